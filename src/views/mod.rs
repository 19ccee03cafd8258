//! Server-rendered pages. Every piece of user text goes through [`escape`].

use pulldown_cmark::escape::escape_html;

pub mod admin;
pub mod admin_table;
pub mod dashboard;
pub mod login;
pub mod note_card;
pub mod note_form;

/// HTML escaping, including `'` since attributes here are single quoted.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html(&mut out, text).ok();
    out.replace('\'', "&#39;")
}

/// Wraps a body in the shared document shell. `live_tables` are the realtime
/// channels the page listens on; any snapshot reloads the page.
pub fn page(title: &str, body: &str, live_tables: &[&str]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset='utf-8'>");
    html.push_str(&format!("<title>{}</title>", escape(title)));
    html.push_str("</head><body>");
    html.push_str(body);
    if !live_tables.is_empty() {
        html.push_str("<script>");
        for table in live_tables {
            html.push_str(&format!(
                "(function(){{var proto=location.protocol==='https:'?'wss':'ws';\
                 var ws=new WebSocket(proto+'://'+location.host+'/realtime/{}');\
                 var first=true;ws.onmessage=function(){{if(first){{first=false;return;}}location.reload();}};}})();",
                table
            ));
        }
        html.push_str("</script>");
    }
    html.push_str("</body></html>");
    html
}

/// Blocking alert shown when a mutation fails.
pub fn alert(message: &str, back: &str) -> String {
    let body = format!(
        "<div class='alert' role='alert'><p>{}</p><a href='{}'>Back</a></div>",
        escape(message),
        escape(back)
    );
    page("Error", &body, &[])
}

/// Shown while the caller's profile cannot be fetched; polls again.
pub fn loading() -> String {
    let mut html = page("Loading...", "<div class='loading'>Loading...</div>", &[]);
    html = html.replacen(
        "</head>",
        "<meta http-equiv='refresh' content='5'></head>",
        1,
    );
    html
}

pub fn nav(heading: &str, links: &str) -> String {
    format!(
        "<nav><h1>{}</h1><div class='nav-links'>{}\
         <form method='post' action='/session/end'><button type='submit'>Sign Out</button></form>\
         </div></nav>",
        escape(heading),
        links
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_text_is_escaped() {
        assert_eq!(
            escape("<script>alert(\"x\")</script> & more"),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; more"
        );
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn live_pages_open_one_socket_per_table() {
        let html = page("Admin", "<p>x</p>", &["notes", "profiles"]);
        assert!(html.contains("/realtime/notes"));
        assert!(html.contains("/realtime/profiles"));
        assert!(!page("Login", "", &[]).contains("<script>"));
    }

    #[test]
    fn loading_page_refreshes_itself() {
        assert!(loading().contains("http-equiv='refresh'"));
        assert!(loading().contains("Loading..."));
    }
}
