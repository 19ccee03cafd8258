use crate::views::{escape, page};

pub fn render(error: Option<&str>) -> String {
    let mut body = String::from("<main class='login'><h1>Cloud Notes Hub 2.0</h1>");
    if let Some(error) = error {
        body.push_str(&format!(
            "<div class='alert' role='alert'>{}</div>",
            escape(error)
        ));
    }
    body.push_str(
        "<form method='post' action='/session'><h2>Sign In</h2>\
         <input type='email' name='email' placeholder='Email' required>\
         <input type='password' name='password' placeholder='Password' required>\
         <button type='submit'>Sign In</button></form>",
    );
    body.push_str(
        "<form method='post' action='/session/register'><h2>Create Account</h2>\
         <input type='text' name='full_name' placeholder='Full name'>\
         <input type='email' name='email' placeholder='Email' required>\
         <input type='password' name='password' placeholder='Password' required>\
         <button type='submit'>Sign Up</button></form>",
    );
    body.push_str("</main>");
    page("Sign In", &body, &[])
}
