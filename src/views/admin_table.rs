use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use uuid::Uuid;

use crate::types::filter::AdminFilter;
use crate::types::note::Note;
use crate::types::profile::ProfileDirectory;
use crate::views::escape;

/// Query string that reproduces `filter`, so actions land back on the same view.
pub fn filter_query(filter: &AdminFilter) -> String {
    format!(
        "q={}&visibility={}",
        utf8_percent_encode(&filter.q, NON_ALPHANUMERIC),
        filter.visibility.as_str()
    )
}

fn preview(content: &str) -> String {
    const MAX: usize = 80;
    match content.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}

pub fn render(
    notes: &[&Note],
    profiles: &ProfileDirectory,
    filter: &AdminFilter,
    editing: Option<Uuid>,
) -> String {
    let qs = filter_query(filter);
    let mut s = String::new();
    s.push_str("<div class='admin-table'><table><thead><tr>");
    for heading in ["Title", "Content Preview", "Author", "Status", "Created", "Actions"] {
        s.push_str(&format!("<th>{}</th>", heading));
    }
    s.push_str("</tr></thead><tbody>");

    for note in notes {
        let is_editing = editing == Some(note.id);
        let form_id = format!("edit-{}", note.id);
        s.push_str(&format!("<tr id='row-{}'>", note.id));

        if is_editing {
            s.push_str(&format!(
                "<td><input form='{}' type='text' name='title' value=\"{}\"></td>",
                form_id,
                escape(&note.title)
            ));
            s.push_str(&format!(
                "<td><textarea form='{}' name='content' rows='2'>{}</textarea></td>",
                form_id,
                escape(&note.content)
            ));
        } else {
            s.push_str(&format!("<td>{}</td>", escape(&note.title)));
            s.push_str(&format!("<td>{}</td>", escape(&preview(&note.content))));
        }

        s.push_str(&format!("<td>{}</td>", escape(profiles.email_of(note.user_id))));
        s.push_str(&format!(
            "<td><form method='post' action='/admin/notes/{}/visibility?{}'>\
             <button type='submit' class='{}'>{}</button></form></td>",
            note.id,
            qs,
            if note.is_public { "status-public" } else { "status-private" },
            if note.is_public { "Public" } else { "Private" }
        ));
        s.push_str(&format!(
            "<td>{}</td>",
            note.created_at.format("%Y-%m-%d")
        ));

        s.push_str("<td>");
        if is_editing {
            s.push_str(&format!(
                "<form id='{}' method='post' action='/admin/notes/{}?{}'>\
                 <button type='submit'>Save</button></form>",
                form_id, note.id, qs
            ));
            s.push_str(&format!("<a href='/admin?{}'>Cancel</a>", qs));
        } else {
            s.push_str(&format!(
                "<a href='/admin?{}&edit={}'>Edit</a>",
                qs, note.id
            ));
            s.push_str(&format!(
                "<form method='post' action='/admin/notes/{}/delete?{}' \
                 onsubmit=\"return confirm('Are you sure you want to delete this note?')\">\
                 <input type='hidden' name='confirm' value='true'>\
                 <button type='submit'>Delete</button></form>",
                note.id, qs
            ));
        }
        s.push_str("</td></tr>");
    }
    s.push_str("</tbody></table>");

    if notes.is_empty() {
        s.push_str("<div class='empty'>No notes found</div>");
    }
    s.push_str("</div>");
    s
}
