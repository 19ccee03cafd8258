use crate::types::note::Note;
use crate::views::escape;

fn date(note_time: &chrono::DateTime<chrono::Utc>) -> String {
    note_time.format("%Y-%m-%d").to_string()
}

/// One note on the dashboard, either read-only or as an edit form.
pub fn render(note: &Note, editing: bool) -> String {
    let mut s = String::new();
    s.push_str(&format!("<div class='note-card' id='note-{}'>", note.id));
    if editing {
        s.push_str(&format!(
            "<form method='post' action='/dashboard/notes/{}'>",
            note.id
        ));
        s.push_str(&format!(
            "<input type='text' name='title' value=\"{}\" placeholder='Note title'>",
            escape(&note.title)
        ));
        s.push_str(&format!(
            "<textarea name='content' rows='6' placeholder='Note content'>{}</textarea>",
            escape(&note.content)
        ));
        s.push_str("<button type='submit'>Save</button>");
        s.push_str("<a href='/dashboard'>Cancel</a>");
        s.push_str("</form>");
    } else {
        s.push_str("<div class='note-header'>");
        s.push_str(&format!("<h3>{}</h3>", escape(&note.title)));
        s.push_str(&format!(
            "<a href='/dashboard?edit={}'>Edit</a>",
            note.id
        ));
        s.push_str(&format!(
            "<form method='post' action='/dashboard/notes/{}/delete' \
             onsubmit=\"return confirm('Are you sure you want to delete this note?')\">\
             <input type='hidden' name='confirm' value='true'>\
             <button type='submit'>Delete</button></form>",
            note.id
        ));
        s.push_str("</div>");
        s.push_str(&format!(
            "<p class='note-content'>{}</p>",
            escape(&note.content)
        ));
        s.push_str("<div class='note-meta'>");
        s.push_str(&format!("<span>Created: {}</span>", date(&note.created_at)));
        if note.updated_at != note.created_at {
            s.push_str(&format!("<span>Updated: {}</span>", date(&note.updated_at)));
        }
        if note.is_public {
            s.push_str("<span class='badge-public'>Public</span>");
        }
        s.push_str("</div>");
    }
    s.push_str("</div>");
    s
}
