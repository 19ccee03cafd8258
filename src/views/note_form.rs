use serde::Deserialize;

use crate::types::note::NoteDraft;

/// Fields posted by the new-note form. An unchecked checkbox is simply absent.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub is_public: Option<String>,
}

impl NoteForm {
    pub fn into_draft(self) -> NoteDraft {
        NoteDraft {
            title: self.title,
            content: self.content,
            is_public: self.is_public.is_some(),
        }
    }
}

/// The collapsed "+ New Note" button, or the open form.
pub fn render(open: bool) -> String {
    if !open {
        return "<a class='new-note' href='/dashboard?new=1'>+ New Note</a>".to_string();
    }
    let mut s = String::new();
    s.push_str("<form class='note-form' method='post' action='/dashboard/notes'>");
    s.push_str("<div><input type='text' name='title' placeholder='Note title' required></div>");
    s.push_str(
        "<div><textarea name='content' rows='6' placeholder='Note content' required></textarea></div>",
    );
    s.push_str(
        "<div><input type='checkbox' id='isPublic' name='is_public'>\
         <label for='isPublic'>Make this note public</label></div>",
    );
    s.push_str("<div><button type='submit'>Create Note</button>");
    s.push_str("<a href='/dashboard'>Cancel</a></div>");
    s.push_str("</form>");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_presence_sets_visibility() {
        let form = NoteForm {
            title: "t".to_string(),
            content: "c".to_string(),
            is_public: Some("on".to_string()),
        };
        assert!(form.into_draft().is_public);
        assert!(!NoteForm::default().into_draft().is_public);
    }

    #[test]
    fn collapsed_until_opened() {
        assert!(render(false).contains("+ New Note"));
        assert!(render(true).contains("Make this note public"));
    }
}
