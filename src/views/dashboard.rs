use uuid::Uuid;

use crate::types::note::Note;
use crate::types::profile::Profile;
use crate::views::{escape, nav, note_card, note_form, page};

/// Local UI state carried in the dashboard URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardState {
    pub form_open: bool,
    pub editing: Option<Uuid>,
}

pub fn render(profile: &Profile, notes: &[Note], state: DashboardState) -> String {
    let mut links = format!("<span class='email'>{}</span>", escape(&profile.email));
    if profile.is_admin {
        links.push_str("<a href='/admin'>Admin Dashboard</a>");
    }

    let mut body = nav("Cloud Notes Hub 2.0", &links);
    body.push_str("<main><div class='my-notes'><h2>My Notes</h2>");
    body.push_str(&note_form::render(state.form_open));
    body.push_str("</div><div class='note-grid'>");
    for note in notes {
        body.push_str(&note_card::render(note, state.editing == Some(note.id)));
    }
    body.push_str("</div>");
    if notes.is_empty() {
        body.push_str(
            "<div class='empty'>No notes yet. Create your first note to get started!</div>",
        );
    }
    body.push_str("</main>");

    page("Dashboard", &body, &["notes"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(is_admin: bool) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            email: "me@example.com".to_string(),
            full_name: None,
            avatar_url: None,
            is_admin,
        }
    }

    #[test]
    fn admin_link_only_for_admins() {
        let state = DashboardState::default();
        assert!(render(&profile(true), &[], state).contains("Admin Dashboard"));
        assert!(!render(&profile(false), &[], state).contains("Admin Dashboard"));
    }

    #[test]
    fn empty_dashboard_invites_a_first_note() {
        let html = render(&profile(false), &[], DashboardState::default());
        assert!(html.contains("No notes yet."));
        assert!(html.contains("me@example.com"));
    }
}
