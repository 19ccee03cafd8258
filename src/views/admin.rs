use uuid::Uuid;

use crate::types::filter::{AdminFilter, VisibilityFilter};
use crate::types::note::Note;
use crate::types::profile::ProfileDirectory;
use crate::views::{admin_table, escape, nav, page};

fn option(filter: &AdminFilter, value: VisibilityFilter, label: &str) -> String {
    format!(
        "<option value='{}'{}>{}</option>",
        value.as_str(),
        if filter.visibility == value { " selected" } else { "" },
        label
    )
}

/// Admin dashboard over every user's notes. `notes` is the full fetched list;
/// the filter is applied here.
pub fn render(
    notes: &[Note],
    profiles: &ProfileDirectory,
    filter: &AdminFilter,
    editing: Option<Uuid>,
) -> String {
    let links = "<a href='/dashboard'>Back to Dashboard</a>";
    let mut body = nav("Admin Dashboard", links);
    body.push_str("<main><h2>All Notes</h2>");

    body.push_str("<form class='filters' method='get' action='/admin'>");
    body.push_str(&format!(
        "<input type='text' name='q' value=\"{}\" placeholder='Search notes...'>",
        escape(&filter.q)
    ));
    body.push_str("<select name='visibility' onchange='this.form.submit()'>");
    body.push_str(&option(filter, VisibilityFilter::All, "All Notes"));
    body.push_str(&option(filter, VisibilityFilter::Public, "Public Only"));
    body.push_str(&option(filter, VisibilityFilter::Private, "Private Only"));
    body.push_str("</select><button type='submit'>Search</button></form>");

    let shown = filter.apply(notes);
    body.push_str(&format!(
        "<p class='counts'>Showing {} of {} notes from {} users</p>",
        shown.len(),
        notes.len(),
        profiles.user_count()
    ));
    body.push_str(&admin_table::render(&shown, profiles, filter, editing));
    body.push_str("</main>");

    page("Admin Dashboard", &body, &["notes", "profiles"])
}
