use serde::{Deserialize, Serialize};

use crate::types::note::Note;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityFilter {
    #[default]
    All,
    Public,
    Private,
}

impl VisibilityFilter {
    pub fn matches(self, note: &Note) -> bool {
        match self {
            VisibilityFilter::All => true,
            VisibilityFilter::Public => note.is_public,
            VisibilityFilter::Private => !note.is_public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityFilter::All => "all",
            VisibilityFilter::Public => "public",
            VisibilityFilter::Private => "private",
        }
    }
}

/// Search box plus visibility select of the admin table.
///
/// Only ever applied to notes that were already fetched; the store query is
/// not narrowed by it.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AdminFilter {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub visibility: VisibilityFilter,
}

impl AdminFilter {
    pub fn matches(&self, note: &Note) -> bool {
        let needle = self.q.to_lowercase();
        let matches_search = note.title.to_lowercase().contains(&needle)
            || note.content.to_lowercase().contains(&needle);
        matches_search && self.visibility.matches(note)
    }

    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|n| self.matches(n)).collect()
    }
}
