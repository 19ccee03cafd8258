use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
}

/// Profiles keyed by id, in fetch order. Used to label notes with their author.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    by_id: IndexMap<Uuid, Profile>,
}

impl ProfileDirectory {
    pub fn new(profiles: Vec<Profile>) -> Self {
        ProfileDirectory {
            by_id: profiles.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn email_of(&self, user_id: Uuid) -> &str {
        self.by_id
            .get(&user_id)
            .map(|p| p.email.as_str())
            .unwrap_or("Unknown")
    }

    pub fn user_count(&self) -> usize {
        self.by_id.len()
    }
}
