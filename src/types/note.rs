use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub is_public: bool,
}

impl Note {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Insert payload. The owner comes from the session, never from the client body.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub is_public: bool,
    pub user_id: Uuid,
}

/// Body of `POST /notes`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_public: bool,
}

impl NoteDraft {
    /// Title and content must both carry something other than whitespace.
    pub fn validate(&self) -> Result<(), handle_errors::Error> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(handle_errors::Error::MissingParameters);
        }
        Ok(())
    }

    pub fn into_new_note(self, user_id: Uuid) -> NewNote {
        NewNote {
            title: self.title,
            content: self.content,
            is_public: self.is_public,
            user_id,
        }
    }
}

/// Partial update. Ownership is fixed at creation, so there is no `user_id`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_public.is_none()
    }

    pub fn visibility(is_public: bool) -> Self {
        NotePatch {
            is_public: Some(is_public),
            ..Default::default()
        }
    }

    /// A patch may not blank out a title or content that it touches.
    pub fn validate(&self) -> Result<(), handle_errors::Error> {
        let blank = |v: &Option<String>| v.as_deref().map_or(false, |s| s.trim().is_empty());
        if blank(&self.title) || blank(&self.content) {
            return Err(handle_errors::Error::MissingParameters);
        }
        Ok(())
    }

    pub fn apply(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(is_public) = self.is_public {
            note.is_public = is_public;
        }
    }
}

/// Which rows a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteScope {
    All,
    OwnedBy(Uuid),
    Public,
}

impl NoteScope {
    pub fn admits(&self, note: &Note) -> bool {
        match self {
            NoteScope::All => true,
            NoteScope::OwnedBy(user_id) => note.user_id == *user_id,
            NoteScope::Public => note.is_public,
        }
    }
}
