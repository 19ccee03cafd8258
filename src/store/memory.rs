use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Backend;
use crate::types::account::{Account, NewAccount};
use crate::types::note::{NewNote, Note, NotePatch, NoteScope};
use crate::types::profile::Profile;

#[derive(Default)]
struct Tables {
    notes: Vec<Note>,
    profiles: Vec<Profile>,
    accounts: Vec<Account>,
}

/// Process-local backend. Rows live in insertion order; listings are
/// returned newest first like the postgres queries.
#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first. Rows sharing a timestamp keep reverse insertion order.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_notes(&self, scope: NoteScope) -> Result<Vec<Note>, handle_errors::Error> {
        let tables = self.tables.read().await;
        let visible: Vec<Note> = tables
            .notes
            .iter()
            .filter(|n| scope.admits(n))
            .cloned()
            .collect();
        Ok(newest_first(&visible, |n| n.created_at))
    }

    async fn get_note(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        let tables = self.tables.read().await;
        tables
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(handle_errors::Error::NoteNotFound)
    }

    async fn insert_note(&self, note: NewNote) -> Result<Note, handle_errors::Error> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: note.title,
            content: note.content,
            user_id: note.user_id,
            is_public: note.is_public,
        };
        self.tables.write().await.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Note, handle_errors::Error> {
        let mut tables = self.tables.write().await;
        let note = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(handle_errors::Error::NoteNotFound)?;
        patch.apply(note);
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete_note(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        let mut tables = self.tables.write().await;
        let idx = tables
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(handle_errors::Error::NoteNotFound)?;
        Ok(tables.notes.remove(idx))
    }

    async fn get_profile(&self, id: Uuid) -> Result<Profile, handle_errors::Error> {
        let tables = self.tables.read().await;
        tables
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(handle_errors::Error::ProfileNotFound)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, handle_errors::Error> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.profiles, |p| p.created_at))
    }

    async fn add_account(&self, account: NewAccount) -> Result<Profile, handle_errors::Error> {
        let mut tables = self.tables.write().await;
        if tables.accounts.iter().any(|a| a.email == account.email) {
            return Err(handle_errors::Error::EmailTaken);
        }
        let id = Uuid::new_v4();
        let profile = Profile {
            id,
            created_at: Utc::now(),
            email: account.email.clone(),
            full_name: account.full_name,
            avatar_url: None,
            is_admin: account.is_admin,
        };
        tables.accounts.push(Account {
            id,
            email: account.email,
            password: account.password,
        });
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn get_account(&self, email: &str) -> Result<Account, handle_errors::Error> {
        let tables = self.tables.read().await;
        tables
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(handle_errors::Error::AccountNotFound)
    }
}
