use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::live::LiveList;
use crate::realtime::{ChangeHub, ChangeKind, Table};
use crate::types::account::{Account, NewAccount};
use crate::types::note::{NewNote, Note, NotePatch, NoteScope};
use crate::types::profile::Profile;

pub mod memory;
pub mod postgres;

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

/// Row access for the `notes`, `profiles` and `accounts` collections.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Newest first.
    async fn list_notes(&self, scope: NoteScope) -> Result<Vec<Note>, handle_errors::Error>;
    async fn get_note(&self, id: Uuid) -> Result<Note, handle_errors::Error>;
    async fn insert_note(&self, note: NewNote) -> Result<Note, handle_errors::Error>;
    async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Note, handle_errors::Error>;
    async fn delete_note(&self, id: Uuid) -> Result<Note, handle_errors::Error>;
    async fn get_profile(&self, id: Uuid) -> Result<Profile, handle_errors::Error>;
    /// Newest first.
    async fn list_profiles(&self) -> Result<Vec<Profile>, handle_errors::Error>;
    /// Creates the account and its profile together.
    async fn add_account(&self, account: NewAccount) -> Result<Profile, handle_errors::Error>;
    async fn get_account(&self, email: &str) -> Result<Account, handle_errors::Error>;
}

/// Backend plus the change hub every successful mutation is published on.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
    hub: ChangeHub,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self, handle_errors::Error> {
        let backend = PgBackend::connect(db_url).await?;
        Ok(Store::with_backend(Arc::new(backend)))
    }

    pub fn in_memory() -> Self {
        Store::with_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        Store {
            backend,
            hub: ChangeHub::new(),
        }
    }

    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    pub async fn get_notes(&self, scope: NoteScope) -> Result<Vec<Note>, handle_errors::Error> {
        self.backend.list_notes(scope).await
    }

    pub async fn get_note(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        self.backend.get_note(id).await
    }

    pub async fn add_note(&self, note: NewNote) -> Result<Note, handle_errors::Error> {
        match self.backend.insert_note(note).await {
            Ok(note) => {
                info!(id = %note.id, user_id = %note.user_id, "note created");
                self.hub.publish(Table::Notes, ChangeKind::Insert, note.id);
                Ok(note)
            }
            Err(e) => {
                error!("Error creating note: {}", e);
                Err(e)
            }
        }
    }

    pub async fn update_note(
        &self,
        id: Uuid,
        patch: NotePatch,
    ) -> Result<Note, handle_errors::Error> {
        if patch.is_empty() {
            return Err(handle_errors::Error::MissingParameters);
        }
        patch.validate()?;
        match self.backend.update_note(id, patch).await {
            Ok(note) => {
                info!(%id, "note updated");
                self.hub.publish(Table::Notes, ChangeKind::Update, id);
                Ok(note)
            }
            Err(e) => {
                error!(%id, "Error updating note: {}", e);
                Err(e)
            }
        }
    }

    /// Flips `is_public` based on the currently stored value.
    pub async fn toggle_visibility(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        let note = self.backend.get_note(id).await?;
        self.update_note(id, NotePatch::visibility(!note.is_public))
            .await
    }

    pub async fn delete_note(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        match self.backend.delete_note(id).await {
            Ok(note) => {
                info!(%id, "note deleted");
                self.hub.publish(Table::Notes, ChangeKind::Delete, id);
                Ok(note)
            }
            Err(e) => {
                error!(%id, "Error deleting note: {}", e);
                Err(e)
            }
        }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Profile, handle_errors::Error> {
        self.backend.get_profile(id).await
    }

    pub async fn get_profiles(&self) -> Result<Vec<Profile>, handle_errors::Error> {
        self.backend.list_profiles().await
    }

    pub async fn add_account(&self, account: NewAccount) -> Result<Profile, handle_errors::Error> {
        let profile = self.backend.add_account(account).await?;
        info!(id = %profile.id, "account added");
        self.hub
            .publish(Table::Profiles, ChangeKind::Insert, profile.id);
        Ok(profile)
    }

    pub async fn get_account(&self, email: &str) -> Result<Account, handle_errors::Error> {
        self.backend.get_account(email).await
    }

    /// Notes in `scope`, refetched whole whenever the `notes` table changes.
    pub fn live_notes(&self, scope: NoteScope) -> LiveList<Note> {
        let backend = self.backend.clone();
        LiveList::spawn(self.hub.subscribe(Table::Notes), move || {
            let backend = backend.clone();
            async move { backend.list_notes(scope).await }
        })
    }

    pub fn live_profiles(&self) -> LiveList<Profile> {
        let backend = self.backend.clone();
        LiveList::spawn(self.hub.subscribe(Table::Profiles), move || {
            let backend = backend.clone();
            async move { backend.list_profiles().await }
        })
    }
}
