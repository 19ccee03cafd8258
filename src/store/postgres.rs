use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::Backend;
use crate::types::account::{Account, NewAccount};
use crate::types::note::{NewNote, Note, NotePatch, NoteScope};
use crate::types::profile::Profile;

const NOTE_COLUMNS: &str = "id, created_at, updated_at, title, content, user_id, is_public";
const PROFILE_COLUMNS: &str = "id, created_at, email, full_name, avatar_url, is_admin";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgBackend {
    pub connection: PgPool,
}

impl PgBackend {
    pub async fn connect(db_url: &str) -> Result<Self, handle_errors::Error> {
        match PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
        {
            Ok(pool) => Ok(PgBackend { connection: pool }),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }
}

fn note_from_row(row: PgRow) -> Note {
    Note {
        id: row.get("id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        title: row.get("title"),
        content: row.get("content"),
        user_id: row.get("user_id"),
        is_public: row.get("is_public"),
    }
}

fn profile_from_row(row: PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        created_at: row.get("created_at"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        avatar_url: row.get("avatar_url"),
        is_admin: row.get("is_admin"),
    }
}

fn account_error(e: sqlx::Error) -> handle_errors::Error {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return handle_errors::Error::EmailTaken;
        }
    }
    handle_errors::Error::DatabaseQueryError(e)
}

#[async_trait]
impl Backend for PgBackend {
    async fn list_notes(&self, scope: NoteScope) -> Result<Vec<Note>, handle_errors::Error> {
        let query = match scope {
            NoteScope::All => format!(
                "SELECT {} FROM notes ORDER BY created_at DESC",
                NOTE_COLUMNS
            ),
            NoteScope::OwnedBy(_) => format!(
                "SELECT {} FROM notes WHERE user_id = $1 ORDER BY created_at DESC",
                NOTE_COLUMNS
            ),
            NoteScope::Public => format!(
                "SELECT {} FROM notes WHERE is_public ORDER BY created_at DESC",
                NOTE_COLUMNS
            ),
        };
        let mut q = sqlx::query(&query);
        if let NoteScope::OwnedBy(user_id) = scope {
            q = q.bind(user_id);
        }
        match q.map(note_from_row).fetch_all(&self.connection).await {
            Ok(notes) => Ok(notes),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn get_note(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        match sqlx::query(&format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS))
            .bind(id)
            .map(note_from_row)
            .fetch_optional(&self.connection)
            .await
        {
            Ok(Some(note)) => Ok(note),
            Ok(None) => Err(handle_errors::Error::NoteNotFound),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn insert_note(&self, note: NewNote) -> Result<Note, handle_errors::Error> {
        match sqlx::query(&format!(
            "INSERT INTO notes (id, title, content, user_id, is_public)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(note.title)
        .bind(note.content)
        .bind(note.user_id)
        .bind(note.is_public)
        .map(note_from_row)
        .fetch_one(&self.connection)
        .await
        {
            Ok(note) => Ok(note),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn update_note(&self, id: Uuid, patch: NotePatch) -> Result<Note, handle_errors::Error> {
        match sqlx::query(&format!(
            "UPDATE notes
            SET title = COALESCE($1, title),
                content = COALESCE($2, content),
                is_public = COALESCE($3, is_public),
                updated_at = now()
            WHERE id = $4
            RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.is_public)
        .bind(id)
        .map(note_from_row)
        .fetch_optional(&self.connection)
        .await
        {
            Ok(Some(note)) => Ok(note),
            Ok(None) => Err(handle_errors::Error::NoteNotFound),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn delete_note(&self, id: Uuid) -> Result<Note, handle_errors::Error> {
        match sqlx::query(&format!(
            "DELETE FROM notes WHERE id = $1 RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(id)
        .map(note_from_row)
        .fetch_optional(&self.connection)
        .await
        {
            Ok(Some(note)) => Ok(note),
            Ok(None) => Err(handle_errors::Error::NoteNotFound),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn get_profile(&self, id: Uuid) -> Result<Profile, handle_errors::Error> {
        match sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .map(profile_from_row)
        .fetch_optional(&self.connection)
        .await
        {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => Err(handle_errors::Error::ProfileNotFound),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, handle_errors::Error> {
        match sqlx::query(&format!(
            "SELECT {} FROM profiles ORDER BY created_at DESC",
            PROFILE_COLUMNS
        ))
        .map(profile_from_row)
        .fetch_all(&self.connection)
        .await
        {
            Ok(profiles) => Ok(profiles),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }

    async fn add_account(&self, account: NewAccount) -> Result<Profile, handle_errors::Error> {
        let mut tx = self
            .connection
            .begin()
            .await
            .map_err(handle_errors::Error::DatabaseQueryError)?;
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO accounts (id, email, password) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&account.email)
            .bind(&account.password)
            .execute(&mut tx)
            .await
            .map_err(account_error)?;

        let profile = sqlx::query(&format!(
            "INSERT INTO profiles (id, email, full_name, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING {}",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(account.is_admin)
        .map(profile_from_row)
        .fetch_one(&mut tx)
        .await
        .map_err(account_error)?;

        tx.commit()
            .await
            .map_err(handle_errors::Error::DatabaseQueryError)?;
        Ok(profile)
    }

    async fn get_account(&self, email: &str) -> Result<Account, handle_errors::Error> {
        match sqlx::query("SELECT id, email, password FROM accounts WHERE email = $1")
            .bind(email)
            .map(|row: PgRow| Account {
                id: row.get("id"),
                email: row.get("email"),
                password: row.get("password"),
            })
            .fetch_optional(&self.connection)
            .await
        {
            Ok(Some(account)) => Ok(account),
            Ok(None) => Err(handle_errors::Error::AccountNotFound),
            Err(e) => Err(handle_errors::Error::DatabaseQueryError(e)),
        }
    }
}
