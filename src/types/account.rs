use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored credentials. `password` holds the argon2 encoded hash.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

/// Account row plus the profile created alongside it.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Claims carried by a session token.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    pub exp: DateTime<Utc>,
    pub user_id: Uuid,
    pub email: String,
    pub nbf: DateTime<Utc>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
