#![allow(dead_code)]

use notes_hub::routes::authentication::{create_account, issue_token, AuthSettings};
use notes_hub::store::Store;
use notes_hub::types::account::Registration;
use notes_hub::types::profile::Profile;

pub const KEY: &str = "RANDOM WORDS WINTER MACINTOSH PC";
pub const ADMIN: &str = "admin@example.com";
pub const PASSWORD: &str = "correct horse";

pub fn settings() -> AuthSettings {
    AuthSettings::new(KEY, vec![ADMIN.to_string()]).unwrap()
}

pub struct User {
    pub profile: Profile,
    pub token: String,
}

impl User {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn cookie(&self) -> String {
        format!("token={}", self.token)
    }
}

pub async fn register(store: &Store, settings: &AuthSettings, email: &str) -> User {
    let registration = Registration {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        full_name: None,
    };
    let profile = create_account(store, settings, registration).await.unwrap();
    let token = issue_token(settings, &profile).unwrap();
    User { profile, token }
}
