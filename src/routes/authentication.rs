use std::sync::Arc;

use argon2::Config;
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{info, warn};
use warp::{http::StatusCode, Filter};

use crate::store::Store;
use crate::types::account::{normalize_email, Login, NewAccount, Registration, Session};
use crate::types::profile::Profile;

pub const TOKEN_COOKIE: &str = "token";
const TOKEN_KEY_LEN: usize = 32;

/// Token key and the registration policy shared by the auth handlers.
#[derive(Clone)]
pub struct AuthSettings {
    key: Arc<Vec<u8>>,
    admin_emails: Arc<Vec<String>>,
    token_lifetime: Duration,
}

impl AuthSettings {
    pub fn new(key: &str, admin_emails: Vec<String>) -> Result<Self, handle_errors::Error> {
        if key.len() != TOKEN_KEY_LEN {
            return Err(handle_errors::Error::Configuration(format!(
                "token_key must be exactly {} bytes",
                TOKEN_KEY_LEN
            )));
        }
        Ok(AuthSettings {
            key: Arc::new(key.as_bytes().to_vec()),
            admin_emails: Arc::new(admin_emails.iter().map(|e| normalize_email(e)).collect()),
            token_lifetime: Duration::days(1),
        })
    }

    fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

pub fn hash_password(password: &[u8]) -> Result<String, handle_errors::Error> {
    let salt = rand::thread_rng().gen::<[u8; 32]>();
    let config = Config::default();
    argon2::hash_encoded(password, &salt, &config).map_err(handle_errors::Error::ArgonLibraryError)
}

fn verify_password(
    hash: &str,
    password: &[u8],
) -> Result<bool, argon2::Error> {
    argon2::verify_encoded(hash, password)
}

pub fn issue_token(settings: &AuthSettings, profile: &Profile) -> Result<String, handle_errors::Error> {
    let now = Utc::now();
    let dt = now + settings.token_lifetime;

    paseto::tokens::PasetoBuilder::new()
        .set_encryption_key(&settings.key[..])
        .set_expiration(&dt)
        .set_not_before(&now)
        .set_claim("user_id", serde_json::json!(profile.id))
        .set_claim("email", serde_json::json!(profile.email))
        .build()
        .map_err(|_| handle_errors::Error::CannotIssueToken)
}

pub fn verify_token(settings: &AuthSettings, token: &str) -> Result<Session, handle_errors::Error> {
    let token = paseto::tokens::validate_local_token(
        token,
        None,
        &settings.key[..],
        &paseto::tokens::TimeBackend::Chrono,
    )
    .map_err(|_| handle_errors::Error::CannotDecryptToken)?;

    serde_json::from_value::<Session>(token).map_err(|_| handle_errors::Error::CannotDecryptToken)
}

fn strip_bearer(header: String) -> String {
    match header.strip_prefix("Bearer ") {
        Some(token) => token.to_string(),
        None => header,
    }
}

/// The caller's session, if the `Authorization` header or the token cookie
/// carries a valid one. The header is tried first.
pub fn session(
    settings: AuthSettings,
) -> impl Filter<Extract = (Option<Session>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::cookie::optional(TOKEN_COOKIE))
        .map(move |header: Option<String>, cookie: Option<String>| {
            header
                .map(strip_bearer)
                .into_iter()
                .chain(cookie)
                .find_map(|token| match verify_token(&settings, &token) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        warn!("rejected session token: {}", e);
                        None
                    }
                })
        })
}

/// Like [`session`] but rejects with `Unauthorized` when there is none.
pub fn auth(
    settings: AuthSettings,
) -> impl Filter<Extract = (Session,), Error = warp::Rejection> + Clone {
    session(settings).and_then(|session: Option<Session>| async move {
        session.ok_or_else(|| warp::reject::custom(handle_errors::Error::Unauthorized))
    })
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        TOKEN_COOKIE, token
    )
}

pub fn expired_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", TOKEN_COOKIE)
}

/// Creates the account and its profile. Listed admin emails get the admin flag.
pub async fn create_account(
    store: &Store,
    settings: &AuthSettings,
    registration: Registration,
) -> Result<Profile, handle_errors::Error> {
    let email = normalize_email(&registration.email);
    if email.is_empty() || registration.password.is_empty() {
        return Err(handle_errors::Error::MissingParameters);
    }
    let password = hash_password(registration.password.as_bytes())?;
    let full_name = registration
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let account = NewAccount {
        is_admin: settings.is_admin_email(&email),
        email,
        password,
        full_name,
    };
    store.add_account(account).await
}

/// Verifies credentials and issues a session token.
pub async fn sign_in(
    store: &Store,
    settings: &AuthSettings,
    login: Login,
) -> Result<String, handle_errors::Error> {
    let account = store.get_account(&normalize_email(&login.email)).await?;
    match verify_password(&account.password, login.password.as_bytes()) {
        Ok(true) => {
            let profile = store.get_profile(account.id).await?;
            issue_token(settings, &profile)
        }
        Ok(false) => Err(handle_errors::Error::WrongPassword),
        Err(e) => Err(handle_errors::Error::ArgonLibraryError(e)),
    }
}

pub async fn register(
    store: Store,
    settings: AuthSettings,
    registration: Registration,
) -> Result<impl warp::Reply, warp::Rejection> {
    match create_account(&store, &settings, registration).await {
        Ok(profile) => {
            info!("Account registered: {}", profile.email);
            Ok(warp::reply::with_status(
                warp::reply::json(&profile),
                StatusCode::CREATED,
            ))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn login(
    store: Store,
    settings: AuthSettings,
    login: Login,
) -> Result<impl warp::Reply, warp::Rejection> {
    match sign_in(&store, &settings, login).await {
        Ok(token) => {
            let cookie = session_cookie(&token);
            Ok(warp::reply::with_header(
                warp::reply::json(&token),
                "set-cookie",
                cookie,
            ))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn logout() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::with_header(
        warp::reply::with_status("Signed out", StatusCode::OK),
        "set-cookie",
        expired_cookie(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings::new("0123456789abcdef0123456789abcdef", vec!["Boss@Example.com".to_string()])
            .unwrap()
    }

    fn profile() -> Profile {
        Profile {
            id: uuid::Uuid::new_v4(),
            created_at: Utc::now(),
            email: "someone@example.com".to_string(),
            full_name: None,
            avatar_url: None,
            is_admin: false,
        }
    }

    #[test]
    fn issued_tokens_verify_to_the_same_user() {
        let settings = settings();
        let profile = profile();
        let token = issue_token(&settings, &profile).unwrap();
        let session = verify_token(&settings, &token).unwrap();
        assert_eq!(session.user_id, profile.id);
        assert_eq!(session.email, profile.email);
    }

    #[test]
    fn tokens_from_another_key_are_rejected() {
        let token = issue_token(&settings(), &profile()).unwrap();
        let other = AuthSettings::new("ffffffffffffffffffffffffffffffff", vec![]).unwrap();
        assert!(verify_token(&other, &token).is_err());
        assert!(verify_token(&settings(), "garbage").is_err());
    }

    #[test]
    fn short_keys_are_a_configuration_error() {
        assert!(AuthSettings::new("short", vec![]).is_err());
    }

    #[test]
    fn admin_emails_are_normalized() {
        assert!(settings().is_admin_email("boss@example.com"));
        assert!(!settings().is_admin_email("someone@example.com"));
    }

    #[test]
    fn passwords_round_trip_through_argon() {
        let hash = hash_password(b"hunter2").unwrap();
        assert!(verify_password(&hash, b"hunter2").unwrap());
        assert!(!verify_password(&hash, b"hunter3").unwrap());
    }

    #[tokio::test]
    async fn bad_header_falls_back_to_the_cookie() {
        let settings = settings();
        let profile = profile();
        let token = issue_token(&settings, &profile).unwrap();

        let found = warp::test::request()
            .header("authorization", "Bearer junk")
            .header("cookie", format!("{}={}", TOKEN_COOKIE, token))
            .filter(&session(settings.clone()))
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.user_id), Some(profile.id));

        let anonymous = warp::test::request()
            .header("authorization", "Bearer junk")
            .filter(&session(settings))
            .await
            .unwrap();
        assert!(anonymous.is_none());
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(strip_bearer("Bearer abc".to_string()), "abc");
        assert_eq!(strip_bearer("abc".to_string()), "abc");
    }
}
