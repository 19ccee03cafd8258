use tracing::warn;

use crate::store::Store;
use crate::types::account::Session;
use crate::types::profile::Profile;

/// Outcome of loading the caller's profile for a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// No live session.
    Login,
    /// The profile could not be fetched.
    Loading,
    Ready(Profile),
}

pub async fn load_profile(store: &Store, session: Option<Session>) -> Gate {
    let session = match session {
        Some(session) => session,
        None => return Gate::Login,
    };
    match store.get_profile(session.user_id).await {
        Ok(profile) => Gate::Ready(profile),
        Err(e) => {
            warn!(user_id = %session.user_id, "profile fetch failed: {}", e);
            Gate::Loading
        }
    }
}

/// Profile of the caller; 403 unless it carries the admin flag.
pub async fn require_admin(store: &Store, session: &Session) -> Result<Profile, warp::Rejection> {
    let profile = store
        .get_profile(session.user_id)
        .await
        .map_err(warp::reject::custom)?;
    if !profile.is_admin {
        return Err(warp::reject::custom(handle_errors::Error::Forbidden));
    }
    Ok(profile)
}

pub async fn get_profile(session: Session, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    match store.get_profile(session.user_id).await {
        Ok(profile) => Ok(warp::reply::json(&profile)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
