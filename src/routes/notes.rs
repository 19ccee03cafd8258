use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use warp::http::StatusCode;

use crate::store::Store;
use crate::types::account::Session;
use crate::types::note::{Note, NoteDraft, NotePatch, NoteScope};

#[derive(Deserialize, Debug, Default)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

async fn is_admin(store: &Store, session: &Session) -> Result<bool, handle_errors::Error> {
    Ok(store.get_profile(session.user_id).await?.is_admin)
}

/// Notes may be read by their owner, by admins, or by anyone when public.
pub async fn readable_note(
    store: &Store,
    session: &Session,
    id: Uuid,
) -> Result<Note, handle_errors::Error> {
    let note = store.get_note(id).await?;
    if note.is_public || note.is_owned_by(session.user_id) || is_admin(store, session).await? {
        Ok(note)
    } else {
        Err(handle_errors::Error::Forbidden)
    }
}

/// Notes may be changed by their owner or by admins.
pub async fn writable_note(
    store: &Store,
    session: &Session,
    id: Uuid,
) -> Result<Note, handle_errors::Error> {
    let note = store.get_note(id).await?;
    if note.is_owned_by(session.user_id) || is_admin(store, session).await? {
        Ok(note)
    } else {
        Err(handle_errors::Error::Forbidden)
    }
}

pub async fn create_note(
    store: &Store,
    session: &Session,
    draft: NoteDraft,
) -> Result<Note, handle_errors::Error> {
    draft.validate()?;
    store.add_note(draft.into_new_note(session.user_id)).await
}

pub async fn change_note(
    store: &Store,
    session: &Session,
    id: Uuid,
    patch: NotePatch,
) -> Result<Note, handle_errors::Error> {
    writable_note(store, session, id).await?;
    store.update_note(id, patch).await
}

pub async fn flip_visibility(
    store: &Store,
    session: &Session,
    id: Uuid,
) -> Result<Note, handle_errors::Error> {
    writable_note(store, session, id).await?;
    store.toggle_visibility(id).await
}

pub async fn remove_note(
    store: &Store,
    session: &Session,
    id: Uuid,
    confirmed: bool,
) -> Result<Note, handle_errors::Error> {
    if !confirmed {
        return Err(handle_errors::Error::ConfirmationRequired);
    }
    writable_note(store, session, id).await?;
    store.delete_note(id).await
}

pub async fn get_notes(session: Session, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    let notes = store
        .get_notes(NoteScope::OwnedBy(session.user_id))
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&notes))
}

pub async fn get_public_notes(
    _session: Session,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let notes = store
        .get_notes(NoteScope::Public)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&notes))
}

pub async fn get_note(
    id: Uuid,
    session: Session,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    match readable_note(&store, &session, id).await {
        Ok(note) => Ok(warp::reply::json(&note)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn add_note(
    session: Session,
    store: Store,
    draft: NoteDraft,
) -> Result<impl warp::Reply, warp::Rejection> {
    match create_note(&store, &session, draft).await {
        Ok(note) => {
            info!("Note added: {}", note.id);
            Ok(warp::reply::with_status(
                warp::reply::json(&note),
                StatusCode::CREATED,
            ))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn update_note(
    id: Uuid,
    session: Session,
    store: Store,
    patch: NotePatch,
) -> Result<impl warp::Reply, warp::Rejection> {
    match change_note(&store, &session, id, patch).await {
        Ok(note) => Ok(warp::reply::json(&note)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn toggle_visibility(
    id: Uuid,
    session: Session,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    match flip_visibility(&store, &session, id).await {
        Ok(note) => Ok(warp::reply::json(&note)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

pub async fn delete_note(
    id: Uuid,
    session: Session,
    store: Store,
    query: DeleteQuery,
) -> Result<impl warp::Reply, warp::Rejection> {
    match remove_note(&store, &session, id, query.confirm).await {
        Ok(note) => Ok(warp::reply::json(&note)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
