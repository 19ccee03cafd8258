use crate::routes::profile::require_admin;
use crate::store::Store;
use crate::types::account::Session;
use crate::types::filter::AdminFilter;
use crate::types::note::NoteScope;

/// Every user's notes, narrowed by the admin filter after fetching.
pub async fn get_notes(
    session: Session,
    store: Store,
    filter: AdminFilter,
) -> Result<impl warp::Reply, warp::Rejection> {
    require_admin(&store, &session).await?;
    let notes = store
        .get_notes(NoteScope::All)
        .await
        .map_err(warp::reject::custom)?;
    let shown = filter.apply(&notes);
    Ok(warp::reply::json(&shown))
}

pub async fn get_profiles(session: Session, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    require_admin(&store, &session).await?;
    let profiles = store.get_profiles().await.map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&profiles))
}
