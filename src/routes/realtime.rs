use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};
use warp::ws::{Message, WebSocket, Ws};

use crate::live::LiveList;
use crate::realtime::Table;
use crate::store::Store;
use crate::types::account::Session;
use crate::types::note::NoteScope;

#[derive(Serialize)]
struct SnapshotMessage<'a, T> {
    table: Table,
    items: &'a [T],
}

/// Upgrades to a socket that receives the caller's scoped list after every
/// refetch. Admins see all notes; profiles are admin only.
pub async fn subscribe(
    table: Table,
    ws: Ws,
    session: Session,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile = store
        .get_profile(session.user_id)
        .await
        .map_err(warp::reject::custom)?;
    if table == Table::Profiles && !profile.is_admin {
        return Err(warp::reject::custom(handle_errors::Error::Forbidden));
    }
    let scope = if profile.is_admin {
        NoteScope::All
    } else {
        NoteScope::OwnedBy(profile.id)
    };

    Ok(ws.on_upgrade(move |socket| async move {
        info!(user_id = %profile.id, table = table.name(), "realtime subscriber connected");
        let (tx, rx) = socket.split();
        match table {
            Table::Notes => forward(store.live_notes(scope), table, tx, rx).await,
            Table::Profiles => forward(store.live_profiles(), table, tx, rx).await,
        }
        info!(user_id = %profile.id, table = table.name(), "realtime subscriber gone");
    }))
}

/// Pushes snapshots until either side goes away. A refetch that yields the
/// same list as the last push sends nothing. Returning drops `list`, which
/// tears its subscription down.
async fn forward<T>(
    list: LiveList<T>,
    table: Table,
    mut tx: SplitSink<WebSocket, Message>,
    mut rx: SplitStream<WebSocket>,
) where
    T: Serialize + Send + Sync + 'static,
{
    let mut snapshots = list.watch();
    let mut sent = 0;
    let mut last_pushed: Option<String> = None;
    loop {
        let payload = {
            let snapshot = snapshots.borrow_and_update();
            if snapshot.revision > sent {
                sent = snapshot.revision;
                Some(serde_json::to_string(&SnapshotMessage {
                    table,
                    items: &snapshot.items,
                }))
            } else {
                None
            }
        };
        match payload {
            Some(Ok(text)) if last_pushed.as_deref() == Some(text.as_str()) => {
                debug!(table = table.name(), "snapshot unchanged, not pushed");
            }
            Some(Ok(text)) => {
                if tx.send(Message::text(text.clone())).await.is_err() {
                    break;
                }
                last_pushed = Some(text);
            }
            Some(Err(e)) => warn!("cannot encode snapshot: {}", e),
            None => {}
        }

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            incoming = rx.next() => match incoming {
                Some(Ok(msg)) if !msg.is_close() => debug!("ignoring client message"),
                _ => break,
            },
        }
    }
    drop(list);
}
