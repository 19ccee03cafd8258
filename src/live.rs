use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::realtime::Subscription;

type Fetch<T> = Box<dyn Fn() -> BoxFuture<'static, Result<Vec<T>, handle_errors::Error>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    /// True until the first fetch succeeds.
    pub loading: bool,
    /// Ticket of the fetch that produced `items`; 0 before any.
    pub revision: u64,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Snapshot {
            items: Vec::new(),
            loading: true,
            revision: 0,
        }
    }
}

struct Refetcher<T> {
    fetch: Fetch<T>,
    issued: AtomicU64,
    state: watch::Sender<Snapshot<T>>,
}

impl<T> Refetcher<T> {
    async fn refetch(&self) -> bool {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        match (self.fetch)().await {
            Ok(items) => self.apply(ticket, items),
            Err(e) => {
                warn!(ticket, "refetch failed, keeping previous list: {}", e);
                false
            }
        }
    }

    /// Applies a finished fetch unless a later-issued one already landed.
    fn apply(&self, ticket: u64, items: Vec<T>) -> bool {
        let applied = self.state.send_if_modified(|snapshot| {
            if ticket <= snapshot.revision {
                return false;
            }
            snapshot.items = items;
            snapshot.loading = false;
            snapshot.revision = ticket;
            true
        });
        if !applied {
            debug!(ticket, "discarded stale fetch result");
        }
        applied
    }
}

/// A list kept in sync with a table by refetching it whole on every change.
///
/// Owns its subscription through a background task; dropping the list aborts
/// the task, which releases the subscription.
pub struct LiveList<T> {
    refetcher: Arc<Refetcher<T>>,
    task: JoinHandle<()>,
}

impl<T> LiveList<T>
where
    T: Send + Sync + 'static,
{
    pub fn spawn<F, Fut>(mut subscription: Subscription, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, handle_errors::Error>> + Send + 'static,
    {
        let (state, _) = watch::channel(Snapshot::default());
        let refetcher = Arc::new(Refetcher {
            fetch: Box::new(move || fetch().boxed()),
            issued: AtomicU64::new(0),
            state,
        });

        let worker = refetcher.clone();
        let task = tokio::spawn(async move {
            worker.refetch().await;
            while let Some(change) = subscription.changed().await {
                debug!(table = subscription.table().name(), ?change, "refetching");
                worker.refetch().await;
            }
        });

        LiveList { refetcher, task }
    }

    pub fn watch(&self) -> watch::Receiver<Snapshot<T>> {
        self.refetcher.state.subscribe()
    }
}

impl<T> Drop for LiveList<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::{ChangeHub, ChangeKind, Table};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use uuid::Uuid;

    fn refetcher() -> Refetcher<u32> {
        let (state, _) = watch::channel(Snapshot::default());
        Refetcher {
            fetch: Box::new(|| async { Ok::<Vec<u32>, handle_errors::Error>(Vec::new()) }.boxed()),
            issued: AtomicU64::new(0),
            state,
        }
    }

    #[test]
    fn stale_results_never_overwrite_newer_ones() {
        let r = refetcher();
        assert!(r.apply(2, vec![2]));
        assert!(!r.apply(1, vec![1]));
        let snapshot = r.state.borrow().clone();
        assert_eq!(snapshot.items, vec![2]);
        assert_eq!(snapshot.revision, 2);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn every_change_triggers_a_full_refetch() {
        let hub = ChangeHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let list = LiveList::spawn(hub.subscribe(Table::Notes), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(vec![n]) }
        });
        let mut rx = list.watch();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().items, vec![1]);

        hub.publish(Table::Notes, ChangeKind::Update, Uuid::new_v4());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().items, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetches_keep_the_loading_state() {
        let hub = ChangeHub::new();
        let list: LiveList<u32> = LiveList::spawn(hub.subscribe(Table::Notes), || async {
            Err(handle_errors::Error::Unauthorized)
        });
        assert!(!list.refetcher.refetch().await);
        let snapshot = list.watch().borrow().clone();
        assert!(snapshot.loading);
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn dropping_the_list_releases_its_subscription() {
        let hub = ChangeHub::new();
        let list: LiveList<u32> =
            LiveList::spawn(hub.subscribe(Table::Profiles), || async { Ok(vec![]) });
        assert_eq!(hub.subscriber_count(Table::Profiles), 1);
        drop(list);
        tokio::time::timeout(Duration::from_secs(5), async {
            while hub.subscriber_count(Table::Profiles) > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("subscription still alive");
    }
}
