use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Notes,
    Profiles,
}

impl std::str::FromStr for Table {
    type Err = handle_errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notes" => Ok(Table::Notes),
            "profiles" => Ok(Table::Profiles),
            other => Err(handle_errors::Error::InvalidId(other.to_string())),
        }
    }
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Notes => "notes",
            Table::Profiles => "profiles",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: Uuid,
}

/// Per-table change channels. Cloning shares the same channels.
#[derive(Clone)]
pub struct ChangeHub {
    notes: broadcast::Sender<ChangeEvent>,
    profiles: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (notes, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (profiles, _) = broadcast::channel(CHANNEL_CAPACITY);
        ChangeHub { notes, profiles }
    }

    fn sender(&self, table: Table) -> &broadcast::Sender<ChangeEvent> {
        match table {
            Table::Notes => &self.notes,
            Table::Profiles => &self.profiles,
        }
    }

    pub fn publish(&self, table: Table, kind: ChangeKind, id: Uuid) {
        let event = ChangeEvent { table, kind, id };
        // No subscribers is not an error: nobody is watching.
        match self.sender(table).send(event) {
            Ok(n) => debug!(table = table.name(), ?kind, %id, receivers = n, "change published"),
            Err(_) => debug!(table = table.name(), ?kind, %id, "change published without subscribers"),
        }
    }

    pub fn subscribe(&self, table: Table) -> Subscription {
        Subscription {
            table,
            receiver: self.sender(table).subscribe(),
        }
    }

    pub fn subscriber_count(&self, table: Table) -> usize {
        self.sender(table).receiver_count()
    }
}

/// What a subscription observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Row(ChangeEvent),
    /// The receiver fell behind and skipped this many events.
    Missed(u64),
}

/// A live subscription to one table. Dropping it unsubscribes.
pub struct Subscription {
    table: Table,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn table(&self) -> Table {
        self.table
    }

    /// Waits for the next change on the table. Returns `None` once the hub is gone.
    ///
    /// Missed events are folded into a single `Change::Missed`.
    pub async fn changed(&mut self) -> Option<Change> {
        match self.receiver.recv().await {
            Ok(event) => Some(Change::Row(event)),
            Err(RecvError::Lagged(n)) => {
                warn!(table = self.table.name(), missed = n, "subscription lagged");
                Some(Change::Missed(n))
            }
            Err(RecvError::Closed) => None,
        }
    }
}
