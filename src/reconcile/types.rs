//! Reconciliation Types
//!
//! Resource kinds, the lifecycle state machine and the snapshot the
//! reconciler keeps for each managed object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remote resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    DnsZone,
    TrafficPattern,
    Ruleset,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::DnsZone => write!(f, "DNS zone"),
            Kind::TrafficPattern => write!(f, "traffic pattern"),
            Kind::Ruleset => write!(f, "ruleset"),
        }
    }
}

/// Reconciliation operation, as named in errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one managed object
///
/// ```text
/// Planned --create--> Created --read--> Synced --update--> Updated
///    |                   \________________|__________________/
///    +--import--> Synced                  |
///                                      delete --> Deleted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Declared but not yet on the platform
    Planned,
    Created,
    Synced,
    Updated,
    /// Terminal
    Deleted,
}

impl Lifecycle {
    /// State reached by applying `operation` in this state, if allowed
    pub fn transition(self, operation: Operation) -> Option<Lifecycle> {
        use Lifecycle::*;
        use Operation::*;

        match (self, operation) {
            (Planned, Create) => Some(Created),
            (Planned, Import) => Some(Synced),
            (Created | Synced | Updated, Read) => Some(Synced),
            (Created | Synced | Updated, Update) => Some(Updated),
            (Created | Synced | Updated, Delete) => Some(Deleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Planned => write!(f, "planned"),
            Lifecycle::Created => write!(f, "created"),
            Lifecycle::Synced => write!(f, "synced"),
            Lifecycle::Updated => write!(f, "updated"),
            Lifecycle::Deleted => write!(f, "deleted"),
        }
    }
}

/// Last known state of a managed object
///
/// Produced only by the reconciler; a failed operation never touches an
/// existing snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<M> {
    pub kind: Kind,
    /// Remote id, captured once at creation or import
    pub id: i64,
    /// Name the object had when last seen
    pub name: String,
    pub model: M,
    pub state: Lifecycle,
    /// Time of the last local mutation (create, update, import)
    pub last_updated: DateTime<Utc>,
}

/// Result of reading back a managed object
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<M> {
    /// The remote object matches our identity; here is its current state
    Synced(Snapshot<M>),
    /// The remote object no longer exists
    Gone,
    /// The object was renamed out of band and must be recreated
    Replace { remote_name: String },
}
