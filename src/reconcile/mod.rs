//! Reconciliation
//!
//! Keeps a local [`Snapshot`] of each managed object in step with the
//! platform. See [`Reconciler`] for the operations and [`Lifecycle`] for
//! the state machine they walk.

mod controller;
mod kinds;
mod types;

pub use controller::Reconciler;
pub use kinds::{DnsZones, Resource, Rulesets, TrafficPatterns};
pub use types::{Kind, Lifecycle, Operation, ReadOutcome, Snapshot};
