//! NGENIX Sync Library
//!
//! Validates, transforms and reconciles three NGENIX platform resource
//! kinds (DNS zones, traffic pattern lists and WAF rulesets) against the
//! platform API.
//!
//! ## Flow
//!
//! `*Input` -> [`validate`] -> model -> [`transform`] `to_wire` ->
//! [`client::ApiClient`] -> [`transform`] `from_wire` -> [`reconcile::Snapshot`]

pub mod catalog;
pub mod client;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod transform;
pub mod validate;
pub mod wire;

pub use client::{ApiClient, ClientConfig, RestClient};
pub use error::{ConsistencyError, ReconcileError, ValidationError};
pub use reconcile::{DnsZones, Kind, Lifecycle, ReadOutcome, Reconciler, Rulesets, Snapshot, TrafficPatterns};
