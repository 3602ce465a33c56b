//! Platform API Client
//!
//! The [`ApiClient`] trait is the only seam between the reconciler and the
//! network. Every call is generic over a [`WireObject`], which ties a wire
//! shape to its resource [`Kind`] so one client serves all three kinds.
//!
//! - [`RestClient`]: reqwest over the platform's JSON API
//! - `MemoryClient`: in-process double used by the test suite

mod rest;

#[cfg(test)]
pub(crate) mod memory;

pub use rest::{ClientConfig, RestClient};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::reconcile::Kind;
use crate::wire::{CustomerRef, DnsZoneWire, RulesetWire, TrafficPatternWire};

/// A failed remote call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("object not found")]
    NotFound,

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A wire shape stored by the platform as one addressable object
pub trait WireObject: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: Kind;

    fn id(&self) -> Option<i64>;

    fn name(&self) -> Option<&str>;

    /// Attach the owning customer; sent on create only
    fn set_customer(&mut self, customer_id: i64);
}

impl WireObject for DnsZoneWire {
    const KIND: Kind = Kind::DnsZone;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_customer(&mut self, customer_id: i64) {
        self.customer_ref = Some(CustomerRef { id: customer_id });
    }
}

impl WireObject for TrafficPatternWire {
    const KIND: Kind = Kind::TrafficPattern;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_customer(&mut self, customer_id: i64) {
        self.customer_ref = Some(CustomerRef { id: customer_id });
    }
}

impl WireObject for RulesetWire {
    const KIND: Kind = Kind::Ruleset;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_customer(&mut self, customer_id: i64) {
        self.customer_ref = Some(CustomerRef { id: customer_id });
    }
}

/// Remote CRUD contract used by the reconciler
///
/// Implementations own transport concerns (authentication, timeouts). The
/// reconciler never retries, so neither should they silently.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Whether an object of this kind with this exact name exists
    async fn exists<W: WireObject>(&self, name: &str) -> Result<bool, ApiError> {
        Ok(self.id_by_name::<W>(name).await?.is_some())
    }

    /// Numeric id of the object with this exact name, if any
    async fn id_by_name<W: WireObject>(&self, name: &str) -> Result<Option<i64>, ApiError>;

    async fn create<W: WireObject>(&self, object: &W) -> Result<W, ApiError>;

    /// Fails with [`ApiError::NotFound`] when no such object exists
    async fn get_by_id<W: WireObject>(&self, id: i64) -> Result<W, ApiError>;

    /// Partial update: members absent from `object` are left unchanged remotely
    async fn update<W: WireObject>(&self, id: i64, object: &W) -> Result<W, ApiError>;

    async fn delete<W: WireObject>(&self, id: i64) -> Result<(), ApiError>;

    /// Every object of this kind visible to the configured customer
    async fn list_all<W: WireObject>(&self) -> Result<Vec<W>, ApiError>;

    fn customer_id(&self) -> i64;
}
