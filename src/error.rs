//! Error Taxonomy
//!
//! Three families: validation failures (caught locally, before any remote
//! mutation), consistency failures (the remote side returned something
//! outside the supported grammar) and reconciliation failures (remote call
//! errors and state machine violations).

use thiserror::Error;

use crate::client::ApiError;
use crate::reconcile::{Kind, Lifecycle, Operation};

/// A declarative object was rejected before transformation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value outside a closed enumeration
    #[error("invalid {field} value '{value}', expected one of [{accepted}]")]
    InvalidEnum {
        field: &'static str,
        value: String,
        accepted: String,
    },

    #[error("record '{record}': both fields <data> and <configRef> are set")]
    DataConfigRefConflict { record: String },

    #[error("record '{record}': both fields <data> and <targetGroupRef> are set")]
    DataTargetGroupRefConflict { record: String },

    #[error("record '{record}': both fields <configRef> and <targetGroupRef> are set")]
    ConfigRefTargetGroupRefConflict { record: String },

    #[error("pattern #{index}: field <{field}> is required for this content type")]
    ContentFieldMissing { index: usize, field: &'static str },

    #[error("pattern #{index}: field <{field}> is invalid: {reason}")]
    ContentFieldInvalid {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("pattern #{index}: {addr} is not a network address, expected {network}")]
    NotNetworkAddress {
        index: usize,
        addr: String,
        network: String,
    },

    #[error("pattern #{index}: both fields <ttl> and <expires> are set")]
    TtlExpiresConflict { index: usize },

    #[error("pattern #{index}: <ttl> and <expires> are not supported for content type {content_type}")]
    TtlExpiresNotSupported { index: usize, content_type: String },

    #[error("list type whitelist is not compatible with content type {content_type}")]
    IncompatibleContentType { content_type: String },

    #[error("list type {list_type} is read-only and cannot be managed")]
    ReadOnlyType { list_type: String },

    #[error("condition parameter #{index}: both <trafficPatternRef> and <option> are set")]
    ParamBindingConflict { index: usize },

    #[error("attribute <{field}> is invalid: {reason}")]
    AttributeInvalid { field: &'static str, reason: String },
}

/// The remote side returned an object the supported grammar cannot express
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("remote returned unknown DNS record type '{0}'")]
    UnknownRecordType(String),

    #[error("remote returned unknown content type '{0}'")]
    UnknownContentType(String),

    #[error("remote returned unknown traffic pattern type '{0}'")]
    UnknownListType(String),

    #[error("remote returned unknown condition function '{0}'")]
    UnknownFunction(String),

    #[error("remote returned unknown action '{0}'")]
    UnknownAction(String),

    #[error("remote returned more than one variant of <{field}>")]
    ConflictingVariants { field: String },

    #[error("remote pattern has no content for content type {content_type}")]
    MissingContent { content_type: String },

    #[error("remote pattern field <{field}> has unrepresentable value {value}")]
    InvalidContent { field: &'static str, value: String },

    #[error("remote object has no {0}")]
    MissingAttribute(&'static str),
}

/// A reconciliation operation failed; the snapshot was left untouched
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("validation failed for {kind} '{name}': {source}")]
    Validation {
        kind: Kind,
        name: String,
        #[source]
        source: ValidationError,
    },

    #[error("{kind} '{name}' no longer matches the supported grammar: {source}")]
    Consistency {
        kind: Kind,
        name: String,
        #[source]
        source: ConsistencyError,
    },

    #[error("{operation} {kind} '{identity}' failed: {source}")]
    Remote {
        operation: Operation,
        kind: Kind,
        identity: String,
        #[source]
        source: ApiError,
    },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: Kind, name: String },

    #[error("could not resolve the identifier of {kind} '{name}'")]
    IdNotResolved { kind: Kind, name: String },

    #[error("cannot {operation} {kind} '{name}' in state {state}")]
    InvalidTransition {
        operation: Operation,
        kind: Kind,
        name: String,
        state: Lifecycle,
    },

    #[error("changing <{field}> of {kind} '{name}' requires replacing the resource")]
    RequiresReplacement {
        kind: Kind,
        name: String,
        field: &'static str,
    },

    #[error("{kind} {id} was renamed out of band from '{local}' to '{remote}'")]
    Renamed {
        kind: Kind,
        id: i64,
        local: String,
        remote: String,
    },

    #[error("import identifier '{0}' is not a numeric id")]
    InvalidImportId(String),
}
