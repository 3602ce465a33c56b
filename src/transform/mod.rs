//! Model Transformer
//!
//! Pure, bidirectional mapping between validated models and wire objects.
//!
//! `to_wire` only ever receives models the validator accepted and performs
//! no checks of its own: it projects the active variant of each
//! discriminated group and leaves every inactive member out of the payload.
//!
//! `from_wire` is the inverse. It fails with a [`ConsistencyError`] when the
//! remote side hands back something the supported grammar cannot express,
//! such as an unknown record type or two arms of one variant group.
//!
//! [`ConsistencyError`]: crate::error::ConsistencyError

pub mod dns;
pub mod ruleset;
pub mod traffic;
