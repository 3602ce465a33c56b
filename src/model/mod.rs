//! Declarative and Validated Models
//!
//! Each resource kind has two shapes:
//!
//! - `*Input`: what configuration hands us. Permissive, every mutually
//!   exclusive group is a set of independent optionals, enumerations are
//!   plain strings.
//! - the validated model: produced only by [`crate::validate`], with tagged
//!   variants so that illegal combinations cannot be represented.
//!
//! Every validated model converts back into its `*Input` form, which is how
//! a read-back snapshot is rendered and re-validated.

pub mod dns;
pub mod ruleset;
pub mod traffic;

use serde::{Deserialize, Serialize};

pub use dns::{DnsRecord, DnsRecordInput, DnsZone, DnsZoneInput, RecordPayload};
pub use ruleset::{
    Action, ActionInput, Condition, ConditionInput, ConditionParam, ConditionParamInput,
    ParamBinding, ParamOption, Rule, RuleInput, Ruleset, RulesetInput,
};
pub use traffic::{Lifetime, Pattern, PatternContent, PatternInput, TrafficPattern, TrafficPatternInput};

/// Reference to another remote object by numeric id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: i64,
}

impl ObjectRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}
