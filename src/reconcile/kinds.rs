//! Resource Kinds
//!
//! Binds each kind's input, model and wire shapes to its validator and
//! transformer so the reconciler can drive all three the same way.

use serde::Serialize;

use super::types::Kind;
use crate::catalog::RecordType;
use crate::client::WireObject;
use crate::error::{ConsistencyError, ValidationError};
use crate::model::{DnsZone, DnsZoneInput, RecordPayload, Ruleset, RulesetInput, TrafficPattern, TrafficPatternInput};
use crate::transform;
use crate::validate;
use crate::wire::{DnsZoneWire, RulesetWire, TrafficPatternWire};

/// One remote resource kind
pub trait Resource: Send + Sync + 'static {
    type Input: Send + Sync;
    type Model: Clone + PartialEq + Serialize + Send + Sync;
    type Wire: WireObject;

    const KIND: Kind = <Self::Wire as WireObject>::KIND;

    /// Probe for an existing object with the same name before creating.
    /// Kinds without the probe rely on the platform to reject duplicates.
    const PROBE_BEFORE_CREATE: bool = false;

    fn validate(input: &Self::Input) -> Result<Self::Model, ValidationError>;

    fn to_wire(model: &Self::Model) -> Self::Wire;

    /// PATCH payload; defaults to the full payload
    fn to_update_wire(model: &Self::Model) -> Self::Wire {
        Self::to_wire(model)
    }

    fn from_wire(wire: &Self::Wire) -> Result<Self::Model, ConsistencyError>;

    fn input_name(input: &Self::Input) -> &str;

    fn name(model: &Self::Model) -> &str;

    /// First attribute that cannot be changed in place, if `desired` changes one
    fn immutable_change(_current: &Self::Model, _desired: &Self::Model) -> Option<&'static str> {
        None
    }

    /// Legal but suspicious parts of a validated model, logged before sending
    fn warnings(_model: &Self::Model) -> Vec<String> {
        Vec::new()
    }
}

pub struct DnsZones;

impl Resource for DnsZones {
    type Input = DnsZoneInput;
    type Model = DnsZone;
    type Wire = DnsZoneWire;

    const PROBE_BEFORE_CREATE: bool = true;

    fn validate(input: &DnsZoneInput) -> Result<DnsZone, ValidationError> {
        validate::dns_zone(input)
    }

    fn to_wire(model: &DnsZone) -> DnsZoneWire {
        transform::dns::to_wire(model)
    }

    fn to_update_wire(model: &DnsZone) -> DnsZoneWire {
        transform::dns::to_update_wire(model)
    }

    fn from_wire(wire: &DnsZoneWire) -> Result<DnsZone, ConsistencyError> {
        transform::dns::from_wire(wire)
    }

    fn input_name(input: &DnsZoneInput) -> &str {
        &input.name
    }

    fn name(model: &DnsZone) -> &str {
        &model.name
    }

    fn immutable_change(current: &DnsZone, desired: &DnsZone) -> Option<&'static str> {
        (current.name != desired.name).then_some("name")
    }

    fn warnings(model: &DnsZone) -> Vec<String> {
        model
            .records
            .iter()
            .filter(|record| {
                record.record_type == RecordType::A
                    && matches!(&record.payload, RecordPayload::Data(data) if data.is_empty())
            })
            .map(|record| {
                format!(
                    "A record '{}' has no data and no reference, sending empty data",
                    record.name
                )
            })
            .collect()
    }
}

pub struct TrafficPatterns;

impl Resource for TrafficPatterns {
    type Input = TrafficPatternInput;
    type Model = TrafficPattern;
    type Wire = TrafficPatternWire;

    fn validate(input: &TrafficPatternInput) -> Result<TrafficPattern, ValidationError> {
        validate::traffic_pattern(input)
    }

    fn to_wire(model: &TrafficPattern) -> TrafficPatternWire {
        transform::traffic::to_wire(model)
    }

    fn to_update_wire(model: &TrafficPattern) -> TrafficPatternWire {
        transform::traffic::to_update_wire(model)
    }

    fn from_wire(wire: &TrafficPatternWire) -> Result<TrafficPattern, ConsistencyError> {
        transform::traffic::from_wire(wire)
    }

    fn input_name(input: &TrafficPatternInput) -> &str {
        &input.name
    }

    fn name(model: &TrafficPattern) -> &str {
        &model.name
    }

    fn immutable_change(current: &TrafficPattern, desired: &TrafficPattern) -> Option<&'static str> {
        if current.list_type != desired.list_type {
            Some("type")
        } else if current.content_type != desired.content_type {
            Some("contentType")
        } else {
            None
        }
    }
}

pub struct Rulesets;

impl Resource for Rulesets {
    type Input = RulesetInput;
    type Model = Ruleset;
    type Wire = RulesetWire;

    fn validate(input: &RulesetInput) -> Result<Ruleset, ValidationError> {
        validate::ruleset(input)
    }

    fn to_wire(model: &Ruleset) -> RulesetWire {
        transform::ruleset::to_wire(model)
    }

    fn from_wire(wire: &RulesetWire) -> Result<Ruleset, ConsistencyError> {
        transform::ruleset::from_wire(wire)
    }

    fn input_name(input: &RulesetInput) -> &str {
        &input.name
    }

    fn name(model: &Ruleset) -> &str {
        &model.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentType, ListType};
    use crate::model::DnsRecord;

    #[test]
    fn test_kinds_follow_wire_shapes() {
        assert_eq!(DnsZones::KIND, Kind::DnsZone);
        assert_eq!(TrafficPatterns::KIND, Kind::TrafficPattern);
        assert_eq!(Rulesets::KIND, Kind::Ruleset);
        assert!(DnsZones::PROBE_BEFORE_CREATE);
        assert!(!TrafficPatterns::PROBE_BEFORE_CREATE);
        assert!(!Rulesets::PROBE_BEFORE_CREATE);
    }

    #[test]
    fn test_immutable_changes() {
        let zone = DnsZone {
            name: "a.ru".to_string(),
            comment: "x".to_string(),
            records: vec![],
        };
        let renamed = DnsZone {
            name: "b.ru".to_string(),
            ..zone.clone()
        };
        let recommented = DnsZone {
            comment: "y".to_string(),
            ..zone.clone()
        };
        assert_eq!(DnsZones::immutable_change(&zone, &renamed), Some("name"));
        assert_eq!(DnsZones::immutable_change(&zone, &recommented), None);

        let list = TrafficPattern {
            name: "tp".to_string(),
            list_type: ListType::Commonlist,
            content_type: ContentType::Addr,
            patterns: vec![],
        };
        let retyped = TrafficPattern {
            list_type: ListType::Whitelist,
            ..list.clone()
        };
        let recontent = TrafficPattern {
            content_type: ContentType::Asn,
            ..list.clone()
        };
        let renamed = TrafficPattern {
            name: "tp2".to_string(),
            ..list.clone()
        };
        assert_eq!(TrafficPatterns::immutable_change(&list, &retyped), Some("type"));
        assert_eq!(TrafficPatterns::immutable_change(&list, &recontent), Some("contentType"));
        assert_eq!(TrafficPatterns::immutable_change(&list, &renamed), None);
    }

    #[test]
    fn test_empty_a_records_are_reported() {
        let zone = DnsZone {
            name: "a.ru".to_string(),
            comment: "x".to_string(),
            records: vec![
                DnsRecord::data("bare", RecordType::A, ""),
                DnsRecord::data("www", RecordType::A, "23.12.76.128"),
                DnsRecord::data("txt", RecordType::TXT, ""),
            ],
        };

        let warnings = DnsZones::warnings(&zone);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'bare'"));
    }
}
