//! DNS zone transformation

use crate::catalog::RecordType;
use crate::error::ConsistencyError;
use crate::model::dns::DEFAULT_ZONE_COMMENT;
use crate::model::{DnsRecord, DnsZone, RecordPayload};
use crate::wire::{DnsZoneWire, RecordWire, RefWire};

/// Full zone payload, used on create
pub fn to_wire(zone: &DnsZone) -> DnsZoneWire {
    DnsZoneWire {
        id: None,
        name: Some(zone.name.clone()),
        customer_ref: None,
        records: zone.records.iter().map(record_to_wire).collect(),
        comment: Some(zone.comment.clone()),
    }
}

/// PATCH payload: records and comment only, the name is the zone's key
pub fn to_update_wire(zone: &DnsZone) -> DnsZoneWire {
    DnsZoneWire {
        name: None,
        ..to_wire(zone)
    }
}

pub fn record_to_wire(record: &DnsRecord) -> RecordWire {
    let mut wire = RecordWire {
        name: record.name.clone(),
        record_type: record.record_type.as_str().to_string(),
        ..Default::default()
    };
    match &record.payload {
        RecordPayload::Data(data) => wire.data = Some(data.clone()),
        RecordPayload::ConfigRef(id) => wire.config_ref = Some(RefWire { id: *id }),
        RecordPayload::TargetGroupRef(id) => wire.target_group_ref = Some(RefWire { id: *id }),
    }
    wire
}

pub fn from_wire(wire: &DnsZoneWire) -> Result<DnsZone, ConsistencyError> {
    let name = wire
        .name
        .clone()
        .ok_or(ConsistencyError::MissingAttribute("name"))?;

    let records = wire
        .records
        .iter()
        .map(record_from_wire)
        .collect::<Result<Vec<_>, _>>()?;

    // A zone stored without a comment reads back with the default one
    let comment = match wire.comment.as_deref() {
        Some(comment) if !comment.is_empty() => comment.to_string(),
        _ => DEFAULT_ZONE_COMMENT.to_string(),
    };

    Ok(DnsZone {
        name,
        comment,
        records,
    })
}

pub fn record_from_wire(wire: &RecordWire) -> Result<DnsRecord, ConsistencyError> {
    let record_type = RecordType::lookup(&wire.record_type)
        .ok_or_else(|| ConsistencyError::UnknownRecordType(wire.record_type.clone()))?;

    let payload = match record_type {
        RecordType::A => {
            let data = wire.data.as_deref().filter(|data| !data.is_empty());
            match (data, wire.config_ref, wire.target_group_ref) {
                (None, Some(config), None) => RecordPayload::ConfigRef(config.id),
                (None, None, Some(group)) => RecordPayload::TargetGroupRef(group.id),
                (data, None, None) => RecordPayload::Data(data.unwrap_or_default().to_string()),
                _ => {
                    return Err(ConsistencyError::ConflictingVariants {
                        field: format!("record '{}' payload", wire.name),
                    })
                }
            }
        }
        _ => RecordPayload::Data(wire.data.clone().unwrap_or_default()),
    };

    Ok(DnsRecord {
        name: wire.name.clone(),
        record_type,
        payload,
    })
}
