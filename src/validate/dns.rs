//! DNS zone validation

use super::{check_length, lookup};
use crate::catalog::RecordType;
use crate::error::ValidationError;
use crate::model::dns::DEFAULT_ZONE_COMMENT;
use crate::model::{DnsRecord, DnsRecordInput, DnsZone, DnsZoneInput, RecordPayload};

pub fn dns_zone(input: &DnsZoneInput) -> Result<DnsZone, ValidationError> {
    check_length("name", &input.name, 1, 253)?;

    let comment = match &input.comment {
        Some(comment) => {
            check_length("comment", comment, 1, 250)?;
            comment.clone()
        }
        None => DEFAULT_ZONE_COMMENT.to_string(),
    };

    let records = input
        .records
        .iter()
        .map(dns_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DnsZone {
        name: input.name.clone(),
        comment,
        records,
    })
}

pub fn dns_record(input: &DnsRecordInput) -> Result<DnsRecord, ValidationError> {
    let record_type = lookup(
        "type",
        &input.record_type,
        RecordType::lookup,
        RecordType::accepted,
    )?;

    // References only mean something on A records; elsewhere they are ignored
    let payload = match record_type {
        RecordType::A => a_record_payload(input)?,
        _ => RecordPayload::Data(input.data.clone().unwrap_or_default()),
    };

    Ok(DnsRecord {
        name: input.name.clone(),
        record_type,
        payload,
    })
}

fn a_record_payload(input: &DnsRecordInput) -> Result<RecordPayload, ValidationError> {
    let data = input.data.as_deref().filter(|data| !data.is_empty());
    let record = || input.name.clone();

    match (data, input.config_ref, input.target_group_ref) {
        (Some(_), Some(_), _) => Err(ValidationError::DataConfigRefConflict { record: record() }),
        (Some(_), None, Some(_)) => {
            Err(ValidationError::DataTargetGroupRefConflict { record: record() })
        }
        (None, Some(_), Some(_)) => {
            Err(ValidationError::ConfigRefTargetGroupRefConflict { record: record() })
        }
        (Some(data), None, None) => Ok(RecordPayload::Data(data.to_string())),
        (None, Some(config), None) => Ok(RecordPayload::ConfigRef(config.id)),
        (None, None, Some(group)) => Ok(RecordPayload::TargetGroupRef(group.id)),
        // Kept as an empty-data record; the reconciler reports it
        (None, None, None) => Ok(RecordPayload::Data(String::new())),
    }
}
