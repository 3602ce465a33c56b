//! DNS zone shapes

use serde::{Deserialize, Serialize};

use super::ObjectRef;
use crate::catalog::RecordType;

/// Comment sent when a zone is created without one
pub const DEFAULT_ZONE_COMMENT: &str = "Created by ngenix-sync";

/// DNS zone as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZoneInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub records: Vec<DnsRecordInput>,
}

/// DNS record as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordInput {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ref: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group_ref: Option<ObjectRef>,
}

/// Validated DNS zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZone {
    pub name: String,
    pub comment: String,
    pub records: Vec<DnsRecord>,
}

/// Validated DNS record
///
/// `payload` is `Data` for every type except `A`, which may instead point
/// at a config or a target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: String,
    pub record_type: RecordType,
    pub payload: RecordPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPayload {
    Data(String),
    ConfigRef(i64),
    TargetGroupRef(i64),
}

impl DnsRecord {
    pub fn data(name: &str, record_type: RecordType, data: &str) -> Self {
        Self {
            name: name.to_string(),
            record_type,
            payload: RecordPayload::Data(data.to_string()),
        }
    }
}

impl From<&DnsRecord> for DnsRecordInput {
    fn from(record: &DnsRecord) -> Self {
        let mut input = DnsRecordInput {
            name: record.name.clone(),
            record_type: record.record_type.as_str().to_string(),
            ..Default::default()
        };
        match &record.payload {
            RecordPayload::Data(data) => input.data = Some(data.clone()),
            RecordPayload::ConfigRef(id) => input.config_ref = Some(ObjectRef::new(*id)),
            RecordPayload::TargetGroupRef(id) => input.target_group_ref = Some(ObjectRef::new(*id)),
        }
        input
    }
}

impl From<&DnsZone> for DnsZoneInput {
    fn from(zone: &DnsZone) -> Self {
        Self {
            name: zone.name.clone(),
            comment: Some(zone.comment.clone()),
            records: zone.records.iter().map(DnsRecordInput::from).collect(),
        }
    }
}
