//! Wire Types
//!
//! JSON shapes exchanged with the platform API. These are plain records with
//! optional members; absent members are omitted from request bodies, which
//! is what gives PATCH its partial-update meaning. Discriminators stay as
//! strings here so that an unexpected value can be reported instead of
//! failing deserialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefWire {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: i64,
}

// ============================================================
// DNS zones
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsZoneWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ref: Option<CustomerRef>,
    #[serde(default)]
    pub records: Vec<RecordWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWire {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ref: Option<RefWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group_ref: Option<RefWire>,
}

// ============================================================
// Traffic patterns
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficPatternWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ref: Option<CustomerRef>,
    #[serde(default)]
    pub patterns: Vec<PatternWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5_hash_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(default)]
    pub comment: String,
}

impl PatternWire {
    /// Number of content fields carrying a value
    pub fn content_fields_set(&self) -> usize {
        [
            self.addr.is_some(),
            self.common_string.is_some(),
            self.country_code.is_some(),
            self.http_method.is_some(),
            self.asn.is_some(),
            self.md5_hash_string.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

// ============================================================
// Rulesets
// ============================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ref: Option<CustomerRef>,
    #[serde(default)]
    pub rules: Vec<RuleWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleWire {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub conditions: Vec<ConditionWire>,
    #[serde(default)]
    pub actions: Vec<ActionWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionWire {
    pub function: String,
    #[serde(default)]
    pub negation: bool,
    #[serde(default)]
    pub params: Vec<ConditionParamWire>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionParamWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_pattern_ref: Option<RefWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<ParamOptionWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamOptionWire {
    pub name: String,
    pub value: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionWire {
    pub action: String,
    #[serde(default)]
    pub params: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_omits_inactive_arms() {
        let record = RecordWire {
            name: "cfg".to_string(),
            record_type: "A".to_string(),
            config_ref: Some(RefWire { id: 88903 }),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"cfg","type":"A","configRef":{"id":88903}}"#);
    }

    #[test]
    fn test_pattern_deserializes_nulls_as_absent() {
        let json = r#"{"addr":"10.0.0.0/8","commonString":null,"ttl":null,"expires":1924166191,"comment":"office"}"#;
        let pattern: PatternWire = serde_json::from_str(json).unwrap();

        assert_eq!(pattern.addr.as_deref(), Some("10.0.0.0/8"));
        assert_eq!(pattern.common_string, None);
        assert_eq!(pattern.expires, Some(1924166191));
        assert_eq!(pattern.content_fields_set(), 1);
    }

    #[test]
    fn test_traffic_pattern_uses_type_key() {
        let list = TrafficPatternWire {
            name: Some("tp".to_string()),
            list_type: Some("commonlist".to_string()),
            content_type: Some("asn".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["type"], "commonlist");
        assert_eq!(json["contentType"], "asn");
        assert!(json.get("id").is_none());
    }
}
