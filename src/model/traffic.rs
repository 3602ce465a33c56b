//! Traffic pattern shapes

use serde::{Deserialize, Serialize};

use crate::catalog::{ContentType, ListType};

/// Traffic pattern list as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficPatternInput {
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: String,
    pub content_type: String,
    #[serde(default)]
    pub patterns: Vec<PatternInput>,
}

/// One pattern as declared in configuration
///
/// Exactly one content field is expected to be set, chosen by the owning
/// list's content type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInput {
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

impl PatternInput {
    /// Names of the content fields that carry a value
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let slots = [
            ("addr", self.addr.is_some()),
            ("commonString", self.common_string.is_some()),
            ("countryCode", self.country_code.is_some()),
            ("httpMethod", self.http_method.is_some()),
            ("asn", self.asn.is_some()),
            ("md5HashString", self.md5_hash_string.is_some()),
        ];
        slots
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(field, _)| field)
            .collect()
    }
}

/// Validated traffic pattern list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficPattern {
    pub name: String,
    pub list_type: ListType,
    pub content_type: ContentType,
    pub patterns: Vec<Pattern>,
}

/// Validated pattern; `content` always matches the list's content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub content: PatternContent,
    pub lifetime: Lifetime,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternContent {
    Addr(String),
    CommonString(String),
    CountryCode(String),
    HttpMethod(String),
    Asn(u32),
    Md5HashString(String),
}

impl PatternContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            PatternContent::Addr(_) => ContentType::Addr,
            PatternContent::CommonString(_) => ContentType::CommonString,
            PatternContent::CountryCode(_) => ContentType::CountryCode,
            PatternContent::HttpMethod(_) => ContentType::HttpMethod,
            PatternContent::Asn(_) => ContentType::Asn,
            PatternContent::Md5HashString(_) => ContentType::Md5HashString,
        }
    }
}

/// How long a pattern stays in its list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    #[default]
    Permanent,
    /// Seconds to live
    Ttl(i64),
    /// Unix timestamp after which the pattern is dropped
    Expires(i64),
}

impl Lifetime {
    pub fn ttl(self) -> Option<i64> {
        match self {
            Lifetime::Ttl(ttl) => Some(ttl),
            _ => None,
        }
    }

    pub fn expires(self) -> Option<i64> {
        match self {
            Lifetime::Expires(at) => Some(at),
            _ => None,
        }
    }
}

impl Pattern {
    pub fn new(content: PatternContent) -> Self {
        Self {
            content,
            lifetime: Lifetime::Permanent,
            comment: String::new(),
        }
    }
}

impl From<&Pattern> for PatternInput {
    fn from(pattern: &Pattern) -> Self {
        let mut input = PatternInput {
            ttl: pattern.lifetime.ttl(),
            expires: pattern.lifetime.expires(),
            comment: pattern.comment.clone(),
            ..Default::default()
        };
        match &pattern.content {
            PatternContent::Addr(v) => input.addr = Some(v.clone()),
            PatternContent::CommonString(v) => input.common_string = Some(v.clone()),
            PatternContent::CountryCode(v) => input.country_code = Some(v.clone()),
            PatternContent::HttpMethod(v) => input.http_method = Some(v.clone()),
            PatternContent::Asn(v) => input.asn = Some(i64::from(*v)),
            PatternContent::Md5HashString(v) => input.md5_hash_string = Some(v.clone()),
        }
        input
    }
}

impl From<&TrafficPattern> for TrafficPatternInput {
    fn from(list: &TrafficPattern) -> Self {
        Self {
            name: list.name.clone(),
            list_type: list.list_type.as_str().to_string(),
            content_type: list.content_type.as_str().to_string(),
            patterns: list.patterns.iter().map(PatternInput::from).collect(),
        }
    }
}
