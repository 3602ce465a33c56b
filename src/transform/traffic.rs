//! Traffic pattern transformation

use crate::catalog::{ContentType, ListType};
use crate::error::ConsistencyError;
use crate::model::{Lifetime, Pattern, PatternContent, TrafficPattern};
use crate::wire::{PatternWire, TrafficPatternWire};

/// Full list payload, used on create
pub fn to_wire(list: &TrafficPattern) -> TrafficPatternWire {
    TrafficPatternWire {
        id: None,
        name: Some(list.name.clone()),
        list_type: Some(list.list_type.as_str().to_string()),
        content_type: Some(list.content_type.as_str().to_string()),
        customer_ref: None,
        patterns: list.patterns.iter().map(pattern_to_wire).collect(),
    }
}

/// PATCH payload: type and content type cannot change after creation
pub fn to_update_wire(list: &TrafficPattern) -> TrafficPatternWire {
    TrafficPatternWire {
        list_type: None,
        content_type: None,
        ..to_wire(list)
    }
}

pub fn pattern_to_wire(pattern: &Pattern) -> PatternWire {
    let mut wire = PatternWire {
        ttl: pattern.lifetime.ttl(),
        expires: pattern.lifetime.expires(),
        comment: pattern.comment.clone(),
        ..Default::default()
    };
    match &pattern.content {
        PatternContent::Addr(v) => wire.addr = Some(v.clone()),
        PatternContent::CommonString(v) => wire.common_string = Some(v.clone()),
        PatternContent::CountryCode(v) => wire.country_code = Some(v.clone()),
        PatternContent::HttpMethod(v) => wire.http_method = Some(v.clone()),
        PatternContent::Asn(v) => wire.asn = Some(i64::from(*v)),
        PatternContent::Md5HashString(v) => wire.md5_hash_string = Some(v.clone()),
    }
    wire
}

pub fn from_wire(wire: &TrafficPatternWire) -> Result<TrafficPattern, ConsistencyError> {
    let name = wire
        .name
        .clone()
        .ok_or(ConsistencyError::MissingAttribute("name"))?;

    let list_type = wire
        .list_type
        .as_deref()
        .ok_or(ConsistencyError::MissingAttribute("type"))?;
    let list_type = ListType::lookup(list_type)
        .ok_or_else(|| ConsistencyError::UnknownListType(list_type.to_string()))?;

    let content_type = wire
        .content_type
        .as_deref()
        .ok_or(ConsistencyError::MissingAttribute("contentType"))?;
    let content_type = ContentType::lookup(content_type)
        .ok_or_else(|| ConsistencyError::UnknownContentType(content_type.to_string()))?;

    let patterns = wire
        .patterns
        .iter()
        .map(|pattern| pattern_from_wire(content_type, pattern))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrafficPattern {
        name,
        list_type,
        content_type,
        patterns,
    })
}

/// Read one pattern, picking its content field by the list's content type
pub fn pattern_from_wire(
    content_type: ContentType,
    wire: &PatternWire,
) -> Result<Pattern, ConsistencyError> {
    if wire.content_fields_set() > 1 {
        return Err(ConsistencyError::ConflictingVariants {
            field: "pattern content".to_string(),
        });
    }

    let content = match content_type {
        ContentType::Addr => wire.addr.clone().map(PatternContent::Addr),
        ContentType::CommonString => wire.common_string.clone().map(PatternContent::CommonString),
        ContentType::CountryCode => wire.country_code.clone().map(PatternContent::CountryCode),
        ContentType::HttpMethod => wire.http_method.clone().map(PatternContent::HttpMethod),
        ContentType::Asn => match wire.asn {
            Some(asn) => Some(PatternContent::Asn(u32::try_from(asn).map_err(|_| {
                ConsistencyError::InvalidContent {
                    field: "asn",
                    value: asn.to_string(),
                }
            })?)),
            None => None,
        },
        ContentType::Md5HashString => wire.md5_hash_string.clone().map(PatternContent::Md5HashString),
    };
    let content = content.ok_or_else(|| ConsistencyError::MissingContent {
        content_type: content_type.to_string(),
    })?;

    let lifetime = match (wire.ttl, wire.expires) {
        (None, None) => Lifetime::Permanent,
        (Some(ttl), None) => Lifetime::Ttl(ttl),
        (None, Some(expires)) => Lifetime::Expires(expires),
        (Some(_), Some(_)) => {
            return Err(ConsistencyError::ConflictingVariants {
                field: "ttl/expires".to_string(),
            })
        }
    };

    Ok(Pattern {
        content,
        lifetime,
        comment: wire.comment.clone(),
    })
}
