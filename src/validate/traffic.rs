//! Traffic pattern validation
//!
//! List-level checks first (type, read-only types, content type, whitelist
//! compatibility), then every pattern against the content rule selected by
//! the list's content type.

use std::sync::LazyLock;

use ipnetwork::Ipv4Network;
use regex::Regex;

use super::{check_length, lookup};
use crate::catalog::{ContentRule, ContentType, ListType, HTTP_METHODS};
use crate::error::ValidationError;
use crate::model::{Lifetime, Pattern, PatternContent, PatternInput, TrafficPattern, TrafficPatternInput};

const MAX_NAME_LEN: usize = 42;
const MAX_COMMON_STRING_LEN: usize = 255;

static IPV4_CIDR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])\.){3}([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])/(3[0-2]|[1-2]?[0-9])$",
    )
    .expect("IPV4_CIDR_RE is a valid regex pattern")
});

static COUNTRY_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}$").expect("COUNTRY_CODE_RE is a valid regex pattern")
});

static MD5_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-fA-F0-9]{32}$").expect("MD5_RE is a valid regex pattern")
});

pub fn traffic_pattern(input: &TrafficPatternInput) -> Result<TrafficPattern, ValidationError> {
    check_length("name", &input.name, 1, MAX_NAME_LEN)?;

    let list_type = lookup("type", &input.list_type, ListType::lookup, ListType::accepted)?;
    if list_type.is_read_only() {
        return Err(ValidationError::ReadOnlyType {
            list_type: list_type.to_string(),
        });
    }

    let content_type = lookup(
        "contentType",
        &input.content_type,
        ContentType::lookup,
        ContentType::accepted,
    )?;
    let rule = content_type.rule();

    if list_type == ListType::Whitelist && !rule.whitelist_compatible {
        return Err(ValidationError::IncompatibleContentType {
            content_type: content_type.to_string(),
        });
    }

    let patterns = input
        .patterns
        .iter()
        .enumerate()
        .map(|(index, pattern_input)| pattern(index, rule, pattern_input))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrafficPattern {
        name: input.name.clone(),
        list_type,
        content_type,
        patterns,
    })
}

/// Validate one pattern against the content rule of its list
pub fn pattern(
    index: usize,
    rule: &ContentRule,
    input: &PatternInput,
) -> Result<Pattern, ValidationError> {
    for field in input.populated_fields() {
        if field != rule.field {
            return Err(ValidationError::ContentFieldInvalid {
                index,
                field,
                reason: format!("not allowed for content type {}", rule.content_type),
            });
        }
    }

    let lifetime = lifetime(index, rule, input)?;
    let content = content(index, rule, input)?;

    Ok(Pattern {
        content,
        lifetime,
        comment: input.comment.clone(),
    })
}

fn lifetime(index: usize, rule: &ContentRule, input: &PatternInput) -> Result<Lifetime, ValidationError> {
    match (input.ttl, input.expires) {
        (None, None) => Ok(Lifetime::Permanent),
        _ if !rule.lifetime_supported => Err(ValidationError::TtlExpiresNotSupported {
            index,
            content_type: rule.content_type.to_string(),
        }),
        (Some(_), Some(_)) => Err(ValidationError::TtlExpiresConflict { index }),
        (Some(ttl), None) => Ok(Lifetime::Ttl(ttl)),
        (None, Some(expires)) => Ok(Lifetime::Expires(expires)),
    }
}

fn content(index: usize, rule: &ContentRule, input: &PatternInput) -> Result<PatternContent, ValidationError> {
    let field = rule.field;
    let invalid = |reason: &str| ValidationError::ContentFieldInvalid {
        index,
        field,
        reason: reason.to_string(),
    };

    match rule.content_type {
        ContentType::Addr => {
            let addr = required(index, field, input.addr.as_ref())?;
            if !addr.contains('/') {
                return Err(invalid("missing netmask, expected address/prefix"));
            }
            if !IPV4_CIDR_RE.is_match(addr) {
                return Err(invalid("not an IPv4 address with a mask"));
            }
            check_network_address(index, addr)?;
            Ok(PatternContent::Addr(addr.clone()))
        }
        ContentType::CommonString => {
            let value = required(index, field, input.common_string.as_ref())?;
            if value.chars().count() > MAX_COMMON_STRING_LEN {
                return Err(invalid("exceeds 255 characters"));
            }
            Ok(PatternContent::CommonString(value.clone()))
        }
        ContentType::CountryCode => {
            let value = required(index, field, input.country_code.as_ref())?;
            if !COUNTRY_CODE_RE.is_match(value) {
                return Err(invalid("expected two uppercase letters"));
            }
            Ok(PatternContent::CountryCode(value.clone()))
        }
        ContentType::HttpMethod => {
            let value = required(index, field, input.http_method.as_ref())?;
            if !HTTP_METHODS.contains(&value.as_str()) {
                return Err(invalid(&format!("expected one of [{}]", HTTP_METHODS.join(", "))));
            }
            Ok(PatternContent::HttpMethod(value.clone()))
        }
        ContentType::Asn => {
            let value = required(index, field, input.asn.as_ref())?;
            let asn = u32::try_from(*value).map_err(|_| invalid("expected an integer in 0..=4294967295"))?;
            Ok(PatternContent::Asn(asn))
        }
        ContentType::Md5HashString => {
            let value = required(index, field, input.md5_hash_string.as_ref())?;
            if !MD5_RE.is_match(value) {
                return Err(invalid("expected 32 hexadecimal characters"));
            }
            Ok(PatternContent::Md5HashString(value.clone()))
        }
    }
}

fn required<'a, T>(index: usize, field: &'static str, value: Option<&'a T>) -> Result<&'a T, ValidationError> {
    value.ok_or(ValidationError::ContentFieldMissing { index, field })
}

/// The address must be the network address of its own prefix
fn check_network_address(index: usize, addr: &str) -> Result<(), ValidationError> {
    let network: Ipv4Network = addr.parse().map_err(|e: ipnetwork::IpNetworkError| {
        ValidationError::ContentFieldInvalid {
            index,
            field: "addr",
            reason: e.to_string(),
        }
    })?;

    if network.ip() != network.network() {
        return Err(ValidationError::NotNetworkAddress {
            index,
            addr: addr.to_string(),
            network: format!("{}/{}", network.network(), network.prefix()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(list_type: &str, content_type: &str, patterns: Vec<PatternInput>) -> TrafficPatternInput {
        TrafficPatternInput {
            name: "tst-tp".to_string(),
            list_type: list_type.to_string(),
            content_type: content_type.to_string(),
            patterns,
        }
    }

    fn addr(value: &str) -> PatternInput {
        PatternInput {
            addr: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn asn(value: i64) -> PatternInput {
        PatternInput {
            asn: Some(value),
            ..Default::default()
        }
    }

    fn md5(value: &str) -> PatternInput {
        PatternInput {
            md5_hash_string: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_host_address_with_full_mask_is_valid() {
        let input = list("commonlist", "addr", vec![addr("98.164.15.2/32")]);
        let validated = traffic_pattern(&input).unwrap();
        assert_eq!(
            validated.patterns[0].content,
            PatternContent::Addr("98.164.15.2/32".to_string())
        );
    }

    #[test]
    fn test_address_must_be_network_address() {
        for value in ["98.164.15.3/31", "98.164.15.2/30", "10.1.2.3/8"] {
            let input = list("commonlist", "addr", vec![addr(value)]);
            assert!(
                matches!(traffic_pattern(&input), Err(ValidationError::NotNetworkAddress { .. })),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_network_address_reports_expected_network() {
        let input = list("commonlist", "addr", vec![addr("98.164.15.2/30")]);
        match traffic_pattern(&input) {
            Err(ValidationError::NotNetworkAddress { network, .. }) => {
                assert_eq!(network, "98.164.15.0/30")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_aligned_networks_are_valid() {
        for value in ["98.164.15.2/31", "10.0.0.0/8", "192.168.4.0/22", "1.2.3.4/32"] {
            let input = list("whitelist", "addr", vec![addr(value)]);
            assert!(traffic_pattern(&input).is_ok(), "{} should be accepted", value);
        }
    }

    #[test]
    fn test_address_without_mask_rejected() {
        let input = list("commonlist", "addr", vec![addr("1.2.3.4")]);
        match traffic_pattern(&input) {
            Err(ValidationError::ContentFieldInvalid { index: 0, field: "addr", reason }) => {
                assert!(reason.contains("netmask"), "unexpected reason: {}", reason)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_address() {
        let input = list("commonlist", "addr", vec![addr("300.1.1.1/32")]);
        assert!(matches!(
            traffic_pattern(&input),
            Err(ValidationError::ContentFieldInvalid { field: "addr", .. })
        ));
    }

    #[test]
    fn test_addr_ttl_and_expires_conflict() {
        let mut pattern = addr("23.56.67.89/32");
        pattern.ttl = Some(3600);
        pattern.expires = Some(1924165191);
        let input = list("commonlist", "addr", vec![pattern]);

        assert_eq!(
            traffic_pattern(&input),
            Err(ValidationError::TtlExpiresConflict { index: 0 })
        );
    }

    #[test]
    fn test_addr_keeps_lifetime() {
        let mut pattern = addr("23.56.67.89/32");
        pattern.expires = Some(1924165191);
        let input = list("commonlist", "addr", vec![pattern]);

        let validated = traffic_pattern(&input).unwrap();
        assert_eq!(validated.patterns[0].lifetime, Lifetime::Expires(1924165191));
    }

    #[test]
    fn test_lifetime_not_supported_outside_addr() {
        let mut pattern = asn(13238);
        pattern.ttl = Some(60);
        let input = list("commonlist", "asn", vec![pattern]);

        assert!(matches!(
            traffic_pattern(&input),
            Err(ValidationError::TtlExpiresNotSupported { index: 0, .. })
        ));
    }

    #[test]
    fn test_whitelist_incompatible_content_type() {
        let input = list("whitelist", "asn", vec![]);
        assert_eq!(
            traffic_pattern(&input),
            Err(ValidationError::IncompatibleContentType {
                content_type: "asn".to_string()
            })
        );
    }

    #[test]
    fn test_read_only_list_types() {
        for list_type in ["blacklist", "filterlist"] {
            let input = list(list_type, "addr", vec![]);
            assert!(matches!(
                traffic_pattern(&input),
                Err(ValidationError::ReadOnlyType { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_list_and_content_type() {
        assert!(matches!(
            traffic_pattern(&list("greylist", "addr", vec![])),
            Err(ValidationError::InvalidEnum { field: "type", .. })
        ));
        assert!(matches!(
            traffic_pattern(&list("commonlist", "ipv6", vec![])),
            Err(ValidationError::InvalidEnum { field: "contentType", .. })
        ));
    }

    #[test]
    fn test_asn_range() {
        let ok = list("commonlist", "asn", vec![asn(4294967295), asn(0)]);
        let validated = traffic_pattern(&ok).unwrap();
        assert_eq!(validated.patterns[0].content, PatternContent::Asn(u32::MAX));

        for value in [4294967296, -1] {
            let bad = list("commonlist", "asn", vec![asn(value)]);
            assert!(matches!(
                traffic_pattern(&bad),
                Err(ValidationError::ContentFieldInvalid { field: "asn", .. })
            ));
        }
    }

    #[test]
    fn test_md5_hash_string() {
        let ok = list("commonlist", "md5HashString", vec![md5("d41d8cd98f00b204e9800998ecf8427e")]);
        assert!(traffic_pattern(&ok).is_ok());

        let bad = list("commonlist", "md5HashString", vec![md5("not-32-hex-chars")]);
        assert!(matches!(
            traffic_pattern(&bad),
            Err(ValidationError::ContentFieldInvalid { field: "md5HashString", .. })
        ));
    }

    #[test]
    fn test_country_code_and_http_method() {
        let cc = |v: &str| PatternInput {
            country_code: Some(v.to_string()),
            ..Default::default()
        };
        assert!(traffic_pattern(&list("commonlist", "countryCode", vec![cc("RU")])).is_ok());
        assert!(traffic_pattern(&list("commonlist", "countryCode", vec![cc("ru")])).is_err());
        assert!(traffic_pattern(&list("commonlist", "countryCode", vec![cc("RUS")])).is_err());

        let method = |v: &str| PatternInput {
            http_method: Some(v.to_string()),
            ..Default::default()
        };
        assert!(traffic_pattern(&list("commonlist", "httpMethod", vec![method("PURGE")])).is_ok());
        assert!(traffic_pattern(&list("commonlist", "httpMethod", vec![method("TRACE")])).is_err());
    }

    #[test]
    fn test_common_string_length() {
        let s = |len: usize| PatternInput {
            common_string: Some("a".repeat(len)),
            ..Default::default()
        };
        assert!(traffic_pattern(&list("commonlist", "commonString", vec![s(255)])).is_ok());
        assert!(traffic_pattern(&list("commonlist", "commonString", vec![s(256)])).is_err());
    }

    #[test]
    fn test_missing_content_field() {
        let input = list("commonlist", "countryCode", vec![PatternInput::default()]);
        assert_eq!(
            traffic_pattern(&input),
            Err(ValidationError::ContentFieldMissing {
                index: 0,
                field: "countryCode"
            })
        );
    }

    #[test]
    fn test_foreign_content_field_rejected() {
        let mut pattern = addr("10.0.0.0/8");
        pattern.country_code = Some("RU".to_string());
        let input = list("commonlist", "addr", vec![pattern]);

        assert!(matches!(
            traffic_pattern(&input),
            Err(ValidationError::ContentFieldInvalid { field: "countryCode", .. })
        ));
    }

    #[test]
    fn test_name_length() {
        let mut input = list("commonlist", "addr", vec![]);
        input.name = "n".repeat(43);
        assert!(matches!(
            traffic_pattern(&input),
            Err(ValidationError::AttributeInvalid { field: "name", .. })
        ));
    }
}
