//! Variant Validator
//!
//! Turns declarative `*Input` objects into validated models, or rejects them
//! with the first [`ValidationError`] found. Pure: no I/O, inputs are only
//! borrowed. Runs before any transformation or remote call.

mod dns;
mod ruleset;
mod traffic;

pub use dns::{dns_record, dns_zone};
pub use ruleset::{action, condition, condition_param, ruleset};
pub use traffic::{pattern, traffic_pattern};

use crate::error::ValidationError;

/// Resolve `value` through a catalog lookup table
fn lookup<T>(
    field: &'static str,
    value: &str,
    find: fn(&str) -> Option<T>,
    accepted: fn() -> String,
) -> Result<T, ValidationError> {
    find(value).ok_or_else(|| ValidationError::InvalidEnum {
        field,
        value: value.to_string(),
        accepted: accepted(),
    })
}

/// Character-count bounds on a top-level attribute
fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::AttributeInvalid {
            field,
            reason: format!("length {} is outside {}..={}", len, min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecordType;

    #[test]
    fn test_lookup_reports_accepted_values() {
        let err = lookup("type", "PTR", RecordType::lookup, RecordType::accepted).unwrap_err();
        match err {
            ValidationError::InvalidEnum { field, value, accepted } => {
                assert_eq!(field, "type");
                assert_eq!(value, "PTR");
                assert!(accepted.starts_with("A, CNAME"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_length_counts_characters() {
        assert!(check_length("name", "зона", 1, 4).is_ok());
        assert!(check_length("name", "", 1, 4).is_err());
        assert!(check_length("name", "abcde", 1, 4).is_err());
    }
}
