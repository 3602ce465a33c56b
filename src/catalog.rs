//! Closed Enumerations
//!
//! Every discriminator the platform API understands lives here as a lookup
//! table. Validation and transformation consult these tables instead of
//! carrying string literals through their control flow.

use serde::{Deserialize, Serialize};

/// Declares a wire enumeration together with its lookup table.
///
/// The table is the single source of the accepted wire spellings; `lookup`
/// and `as_str` are derived from it.
macro_rules! lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $table:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        pub const $table: &[($name, &str)] = &[$(($name::$variant, $wire)),+];

        impl $name {
            /// Wire spelling of this value
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Resolve a wire spelling, `None` when it is outside the table
            pub fn lookup(value: &str) -> Option<Self> {
                $table
                    .iter()
                    .find(|(_, wire)| *wire == value)
                    .map(|(variant, _)| *variant)
            }

            /// All accepted spellings, comma separated (for messages)
            pub fn accepted() -> String {
                $table
                    .iter()
                    .map(|(_, wire)| *wire)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

lookup_enum! {
    /// DNS record type
    #[allow(clippy::upper_case_acronyms)]
    RecordType, RECORD_TYPES {
        A => "A",
        CNAME => "CNAME",
        MX => "MX",
        AAAA => "AAAA",
        SRV => "SRV",
        NS => "NS",
        TXT => "TXT",
        CAA => "CAA",
    }
}

lookup_enum! {
    /// Traffic pattern list type
    ListType, LIST_TYPES {
        Blacklist => "blacklist",
        Whitelist => "whitelist",
        Filterlist => "filterlist",
        Commonlist => "commonlist",
    }
}

lookup_enum! {
    /// Selects which single content field a pattern carries
    ContentType, CONTENT_TYPES {
        Addr => "addr",
        CommonString => "commonString",
        CountryCode => "countryCode",
        HttpMethod => "httpMethod",
        Asn => "asn",
        Md5HashString => "md5HashString",
    }
}

lookup_enum! {
    /// Ruleset condition function
    ConditionFunction, CONDITION_FUNCTIONS {
        In => "in",
        Equals => "equals",
        Contains => "contains",
        Begins => "begins",
        Ends => "ends",
        True => "true",
        Exists => "exists",
    }
}

lookup_enum! {
    /// Ruleset action name
    ActionName, ACTION_NAMES {
        Allow => "allow",
        Deny => "deny",
        Redirect => "redirect",
        SetHeader => "setHeader",
        DelHeader => "delHeader",
        JsChallenge => "jsChallenge",
    }
}

/// HTTP methods accepted as `httpMethod` pattern content
pub const HTTP_METHODS: &[&str] = &[
    "GET", "POST", "OPTIONS", "PUT", "PATCH", "DELETE", "HEAD", "PURGE",
];

/// List types that can be read but never created or modified here
pub const READ_ONLY_LIST_TYPES: &[ListType] = &[ListType::Blacklist, ListType::Filterlist];

impl ListType {
    pub fn is_read_only(self) -> bool {
        READ_ONLY_LIST_TYPES.contains(&self)
    }
}

/// Per-content-type properties
#[derive(Debug)]
pub struct ContentRule {
    pub content_type: ContentType,
    /// Name of the pattern field this content type populates
    pub field: &'static str,
    /// Whether a whitelist may use this content type
    pub whitelist_compatible: bool,
    /// Whether patterns may carry `ttl` / `expires`
    pub lifetime_supported: bool,
}

pub const CONTENT_RULES: &[ContentRule] = &[
    ContentRule {
        content_type: ContentType::Addr,
        field: "addr",
        whitelist_compatible: true,
        lifetime_supported: true,
    },
    ContentRule {
        content_type: ContentType::CommonString,
        field: "commonString",
        whitelist_compatible: false,
        lifetime_supported: false,
    },
    ContentRule {
        content_type: ContentType::CountryCode,
        field: "countryCode",
        whitelist_compatible: false,
        lifetime_supported: false,
    },
    ContentRule {
        content_type: ContentType::HttpMethod,
        field: "httpMethod",
        whitelist_compatible: false,
        lifetime_supported: false,
    },
    ContentRule {
        content_type: ContentType::Asn,
        field: "asn",
        whitelist_compatible: false,
        lifetime_supported: false,
    },
    ContentRule {
        content_type: ContentType::Md5HashString,
        field: "md5HashString",
        whitelist_compatible: false,
        lifetime_supported: false,
    },
];

impl ContentType {
    /// Properties of this content type from [`CONTENT_RULES`]
    pub fn rule(self) -> &'static ContentRule {
        // CONTENT_RULES lists every ContentType variant in declaration order
        &CONTENT_RULES[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(RecordType::lookup("CNAME"), Some(RecordType::CNAME));
        assert_eq!(RecordType::lookup("cname"), None);
        assert_eq!(ConditionFunction::lookup("regex"), None);
        assert_eq!(ActionName::lookup("jsChallenge"), Some(ActionName::JsChallenge));
    }

    #[test]
    fn test_content_rules_cover_every_content_type() {
        assert_eq!(CONTENT_RULES.len(), CONTENT_TYPES.len());
        for (content_type, wire) in CONTENT_TYPES {
            let rule = content_type.rule();
            assert_eq!(rule.content_type, *content_type);
            assert_eq!(rule.field, *wire);
        }
    }

    #[test]
    fn test_read_only_list_types() {
        assert!(ListType::Blacklist.is_read_only());
        assert!(ListType::Filterlist.is_read_only());
        assert!(!ListType::Whitelist.is_read_only());
        assert!(!ListType::Commonlist.is_read_only());
    }

    #[test]
    fn test_serde_uses_wire_spelling() {
        let json = serde_json::to_string(&ContentType::Md5HashString).unwrap();
        assert_eq!(json, "\"md5HashString\"");
        assert_eq!(ActionName::SetHeader.to_string(), "setHeader");
    }
}
