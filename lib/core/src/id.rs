//! Strongly-typed identifiers for users, protected objects and the records
//! owned by the two registries.
//!
//! Every identifier wraps a ULID, so identifiers generated later sort after
//! identifiers generated earlier. The registries rely on this to define
//! "first match" among duplicate records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Generates a ULID-backed identifier with a display prefix.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Creates a new ID with a freshly generated ULID.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Creates an ID from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }

            /// Returns the prefix used for display formatting.
            #[must_use]
            pub const fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // The prefix is optional on input
                let raw = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);

                Ulid::from_str(raw).map(Self).map_err(|e| ParseIdError {
                    id_type: stringify!($name),
                    reason: e.to_string(),
                })
            }
        }

        impl From<Ulid> for $name {
            fn from(ulid: Ulid) -> Self {
                Self(ulid)
            }
        }

        impl From<$name> for Ulid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Stable identifier of a user, as produced by identity resolution.
    UserId,
    "usr"
);

define_id!(
    /// Identifier of a protected object (a post, a reply, a community...).
    ObjectId,
    "obj"
);

define_id!(
    /// Identifier of a relationship type defined by a user.
    RelationshipTypeId,
    "rtype"
);

define_id!(
    /// Identifier of one edge from a relationship type to a target user.
    RelationEdgeId,
    "redge"
);

define_id!(
    /// Identifier of a privacy attribute attached to a protected object.
    PrivacyAttributeId,
    "pattr"
);

define_id!(
    /// Identifier of one permitted value of a privacy attribute.
    AttributeValueId,
    "pval"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        assert!(UserId::new().to_string().starts_with("usr_"));
        assert!(ObjectId::new().to_string().starts_with("obj_"));
        assert!(RelationshipTypeId::new().to_string().starts_with("rtype_"));
        assert!(PrivacyAttributeId::new().to_string().starts_with("pattr_"));
    }

    #[test]
    fn parse_with_prefix() {
        let id = ObjectId::new();
        let parsed: ObjectId = id.to_string().parse().expect("should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_without_prefix() {
        let ulid = Ulid::new();
        let id: UserId = ulid.to_string().parse().expect("should parse");
        assert_eq!(id.as_ulid(), ulid);
    }

    #[test]
    fn parse_rejects_foreign_prefix() {
        let user = UserId::new();
        let result: Result<ObjectId, _> = user.to_string().parse();
        let err = result.expect_err("usr_ prefix is not an object id");
        assert_eq!(err.id_type, "ObjectId");
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let first = RelationEdgeId::from_ulid(Ulid::from_parts(1_000, 7));
        let second = RelationEdgeId::from_ulid(Ulid::from_parts(2_000, 3));
        assert!(first < second);
    }

    #[test]
    fn serializes_as_bare_ulid() {
        let id = AttributeValueId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.as_ulid()));
    }
}
