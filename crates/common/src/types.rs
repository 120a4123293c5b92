//! Identifier types for workspace entities.
//!
//! Every entity is keyed by a UUID. Parsing from path segments goes through
//! [`FromStr`] so an invalid identifier is rejected before any query runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a string is not a valid identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Not a UUID.
    #[error("identifier is not in its proper form")]
    Invalid,
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|_| IdentifierError::Invalid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a project
    ProjectId
);

uuid_id!(
    /// Unique identifier for a workspace
    WorkspaceId
);

uuid_id!(
    /// Unique identifier for an asset
    AssetId
);

uuid_id!(
    /// Unique identifier for a stem (workspace type)
    StemId
);

/// Identifier of an authenticated principal (the token `sub`).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Borrow the raw subject.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserId([REDACTED])")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_identifier() {
        let raw = "2fdf996e-2372-4f3c-bccf-d8efcca8bd49";
        let id: StemId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parse_invalid_identifier() {
        for raw in ["", "not-a-uuid", "2fdf996e-2372-4f3c-bccf", "'; DROP TABLE project;--"] {
            assert_eq!(
                raw.parse::<ProjectId>(),
                Err(IdentifierError::Invalid),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(WorkspaceId::new(), WorkspaceId::new());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = AssetId(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn test_user_id_debug_is_redacted() {
        let user = UserId("alice@example.com".to_string());
        assert!(!format!("{user:?}").contains("alice"));
        assert_eq!(user.as_str(), "alice@example.com");
    }
}
