//! Identity and authorization payload carried inside a token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Claims carried by an access token.
///
/// Registered claim names follow RFC 7519. `roles` lists the role names
/// assigned to the principal when the token was issued.
///
/// # Security
///
/// `sub` and `jti` are redacted in Debug output. Claims decoded from a token
/// are only trustworthy once `AuthenticationContext::read_claims_from_token`
/// has returned them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject (principal identifier) - redacted in Debug output.
    pub sub: String,

    /// Audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Not-before timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Unique token identifier - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Roles granted to the subject, in issuance order.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("nbf", &self.nbf)
            .field("iat", &self.iat)
            .field("jti", &self.jti.as_ref().map(|_| "[REDACTED]"))
            .field("roles", &self.roles)
            .finish()
    }
}

impl Claims {
    /// Build claims for a fresh token: `iat` and `nbf` are `now`, `exp` is
    /// `now + ttl` and `jti` is a random UUID.
    #[must_use]
    pub fn issue(
        subject: impl Into<String>,
        roles: Vec<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let issued_at = now.timestamp();
        Self {
            iss: None,
            sub: subject.into(),
            aud: None,
            exp: (now + ttl).timestamp(),
            nbf: Some(issued_at),
            iat: Some(issued_at),
            jti: Some(Uuid::new_v4().to_string()),
            roles,
        }
    }

    /// Set the issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Set the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Returns `true` if any of the subject's roles exactly matches one of
    /// `allowed_roles`.
    ///
    /// Matching is case-sensitive string equality with no hierarchy or
    /// wildcards. An empty role list on either side never authorizes.
    #[must_use]
    pub fn authorize_check<S: AsRef<str>>(&self, allowed_roles: &[S]) -> bool {
        self.roles
            .iter()
            .any(|role| allowed_roles.iter().any(|allowed| allowed.as_ref() == role))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn claims_with_roles(roles: &[&str]) -> Claims {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Claims::issue(
            "user-42",
            roles.iter().map(ToString::to_string).collect(),
            now,
            Duration::hours(1),
        )
    }

    #[test]
    fn test_issue_sets_temporal_claims() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = Claims::issue("user-42", vec![], now, Duration::minutes(15));

        assert_eq!(claims.iat, Some(now.timestamp()));
        assert_eq!(claims.nbf, Some(now.timestamp()));
        assert_eq!(claims.exp, now.timestamp() + 900);
        assert!(claims.jti.is_some());
        assert_eq!(claims.sub, "user-42");
    }

    #[test]
    fn test_issue_generates_unique_jti() {
        let a = claims_with_roles(&[]);
        let b = claims_with_roles(&[]);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_builder_helpers() {
        let claims = claims_with_roles(&["USER"])
            .with_issuer("workspace-service")
            .with_audience("workspace-api");

        assert_eq!(claims.iss.as_deref(), Some("workspace-service"));
        assert_eq!(claims.aud.as_deref(), Some("workspace-api"));
    }

    #[test]
    fn test_authorize_check_intersecting() {
        let claims = claims_with_roles(&["USER", "AUDITOR"]);
        assert!(claims.authorize_check(&["ADMIN", "AUDITOR"]));
        assert!(claims.authorize_check(&["USER"]));
    }

    #[test]
    fn test_authorize_check_disjoint() {
        let claims = claims_with_roles(&["USER"]);
        assert!(!claims.authorize_check(&["ADMIN"]));
    }

    #[test]
    fn test_authorize_check_is_case_sensitive() {
        let claims = claims_with_roles(&["admin"]);
        assert!(!claims.authorize_check(&["ADMIN"]));
        assert!(!claims.authorize_check(&["admin "]));
    }

    #[test]
    fn test_authorize_check_empty_sets() {
        let no_roles = claims_with_roles(&[]);
        let empty: [&str; 0] = [];

        assert!(!no_roles.authorize_check(&["ADMIN"]));
        assert!(!claims_with_roles(&["ADMIN"]).authorize_check(&empty));
        assert!(!no_roles.authorize_check(&empty));
    }

    #[test]
    fn test_authorize_check_accepts_owned_strings() {
        let claims = claims_with_roles(&["USER"]);
        let allowed = vec!["USER".to_string()];
        assert!(claims.authorize_check(&allowed));
    }

    #[test]
    fn test_debug_redacts_subject_and_jti() {
        let claims = claims_with_roles(&["USER"]);
        let jti = claims.jti.clone().unwrap();
        let debug_str = format!("{claims:?}");

        assert!(!debug_str.contains("user-42"), "sub must be redacted");
        assert!(!debug_str.contains(&jti), "jti must be redacted");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("USER"), "roles are not sensitive");
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let claims = Claims {
            iss: None,
            sub: "user-42".to_string(),
            aud: None,
            exp: 1_700_000_000,
            nbf: None,
            iat: None,
            jti: None,
            roles: vec!["USER".to_string()],
        };

        let json = serde_json::to_value(&claims).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3, "only sub, exp and roles expected: {json}");
        assert_eq!(json["roles"], serde_json::json!(["USER"]));
    }

    #[test]
    fn test_deserialization_defaults_roles() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub":"user-42","exp":1700000000}"#).unwrap();
        assert!(claims.roles.is_empty());
        assert_eq!(claims.iss, None);
    }

    #[test]
    fn test_deserialization_requires_exp() {
        let result = serde_json::from_str::<Claims>(r#"{"sub":"user-42","roles":[]}"#);
        assert!(result.is_err());
    }
}
