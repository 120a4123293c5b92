use super::validated;
use crate::errors::WsError;
use crate::models::{IssueTokenRequest, IssueTokenResponse};
use crate::observability::metrics::record_token_issued;
use chrono::{DateTime, Utc};
use common::{AuthenticationContext, Claims};
use std::time::Duration;
use tracing::instrument;

/// Lifetime of a minted token: the requested TTL, capped at `max_ttl`.
fn effective_ttl(requested_seconds: Option<u64>, max_ttl: Duration) -> Duration {
    requested_seconds
        .map(Duration::from_secs)
        .map_or(max_ttl, |requested| requested.min(max_ttl))
}

/// Mint a token for `request.subject` with the active signing key.
///
/// # Errors
///
/// - `Validation` for an empty subject or role list
/// - `Internal` if the active key can no longer sign
#[instrument(skip_all, name = "ws.service.issue_token")]
pub async fn issue_token(
    auth: &AuthenticationContext,
    request: &IssueTokenRequest,
    max_ttl: Duration,
    issuer: Option<&str>,
    now: DateTime<Utc>,
) -> Result<IssueTokenResponse, WsError> {
    validated(request.validate())?;

    let ttl = effective_ttl(request.ttl_seconds, max_ttl);
    let chrono_ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| WsError::Internal(format!("token TTL out of range: {e}")))?;

    let mut claims = Claims::issue(request.subject.trim(), request.roles.clone(), now, chrono_ttl);
    if let Some(issuer) = issuer {
        claims = claims.with_issuer(issuer);
    }

    let access_token = auth.generate_token(&claims).await?;
    record_token_issued();

    tracing::info!(
        target: "ws.service.token",
        key_id = auth.active_key_id(),
        ttl_seconds = ttl.as_secs(),
        "Token issued"
    );

    Ok(IssueTokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: ttl.as_secs(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::testing::{key_store, PRIMARY_KEY_ID};

    async fn auth() -> AuthenticationContext {
        AuthenticationContext::new(PRIMARY_KEY_ID, key_store())
            .await
            .unwrap()
    }

    fn request(ttl_seconds: Option<u64>) -> IssueTokenRequest {
        IssueTokenRequest {
            subject: "importer".to_string(),
            roles: vec!["USER".to_string()],
            ttl_seconds,
        }
    }

    #[test]
    fn test_effective_ttl_caps() {
        let max = Duration::from_secs(3600);
        assert_eq!(effective_ttl(None, max), max);
        assert_eq!(effective_ttl(Some(60), max), Duration::from_secs(60));
        assert_eq!(effective_ttl(Some(86_400), max), max);
    }

    #[tokio::test]
    async fn test_issued_token_verifies() {
        let auth = auth().await;
        let response = issue_token(
            &auth,
            &request(Some(120)),
            Duration::from_secs(3600),
            Some("workspace-service"),
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 120);

        let claims = auth.read_claims_from_token(&response.access_token).await.unwrap();
        assert_eq!(claims.sub, "importer");
        assert_eq!(claims.roles, vec!["USER".to_string()]);
        assert_eq!(claims.iss.as_deref(), Some("workspace-service"));
        assert_eq!(claims.exp - claims.iat.unwrap(), 120);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_signing() {
        let auth = auth().await;
        let bad = IssueTokenRequest {
            subject: String::new(),
            roles: vec![],
            ttl_seconds: None,
        };

        let result = issue_token(&auth, &bad, Duration::from_secs(3600), None, Utc::now()).await;
        assert!(matches!(result, Err(WsError::Validation(_))));
    }
}
