//! Workspace service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are generic for server-side failures; the actual error
//! is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::types::IdentifierError;
use common::AuthError;
use serde::Serialize;
use thiserror::Error;

/// Generic message for every rejected bearer token.
pub const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON field name.
    pub field: String,
    /// Human-readable reason.
    pub error: String,
}

impl FieldError {
    pub fn new(field: &str, error: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            error: error.into(),
        }
    }
}

/// Workspace service error type.
///
/// Maps to HTTP status codes:
/// - Database, Internal: 500 Internal Server Error
/// - InvalidToken: 401 Unauthorized
/// - Forbidden: 403 Forbidden
/// - NotFound: 404 Not Found
/// - Conflict: 409 Conflict
/// - BadRequest, InvalidIdentifier, Validation: 400 Bad Request
/// - ServiceUnavailable: 503 Service Unavailable
#[derive(Debug, Error)]
pub enum WsError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Identifier is not in its proper form")]
    InvalidIdentifier,

    #[error("Data validation error")]
    Validation(Vec<FieldError>),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WsError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            WsError::Database(_) | WsError::Internal(_) => 500,
            WsError::InvalidToken(_) => 401,
            WsError::Forbidden(_) => 403,
            WsError::NotFound(_) => 404,
            WsError::Conflict(_) => 409,
            WsError::BadRequest(_) | WsError::InvalidIdentifier | WsError::Validation(_) => 400,
            WsError::ServiceUnavailable(_) => 503,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for WsError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match self {
            WsError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "ws.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            WsError::InvalidToken(reason) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason),
            WsError::Forbidden(reason) => (StatusCode::FORBIDDEN, "FORBIDDEN", reason),
            WsError::NotFound(resource) => (StatusCode::NOT_FOUND, "NOT_FOUND", resource),
            WsError::Conflict(reason) => (StatusCode::CONFLICT, "CONFLICT", reason),
            WsError::BadRequest(reason) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason),
            WsError::InvalidIdentifier => (
                StatusCode::BAD_REQUEST,
                "INVALID_IDENTIFIER",
                "Identifier is not in its proper form".to_string(),
            ),
            WsError::Validation(errors) => {
                fields = Some(errors);
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Data validation error".to_string(),
                )
            }
            WsError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "ws.availability", reason = %reason, "Service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            WsError::Internal(reason) => {
                tracing::error!(target: "ws.internal", reason = %reason, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                fields,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"workspace-service\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Convert sqlx errors to WsError
impl From<sqlx::Error> for WsError {
    fn from(err: sqlx::Error) -> Self {
        WsError::Database(err.to_string())
    }
}

impl From<IdentifierError> for WsError {
    fn from(_: IdentifierError) -> Self {
        WsError::InvalidIdentifier
    }
}

/// Untrusted-token failures become a generic 401; anything that points at a
/// server-side fault (missing signing key, scope misuse) becomes a 500.
impl From<AuthError> for WsError {
    fn from(err: AuthError) -> Self {
        if err.is_untrusted_token() {
            WsError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string())
        } else {
            WsError::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use common::{KeyStoreError, RejectReason};
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WsError::Database("x".into()).status_code(), 500);
        assert_eq!(WsError::Internal("x".into()).status_code(), 500);
        assert_eq!(WsError::InvalidToken("x".into()).status_code(), 401);
        assert_eq!(WsError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(WsError::NotFound("x".into()).status_code(), 404);
        assert_eq!(WsError::Conflict("x".into()).status_code(), 409);
        assert_eq!(WsError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(WsError::InvalidIdentifier.status_code(), 400);
        assert_eq!(WsError::Validation(vec![]).status_code(), 400);
        assert_eq!(WsError::ServiceUnavailable("x".into()).status_code(), 503);
    }

    #[tokio::test]
    async fn test_invalid_token_response_has_www_authenticate() {
        let response = WsError::InvalidToken(INVALID_TOKEN_MESSAGE.to_string()).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let header = response.headers().get("WWW-Authenticate").unwrap();
        assert_eq!(
            header.to_str().unwrap(),
            "Bearer realm=\"workspace-service\", error=\"invalid_token\""
        );

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
        assert_eq!(body["error"]["message"], INVALID_TOKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_database_error_message_is_generic() {
        let response =
            WsError::Database("relation \"project\" does not exist".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("relation"));
    }

    #[tokio::test]
    async fn test_internal_error_message_is_generic() {
        let response = WsError::Internal("claims missing".to_string()).into_response();
        let body = read_body_json(response.into_body()).await;

        assert_eq!(body["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_validation_response_lists_fields() {
        let response = WsError::Validation(vec![
            FieldError::new("name", "name is a required field"),
            FieldError::new("x_max", "x_max must be 1 or greater"),
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["fields"][0]["field"], "name");
        assert_eq!(body["error"]["fields"][1]["field"], "x_max");
    }

    #[tokio::test]
    async fn test_other_errors_omit_fields() {
        let response = WsError::NotFound("Project not found".to_string()).into_response();
        let body = read_body_json(response.into_body()).await;

        assert!(body["error"].get("fields").is_none());
        assert!(response_has_no_auth_header(
            WsError::Forbidden("x".into()).into_response()
        ));
    }

    fn response_has_no_auth_header(response: Response) -> bool {
        response.headers().get("WWW-Authenticate").is_none()
    }

    #[test]
    fn test_auth_error_mapping() {
        let untrusted = [
            AuthError::KidNotFound,
            AuthError::KidInvalidType,
            AuthError::TokenAuthority(RejectReason::Expired),
            AuthError::KeyStore(KeyStoreError::UnknownKey("old".into())),
        ];
        for err in untrusted {
            let mapped = WsError::from(err);
            assert!(
                matches!(mapped, WsError::InvalidToken(ref m) if m == INVALID_TOKEN_MESSAGE),
                "got {mapped:?}"
            );
        }

        let server_faults = [
            AuthError::KeyNotFound,
            AuthError::ClaimsMissing,
            AuthError::Signing("boom".into()),
            AuthError::KeyStore(KeyStoreError::Unavailable("disk".into())),
        ];
        for err in server_faults {
            assert!(matches!(WsError::from(err), WsError::Internal(_)));
        }
    }

    #[test]
    fn test_identifier_error_mapping() {
        let err: WsError = IdentifierError::Invalid.into();
        assert!(matches!(err, WsError::InvalidIdentifier));
    }
}
