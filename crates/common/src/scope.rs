//! Per-request scope that carries verified claims.
//!
//! A [`RequestScope`] is an immutable value. Authentication produces a new
//! scope with claims attached; the original is never modified, so a scope
//! that never went through authentication can never yield claims. Callers
//! thread the scope explicitly (in HTTP handlers it travels in request
//! extensions).

use crate::claims::Claims;
use crate::error::AuthError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Request metadata plus, once authenticated, the caller's claims.
#[derive(Debug, Clone)]
pub struct RequestScope {
    trace_id: Uuid,
    received_at: DateTime<Utc>,
    claims: Option<Arc<Claims>>,
}

impl RequestScope {
    /// Create an unauthenticated scope.
    #[must_use]
    pub fn new(trace_id: Uuid, received_at: DateTime<Utc>) -> Self {
        Self {
            trace_id,
            received_at,
            claims: None,
        }
    }

    /// Create an unauthenticated scope with a random trace id and the current time.
    #[must_use]
    pub fn start() -> Self {
        Self::new(Uuid::new_v4(), Utc::now())
    }

    /// The request trace id.
    #[must_use]
    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    /// When the request was received.
    #[must_use]
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Derive a scope carrying `claims`. `self` is left untouched.
    #[must_use]
    pub fn attach_claims(&self, claims: Claims) -> Self {
        Self {
            trace_id: self.trace_id,
            received_at: self.received_at,
            claims: Some(Arc::new(claims)),
        }
    }

    /// The attached claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ClaimsMissing` if no claims were ever attached.
    /// This indicates authorization ran before authentication and is a server
    /// fault, not a client one.
    pub fn claims(&self) -> Result<&Claims, AuthError> {
        self.claims.as_deref().ok_or(AuthError::ClaimsMissing)
    }

    /// Whether claims have been attached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }
}
