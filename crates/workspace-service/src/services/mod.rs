//! Service layer for the workspace service.
//!
//! Business rules live here: validation, ownership and existence checks.
//! Handlers authenticate and authorize; repositories only talk SQL.
//!
//! # Components
//!
//! - `project_service` - Project CRUD
//! - `workspace_service` - Workspace CRUD and stem lookups
//! - `asset_service` - Asset CRUD with limit and bounds enforcement
//! - `token_service` - Admin token minting

pub mod asset_service;
pub mod project_service;
pub mod token_service;
pub mod workspace_service;

use crate::errors::{FieldError, WsError};
use common::Claims;

/// Only the principal that created an entity may change or delete it.
fn ensure_owner(created_by_user_id: &str, claims: &Claims, entity: &str) -> Result<(), WsError> {
    if created_by_user_id == claims.sub {
        Ok(())
    } else {
        tracing::debug!(target: "ws.service.ownership", entity, "Caller is not the creator");
        Err(WsError::Forbidden(format!("Only the creator may modify this {entity}")))
    }
}

fn validated(result: Result<(), Vec<FieldError>>) -> Result<(), WsError> {
    result.map_err(WsError::Validation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_ensure_owner() {
        let claims = Claims::issue("owner-1", vec!["USER".to_string()], Utc::now(), Duration::minutes(5));

        assert!(ensure_owner("owner-1", &claims, "project").is_ok());
        assert!(matches!(
            ensure_owner("someone-else", &claims, "project"),
            Err(WsError::Forbidden(_))
        ));
        // Exact match only.
        assert!(ensure_owner("OWNER-1", &claims, "project").is_err());
    }

    #[test]
    fn test_validated_wraps_field_errors() {
        let err = validated(Err(vec![FieldError::new("name", "required")])).unwrap_err();
        assert!(matches!(err, WsError::Validation(fields) if fields.len() == 1));
    }
}
