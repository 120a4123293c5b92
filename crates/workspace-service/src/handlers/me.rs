//! Current user endpoint.

use crate::auth::{authorize, MEMBER_ROLES};
use crate::errors::WsError;
use crate::models::MeResponse;
use axum::{Extension, Json};
use common::RequestScope;
use tracing::instrument;

/// `GET /v1/me`: the authenticated subject and roles.
#[instrument(skip_all, name = "ws.handler.me")]
pub async fn get_me(Extension(scope): Extension<RequestScope>) -> Result<Json<MeResponse>, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;

    Ok(Json(MeResponse {
        sub: claims.sub.clone(),
        roles: claims.roles.clone(),
        trace_id: scope.trace_id(),
    }))
}
