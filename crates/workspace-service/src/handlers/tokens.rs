//! Admin token issuance.

use super::parse_body;
use crate::auth::{authorize, ADMIN_ROLES};
use crate::errors::WsError;
use crate::models::{IssueTokenRequest, IssueTokenResponse};
use crate::routes::AppState;
use crate::services::token_service;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use common::RequestScope;
use std::sync::Arc;
use tracing::instrument;

/// `POST /v1/admin/tokens`: mint a token with the active signing key.
///
/// ADMIN only. There is no password flow; this is how operators hand out
/// credentials.
#[instrument(skip_all, name = "ws.handler.issue_token")]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    body: Bytes,
) -> Result<(StatusCode, Json<IssueTokenResponse>), WsError> {
    authorize(&scope, ADMIN_ROLES)?;
    let request: IssueTokenRequest = parse_body(&body)?;

    let response = token_service::issue_token(
        &state.auth,
        &request,
        state.config.token_ttl,
        state.config.token_issuer.as_deref(),
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}
