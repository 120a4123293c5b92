//! Stem handlers.

use crate::auth::{authorize, MEMBER_ROLES};
use crate::errors::WsError;
use crate::models::Stem;
use crate::routes::AppState;
use crate::services::workspace_service;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use common::types::StemId;
use common::RequestScope;
use std::sync::Arc;

/// `GET /v1/stems`
pub async fn list_stems(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
) -> Result<Json<Vec<Stem>>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    Ok(Json(workspace_service::list_stems(&state.pool).await?))
}

/// `GET /v1/stems/:id`
pub async fn get_stem(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<Json<Stem>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let id: StemId = id.parse()?;

    Ok(Json(workspace_service::get_stem(&state.pool, id).await?))
}
