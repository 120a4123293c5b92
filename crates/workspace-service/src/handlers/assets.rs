//! Asset handlers.

use super::parse_body;
use crate::auth::{authorize, MEMBER_ROLES};
use crate::errors::WsError;
use crate::models::{Asset, UpdateAssetRequest};
use crate::routes::AppState;
use crate::services::asset_service;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use common::types::AssetId;
use common::RequestScope;
use std::sync::Arc;
use tracing::instrument;

/// `GET /v1/assets/:id`
#[instrument(skip_all, name = "ws.handler.get_asset")]
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<Json<Asset>, WsError> {
    authorize(&scope, MEMBER_ROLES)?;
    let id: AssetId = id.parse()?;

    Ok(Json(asset_service::get_asset(&state.pool, id).await?))
}

/// `PATCH /v1/assets/:id`
#[instrument(skip_all, name = "ws.handler.update_asset")]
pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Asset>, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: AssetId = id.parse()?;
    let request: UpdateAssetRequest = parse_body(&body)?;

    Ok(Json(
        asset_service::update_asset(&state.pool, claims, id, &request).await?,
    ))
}

/// `DELETE /v1/assets/:id`
#[instrument(skip_all, name = "ws.handler.delete_asset")]
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    Extension(scope): Extension<RequestScope>,
    Path(id): Path<String>,
) -> Result<StatusCode, WsError> {
    let claims = authorize(&scope, MEMBER_ROLES)?;
    let id: AssetId = id.parse()?;

    asset_service::delete_asset(&state.pool, claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
