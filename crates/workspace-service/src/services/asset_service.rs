use super::{ensure_owner, validated};
use crate::errors::WsError;
use crate::models::{Asset, CreateAssetRequest, Page, UpdateAssetRequest};
use crate::repositories::{AssetsRepository, WorkspacesRepository};
use chrono::Utc;
use common::types::{AssetId, WorkspaceId};
use common::Claims;
use sqlx::PgPool;
use tracing::instrument;

fn not_found() -> WsError {
    WsError::NotFound("Asset not found".to_string())
}

pub async fn list_assets(
    pool: &PgPool,
    workspace_id: WorkspaceId,
    page: Page,
) -> Result<Vec<Asset>, WsError> {
    if WorkspacesRepository::find_by_id(pool, workspace_id)
        .await?
        .is_none()
    {
        return Err(WsError::NotFound("Workspace not found".to_string()));
    }
    AssetsRepository::list_by_workspace(pool, workspace_id, page).await
}

pub async fn get_asset(pool: &PgPool, id: AssetId) -> Result<Asset, WsError> {
    AssetsRepository::find_by_id(pool, id)
        .await?
        .ok_or_else(not_found)
}

/// Place a new asset in a workspace.
///
/// # Errors
///
/// - `Validation` for bad fields or a box outside the workspace bounds
/// - `NotFound` if the workspace does not exist
/// - `Conflict` once the workspace holds `assetAmountLimit` assets
#[instrument(skip_all, name = "ws.service.create_asset", fields(workspace_id = %workspace_id))]
pub async fn create_asset(
    pool: &PgPool,
    claims: &Claims,
    workspace_id: WorkspaceId,
    request: &CreateAssetRequest,
) -> Result<Asset, WsError> {
    validated(request.validate())?;
    let placement = request.placement();

    let created = AssetsRepository::create_with_limit_check(
        pool,
        AssetId::new(),
        workspace_id,
        request,
        &claims.sub,
        Utc::now(),
        |workspace| validated(placement.check_within(workspace.bounds())),
    )
    .await?;

    match created {
        Some(asset) => {
            tracing::info!(
                target: "ws.service.asset",
                asset_id = %asset.asset_id,
                "Asset created"
            );
            Ok(asset)
        }
        None => {
            tracing::debug!(target: "ws.service.asset", "Workspace asset limit reached");
            Err(WsError::Conflict(
                "Workspace has reached its asset amount limit".to_string(),
            ))
        }
    }
}

#[instrument(skip_all, name = "ws.service.update_asset", fields(asset_id = %id))]
pub async fn update_asset(
    pool: &PgPool,
    claims: &Claims,
    id: AssetId,
    request: &UpdateAssetRequest,
) -> Result<Asset, WsError> {
    if !request.has_changes() {
        return Err(WsError::BadRequest("No fields to update".to_string()));
    }
    validated(request.validate())?;

    let current = get_asset(pool, id).await?;
    ensure_owner(&current.created_by_user_id, claims, "asset")?;

    AssetsRepository::update(
        pool,
        id,
        WorkspaceId(current.workspace_id),
        request,
        &claims.sub,
        Utc::now(),
        |workspace, locked| {
            if request.moves_or_resizes() {
                validated(
                    request
                        .apply_to(locked.placement())
                        .check_within(workspace.bounds()),
                )
            } else {
                Ok(())
            }
        },
    )
    .await?
    .ok_or_else(not_found)
}

#[instrument(skip_all, name = "ws.service.delete_asset", fields(asset_id = %id))]
pub async fn delete_asset(pool: &PgPool, claims: &Claims, id: AssetId) -> Result<(), WsError> {
    let current = get_asset(pool, id).await?;
    ensure_owner(&current.created_by_user_id, claims, "asset")?;

    if !AssetsRepository::delete(pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(target: "ws.service.asset", asset_id = %id, "Asset deleted");
    Ok(())
}
