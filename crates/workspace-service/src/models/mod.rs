//! Workspace service models.
//!
//! Database rows, API request bodies and their validation rules. Rows map
//! column-for-column via `sqlx::FromRow`; JSON field names follow the public
//! API (`projectId`, `maxX`, ...).

use crate::errors::FieldError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Readiness check response.
///
/// Returned by the `/ready` endpoint (readiness probe).
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// Service readiness status ("ready" or "not_ready").
    pub status: &'static str,

    /// Database connectivity status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,

    /// Error message (generic, no infrastructure details).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Paging
// ============================================================================

/// Page size used when `top` is omitted.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 500;

/// `?skip=&top=` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub top: Option<i64>,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub top: i64,
}

impl ListParams {
    /// Apply defaults and bounds.
    ///
    /// # Errors
    ///
    /// Returns field errors for a negative `skip` or a `top` outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn page(&self) -> Result<Page, Vec<FieldError>> {
        let skip = self.skip.unwrap_or(0);
        let top = self.top.unwrap_or(DEFAULT_PAGE_SIZE);

        let mut errors = Vec::new();
        if skip < 0 {
            errors.push(FieldError::new("skip", "skip must be 0 or greater"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&top) {
            errors.push(FieldError::new(
                "top",
                format!("top must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        if errors.is_empty() {
            Ok(Page { skip, top })
        } else {
            Err(errors)
        }
    }
}

// ============================================================================
// Shared validation helpers
// ============================================================================

/// Maximum length of names and external references.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 4000;

fn check_required_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, format!("{field} is a required field")));
    } else if trimmed.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
}

fn check_optional_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
}

fn check_min(errors: &mut Vec<FieldError>, field: &str, value: i32, min: i32) {
    if value < min {
        errors.push(FieldError::new(
            field,
            format!("{field} must be {min} or greater"),
        ));
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Project database row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    #[serde(rename = "id")]
    pub project_id: Uuid,
    #[serde(rename = "projectTypeId")]
    pub project_collaboration_type_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    #[serde(rename = "createdByUser")]
    pub created_by_user_id: String,
    #[serde(rename = "dateUpdated")]
    pub date_updated: DateTime<Utc>,
    #[serde(rename = "updatedByUser")]
    pub updated_by_user_id: String,
}

/// Body of `POST /v1/projects`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_type_id: Uuid,
    pub name: String,
    pub description: String,
}

impl CreateProjectRequest {
    /// Validate the request fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, "name", &self.name, MAX_NAME_LENGTH);
        check_required_text(
            &mut errors,
            "description",
            &self.description,
            MAX_DESCRIPTION_LENGTH,
        );
        into_result(errors)
    }
}

/// Body of `PATCH /v1/projects/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectRequest {
    /// Check if any field is being updated.
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }

    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_required_text(&mut errors, "name", name, MAX_NAME_LENGTH);
        }
        if let Some(description) = &self.description {
            check_required_text(&mut errors, "description", description, MAX_DESCRIPTION_LENGTH);
        }
        into_result(errors)
    }
}

// ============================================================================
// Stems
// ============================================================================

/// Workspace type (Sticker, 2D, 3D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Stem {
    #[serde(rename = "id")]
    pub stem_id: Uuid,
    pub name: String,
}

// ============================================================================
// Workspaces
// ============================================================================

/// Workspace database row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Workspace {
    #[serde(rename = "id")]
    pub workspace_id: Uuid,
    #[serde(rename = "projectId")]
    pub project_id: Uuid,
    #[serde(rename = "stemId")]
    pub stem_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "assetAmountLimit")]
    pub asset_amount_limit: i32,
    #[serde(rename = "maxX")]
    pub x_max: i32,
    #[serde(rename = "maxY")]
    pub y_max: i32,
    #[serde(rename = "maxZ")]
    pub z_max: i32,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    #[serde(rename = "createdByUser")]
    pub created_by_user_id: String,
    #[serde(rename = "dateUpdated")]
    pub date_updated: DateTime<Utc>,
    #[serde(rename = "updatedByUser")]
    pub updated_by_user_id: String,
}

impl Workspace {
    /// The scene extent assets must fit in.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x_max: self.x_max,
            y_max: self.y_max,
            z_max: self.z_max,
        }
    }
}

/// Body of `POST /v1/projects/{id}/workspaces`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    pub stem_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub asset_amount_limit: i32,
    pub max_x: i32,
    pub max_y: i32,
    pub max_z: i32,
}

impl CreateWorkspaceRequest {
    /// Validate the request fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, "name", &self.name, MAX_NAME_LENGTH);
        check_optional_text(
            &mut errors,
            "description",
            &self.description,
            MAX_DESCRIPTION_LENGTH,
        );
        check_min(&mut errors, "assetAmountLimit", self.asset_amount_limit, 1);
        check_min(&mut errors, "maxX", self.max_x, 1);
        check_min(&mut errors, "maxY", self.max_y, 1);
        check_min(&mut errors, "maxZ", self.max_z, 0);
        into_result(errors)
    }
}

/// Body of `PATCH /v1/workspaces/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub asset_amount_limit: Option<i32>,
    pub max_x: Option<i32>,
    pub max_y: Option<i32>,
    pub max_z: Option<i32>,
}

impl UpdateWorkspaceRequest {
    /// Check if any field is being updated.
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.asset_amount_limit.is_some()
            || self.max_x.is_some()
            || self.max_y.is_some()
            || self.max_z.is_some()
    }

    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_required_text(&mut errors, "name", name, MAX_NAME_LENGTH);
        }
        if let Some(description) = &self.description {
            check_optional_text(&mut errors, "description", description, MAX_DESCRIPTION_LENGTH);
        }
        if let Some(limit) = self.asset_amount_limit {
            check_min(&mut errors, "assetAmountLimit", limit, 1);
        }
        if let Some(x) = self.max_x {
            check_min(&mut errors, "maxX", x, 1);
        }
        if let Some(y) = self.max_y {
            check_min(&mut errors, "maxY", y, 1);
        }
        if let Some(z) = self.max_z {
            check_min(&mut errors, "maxZ", z, 0);
        }
        into_result(errors)
    }
}

// ============================================================================
// Assets
// ============================================================================

/// Extent of a workspace scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x_max: i32,
    pub y_max: i32,
    pub z_max: i32,
}

/// Position and size of an asset inside its workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub width: i32,
    pub height: i32,
    pub length: i32,
}

impl Placement {
    /// Check that the asset's box lies inside `bounds` on every axis.
    ///
    /// # Errors
    ///
    /// Returns one field error per axis that overflows.
    pub fn check_within(&self, bounds: Bounds) -> Result<(), Vec<FieldError>> {
        let axes = [
            ("x", self.x, self.width, bounds.x_max, "maxX"),
            ("y", self.y, self.height, bounds.y_max, "maxY"),
            ("z", self.z, self.length, bounds.z_max, "maxZ"),
        ];

        let errors = axes
            .into_iter()
            .filter(|(_, position, size, max, _)| i64::from(*position) + i64::from(*size) > i64::from(*max))
            .map(|(field, _, _, max, bound)| {
                FieldError::new(field, format!("asset exceeds workspace {bound} of {max}"))
            })
            .collect();
        into_result(errors)
    }
}

/// Asset database row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Asset {
    #[serde(rename = "id")]
    pub asset_id: Uuid,
    #[serde(rename = "workspaceId")]
    pub workspace_id: Uuid,
    #[serde(rename = "assetRefId")]
    pub asset_external_ref_id: String,
    #[serde(rename = "x")]
    pub position_x: i32,
    #[serde(rename = "y")]
    pub position_y: i32,
    #[serde(rename = "z")]
    pub position_z: i32,
    pub scale: i32,
    #[serde(rename = "height")]
    pub height_by_y: i32,
    #[serde(rename = "width")]
    pub width_by_x: i32,
    #[serde(rename = "length")]
    pub length_by_z: i32,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    #[serde(rename = "createdByUser")]
    pub created_by_user_id: String,
    #[serde(rename = "dateUpdated")]
    pub date_updated: DateTime<Utc>,
    #[serde(rename = "updatedByUser")]
    pub updated_by_user_id: String,
}

impl Asset {
    pub fn placement(&self) -> Placement {
        Placement {
            x: self.position_x,
            y: self.position_y,
            z: self.position_z,
            width: self.width_by_x,
            height: self.height_by_y,
            length: self.length_by_z,
        }
    }
}

/// Body of `POST /v1/workspaces/{id}/assets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    pub asset_ref_id: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub scale: i32,
    pub height: i32,
    pub width: i32,
    pub length: i32,
}

impl CreateAssetRequest {
    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            z: self.z,
            width: self.width,
            height: self.height,
            length: self.length,
        }
    }

    /// Validate the request fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, "assetRefId", &self.asset_ref_id, MAX_NAME_LENGTH);
        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("z", self.z),
            ("height", self.height),
            ("width", self.width),
            ("length", self.length),
        ] {
            check_min(&mut errors, field, value, 0);
        }
        check_min(&mut errors, "scale", self.scale, 1);
        into_result(errors)
    }
}

/// Body of `PATCH /v1/assets/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    pub asset_ref_id: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub z: Option<i32>,
    pub scale: Option<i32>,
    pub height: Option<i32>,
    pub width: Option<i32>,
    pub length: Option<i32>,
}

impl UpdateAssetRequest {
    /// Check if any field is being updated.
    pub fn has_changes(&self) -> bool {
        self.asset_ref_id.is_some()
            || self.scale.is_some()
            || self.moves_or_resizes()
    }

    /// Whether the asset's box changes, which requires a fresh bounds check.
    pub fn moves_or_resizes(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.z.is_some()
            || self.height.is_some()
            || self.width.is_some()
            || self.length.is_some()
    }

    /// The placement after applying this update to `current`.
    pub fn apply_to(&self, current: Placement) -> Placement {
        Placement {
            x: self.x.unwrap_or(current.x),
            y: self.y.unwrap_or(current.y),
            z: self.z.unwrap_or(current.z),
            width: self.width.unwrap_or(current.width),
            height: self.height.unwrap_or(current.height),
            length: self.length.unwrap_or(current.length),
        }
    }

    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(reference) = &self.asset_ref_id {
            check_required_text(&mut errors, "assetRefId", reference, MAX_NAME_LENGTH);
        }
        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("z", self.z),
            ("height", self.height),
            ("width", self.width),
            ("length", self.length),
        ] {
            if let Some(value) = value {
                check_min(&mut errors, field, value, 0);
            }
        }
        if let Some(scale) = self.scale {
            check_min(&mut errors, "scale", scale, 1);
        }
        into_result(errors)
    }
}

// ============================================================================
// Identity and tokens
// ============================================================================

/// Response of `GET /v1/me`.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub sub: String,
    pub roles: Vec<String>,
    #[serde(rename = "traceId")]
    pub trace_id: Uuid,
}

/// Body of `POST /v1/admin/tokens`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    pub subject: String,
    pub roles: Vec<String>,
    /// Requested lifetime; capped at the configured token TTL.
    pub ttl_seconds: Option<u64>,
}

impl IssueTokenRequest {
    /// Validate the request fields.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_required_text(&mut errors, "subject", &self.subject, MAX_NAME_LENGTH);
        if self.roles.is_empty() {
            errors.push(FieldError::new("roles", "roles must contain at least one role"));
        } else if self.roles.iter().any(|role| role.trim().is_empty()) {
            errors.push(FieldError::new("roles", "roles must not contain empty values"));
        }
        if self.ttl_seconds == Some(0) {
            errors.push(FieldError::new("ttlSeconds", "ttlSeconds must be 1 or greater"));
        }
        into_result(errors)
    }
}

/// Response of `POST /v1/admin/tokens`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_page_defaults() {
        let page = ListParams::default().page().unwrap();
        assert_eq!(page, Page { skip: 0, top: DEFAULT_PAGE_SIZE });
    }

    #[test]
    fn test_page_bounds() {
        let max = ListParams { skip: Some(10), top: Some(MAX_PAGE_SIZE) };
        assert_eq!(max.page().unwrap(), Page { skip: 10, top: MAX_PAGE_SIZE });

        let bad = ListParams { skip: Some(-1), top: Some(0) };
        assert_eq!(fields(&bad.page().unwrap_err()), vec!["skip", "top"]);

        let too_big = ListParams { skip: None, top: Some(MAX_PAGE_SIZE + 1) };
        assert!(too_big.page().is_err());
    }

    #[test]
    fn test_create_project_requires_name_and_description() {
        let request: CreateProjectRequest = serde_json::from_value(serde_json::json!({
            "projectTypeId": Uuid::nil(),
            "name": "  ",
            "description": ""
        }))
        .unwrap();

        assert_eq!(
            fields(&request.validate().unwrap_err()),
            vec!["name", "description"]
        );
    }

    #[test]
    fn test_create_project_rejects_long_name() {
        let request = CreateProjectRequest {
            project_type_id: Uuid::nil(),
            name: "n".repeat(MAX_NAME_LENGTH + 1),
            description: "d".to_string(),
        };
        assert_eq!(fields(&request.validate().unwrap_err()), vec!["name"]);
    }

    #[test]
    fn test_update_project_has_changes() {
        assert!(!UpdateProjectRequest::default().has_changes());
        let request = UpdateProjectRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(request.has_changes());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_project_rejects_blank_present_field() {
        let request = UpdateProjectRequest {
            description: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(fields(&request.validate().unwrap_err()), vec!["description"]);
    }

    fn workspace_request() -> CreateWorkspaceRequest {
        CreateWorkspaceRequest {
            stem_id: Uuid::nil(),
            name: "Board".to_string(),
            description: String::new(),
            asset_amount_limit: 10,
            max_x: 100,
            max_y: 100,
            max_z: 0,
        }
    }

    #[test]
    fn test_create_workspace_allows_flat_scene() {
        assert!(workspace_request().validate().is_ok());
    }

    #[test]
    fn test_create_workspace_bounds() {
        let request = CreateWorkspaceRequest {
            asset_amount_limit: 0,
            max_x: 0,
            max_y: -5,
            max_z: -1,
            ..workspace_request()
        };
        assert_eq!(
            fields(&request.validate().unwrap_err()),
            vec!["assetAmountLimit", "maxX", "maxY", "maxZ"]
        );
    }

    #[test]
    fn test_create_workspace_description_defaults_to_empty() {
        let request: CreateWorkspaceRequest = serde_json::from_value(serde_json::json!({
            "stemId": "2fdf996e-2372-4f3c-bccf-d8efcca8bd49",
            "name": "Sticker wall",
            "assetAmountLimit": 5,
            "maxX": 10,
            "maxY": 10,
            "maxZ": 0
        }))
        .unwrap();
        assert_eq!(request.description, "");
    }

    #[test]
    fn test_update_workspace_validates_present_fields() {
        let request = UpdateWorkspaceRequest {
            max_z: Some(-1),
            ..Default::default()
        };
        assert!(request.has_changes());
        assert_eq!(fields(&request.validate().unwrap_err()), vec!["maxZ"]);
    }

    fn asset_request() -> CreateAssetRequest {
        CreateAssetRequest {
            asset_ref_id: "cdn://sticker/42".to_string(),
            x: 0,
            y: 0,
            z: 0,
            scale: 1,
            height: 10,
            width: 10,
            length: 0,
        }
    }

    #[test]
    fn test_create_asset_validation() {
        assert!(asset_request().validate().is_ok());

        let request = CreateAssetRequest {
            asset_ref_id: String::new(),
            x: -1,
            scale: 0,
            ..asset_request()
        };
        assert_eq!(
            fields(&request.validate().unwrap_err()),
            vec!["assetRefId", "x", "scale"]
        );
    }

    #[test]
    fn test_placement_within_bounds() {
        let bounds = Bounds { x_max: 100, y_max: 50, z_max: 0 };

        assert!(asset_request().placement().check_within(bounds).is_ok());

        let edge = Placement { x: 90, y: 40, z: 0, width: 10, height: 10, length: 0 };
        assert!(edge.check_within(bounds).is_ok());

        let over = Placement { x: 95, y: 45, z: 1, width: 10, height: 10, length: 0 };
        assert_eq!(fields(&over.check_within(bounds).unwrap_err()), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_placement_does_not_overflow() {
        let bounds = Bounds { x_max: i32::MAX, y_max: 1, z_max: 0 };
        let huge = Placement { x: i32::MAX, y: 0, z: 0, width: i32::MAX, height: 0, length: 0 };
        assert_eq!(fields(&huge.check_within(bounds).unwrap_err()), vec!["x"]);
    }

    #[test]
    fn test_update_asset_apply_to() {
        let current = asset_request().placement();
        let update = UpdateAssetRequest {
            x: Some(5),
            length: Some(2),
            ..Default::default()
        };

        assert!(update.moves_or_resizes());
        let moved = update.apply_to(current);
        assert_eq!(moved.x, 5);
        assert_eq!(moved.length, 2);
        assert_eq!(moved.width, current.width);
    }

    #[test]
    fn test_update_asset_scale_only_does_not_move() {
        let update = UpdateAssetRequest {
            scale: Some(3),
            ..Default::default()
        };
        assert!(update.has_changes());
        assert!(!update.moves_or_resizes());
    }

    #[test]
    fn test_issue_token_validation() {
        let request: IssueTokenRequest = serde_json::from_value(serde_json::json!({
            "subject": "svc-importer",
            "roles": ["USER"]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.ttl_seconds, None);

        let bad = IssueTokenRequest {
            subject: " ".to_string(),
            roles: vec![],
            ttl_seconds: Some(0),
        };
        assert_eq!(
            fields(&bad.validate().unwrap_err()),
            vec!["subject", "roles", "ttlSeconds"]
        );
    }

    #[test]
    fn test_project_serializes_with_api_names() {
        let now = Utc::now();
        let project = Project {
            project_id: Uuid::nil(),
            project_collaboration_type_id: Uuid::nil(),
            name: "Launch".to_string(),
            description: "Q3 launch".to_string(),
            date_created: now,
            created_by_user_id: "user-1".to_string(),
            date_updated: now,
            updated_by_user_id: "user-1".to_string(),
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["id"], Uuid::nil().to_string());
        assert_eq!(json["projectTypeId"], Uuid::nil().to_string());
        assert_eq!(json["createdByUser"], "user-1");
        assert!(json.get("project_id").is_none());
    }
}
