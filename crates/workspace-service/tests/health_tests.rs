//! Health endpoint integration tests.
//!
//! `/health` is plain text "OK" and never touches the database. `/ready`
//! runs the database status probe and reports JSON.

use ws_test_utils::TestWorkspaceServer;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn_without_database().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_reports_unreachable_database() -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn_without_database().await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;
    assert_eq!(response.status(), 503);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["database"], "unhealthy");
    // Never leak connection details
    let error = body["error"].as_str().unwrap_or_default();
    assert!(!error.contains("127.0.0.1"));
    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_is_public() -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn_without_database().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), 200);
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn_without_database().await?;

    let response = reqwest::get(format!("{}/v2/projects", server.url())).await?;

    assert_eq!(response.status(), 404);
    Ok(())
}
