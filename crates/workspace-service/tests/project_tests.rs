//! Project and workspace integration tests.
//!
//! These need PostgreSQL: run with `DATABASE_URL` set and `--ignored`.

use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::PgPool;
use ws_test_utils::{
    TestWorkspaceServer, COLLABORATION_PERSONAL, MISSING_PROJECT_ID, ROLE_USER, STEM_2D,
    TEST_USER_ALICE, TEST_USER_BOB,
};

async fn create_project(
    server: &TestWorkspaceServer,
    token: &str,
    name: &str,
) -> Result<Value, anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/v1/projects", server.url()))
        .bearer_auth(token)
        .json(&json!({
            "projectTypeId": COLLABORATION_PERSONAL,
            "name": name,
            "description": "integration test project",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(response.json().await?)
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_project_lifecycle(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn(pool).await?;
    let alice = server.token_for(TEST_USER_ALICE, &[ROLE_USER]).await?;
    let client = reqwest::Client::new();

    let created = create_project(&server, &alice, "Atrium").await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["createdByUser"], TEST_USER_ALICE);

    let fetched: Value = client
        .get(format!("{}/v1/projects/{}", server.url(), id))
        .bearer_auth(&alice)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched["name"], "Atrium");

    let patched = client
        .patch(format!("{}/v1/projects/{}", server.url(), id))
        .bearer_auth(&alice)
        .json(&json!({ "name": "Atrium II" }))
        .send()
        .await?;
    assert_eq!(patched.status(), StatusCode::OK);
    let patched: Value = patched.json().await?;
    assert_eq!(patched["name"], "Atrium II");
    assert_eq!(patched["description"], "integration test project");

    let deleted = client
        .delete(format!("{}/v1/projects/{}", server.url(), id))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client
        .get(format!("{}/v1/projects/{}", server.url(), id))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_only_creator_may_modify_project(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn(pool).await?;
    let alice = server.token_for(TEST_USER_ALICE, &[ROLE_USER]).await?;
    let bob = server.token_for(TEST_USER_BOB, &[ROLE_USER]).await?;

    let created = create_project(&server, &alice, "Private").await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let response = reqwest::Client::new()
        .delete(format!("{}/v1/projects/{}", server.url(), id))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_list_projects_newest_first(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn(pool).await?;
    let alice = server.token_for(TEST_USER_ALICE, &[ROLE_USER]).await?;

    create_project(&server, &alice, "first").await?;
    create_project(&server, &alice, "second").await?;

    let listed: Vec<Value> = reqwest::Client::new()
        .get(format!("{}/v1/projects?top=1", server.url()))
        .bearer_auth(&alice)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(|p| p["name"].clone()), Some(json!("second")));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_workspace_requires_known_project_and_stem(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestWorkspaceServer::spawn(pool).await?;
    let alice = server.token_for(TEST_USER_ALICE, &[ROLE_USER]).await?;
    let client = reqwest::Client::new();

    let body = json!({
        "stemId": STEM_2D,
        "name": "Board",
        "assetAmountLimit": 2,
        "maxX": 100,
        "maxY": 100,
        "maxZ": 0,
    });

    let missing = client
        .post(format!("{}/v1/projects/{}/workspaces", server.url(), MISSING_PROJECT_ID))
        .bearer_auth(&alice)
        .json(&body)
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let project = create_project(&server, &alice, "Boards").await?;
    let project_id = project["id"].as_str().unwrap_or_default().to_string();

    let mut bad_stem = body.clone();
    bad_stem["stemId"] = json!(MISSING_PROJECT_ID);
    let response = client
        .post(format!("{}/v1/projects/{}/workspaces", server.url(), project_id))
        .bearer_auth(&alice)
        .json(&bad_stem)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let created = client
        .post(format!("{}/v1/projects/{}/workspaces", server.url(), project_id))
        .bearer_auth(&alice)
        .json(&body)
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let workspace: Value = created.json().await?;
    assert_eq!(workspace["projectId"], json!(project_id));
    assert_eq!(workspace["maxZ"], 0);
    Ok(())
}
