//! # Workspace Service Test Utilities
//!
//! Shared test utilities for the workspace service.
//!
//! This crate provides:
//! - Server test harness (`TestWorkspaceServer` for E2E tests)
//! - Claims builders, including tokens signed by arbitrary keys
//! - Fixed test IDs (UUIDs, constants)
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ws_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestWorkspaceServer::spawn_without_database().await?;
//!     let token = server.token_for(TEST_USER_ALICE, &[ROLE_USER]).await?;
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/v1/me", server.url()))
//!         .bearer_auth(&token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
