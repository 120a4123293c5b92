//! Observability module for the workspace service.
//!
//! Provides metrics definitions and recording helpers.

pub mod metrics;
