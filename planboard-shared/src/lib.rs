//! # Planboard Shared Library
//!
//! This crate contains the data model and business logic shared by the
//! Planboard API server and tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `access`: Plan access control evaluation
//! - `progress`: Per-section completion scoring and overall plan progress
//! - `summary`: Executive summary generation (insights + recommendations)
//! - `collab`: Invitation/collaboration workflow
//! - `sections`: Section upsert orchestration with event emission
//! - `events`: Outbound event queue and Redis dispatcher
//! - `auth`: JWT tokens, password hashing, request auth context
//! - `db`: Connection pool and migrations
//! - `redis`: Redis client wrapper

pub mod access;
pub mod auth;
pub mod collab;
pub mod db;
pub mod events;
pub mod models;
pub mod progress;
pub mod redis;
pub mod sections;
pub mod summary;

/// Current version of the Planboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
