//! Shared test utilities for the branch-manager workspace.
//!
//! Git fixtures used by the crate test suites and the integration tests.
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: low-level git helpers and a single-repository fixture
//! - [`repo`]: [`TestRepo`], a working clone with a bare `origin`

pub mod git;
pub mod repo;

pub use repo::TestRepo;
