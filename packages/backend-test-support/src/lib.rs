//! Backend test support utilities
//!
//! Shared helpers for the backend's integration tests: an in-memory migrated
//! database, unified logging initialization, Problem Details assertions and
//! unique test data.

pub mod db;
pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
