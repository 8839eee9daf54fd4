//! Common test infrastructure
//!
//! This module provides everything the integration tests wire together: a
//! configurable stub catalog, a scripted reasoning engine, and builders that
//! assemble real components around them. Tests should only import from this
//! module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{test_app, track, StubCatalog, TEST_USER};
//! use maestro::catalog::TimeWindow;
//!
//! #[tokio::test]
//! async fn test_aggregate() {
//!     let app = test_app(
//!         StubCatalog::new().with_top_tracks(TimeWindow::ShortTerm, vec![track("t1", "a1")]),
//!     );
//!     let profile = app.aggregator.aggregate(TEST_USER).await.unwrap();
//!     assert_eq!(profile.top_tracks.count, 1);
//! }
//! ```

// Each test binary compiles its own copy of this module and none of them
// uses every helper.
#![allow(dead_code)]

mod catalog;
mod constants;
mod engine;
mod fixtures;

// Public API - this is what tests import
pub use catalog::{CatalogCall, StubCatalog};
pub use constants::*;
pub use engine::{answer, tool_call, ScriptedEngine};
pub use fixtures::{artist, scripted_orchestrator, test_app, track, TestApp};
