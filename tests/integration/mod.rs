//! Integration test suite for the inliner
//!
//! End-to-end tests that drive the library through its public API and the
//! `inliner` binary through `assert_cmd`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **end_to_end**: buffered resolution, import-once, recursion, failure isolation
//! - **streaming**: chunked resolution and equivalence with buffered mode
//! - **update**: dependency cache and the update workflow
//! - **cli**: the `inliner` binary

mod cli;
mod end_to_end;
mod streaming;
mod update;
