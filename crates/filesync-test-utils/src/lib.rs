//! Shared test utilities for the filesync workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for origin/copy file layouts

pub mod tree;

pub use tree::TestTree;
