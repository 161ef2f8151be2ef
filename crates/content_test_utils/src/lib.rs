//! # Content Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Sample pack fixtures and a pack builder
//! - Property-based testing strategies
//! - Assertion helpers over validation outcomes
//! - Digest determinism harness
//! - Balance-checker doubles

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assertions;
pub mod balance;
pub mod determinism;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
