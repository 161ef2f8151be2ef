//! Determinism testing utilities.
//!
//! Provides a harness for verifying that validation produces the same
//! digest for the same input, across repeated calls and across threads.
//!
//! # Testing Strategy
//!
//! The digest is a cache key, so any run-to-run variation is a bug. Sources
//! of variation include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Digest input must only follow document order.
//!
//! - **JSON key order**: the projection must be serialized with a fixed
//!   key order.
//!
//! - **Shared state**: validation must not depend on what ran before it
//!   on another thread.

use std::thread;

use content_core::prelude::{validate_content_pack, PackDigest, ValidationOptions};
use serde_json::Value;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Digest from each run, `None` where validation failed.
    pub digests: Vec<Option<PackDigest>>,
}

impl DeterminismResult {
    /// Whether every run succeeded with the same digest.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.digests.first().map_or(true, |first| {
            first.is_some() && self.digests.iter().all(|digest| digest == first)
        })
    }

    /// Distinct outcomes seen (should be 1).
    #[must_use]
    pub fn unique_digests(&self) -> Vec<Option<PackDigest>> {
        let mut unique = self.digests.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that validation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if any run failed or produced a different digest.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let unique = self.unique_digests();
            panic!(
                "Validation is non-deterministic!\n\
                 Runs: {}\n\
                 Unique outcomes: {} (expected 1)\n\
                 All digests: {:?}",
                self.digests.len(),
                unique.len(),
                self.digests
            );
        }
    }
}

fn run_once(raw: &Value, options: &ValidationOptions) -> Option<PackDigest> {
    validate_content_pack(raw, options)
        .ok()
        .map(|validated| validated.pack.digest())
}

/// Validate `raw` `runs` times in sequence.
#[must_use]
pub fn run_sequential(raw: &Value, options: &ValidationOptions, runs: usize) -> DeterminismResult {
    DeterminismResult {
        digests: (0..runs).map(|_| run_once(raw, options)).collect(),
    }
}

/// Validate `raw` on `threads` threads at once.
///
/// # Panics
///
/// Panics if a worker thread panics.
#[must_use]
pub fn run_parallel(raw: &Value, options: &ValidationOptions, threads: usize) -> DeterminismResult {
    let digests = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| scope.spawn(|| run_once(raw, options)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("validation thread panicked"))
            .collect()
    });
    DeterminismResult { digests }
}
