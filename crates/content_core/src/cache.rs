//! Memoization of whole validation outcomes across calls.
//!
//! Entries are keyed by the id-shape digest of the raw document together
//! with fingerprints of its full text and of the serializable options, so a
//! hit is only served for structurally identical input validated under the
//! same settings. Each key owns a [`OnceLock`]: the first caller runs the
//! validation, concurrent callers for the same key block until it finishes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde_json::Value;

use crate::digest::{compute_digest, fnv1a_32, PackDigest, RawPackShape};
use crate::error::Result;
use crate::options::ValidationConfig;
use crate::validation::ValidatedContentPack;

/// Cache key for one (document, settings) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Id-shape digest of the raw document.
    pub digest: PackDigest,
    /// Fingerprint of the full document text.
    pub input: u32,
    /// Fingerprint of the serializable settings.
    pub config: u32,
}

impl CacheKey {
    /// Key for validating `raw` under `config`.
    #[must_use]
    pub fn new(raw: &Value, config: &ValidationConfig) -> Self {
        let config_text = serde_json::to_string(config).unwrap_or_default();
        Self {
            digest: compute_digest(&RawPackShape(raw)),
            input: fnv1a_32(&raw.to_string()),
            config: fnv1a_32(&config_text),
        }
    }
}

type Slot = Arc<OnceLock<Result<ValidatedContentPack>>>;

/// Thread-safe store of validation outcomes, shared through an `Arc`.
#[derive(Debug, Default)]
pub struct ValidationCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl ValidationCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the outcome stored under `key`, running `validate` to produce
    /// it if needed. The flag is true when the outcome came from the cache.
    pub fn get_or_validate<F>(&self, key: CacheKey, validate: F) -> (Result<ValidatedContentPack>, bool)
    where
        F: FnOnce() -> Result<ValidatedContentPack>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        let mut computed = false;
        let outcome = slot.get_or_init(|| {
            computed = true;
            validate()
        });
        (outcome.clone(), !computed)
    }

    /// Number of stored outcomes, including ones still being computed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored outcome.
    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_test_utils::fixtures;

    #[test]
    fn test_key_tracks_non_id_edits() {
        let config = ValidationConfig::default();
        let raw = fixtures::sample_pack();
        let mut edited = raw.clone();
        edited["resources"][0]["startAmount"] = serde_json::json!(11);

        let a = CacheKey::new(&raw, &config);
        let b = CacheKey::new(&edited, &config);
        assert_eq!(a.digest, b.digest);
        assert_ne!(a, b);
        assert_eq!(a, CacheKey::new(&raw, &config));
    }

    #[test]
    fn test_key_tracks_config() {
        let raw = fixtures::sample_pack();
        let strict = ValidationConfig {
            runtime_event_catalogue: vec!["runtime.tick".to_string()],
            ..ValidationConfig::default()
        };
        assert_ne!(
            CacheKey::new(&raw, &ValidationConfig::default()),
            CacheKey::new(&raw, &strict)
        );
    }
}
