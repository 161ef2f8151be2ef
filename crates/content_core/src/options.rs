//! Validation options.
//!
//! [`ValidationConfig`] is the serializable part, loadable from an options
//! file. [`ValidationOptions`] adds the caller-supplied hooks: warning sink,
//! balance checker and result cache.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::balance::BalanceChecker;
use crate::cache::ValidationCache;
use crate::data::PackModule;
use crate::diagnostics::{ContentPackWarning, Severity, WarningSink};

/// Two-tier allowlist for one category of externally defined ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllowlistSpec {
    /// Enforced entries. A miss is a hard error.
    pub required: Vec<String>,
    /// Advisory entries. A miss is a warning while `required` is empty.
    pub soft: Vec<String>,
}

impl AllowlistSpec {
    /// Spec with only enforced entries.
    #[must_use]
    pub fn required<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: ids.into_iter().map(Into::into).collect(),
            soft: Vec::new(),
        }
    }

    /// Spec with only advisory entries.
    #[must_use]
    pub fn soft<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: Vec::new(),
            soft: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Allowlists per category. `None` leaves the category unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllowlistSpecs {
    /// Runtime flags.
    pub flags: Option<AllowlistSpec>,
    /// Scripts.
    pub scripts: Option<AllowlistSpec>,
    /// Runtime systems automations may drive.
    pub system_automation_targets: Option<AllowlistSpec>,
}

/// Another pack the validated pack may be loaded alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownPack {
    /// Pack id.
    pub id: String,
    /// Pack version.
    pub version: String,
    /// Ids of the packs it requires.
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Minimum runtime version for content in one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGate {
    /// Gated collection.
    pub module: PackModule,
    /// First runtime version supporting it.
    pub introduced_in: String,
    /// Severity when the runtime is older.
    #[serde(default)]
    pub severity: Severity,
}

/// Balance-check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceOptions {
    /// Run the checker when one is supplied.
    pub enabled: bool,
    /// Report checker errors as results instead of failing.
    pub warn_only: bool,
    /// Passed through to the checker untouched.
    pub config: Value,
}

impl Default for BalanceOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            warn_only: false,
            config: Value::Null,
        }
    }
}

/// Serializable validation settings.
///
/// # Example
///
/// ```json
/// {
///     "runtimeVersion": "0.5.0",
///     "allowlists": { "flags": { "soft": ["tutorial-done"] } },
///     "featureGates": [{ "module": "entities", "introducedIn": "0.5.0" }],
///     "knownPacks": [{ "id": "core", "version": "1.2.0" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationConfig {
    /// Allowlists for flags, scripts and system automation targets.
    pub allowlists: AllowlistSpecs,
    /// Version of the runtime the pack will be loaded into.
    pub runtime_version: Option<String>,
    /// Minimum runtime versions per collection.
    pub feature_gates: Vec<FeatureGate>,
    /// Packs available alongside the validated one.
    pub known_packs: Vec<KnownPack>,
    /// Event ids defined by the runtime itself.
    pub runtime_event_catalogue: Vec<String>,
    /// Packs currently enabled.
    pub active_pack_ids: Vec<String>,
    /// Severity of references to undeclared runtime events.
    ///
    /// When unset, an unknown event is an error if the catalogue is
    /// non-empty and a warning otherwise.
    pub unknown_runtime_event_severity: Option<Severity>,
    /// Balance-check settings.
    pub balance: BalanceOptions,
}

impl ValidationConfig {
    /// Severity applied to unknown runtime event references.
    #[must_use]
    pub fn runtime_event_severity(&self) -> Severity {
        self.unknown_runtime_event_severity.unwrap_or({
            if self.runtime_event_catalogue.is_empty() {
                Severity::Warning
            } else {
                Severity::Error
            }
        })
    }
}

/// Everything a validation call needs besides the pack itself.
#[derive(Clone, Default)]
pub struct ValidationOptions {
    /// Serializable settings.
    pub config: ValidationConfig,
    /// Receives each warning as it is emitted.
    pub warning_sink: Option<Arc<WarningSink>>,
    /// External balance checker.
    pub balance_checker: Option<Arc<dyn BalanceChecker>>,
    /// Memoizes whole results across calls.
    pub cache: Option<Arc<ValidationCache>>,
}

impl ValidationOptions {
    /// Options with the given settings and no hooks.
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Stream warnings to `sink`.
    #[must_use]
    pub fn with_warning_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&ContentPackWarning) + Send + Sync + 'static,
    {
        self.warning_sink = Some(Arc::new(sink));
        self
    }

    /// Run `checker` after normalization.
    #[must_use]
    pub fn with_balance_checker<C>(mut self, checker: C) -> Self
    where
        C: BalanceChecker + 'static,
    {
        self.balance_checker = Some(Arc::new(checker));
        self
    }

    /// Memoize results in `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ValidationCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("config", &self.config)
            .field("warning_sink", &self.warning_sink.is_some())
            .field("balance_checker", &self.balance_checker.is_some())
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config: ValidationConfig = serde_json::from_value(json!({})).unwrap();
        assert!(config.runtime_version.is_none());
        assert!(config.allowlists.flags.is_none());
        assert!(config.balance.enabled);
        assert!(!config.balance.warn_only);
    }

    #[test]
    fn test_deserialize_config() {
        let config: ValidationConfig = serde_json::from_value(json!({
            "allowlists": { "scripts": { "required": ["pack.boot"] } },
            "featureGates": [{ "module": "entities", "introducedIn": "0.5.0", "severity": "warning" }],
            "knownPacks": [{ "id": "core", "version": "1.0.0" }]
        }))
        .unwrap();
        let scripts = config.allowlists.scripts.unwrap();
        assert_eq!(scripts.required, vec!["pack.boot"]);
        assert!(scripts.soft.is_empty());
        assert_eq!(config.feature_gates[0].module, PackModule::Entities);
        assert_eq!(config.feature_gates[0].severity, Severity::Warning);
        assert!(config.known_packs[0].requires.is_empty());
    }

    #[test]
    fn test_runtime_event_severity() {
        let mut config = ValidationConfig::default();
        assert_eq!(config.runtime_event_severity(), Severity::Warning);

        config.runtime_event_catalogue = vec!["runtime.tick".to_string()];
        assert_eq!(config.runtime_event_severity(), Severity::Error);

        config.unknown_runtime_event_severity = Some(Severity::Warning);
        assert_eq!(config.runtime_event_severity(), Severity::Warning);
    }
}
