//! Validation passes and the pipeline that sequences them.
//!
//! Schema parse, runtime compatibility, cross references, cycle passes,
//! then normalization and the optional balance check. Every pass before
//! normalization accumulates into one [`Diagnostics`]; any hard issue stops
//! the pipeline there so no partially valid pack is ever frozen.

pub mod allowlist;
pub mod cross_reference;
pub mod cycles;
pub mod feature_gates;
pub mod graphs;
pub mod index;
pub mod references;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::balance::{BalanceIssue, BalanceValidationError};
use crate::cache::CacheKey;
use crate::diagnostics::{ContentPackWarning, Diagnostics};
use crate::error::{ContentPackValidationError, Result};
use crate::normalize::{normalize, NormalizedContentPack};
use crate::options::ValidationOptions;
use crate::schema::parse_content_pack;

use self::allowlist::normalize_allowlists;
use self::cross_reference::CrossReferenceValidator;
use self::feature_gates::check_runtime_compatibility;
use self::graphs::{check_pack_dependencies, check_transform_cycles, check_unlock_cycles};
use self::index::PackIndex;

/// Successful validation outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedContentPack {
    /// The frozen pack.
    pub pack: Arc<NormalizedContentPack>,
    /// Warnings from every pass, in emission order.
    pub warnings: Vec<ContentPackWarning>,
    /// Balance checker warnings.
    pub balance_warnings: Vec<BalanceIssue>,
    /// Balance checker errors, present only with `warnOnly`.
    pub balance_errors: Vec<BalanceIssue>,
}

/// Validate and normalize one raw pack document.
///
/// # Errors
///
/// Returns [`ContentPackError::Validation`](crate::error::ContentPackError::Validation)
/// with every hard issue when the pack is invalid,
/// [`ContentPackError::Balance`](crate::error::ContentPackError::Balance)
/// when the balance checker fails it, and
/// [`ContentPackError::InvalidAllowlist`](crate::error::ContentPackError::InvalidAllowlist)
/// when the options carry a malformed required allowlist.
pub fn validate_content_pack(raw: &Value, options: &ValidationOptions) -> Result<ValidatedContentPack> {
    ContentPackValidator::new(options).validate(raw)
}

/// Runs the validation pipeline under one set of options.
#[derive(Debug, Clone, Copy)]
pub struct ContentPackValidator<'o> {
    options: &'o ValidationOptions,
}

impl<'o> ContentPackValidator<'o> {
    /// Create a validator.
    #[must_use]
    pub const fn new(options: &'o ValidationOptions) -> Self {
        Self { options }
    }

    /// Validate `raw`, going through the cache when one is configured.
    ///
    /// # Errors
    ///
    /// See [`validate_content_pack`].
    pub fn validate(&self, raw: &Value) -> Result<ValidatedContentPack> {
        let Some(cache) = &self.options.cache else {
            return self.run(raw);
        };

        let key = CacheKey::new(raw, &self.options.config);
        let (outcome, hit) = cache.get_or_validate(key, || self.run(raw));
        if hit {
            tracing::debug!(digest = %key.digest, "validation cache hit");
            if let (Ok(validated), Some(sink)) = (&outcome, &self.options.warning_sink) {
                for warning in &validated.warnings {
                    sink(warning);
                }
            }
        }
        outcome
    }

    fn run(&self, raw: &Value) -> Result<ValidatedContentPack> {
        let config = &self.options.config;
        let mut diagnostics = Diagnostics::new(self.options.warning_sink.as_deref());

        let allowlists = normalize_allowlists(&config.allowlists, &mut diagnostics)?;

        let parsed = parse_content_pack(raw, &mut diagnostics);
        let pack = match parsed {
            Some(pack) if !diagnostics.has_errors() => pack,
            _ => {
                let pack_id = raw
                    .pointer("/metadata/id")
                    .and_then(Value::as_str)
                    .map(ToString::to_string);
                return Err(failure(pack_id, diagnostics));
            }
        };
        tracing::debug!(
            pack_id = %pack.id(),
            warnings = diagnostics.warnings().len(),
            "schema parse complete"
        );

        check_runtime_compatibility(&pack, config, &mut diagnostics);

        let index = PackIndex::build(&pack);
        CrossReferenceValidator::new(&pack, &index, &allowlists, config).validate(&mut diagnostics);
        tracing::debug!(
            pack_id = %pack.id(),
            issues = diagnostics.issues().len(),
            warnings = diagnostics.warnings().len(),
            "cross-reference pass complete"
        );

        check_transform_cycles(&pack, &index.transforms, &mut diagnostics);
        check_unlock_cycles(&pack, &mut diagnostics);
        check_pack_dependencies(
            &pack.metadata,
            &config.known_packs,
            &config.active_pack_ids,
            &mut diagnostics,
        );
        tracing::debug!(
            pack_id = %pack.id(),
            issues = diagnostics.issues().len(),
            "cycle passes complete"
        );

        if diagnostics.has_errors() {
            return Err(failure(Some(pack.id().to_string()), diagnostics));
        }
        let (_, warnings) = diagnostics.into_parts();

        let pack = Arc::new(normalize(pack));
        tracing::debug!(pack_id = %pack.id(), digest = %pack.digest(), "normalized");

        let (balance_warnings, balance_errors) = self.check_balance(&pack)?;

        tracing::info!(
            pack_id = %pack.id(),
            digest = %pack.digest(),
            warnings = warnings.len(),
            "content pack validated"
        );
        Ok(ValidatedContentPack {
            pack,
            warnings,
            balance_warnings,
            balance_errors,
        })
    }

    fn check_balance(&self, pack: &NormalizedContentPack) -> Result<(Vec<BalanceIssue>, Vec<BalanceIssue>)> {
        let balance = &self.options.config.balance;
        let checker = match &self.options.balance_checker {
            Some(checker) if balance.enabled => checker,
            _ => return Ok((Vec::new(), Vec::new())),
        };

        let report = checker.check(pack, &balance.config);
        tracing::debug!(
            pack_id = %pack.id(),
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "balance check complete"
        );
        for issue in &report.warnings {
            tracing::warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
        }

        if !report.errors.is_empty() && !balance.warn_only {
            return Err(BalanceValidationError {
                pack_id: pack.id().to_string(),
                errors: report.errors,
            }
            .into());
        }
        Ok((report.warnings, report.errors))
    }
}

fn failure(pack_id: Option<String>, diagnostics: Diagnostics<'_>) -> crate::error::ContentPackError {
    let (issues, _) = diagnostics.into_parts();
    tracing::debug!(pack_id = ?pack_id, issues = issues.len(), "content pack rejected");
    ContentPackValidationError { pack_id, issues }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentPackError;
    use content_test_utils::fixtures;
    use serde_json::json;

    #[test]
    fn test_sample_pack_validates() {
        let validated = validate_content_pack(&fixtures::sample_pack(), &ValidationOptions::default()).unwrap();
        assert!(validated.warnings.is_empty());
        assert_eq!(validated.pack.id(), "sample-pack");
        assert_eq!(validated.pack.generators().len(), 2);
    }

    #[test]
    fn test_schema_failure_stops_before_cross_references() {
        let mut raw = fixtures::sample_pack();
        raw["generators"][0]["produces"] = json!("not an array");
        raw["generators"][1]["produces"][0]["resourceId"] = json!("sample-pack.nonexistent");

        let error = validate_content_pack(&raw, &ValidationOptions::default()).unwrap_err();
        let ContentPackError::Validation(error) = error else {
            panic!("expected a validation error");
        };
        assert_eq!(error.pack_id.as_deref(), Some("sample-pack"));
        assert_eq!(error.issues.len(), 1);
        assert_eq!(error.issues[0].path.to_string(), "generators[0].produces");
    }

    #[test]
    fn test_non_object_input() {
        let error = validate_content_pack(&json!([1, 2]), &ValidationOptions::default()).unwrap_err();
        assert_eq!(error.issues().len(), 1);
        assert_eq!(error.issues()[0].path.to_string(), "<root>");
    }
}
