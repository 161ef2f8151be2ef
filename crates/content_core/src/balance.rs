//! Hook for the external economic balance checker.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::diagnostics::FieldPath;
use crate::normalize::NormalizedContentPack;

/// One finding of a balance checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceIssue {
    /// Checker-defined category.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Where in the pack the finding is.
    #[serde(default)]
    pub path: FieldPath,
}

impl BalanceIssue {
    /// Create a finding.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>, path: FieldPath) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path,
        }
    }
}

/// Everything a balance checker found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceReport {
    /// Never fail validation.
    pub warnings: Vec<BalanceIssue>,
    /// Fail validation unless `warnOnly` is set.
    pub errors: Vec<BalanceIssue>,
}

/// Economic balance checker run on a normalized pack.
///
/// Closures with the matching signature implement this trait.
pub trait BalanceChecker: Send + Sync {
    /// Inspect `pack` using the opaque `config` from the options.
    fn check(&self, pack: &NormalizedContentPack, config: &Value) -> BalanceReport;
}

impl<F> BalanceChecker for F
where
    F: Fn(&NormalizedContentPack, &Value) -> BalanceReport + Send + Sync,
{
    fn check(&self, pack: &NormalizedContentPack, config: &Value) -> BalanceReport {
        self(pack, config)
    }
}

/// Balance checker errors that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("content pack '{pack_id}' failed balance validation with {} error(s)", .errors.len())]
#[serde(rename_all = "camelCase")]
pub struct BalanceValidationError {
    /// Pack checked.
    pub pack_id: String,
    /// Checker errors.
    pub errors: Vec<BalanceIssue>,
}
