//! Balance-checker doubles.
//!
//! A [`ScriptedBalanceChecker`] returns a fixed report and counts how often
//! it ran, which is what the balance and cache tests need to observe.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use content_core::balance::{BalanceChecker, BalanceIssue, BalanceReport};
use content_core::data::NumericFormula;
use content_core::diagnostics::FieldPath;
use content_core::normalize::NormalizedContentPack;
use serde_json::Value;

/// Balance checker returning a preset report.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBalanceChecker {
    report: BalanceReport,
    calls: Arc<AtomicUsize>,
}

impl ScriptedBalanceChecker {
    /// Checker that finds nothing.
    #[must_use]
    pub fn clean() -> Self {
        Self::default()
    }

    /// Add a warning to the report.
    #[must_use]
    pub fn with_warning(mut self, code: &str, message: &str) -> Self {
        self.report
            .warnings
            .push(BalanceIssue::new(code, message, FieldPath::root()));
        self
    }

    /// Add an error to the report.
    #[must_use]
    pub fn with_error(mut self, code: &str, message: &str, path: FieldPath) -> Self {
        self.report.errors.push(BalanceIssue::new(code, message, path));
        self
    }

    /// Shared call counter, still readable after the checker is moved into
    /// the options.
    #[must_use]
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl BalanceChecker for ScriptedBalanceChecker {
    fn check(&self, _pack: &NormalizedContentPack, _config: &Value) -> BalanceReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report.clone()
    }
}

/// Checker flagging exponential cost curves that do not grow.
///
/// `config.minGrowth` (default 1.0) sets the lowest accepted growth factor.
#[must_use]
pub fn flat_cost_checker() -> impl BalanceChecker {
    |pack: &NormalizedContentPack, config: &Value| {
        let min_growth = config
            .get("minGrowth")
            .and_then(Value::as_f64)
            .unwrap_or(1.0);
        let mut report = BalanceReport::default();
        for (position, generator) in pack.generators().iter().enumerate() {
            if let NumericFormula::Exponential { growth, .. } =
                generator.purchase.cost_curve
            {
                if growth <= min_growth {
                    report.errors.push(BalanceIssue::new(
                        "flat-cost",
                        format!("generator '{}' cost does not grow (growth {growth})", generator.id),
                        FieldPath::from("generators")
                            .index(position)
                            .key("purchase")
                            .key("costCurve"),
                    ));
                }
            }
        }
        report
    }
}
