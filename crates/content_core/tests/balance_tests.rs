//! Balance checker hook.

use std::sync::atomic::Ordering;

use content_core::prelude::*;
use content_test_utils::assertions::{expect_failure, expect_success};
use content_test_utils::balance::{flat_cost_checker, ScriptedBalanceChecker};
use content_test_utils::fixtures;
use serde_json::json;

fn balance_config(enabled: bool, warn_only: bool) -> ValidationConfig {
    let mut config = ValidationConfig::default();
    config.balance.enabled = enabled;
    config.balance.warn_only = warn_only;
    config
}

#[test]
fn test_clean_report() {
    let checker = ScriptedBalanceChecker::clean();
    let calls = checker.calls();
    let options = ValidationOptions::default().with_balance_checker(checker);

    let validated = expect_success(validate_content_pack(&fixtures::sample_pack(), &options));
    assert!(validated.balance_warnings.is_empty());
    assert!(validated.balance_errors.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_warnings_never_fail() {
    let checker = ScriptedBalanceChecker::clean().with_warning("slow-start", "first purchase takes 10 minutes");
    let options = ValidationOptions::default().with_balance_checker(checker);

    let validated = expect_success(validate_content_pack(&fixtures::sample_pack(), &options));
    assert_eq!(validated.balance_warnings.len(), 1);
    assert_eq!(validated.balance_warnings[0].code, "slow-start");
}

#[test]
fn test_errors_fail_validation() {
    let path = FieldPath::from("generators").index(0);
    let checker = ScriptedBalanceChecker::clean().with_error("runaway", "income outpaces cost", path.clone());
    let options = ValidationOptions::default().with_balance_checker(checker);

    match expect_failure(validate_content_pack(&fixtures::sample_pack(), &options)) {
        ContentPackError::Balance(error) => {
            assert_eq!(error.pack_id, fixtures::SAMPLE_PACK_ID);
            assert_eq!(error.errors.len(), 1);
            assert_eq!(error.errors[0].path, path);
        }
        other => panic!("expected a balance error, got {other}"),
    }
}

#[test]
fn test_warn_only_returns_errors() {
    let checker = ScriptedBalanceChecker::clean().with_error("runaway", "income outpaces cost", FieldPath::root());
    let options = ValidationOptions::new(balance_config(true, true)).with_balance_checker(checker);

    let validated = expect_success(validate_content_pack(&fixtures::sample_pack(), &options));
    assert_eq!(validated.balance_errors.len(), 1);
}

#[test]
fn test_disabled_checker_is_not_run() {
    let checker = ScriptedBalanceChecker::clean().with_error("runaway", "income outpaces cost", FieldPath::root());
    let calls = checker.calls();
    let options = ValidationOptions::new(balance_config(false, false)).with_balance_checker(checker);

    expect_success(validate_content_pack(&fixtures::sample_pack(), &options));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_checker_skipped_for_invalid_pack() {
    let checker = ScriptedBalanceChecker::clean();
    let calls = checker.calls();
    let options = ValidationOptions::default().with_balance_checker(checker);

    let mut raw = fixtures::sample_pack();
    raw["generators"][0]["purchase"]["currencyId"] = json!("sample-pack.gold");

    expect_failure(validate_content_pack(&raw, &options));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_checker_receives_config() {
    let mut config = balance_config(true, false);
    config.balance.config = json!({ "minGrowth": 1.18 });
    let options = ValidationOptions::new(config).with_balance_checker(flat_cost_checker());

    match expect_failure(validate_content_pack(&fixtures::sample_pack(), &options)) {
        ContentPackError::Balance(error) => {
            // Only the reactor (growth 1.15) is below the threshold.
            assert_eq!(error.errors.len(), 1);
            assert_eq!(error.errors[0].path.to_string(), "generators[0].purchase.costCurve");
        }
        other => panic!("expected a balance error, got {other}"),
    }
}

#[test]
fn test_default_threshold_accepts_sample_pack() {
    let options = ValidationOptions::default().with_balance_checker(flat_cost_checker());
    expect_success(validate_content_pack(&fixtures::sample_pack(), &options));
}
