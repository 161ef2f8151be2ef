//! Assertion helpers over validation outcomes.

use content_core::error::ContentPackError;
use content_core::prelude::{ContentPackIssue, ValidatedContentPack};

/// Issue paths of a failed validation, rendered as strings.
#[must_use]
pub fn issue_paths(error: &ContentPackError) -> Vec<String> {
    error
        .issues()
        .iter()
        .map(|issue| issue.path.to_string())
        .collect()
}

/// Unwrap a validation failure.
///
/// # Panics
///
/// Panics if validation succeeded.
#[must_use]
pub fn expect_failure(result: Result<ValidatedContentPack, ContentPackError>) -> ContentPackError {
    match result {
        Ok(validated) => panic!(
            "expected validation to fail, but pack '{}' validated with {} warning(s)",
            validated.pack.id(),
            validated.warnings.len()
        ),
        Err(error) => error,
    }
}

/// Unwrap a validation success.
///
/// # Panics
///
/// Panics with every issue if validation failed.
#[must_use]
pub fn expect_success(result: Result<ValidatedContentPack, ContentPackError>) -> ValidatedContentPack {
    match result {
        Ok(validated) => validated,
        Err(error) => panic!("expected validation to succeed:\n{error}"),
    }
}

/// Assert that validation failed with exactly one issue, at `path`, and
/// return that issue.
///
/// # Panics
///
/// Panics if validation succeeded or reported a different set of issues.
pub fn assert_single_issue(result: Result<ValidatedContentPack, ContentPackError>, path: &str) -> ContentPackIssue {
    let error = expect_failure(result);
    let issues = error.issues();
    assert_eq!(
        issue_paths(&error),
        vec![path.to_string()],
        "unexpected issues:\n{error}"
    );
    issues[0].clone()
}
