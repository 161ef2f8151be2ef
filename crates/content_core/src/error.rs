//! Error types for content-pack validation.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::balance::BalanceValidationError;
use crate::diagnostics::ContentPackIssue;
use crate::validation::allowlist::AllowlistError;

/// Result type alias using [`ContentPackError`].
pub type Result<T> = std::result::Result<T, ContentPackError>;

/// Top-level error type for a failed validation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentPackError {
    /// The pack has hard issues.
    #[error(transparent)]
    Validation(#[from] ContentPackValidationError),

    /// The balance checker reported errors and `warnOnly` is unset.
    #[error(transparent)]
    Balance(#[from] BalanceValidationError),

    /// A required-tier allowlist entry is not id-shaped.
    #[error(transparent)]
    InvalidAllowlist(#[from] AllowlistError),
}

impl ContentPackError {
    /// Hard issues carried by a [`ContentPackError::Validation`] error.
    #[must_use]
    pub fn issues(&self) -> &[ContentPackIssue] {
        match self {
            Self::Validation(error) => &error.issues,
            Self::Balance(_) | Self::InvalidAllowlist(_) => &[],
        }
    }
}

/// Every hard issue found in one validation call, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", summarize(.pack_id.as_deref(), .issues))]
#[serde(rename_all = "camelCase")]
pub struct ContentPackValidationError {
    /// Pack id, when the metadata could be read.
    pub pack_id: Option<String>,
    /// Issues with their field paths.
    pub issues: Vec<ContentPackIssue>,
}

fn summarize(pack_id: Option<&str>, issues: &[ContentPackIssue]) -> String {
    let mut text = match pack_id {
        Some(id) => format!("content pack '{id}' failed validation"),
        None => "content pack failed validation".to_string(),
    };
    let _ = write!(text, " with {} issue(s)", issues.len());
    for issue in issues {
        let _ = write!(text, "\n  {issue}");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FieldPath;

    #[test]
    fn test_validation_error_lists_issues() {
        let error = ContentPackError::from(ContentPackValidationError {
            pack_id: Some("sample-pack".to_string()),
            issues: vec![ContentPackIssue {
                path: FieldPath::from("generators").index(0).key("purchase"),
                message: "unknown resource 'sample-pack.gold'".to_string(),
            }],
        });
        assert_eq!(
            error.to_string(),
            "content pack 'sample-pack' failed validation with 1 issue(s)\n  \
             generators[0].purchase: unknown resource 'sample-pack.gold'"
        );
        assert_eq!(error.issues().len(), 1);
    }
}
