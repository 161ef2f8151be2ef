//! Pack validation and digest commands.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use content_core::balance::BalanceIssue;
use content_core::diagnostics::{ContentPackIssue, ContentPackWarning};
use content_core::digest::PackDigest;
use content_core::error::ContentPackError;
use content_core::options::{KnownPack, ValidationConfig, ValidationOptions};
use content_core::validation::{validate_content_pack, ValidatedContentPack};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::load::{collect_pack_paths, load_document};

/// Outcome of validating one pack file.
#[derive(Debug)]
pub struct PackReport {
    /// File validated.
    pub path: PathBuf,
    /// Pack id, when the metadata names one.
    pub pack_id: Option<String>,
    /// Validation outcome.
    pub outcome: std::result::Result<ValidatedContentPack, ContentPackError>,
}

impl PackReport {
    /// Whether the pack validated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Digest of a valid pack.
    #[must_use]
    pub fn digest(&self) -> Option<PackDigest> {
        self.outcome.as_ref().ok().map(|validated| validated.pack.digest())
    }

    /// Plain-text rendering: warnings, then issues or a success line.
    #[must_use]
    pub fn render(&self) -> String {
        let name = self
            .pack_id
            .clone()
            .unwrap_or_else(|| self.path.display().to_string());
        let mut text = String::new();
        match &self.outcome {
            Ok(validated) => {
                for warning in &validated.warnings {
                    let _ = writeln!(text, "warning: {warning}");
                }
                for issue in validated.balance_warnings.iter().chain(&validated.balance_errors) {
                    let _ = writeln!(text, "balance: {}: {}", issue.path, issue.message);
                }
                let _ = writeln!(text, "ok: {name} ({})", validated.pack.digest());
            }
            Err(error) => {
                let _ = writeln!(text, "error: {error}");
            }
        }
        text
    }

    /// Machine-readable summary.
    #[must_use]
    pub fn summary(&self) -> PackSummary {
        let mut summary = PackSummary {
            path: self.path.clone(),
            pack_id: self.pack_id.clone(),
            valid: self.is_valid(),
            digest: self.digest(),
            warnings: Vec::new(),
            balance_warnings: Vec::new(),
            balance_errors: Vec::new(),
            issues: Vec::new(),
            error: None,
        };
        match &self.outcome {
            Ok(validated) => {
                summary.warnings.clone_from(&validated.warnings);
                summary.balance_warnings.clone_from(&validated.balance_warnings);
                summary.balance_errors.clone_from(&validated.balance_errors);
            }
            Err(ContentPackError::Balance(error)) => {
                summary.balance_errors.clone_from(&error.errors);
                summary.error = Some(error.to_string());
            }
            Err(error) => {
                summary.issues = error.issues().to_vec();
                if summary.issues.is_empty() {
                    summary.error = Some(error.to_string());
                }
            }
        }
        summary
    }
}

/// Serializable form of a [`PackReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSummary {
    /// File validated.
    pub path: PathBuf,
    /// Pack id.
    pub pack_id: Option<String>,
    /// Whether the pack validated.
    pub valid: bool,
    /// Digest of a valid pack.
    pub digest: Option<PackDigest>,
    /// Warnings.
    pub warnings: Vec<ContentPackWarning>,
    /// Balance warnings.
    pub balance_warnings: Vec<BalanceIssue>,
    /// Balance errors.
    pub balance_errors: Vec<BalanceIssue>,
    /// Hard issues.
    pub issues: Vec<ContentPackIssue>,
    /// Failure without per-field issues (balance, options).
    pub error: Option<String>,
}

/// Known-pack entry read from an unvalidated document.
fn known_pack(document: &Value) -> Option<KnownPack> {
    let metadata = document.get("metadata")?;
    let requires = metadata
        .pointer("/dependencies/requires")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("packId").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some(KnownPack {
        id: metadata.get("id")?.as_str()?.to_string(),
        version: metadata.get("version")?.as_str()?.to_string(),
        requires,
    })
}

/// Add every document's pack to `config.known_packs`, unless the settings
/// already list a pack with that id.
fn with_sibling_packs(config: &ValidationConfig, documents: &[(PathBuf, Value)]) -> ValidationConfig {
    let mut config = config.clone();
    for known in documents.iter().filter_map(|(_, document)| known_pack(document)) {
        if !config.known_packs.iter().any(|existing| existing.id == known.id) {
            config.known_packs.push(known);
        }
    }
    config
}

/// Validate every pack under `paths`.
///
/// Packs validated together are known packs of each other, so dependency
/// cycles across them are found.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded. Validation failures are
/// reported in the returned [`PackReport`]s.
pub fn validate_packs(paths: &[PathBuf], config: &ValidationConfig) -> Result<Vec<PackReport>> {
    let documents = collect_pack_paths(paths)?
        .into_iter()
        .map(|path| load_document(&path).map(|document| (path, document)))
        .collect::<Result<Vec<_>>>()?;

    let options = ValidationOptions::new(with_sibling_packs(config, &documents));
    let reports = documents
        .into_iter()
        .map(|(path, document)| validate_document(path, &document, &options))
        .collect();
    Ok(reports)
}

/// Validate one loaded document.
#[must_use]
pub fn validate_document(path: PathBuf, document: &Value, options: &ValidationOptions) -> PackReport {
    tracing::info!("Validating content pack: {}", path.display());
    let pack_id = document
        .pointer("/metadata/id")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let outcome = validate_content_pack(document, options);
    if let Err(error) = &outcome {
        tracing::debug!(path = %path.display(), "{error}");
    }
    PackReport {
        path,
        pack_id,
        outcome,
    }
}

/// Validate one pack file with no sibling packs.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded.
pub fn validate_file(path: &Path, config: &ValidationConfig) -> Result<PackReport> {
    let document = load_document(path)?;
    Ok(validate_document(
        path.to_path_buf(),
        &document,
        &ValidationOptions::new(config.clone()),
    ))
}

/// Render `<pack id> <digest>` lines for valid packs and `<path> invalid`
/// for the rest.
#[must_use]
pub fn render_digests(reports: &[PackReport]) -> String {
    let mut text = String::new();
    for report in reports {
        match (report.digest(), &report.pack_id) {
            (Some(digest), Some(id)) => {
                let _ = writeln!(text, "{id} {digest}");
            }
            _ => {
                let _ = writeln!(text, "{} invalid", report.path.display());
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_test_utils::fixtures::{self, PackBuilder};
    use std::fs;

    fn write(dir: &Path, name: &str, document: &Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_validate_sample_pack_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "sample.json", &fixtures::sample_pack());

        let report = validate_file(&path, &ValidationConfig::default()).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.pack_id.as_deref(), Some("sample-pack"));
        assert!(report.render().starts_with("ok: sample-pack (fnv1a-"));
    }

    #[test]
    fn test_invalid_pack_reports_issue_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut document = fixtures::sample_pack();
        document["generators"][0]["produces"][0]["resourceId"] = serde_json::json!("sample-pack.nonexistent");
        let path = write(dir.path(), "broken.json", &document);

        let report = validate_file(&path, &ValidationConfig::default()).unwrap();
        assert!(!report.is_valid());
        let summary = report.summary();
        assert_eq!(summary.issues.len(), 1);
        assert_eq!(
            summary.issues[0].path.to_string(),
            "generators[0].produces[0].resourceId"
        );
        assert!(report.render().contains("unknown resource 'sample-pack.nonexistent'"));
    }

    #[test]
    fn test_sibling_packs_form_dependency_graph() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", &PackBuilder::new("pack-a").resource("gold").requires(&["pack-b"]).build());
        write(dir.path(), "b.json", &PackBuilder::new("pack-b").resource("gem").requires(&["pack-a"]).build());

        let reports = validate_packs(&[dir.path().to_path_buf()], &ValidationConfig::default()).unwrap();
        assert_eq!(reports.len(), 2);
        for report in &reports {
            let summary = report.summary();
            assert!(!summary.valid);
            assert!(summary.issues[0].message.contains("pack dependency cycle detected"));
        }
    }

    #[test]
    fn test_digest_lines() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "sample.json", &fixtures::sample_pack());
        write(dir.path(), "zz-broken.json", &serde_json::json!({ "resources": [] }));

        let reports = validate_packs(&[dir.path().to_path_buf()], &ValidationConfig::default()).unwrap();
        let text = render_digests(&reports);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("sample-pack fnv1a-"));
        assert!(lines[1].ends_with("zz-broken.json invalid"));
    }

    #[test]
    fn test_summary_serializes() {
        let report = validate_document(
            PathBuf::from("sample.json"),
            &fixtures::sample_pack(),
            &ValidationOptions::default(),
        );
        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["packId"], "sample-pack");
        assert_eq!(json["valid"], true);
        assert!(json["digest"].as_str().unwrap().starts_with("fnv1a-"));
    }
}
