//! Reading pack and option files from disk.
//!
//! Packs and options are accepted as JSON or RON. Both are read into a
//! `serde_json::Value` first so the core sees the same document whatever
//! the file format.

use std::fs;
use std::path::{Path, PathBuf};

use content_core::options::ValidationConfig;
use serde_json::Value;

use crate::error::{Result, ToolError};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.ron`
    Ron,
}

impl Format {
    /// Format implied by the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }
}

/// Read a JSON or RON file into a document.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported
/// extension, or does not parse.
pub fn load_document(path: &Path) -> Result<Value> {
    let format = Format::from_path(path).ok_or_else(|| ToolError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format {
        Format::Json => serde_json::from_str(&text).map_err(|source| ToolError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Format::Ron => ron::from_str(&text).map_err(|source| ToolError::Ron {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read validation settings from a JSON or RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or does not match the
/// settings schema.
pub fn load_config(path: &Path) -> Result<ValidationConfig> {
    let document = load_document(path)?;
    serde_json::from_value(document).map_err(|source| ToolError::Options {
        path: path.to_path_buf(),
        source,
    })
}

/// Expand `paths` into pack files: files are kept as given, directories
/// contribute their `.json` and `.ron` files in name order.
///
/// # Errors
///
/// Returns an error if a directory cannot be read or nothing is found.
pub fn collect_pack_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut packs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(path).map_err(|source| ToolError::Io {
                path: path.clone(),
                source,
            })?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|entry| entry.is_file() && Format::from_path(entry).is_some())
                .collect();
            found.sort();
            tracing::debug!(dir = %path.display(), packs = found.len(), "scanned directory");
            packs.extend(found);
        } else {
            packs.push(path.clone());
        }
    }
    if packs.is_empty() {
        return Err(ToolError::NoPacks);
    }
    Ok(packs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_core::diagnostics::Severity;
    use content_test_utils::fixtures;

    #[test]
    fn test_json_and_ron_load_the_same_document() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("pack.json");
        let ron_path = dir.path().join("pack.ron");
        let document = serde_json::json!({
            "metadata": { "id": "demo", "title": "Demo", "version": "1.0.0" },
            "resources": [{ "id": "demo.gold", "name": "Gold", "startAmount": 5.0 }]
        });
        fs::write(&json_path, document.to_string()).unwrap();
        fs::write(
            &ron_path,
            r#"{
                "metadata": { "id": "demo", "title": "Demo", "version": "1.0.0" },
                "resources": [{ "id": "demo.gold", "name": "Gold", "startAmount": 5.0 }],
            }"#,
        )
        .unwrap();

        assert_eq!(load_document(&json_path).unwrap(), document);
        assert_eq!(load_document(&ron_path).unwrap(), document);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.yaml");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(
            load_document(&path),
            Err(ToolError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.ron");
        fs::write(
            &path,
            r#"{ "runtimeVersion": "0.5.0", "unknownRuntimeEventSeverity": "warning" }"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.runtime_version.as_deref(), Some("0.5.0"));
        assert_eq!(config.unknown_runtime_event_severity, Some(Severity::Warning));
    }

    #[test]
    fn test_collect_pack_paths_scans_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), fixtures::sample_pack().to_string()).unwrap();
        fs::write(dir.path().join("a.ron"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let packs = collect_pack_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = packs
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.ron", "b.json"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_pack_paths(&[dir.path().to_path_buf()]),
            Err(ToolError::NoPacks)
        ));
    }
}
