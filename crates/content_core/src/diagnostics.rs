//! Diagnostics shared by every validation pass.
//!
//! Hard issues and warnings both carry a [`FieldPath`] pointing at the
//! offending value in the raw input (property names and array indices),
//! so positions survive even though the output is normalized later.
//!
//! Passes never return early on the first problem. They push into a
//! [`Diagnostics`] collector that is threaded through every call and
//! inspected by the orchestrator between phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step in a [`FieldPath`]: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Position inside an array.
    Index(usize),
    /// Property name inside an object.
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a value inside the raw pack document.
///
/// Built incrementally while walking the pack:
///
/// ```
/// use content_core::diagnostics::FieldPath;
///
/// let path = FieldPath::from("generators").index(0).key("produces").index(0).key("resourceId");
/// assert_eq!(path.to_string(), "generators[0].produces[0].resourceId");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path (the document root).
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend with an object key, returning a new path.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Extend with an array index, returning a new path.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// The individual segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Whether this is the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldPath {
    fn from(key: &str) -> Self {
        Self(vec![PathSegment::from(key)])
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}

/// How serious a finding is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Aborts validation before normalization.
    #[default]
    Error,
    /// Reported but never aborts.
    Warning,
}

/// A hard validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPackIssue {
    /// Where in the raw document the problem is.
    pub path: FieldPath,
    /// Human-readable description naming the offending value.
    pub message: String,
}

impl fmt::Display for ContentPackIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningCode {
    /// Id missing from an advisory (soft-only) allowlist.
    AllowlistSoftMiss,
    /// Soft allowlist entry dropped because it is not id-shaped.
    AllowlistEntryInvalid,
    /// Reference to a runtime event nobody declares.
    UnknownRuntimeEvent,
    /// Module used before the runtime version that introduced it.
    FeatureGate,
    /// Required pack absent from the known-pack list.
    UnknownDependency,
    /// Localized variant for a locale the pack does not list.
    UnsupportedLocale,
}

/// A non-fatal finding. Streamed to the warning sink and returned with the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPackWarning {
    /// Warning category.
    pub code: WarningCode,
    /// Human-readable description.
    pub message: String,
    /// Where in the raw document the finding is.
    pub path: FieldPath,
}

impl fmt::Display for ContentPackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Callback receiving each warning as it is emitted.
pub type WarningSink = dyn Fn(&ContentPackWarning) + Send + Sync;

/// Accumulator for issues and warnings within one validation call.
pub struct Diagnostics<'s> {
    issues: Vec<ContentPackIssue>,
    warnings: Vec<ContentPackWarning>,
    sink: Option<&'s (dyn Fn(&ContentPackWarning) + Send + Sync + 's)>,
}

impl<'s> Diagnostics<'s> {
    /// Create a collector that forwards warnings to `sink` when present.
    #[must_use]
    pub fn new(sink: Option<&'s (dyn Fn(&ContentPackWarning) + Send + Sync + 's)>) -> Self {
        Self {
            issues: Vec::new(),
            warnings: Vec::new(),
            sink,
        }
    }

    /// Record a hard issue.
    pub fn error(&mut self, path: FieldPath, message: impl Into<String>) {
        let issue = ContentPackIssue {
            path,
            message: message.into(),
        };
        tracing::debug!(path = %issue.path, "{}", issue.message);
        self.issues.push(issue);
    }

    /// Record a warning and stream it to the sink.
    pub fn warn(&mut self, code: WarningCode, path: FieldPath, message: impl Into<String>) {
        let warning = ContentPackWarning {
            code,
            message: message.into(),
            path,
        };
        tracing::warn!(code = ?warning.code, path = %warning.path, "{}", warning.message);
        if let Some(sink) = self.sink {
            sink(&warning);
        }
        self.warnings.push(warning);
    }

    /// Record a finding whose severity is decided by the caller.
    pub fn report(
        &mut self,
        severity: Severity,
        code: WarningCode,
        path: FieldPath,
        message: impl Into<String>,
    ) {
        match severity {
            Severity::Error => self.error(path, message),
            Severity::Warning => self.warn(code, path, message),
        }
    }

    /// Whether any hard issue has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Hard issues recorded so far.
    #[must_use]
    pub fn issues(&self) -> &[ContentPackIssue] {
        &self.issues
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[ContentPackWarning] {
        &self.warnings
    }

    /// Consume the collector.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ContentPackIssue>, Vec<ContentPackWarning>) {
        (self.issues, self.warnings)
    }
}

impl fmt::Debug for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("issues", &self.issues)
            .field("warnings", &self.warnings)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
