//! Allowlist normalization and enforcement.
//!
//! Flags, scripts and system automation targets are defined outside the
//! pack. Callers restrict them with a two-tier allowlist: `required`
//! entries are enforced, `soft` entries are advisory. A pack can ship with
//! an advisory list first and graduate to an enforced one later.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::{Diagnostics, FieldPath, WarningCode};
use crate::ids::is_valid_content_id;
use crate::options::{AllowlistSpec, AllowlistSpecs};

/// Category of externally defined ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AllowlistCategory {
    /// Runtime flags.
    Flags,
    /// Scripts.
    Scripts,
    /// Runtime systems automations may drive.
    SystemAutomationTargets,
}

impl AllowlistCategory {
    /// Singular label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flags => "flag",
            Self::Scripts => "script",
            Self::SystemAutomationTargets => "system automation target",
        }
    }

    /// Key under `allowlists` in the options.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Flags => "flags",
            Self::Scripts => "scripts",
            Self::SystemAutomationTargets => "systemAutomationTargets",
        }
    }
}

impl fmt::Display for AllowlistCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A required-tier entry that is not id-shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidAllowlistEntry {
    /// Position in the `required` list.
    pub index: usize,
    /// Offending value.
    pub value: String,
}

/// Required-tier allowlist entries that failed the id-shape check.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", describe(.category, .invalid))]
pub struct AllowlistError {
    /// Category of the allowlist.
    pub category: AllowlistCategory,
    /// Every failing entry.
    pub invalid: Vec<InvalidAllowlistEntry>,
}

impl AllowlistError {
    /// Path of the offending list in the options.
    #[must_use]
    pub fn path(&self) -> FieldPath {
        FieldPath::from("allowlists")
            .key(self.category.key())
            .key("required")
    }
}

fn describe(category: &AllowlistCategory, invalid: &[InvalidAllowlistEntry]) -> String {
    let entries = invalid
        .iter()
        .map(|entry| format!("[{}] '{}'", entry.index, entry.value))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "allowlists.{}.required contains invalid {} ids: {entries}",
        category.key(),
        category.label()
    )
}

/// Validated allowlist for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedAllowlist {
    /// Enforced ids.
    pub required: BTreeSet<String>,
    /// Advisory ids.
    pub soft: BTreeSet<String>,
}

impl NormalizedAllowlist {
    /// Whether `id` is in either tier.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.required.contains(id) || self.soft.contains(id)
    }
}

/// Validated allowlists for every category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedAllowlists {
    /// Runtime flags.
    pub flags: Option<NormalizedAllowlist>,
    /// Scripts.
    pub scripts: Option<NormalizedAllowlist>,
    /// System automation targets.
    pub system_automation_targets: Option<NormalizedAllowlist>,
}

impl NormalizedAllowlists {
    /// Allowlist for `category`, if the caller supplied one.
    #[must_use]
    pub fn get(&self, category: AllowlistCategory) -> Option<&NormalizedAllowlist> {
        match category {
            AllowlistCategory::Flags => self.flags.as_ref(),
            AllowlistCategory::Scripts => self.scripts.as_ref(),
            AllowlistCategory::SystemAutomationTargets => self.system_automation_targets.as_ref(),
        }
    }
}

/// Validate one allowlist spec.
///
/// # Errors
///
/// Returns an [`AllowlistError`] naming every required entry that is not
/// id-shaped. Invalid soft entries are dropped with one warning each.
pub fn normalize_allowlist(
    category: AllowlistCategory,
    spec: &AllowlistSpec,
    diagnostics: &mut Diagnostics<'_>,
) -> Result<NormalizedAllowlist, AllowlistError> {
    let invalid: Vec<InvalidAllowlistEntry> = spec
        .required
        .iter()
        .enumerate()
        .filter(|(_, value)| !is_valid_content_id(value))
        .map(|(index, value)| InvalidAllowlistEntry {
            index,
            value: value.clone(),
        })
        .collect();
    if !invalid.is_empty() {
        return Err(AllowlistError { category, invalid });
    }

    let mut soft = BTreeSet::new();
    for (index, value) in spec.soft.iter().enumerate() {
        if is_valid_content_id(value) {
            soft.insert(value.clone());
        } else {
            diagnostics.warn(
                WarningCode::AllowlistEntryInvalid,
                FieldPath::from("allowlists")
                    .key(category.key())
                    .key("soft")
                    .index(index),
                format!("ignoring invalid soft {} allowlist entry '{value}'", category.label()),
            );
        }
    }

    Ok(NormalizedAllowlist {
        required: spec.required.iter().cloned().collect(),
        soft,
    })
}

/// Validate every supplied allowlist.
///
/// # Errors
///
/// Returns the first category whose required tier holds invalid entries.
pub fn normalize_allowlists(
    specs: &AllowlistSpecs,
    diagnostics: &mut Diagnostics<'_>,
) -> Result<NormalizedAllowlists, AllowlistError> {
    let mut normalize = |category, spec: &Option<AllowlistSpec>| {
        spec.as_ref()
            .map(|spec| normalize_allowlist(category, spec, diagnostics))
            .transpose()
    };
    Ok(NormalizedAllowlists {
        flags: normalize(AllowlistCategory::Flags, &specs.flags)?,
        scripts: normalize(AllowlistCategory::Scripts, &specs.scripts)?,
        system_automation_targets: normalize(
            AllowlistCategory::SystemAutomationTargets,
            &specs.system_automation_targets,
        )?,
    })
}

/// Enforce an allowlist on one id.
///
/// With no allowlist the category is unrestricted. Members of either tier
/// pass. A miss is a warning when only the soft tier has entries and a
/// hard error otherwise.
pub fn assert_allowlisted(
    allowlist: Option<&NormalizedAllowlist>,
    category: AllowlistCategory,
    id: &str,
    path: FieldPath,
    diagnostics: &mut Diagnostics<'_>,
) {
    let Some(allowlist) = allowlist else {
        return;
    };
    if allowlist.contains(id) {
        return;
    }
    let label = category.label();
    if !allowlist.soft.is_empty() && allowlist.required.is_empty() {
        diagnostics.warn(
            WarningCode::AllowlistSoftMiss,
            path,
            format!("{label} '{id}' is not in the soft {label} allowlist"),
        );
    } else {
        diagnostics.error(path, format!("{label} '{id}' is not in the {label} allowlist"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(allowlist: Option<&NormalizedAllowlist>, id: &str) -> Diagnostics<'static> {
        let mut diagnostics = Diagnostics::new(None);
        assert_allowlisted(
            allowlist,
            AllowlistCategory::Flags,
            id,
            FieldPath::from("upgrades").index(0),
            &mut diagnostics,
        );
        diagnostics
    }

    fn normalized(spec: &AllowlistSpec) -> NormalizedAllowlist {
        normalize_allowlist(AllowlistCategory::Flags, spec, &mut Diagnostics::new(None)).unwrap()
    }

    #[test]
    fn test_no_spec_is_unrestricted() {
        let diagnostics = check(None, "pack.anything");
        assert!(!diagnostics.has_errors());
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_members_pass() {
        let allowlist = normalized(&AllowlistSpec {
            required: vec!["pack.a".to_string()],
            soft: vec!["pack.b".to_string()],
        });
        assert!(!check(Some(&allowlist), "pack.a").has_errors());
        assert!(!check(Some(&allowlist), "pack.b").has_errors());
    }

    #[test]
    fn test_soft_only_miss_warns() {
        let allowlist = normalized(&AllowlistSpec::soft(["pack.b"]));
        let diagnostics = check(Some(&allowlist), "pack.c");
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warnings()[0].code, WarningCode::AllowlistSoftMiss);
    }

    #[test]
    fn test_required_miss_errors() {
        let allowlist = normalized(&AllowlistSpec {
            required: vec!["pack.a".to_string()],
            soft: vec!["pack.b".to_string()],
        });
        let diagnostics = check(Some(&allowlist), "pack.c");
        assert_eq!(diagnostics.issues().len(), 1);
        assert_eq!(
            diagnostics.issues()[0].message,
            "flag 'pack.c' is not in the flag allowlist"
        );
    }

    #[test]
    fn test_empty_spec_rejects_everything() {
        let allowlist = normalized(&AllowlistSpec::default());
        assert!(check(Some(&allowlist), "pack.c").has_errors());
    }

    #[test]
    fn test_invalid_required_entries_combined() {
        let spec = AllowlistSpec::required(["pack.ok", "Not Valid", "pack.fine", ""]);
        let error =
            normalize_allowlist(AllowlistCategory::Scripts, &spec, &mut Diagnostics::new(None))
                .unwrap_err();
        assert_eq!(
            error.invalid.iter().map(|e| e.index).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(
            error.to_string(),
            "allowlists.scripts.required contains invalid script ids: [1] 'Not Valid', [3] ''"
        );
    }

    #[test]
    fn test_invalid_soft_entries_dropped_with_warning() {
        let mut diagnostics = Diagnostics::new(None);
        let allowlist = normalize_allowlist(
            AllowlistCategory::Flags,
            &AllowlistSpec::soft(["pack.ok", "BAD", "also bad"]),
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(allowlist.soft.len(), 1);
        assert_eq!(diagnostics.warnings().len(), 2);
        assert_eq!(
            diagnostics.warnings()[1].path.to_string(),
            "allowlists.flags.soft[2]"
        );
    }
}
