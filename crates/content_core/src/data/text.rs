//! Localized display text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display text with optional per-locale variants.
///
/// A bare string in the document is shorthand for `{ "default": "..." }`.
/// Resolving a variant for a locale happens outside this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocalizedTextRepr")]
pub struct LocalizedText {
    /// Text shown when no variant matches.
    pub default: String,

    /// Locale tag to translated text.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, String>,
}

impl LocalizedText {
    /// Text with no variants.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            default: text.into(),
            variants: BTreeMap::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged, deny_unknown_fields)]
enum LocalizedTextRepr {
    Plain(String),
    Full {
        default: String,
        #[serde(default)]
        variants: BTreeMap<String, String>,
    },
}

impl From<LocalizedTextRepr> for LocalizedText {
    fn from(repr: LocalizedTextRepr) -> Self {
        match repr {
            LocalizedTextRepr::Plain(default) => Self::plain(default),
            LocalizedTextRepr::Full { default, variants } => Self { default, variants },
        }
    }
}
