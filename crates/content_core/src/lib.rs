//! # Content Core
//!
//! Content-pack compiler for the idle engine runtime.
//!
//! This crate contains **only** validation logic:
//! - No file or network IO
//! - No globals
//! - No formula evaluation (references are extracted, never executed)
//!
//! A call takes one already-parsed document and one set of options, and
//! either returns a frozen, digest-stamped pack or every hard issue found.
//!
//! ## Crate Structure
//!
//! - [`data`] - Pack schema types (resources, generators, formulas, conditions, ...)
//! - [`schema`] - Shape parse with defaults and structural checks
//! - [`validation`] - Cross-reference, cycle and compatibility passes, and the pipeline
//! - [`normalize`] - Frozen output views
//! - [`digest`] - FNV-1a id-shape digest
//! - [`cache`] - Cross-call result memoization
//!
//! ## Example
//!
//! ```
//! use content_core::prelude::*;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "metadata": { "id": "demo", "title": "Demo", "version": "1.0.0" },
//!     "resources": [{ "id": "demo.gold", "name": "Gold" }]
//! });
//! let validated = validate_content_pack(&raw, &ValidationOptions::default()).unwrap();
//! assert_eq!(validated.pack.resources().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod balance;
pub mod cache;
pub mod data;
pub mod diagnostics;
pub mod digest;
pub mod error;
pub mod ids;
pub mod normalize;
pub mod options;
pub mod schema;
pub mod validation;
pub mod version;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::balance::{BalanceChecker, BalanceIssue, BalanceReport};
    pub use crate::cache::ValidationCache;
    pub use crate::data::{EntityKind, PackModule, ParsedContentPack};
    pub use crate::diagnostics::{
        ContentPackIssue, ContentPackWarning, FieldPath, Severity, WarningCode,
    };
    pub use crate::digest::{compute_digest, PackDigest};
    pub use crate::error::{ContentPackError, ContentPackValidationError, Result};
    pub use crate::normalize::NormalizedContentPack;
    pub use crate::options::{
        AllowlistSpec, FeatureGate, KnownPack, ValidationConfig, ValidationOptions,
    };
    pub use crate::validation::{validate_content_pack, ValidatedContentPack};
}
