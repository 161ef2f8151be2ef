//! Content digest over a pack's id shape.
//!
//! The digest covers the pack id, the pack version and the ordered id
//! sequence of every collection. It changes when any id changes or any
//! collection is reordered, and ignores every other field.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::data::{PackModule, ParsedContentPack};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the UTF-16 code units of `text`.
#[must_use]
pub fn fnv1a_32(text: &str) -> u32 {
    text.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Digest identifying a pack's id shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackDigest(u32);

impl PackDigest {
    /// Raw hash value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PackDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fnv1a-{:08x}", self.0)
    }
}

impl Serialize for PackDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Anything exposing a pack id, version and per-collection id sequences.
pub trait PackShape {
    /// Pack id.
    fn pack_id(&self) -> &str;

    /// Pack version string.
    fn pack_version(&self) -> &str;

    /// Ids of `module`, in document order.
    fn module_ids(&self, module: PackModule) -> Vec<&str>;
}

impl PackShape for ParsedContentPack {
    fn pack_id(&self) -> &str {
        &self.metadata.id
    }

    fn pack_version(&self) -> &str {
        &self.metadata.version
    }

    fn module_ids(&self, module: PackModule) -> Vec<&str> {
        ParsedContentPack::module_ids(self, module)
    }
}

/// Id shape read straight from an unvalidated document.
///
/// Entries without a string `id` are skipped, so for a document that
/// parses successfully the digest matches the parsed pack's digest.
#[derive(Debug, Clone, Copy)]
pub struct RawPackShape<'a>(pub &'a Value);

impl PackShape for RawPackShape<'_> {
    fn pack_id(&self) -> &str {
        self.0
            .pointer("/metadata/id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn pack_version(&self) -> &str {
        self.0
            .pointer("/metadata/version")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn module_ids(&self, module: PackModule) -> Vec<&str> {
        self.0
            .get(module.key())
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("id").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Canonical projection hashed by [`compute_digest`].
///
/// Keys serialize in sorted order whatever features `serde_json` is built
/// with, so the text for a given shape never changes.
#[must_use]
pub fn digest_projection<S: PackShape + ?Sized>(shape: &S) -> BTreeMap<String, Value> {
    let mut projection = BTreeMap::new();
    projection.insert("packId".to_string(), Value::from(shape.pack_id()));
    projection.insert("packVersion".to_string(), Value::from(shape.pack_version()));
    for module in PackModule::ALL {
        let ids = shape
            .module_ids(module)
            .into_iter()
            .map(Value::from)
            .collect();
        projection.insert(module.key().to_string(), Value::Array(ids));
    }
    projection
}

/// Digest of a pack's id shape.
#[must_use]
pub fn compute_digest<S: PackShape + ?Sized>(shape: &S) -> PackDigest {
    let text = serde_json::to_string(&digest_projection(shape)).unwrap_or_default();
    PackDigest(fnv1a_32(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_test_utils::fixtures;
    use serde_json::json;

    #[test]
    fn test_fnv1a_reference_vectors() {
        assert_eq!(fnv1a_32(""), 0x811c_9dc5);
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
        assert_eq!(fnv1a_32("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_digest_display() {
        assert_eq!(PackDigest(0xab).to_string(), "fnv1a-000000ab");
        assert_eq!(
            serde_json::to_value(PackDigest(0xdead_beef)).unwrap(),
            json!("fnv1a-deadbeef")
        );
    }

    #[test]
    fn test_projection_lists_every_collection() {
        let raw = fixtures::sample_pack();
        let projection = digest_projection(&RawPackShape(&raw));
        assert_eq!(projection["packId"], json!("sample-pack"));
        assert_eq!(
            projection["resources"],
            json!(["sample-pack.energy", "sample-pack.crystal"])
        );
        assert_eq!(projection["runtimeEvents"], json!([]));
    }

    #[test]
    fn test_projection_text_is_key_sorted() {
        let raw = fixtures::sample_pack();
        let text = serde_json::to_string(&digest_projection(&RawPackShape(&raw))).unwrap();
        assert!(text.starts_with(r#"{"achievements":[],"automations":[],"entities":[]"#));
        assert!(text.contains(r#""packId":"sample-pack","packVersion":"0.1.0","prestigeLayers":[]"#));
        assert_eq!(compute_digest(&RawPackShape(&raw)), PackDigest(fnv1a_32(&text)));
    }

    #[test]
    fn test_raw_digest_ignores_non_id_fields() {
        let raw = fixtures::sample_pack();
        let mut edited = raw.clone();
        edited["resources"][0]["name"] = json!("Renamed");
        assert_eq!(
            compute_digest(&RawPackShape(&raw)),
            compute_digest(&RawPackShape(&edited))
        );
    }
}
