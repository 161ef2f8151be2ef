//! Digest properties.
//!
//! The digest depends on the pack id, the pack version and the ordered ids
//! of every collection, and on nothing else.

use content_core::digest::RawPackShape;
use content_core::prelude::*;
use content_test_utils::determinism::{run_parallel, run_sequential};
use content_test_utils::fixtures::{self, PackBuilder};
use content_test_utils::strategies::{names_and_reordering, unique_local_names};
use proptest::prelude::*;
use serde_json::{json, Value};

fn pack_with_resources(names: &[String]) -> Value {
    names
        .iter()
        .fold(PackBuilder::new("demo"), |builder, name| builder.resource(name))
        .build()
}

fn digest_of(raw: &Value) -> PackDigest {
    match validate_content_pack(raw, &ValidationOptions::default()) {
        Ok(validated) => validated.pack.digest(),
        Err(error) => panic!("pack failed validation:\n{error}"),
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_sequential_runs_agree() {
    run_sequential(&fixtures::sample_pack(), &ValidationOptions::default(), 10).assert_deterministic();
}

#[test]
fn test_parallel_runs_agree() {
    run_parallel(&fixtures::large_pack(20), &ValidationOptions::default(), 8).assert_deterministic();
}

#[test]
fn test_raw_and_normalized_digests_match() {
    let raw = fixtures::large_pack(10);
    assert_eq!(compute_digest(&RawPackShape(&raw)), digest_of(&raw));
}

// =============================================================================
// Sensitivity
// =============================================================================

#[test]
fn test_version_bump_changes_digest() {
    let before = fixtures::sample_pack();
    let mut after = before.clone();
    after["metadata"]["version"] = json!("0.2.0");
    assert_ne!(digest_of(&before), digest_of(&after));
}

#[test]
fn test_collection_membership_matters() {
    let as_resource = PackBuilder::new("demo").resource("gold").resource("mine").build();
    let as_generator = PackBuilder::new("demo")
        .resource("gold")
        .generator("mine", "gold", "gold")
        .build();
    assert_ne!(digest_of(&as_resource), digest_of(&as_generator));
}

proptest! {
    #[test]
    fn prop_digest_is_deterministic(names in unique_local_names(8)) {
        let raw = pack_with_resources(&names);
        prop_assert!(run_sequential(&raw, &ValidationOptions::default(), 3).is_deterministic());
    }

    #[test]
    fn prop_reordering_changes_digest((names, reordered) in names_and_reordering(6)) {
        let original = digest_of(&pack_with_resources(&names));
        let shuffled = digest_of(&pack_with_resources(&reordered));
        prop_assert_ne!(original, shuffled);
    }

    #[test]
    fn prop_renaming_changes_digest(names in unique_local_names(6)) {
        let mut renamed = names.clone();
        renamed[0] = format!("{}-renamed", renamed[0]);
        prop_assume!(!names.contains(&renamed[0]));

        prop_assert_ne!(
            digest_of(&pack_with_resources(&names)),
            digest_of(&pack_with_resources(&renamed))
        );
    }

    #[test]
    fn prop_non_id_fields_are_ignored(
        names in unique_local_names(6),
        start in 0.0f64..1000.0,
        capacity in 1.0f64..1000.0,
    ) {
        let plain = pack_with_resources(&names);
        let decorated = names
            .iter()
            .fold(PackBuilder::new("demo"), |builder, name| {
                builder.resource_with(name, |resource| {
                    resource["name"] = json!(format!("The {name}"));
                    resource["startAmount"] = json!(start);
                    resource["capacity"] = json!(capacity + start);
                    resource["tags"] = json!(["decorated"]);
                })
            })
            .metadata(|metadata| metadata["title"] = json!("Decorated"))
            .build();

        prop_assert_eq!(digest_of(&plain), digest_of(&decorated));
    }
}
