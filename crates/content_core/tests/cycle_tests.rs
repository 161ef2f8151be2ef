//! Cycle detection through the full pipeline.
//!
//! Transform and unlock graphs are built from real packs; the reported
//! cycle must not depend on where the search happened to start.

use content_core::prelude::*;
use content_test_utils::assertions::{assert_single_issue, expect_success};
use content_test_utils::fixtures::{resource_at_least, PackBuilder};
use content_test_utils::strategies::{cycle_with_entry, dag_edges};
use proptest::prelude::*;
use serde_json::{json, Value};

fn validate(raw: &Value) -> Result<ValidatedContentPack> {
    validate_content_pack(raw, &ValidationOptions::default())
}

/// Expected display of a cycle through `ids` in order: rotated to start at
/// the smallest id and closed.
fn canonical(ids: &[String]) -> String {
    let start = ids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(position, _)| position);
    let mut rotated: Vec<&str> = ids[start..].iter().chain(&ids[..start]).map(String::as_str).collect();
    rotated.push(rotated[0]);
    rotated.join(" -> ")
}

// =============================================================================
// Transform Cycles
// =============================================================================

mod transforms {
    use super::*;

    #[test]
    fn test_two_transform_cycle() {
        let raw = PackBuilder::new("demo")
            .resource("ore")
            .resource("ingot")
            .transform("smelt", &["ore"], &["ingot"])
            .transform("recycle", &["ingot"], &["ore"])
            .build();

        let issue = assert_single_issue(validate(&raw), "transforms[1]");
        assert_eq!(
            issue.message,
            "transform dependency cycle detected: demo.recycle -> demo.smelt -> demo.recycle \
             (demo.recycle -> demo.smelt via 'demo.ore'; demo.smelt -> demo.recycle via 'demo.ingot')"
        );
    }

    #[test]
    fn test_catalyst_loop_is_not_a_cycle() {
        let raw = PackBuilder::new("demo")
            .resource("seed")
            .resource("crop")
            .transform("grow", &["seed"], &["seed", "crop"])
            .build();
        expect_success(validate(&raw));
    }

    #[test]
    fn test_chain_is_acyclic() {
        let raw = PackBuilder::new("demo")
            .resource("ore")
            .resource("ingot")
            .resource("gear")
            .transform("smelt", &["ore"], &["ingot"])
            .transform("machine", &["ingot"], &["gear"])
            .build();
        expect_success(validate(&raw));
    }
}

// =============================================================================
// Unlock Cycles
// =============================================================================

mod unlocks {
    use super::*;

    #[test]
    fn test_mutual_resource_gating() {
        let raw = PackBuilder::new("demo")
            .resource_with("gold", |gold| gold["unlockCondition"] = resource_at_least("demo.gem", 1.0))
            .resource_with("gem", |gem| gem["unlockCondition"] = resource_at_least("demo.gold", 1.0))
            .build();

        // The edge gem -> gold comes from gold's gating.
        let issue = assert_single_issue(validate(&raw), "resources[0].unlockCondition");
        assert_eq!(
            issue.message,
            "unlock condition cycle detected: demo.gem -> demo.gold -> demo.gem"
        );
    }

    #[test]
    fn test_cycle_through_upgrade_prerequisites() {
        let raw = PackBuilder::new("demo")
            .resource("gold")
            .upgrade_with("first", "gold", |upgrade| upgrade["prerequisites"] = json!(["demo.second"]))
            .upgrade_with("second", "gold", |upgrade| upgrade["prerequisites"] = json!(["demo.first"]))
            .build();

        let issue = assert_single_issue(validate(&raw), "upgrades[1].prerequisites[0]");
        assert_eq!(
            issue.message,
            "unlock condition cycle detected: demo.first -> demo.second -> demo.first"
        );
    }

    #[test]
    fn test_cycle_reported_at_closing_prerequisite() {
        let raw = PackBuilder::new("demo")
            .resource("gold")
            .upgrade_with("first", "gold", |upgrade| upgrade["prerequisites"] = json!(["demo.second"]))
            .upgrade_with("second", "gold", |upgrade| {
                upgrade["unlockCondition"] = resource_at_least("demo.gold", 5.0);
                upgrade["prerequisites"] = json!(["demo.first"]);
            })
            .build();

        // second's unlock condition is acyclic; its prerequisite closes the loop.
        let issue = assert_single_issue(validate(&raw), "upgrades[1].prerequisites[0]");
        assert_eq!(
            issue.message,
            "unlock condition cycle detected: demo.first -> demo.second -> demo.first"
        );
    }

    #[test]
    fn test_self_gated_resource() {
        let raw = PackBuilder::new("demo")
            .resource_with("gold", |gold| gold["unlockCondition"] = resource_at_least("demo.gold", 1.0))
            .build();

        let issue = assert_single_issue(validate(&raw), "resources[0].unlockCondition");
        assert_eq!(issue.message, "unlock condition cycle detected: demo.gold -> demo.gold");
    }
}

// =============================================================================
// Property Tests
// =============================================================================

/// Resources gated in a ring: `ids[i]` unlocks once `ids[i - 1]` is held.
/// Entries are written starting from `entry`, so the search starts there.
fn gated_ring(names: &[String], entry: usize) -> (Value, Vec<String>) {
    let builder = PackBuilder::new("demo");
    let ids: Vec<String> = names.iter().map(|name| builder.id(name)).collect();
    let count = names.len();

    let mut builder = builder;
    for offset in 0..count {
        let position = (entry + offset) % count;
        let gate = ids[(position + count - 1) % count].clone();
        builder = builder.resource_with(&names[position], |resource| {
            resource["unlockCondition"] = resource_at_least(&gate, 1.0);
        });
    }
    (builder.build(), ids)
}

proptest! {
    #[test]
    fn prop_unlock_cycle_reported_once_in_canonical_form((names, entry) in cycle_with_entry(6)) {
        let (raw, ids) = gated_ring(&names, entry);

        let error = validate(&raw).expect_err("ring must fail");
        prop_assert_eq!(error.issues().len(), 1);
        prop_assert_eq!(
            error.issues()[0].message.clone(),
            format!("unlock condition cycle detected: {}", canonical(&ids))
        );
    }

    #[test]
    fn prop_unlock_dag_is_accepted(edges in dag_edges(6)) {
        let mut builder = PackBuilder::new("demo");
        for node in 0..6 {
            let gates: Vec<Value> = edges
                .iter()
                .filter(|(_, to)| *to == node)
                .map(|(from, _)| resource_at_least(&format!("demo.r{from}"), 1.0))
                .collect();
            builder = builder.resource_with(&format!("r{node}"), |resource| {
                if !gates.is_empty() {
                    resource["unlockCondition"] = json!({ "kind": "allOf", "conditions": gates });
                }
            });
        }

        prop_assert!(validate(&builder.build()).is_ok());
    }
}
