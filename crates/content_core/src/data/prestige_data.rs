//! Prestige layer data structures.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::formula::NumericFormula;
use super::text::LocalizedText;
use crate::ids::prestige_count_resource_id;

/// Data-driven prestige layer definition.
///
/// Every layer needs a companion resource named `<id>-prestige-count`
/// that the runtime increments on each completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrestigeLayerData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Description shown to the player.
    #[serde(default)]
    pub summary: Option<LocalizedText>,

    /// Resources reset on prestige.
    #[serde(default)]
    pub reset_targets: Vec<String>,

    /// Generators reset on prestige.
    #[serde(default)]
    pub reset_generators: Vec<String>,

    /// Upgrades reset on prestige.
    #[serde(default)]
    pub reset_upgrades: Vec<String>,

    /// Condition unlocking the layer.
    pub unlock_condition: Condition,

    /// Reward granted on prestige.
    pub reward: PrestigeReward,

    /// What survives the reset.
    #[serde(default)]
    pub retention: Vec<PrestigeRetention>,
}

/// Reward granted on prestige.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrestigeReward {
    /// Resource granted.
    pub resource_id: String,

    /// Base amount.
    pub base_reward: NumericFormula,

    /// Scaling applied to the base amount.
    #[serde(default)]
    pub multiplier_curve: Option<NumericFormula>,
}

/// Something kept across a prestige reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum PrestigeRetention {
    /// Some or all of a resource.
    Resource {
        /// Resource kept.
        resource_id: String,
        /// Amount kept. Everything when absent.
        #[serde(default)]
        amount: Option<NumericFormula>,
    },
    /// A generator's levels.
    Generator {
        /// Generator kept.
        generator_id: String,
    },
    /// An upgrade's purchases.
    Upgrade {
        /// Upgrade kept.
        upgrade_id: String,
    },
}

impl PrestigeLayerData {
    /// Id of the companion count resource.
    #[must_use]
    pub fn count_resource_id(&self) -> String {
        prestige_count_resource_id(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_resource_id() {
        let layer: PrestigeLayerData = serde_json::from_value(json!({
            "id": "pack.alpha",
            "name": "Alpha",
            "unlockCondition": { "kind": "always" },
            "reward": {
                "resourceId": "pack.shards",
                "baseReward": { "kind": "constant", "value": 1 }
            },
            "retention": [{ "kind": "resource", "resourceId": "pack.shards" }]
        }))
        .unwrap();
        assert_eq!(layer.count_resource_id(), "pack.alpha-prestige-count");
        assert!(matches!(
            layer.retention[0],
            PrestigeRetention::Resource { amount: None, .. }
        ));
    }
}
