//! Upgrade data structures.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::default_true;
use super::formula::NumericFormula;
use super::generator_data::default_cost_multiplier;
use super::text::LocalizedText;

/// Data-driven upgrade definition.
///
/// # Example
///
/// ```json
/// {
///     "id": "sample-pack.overclock",
///     "name": "Overclock",
///     "targets": [{ "kind": "generator", "id": "sample-pack.reactor" }],
///     "cost": { "currencyId": "sample-pack.energy", "costCurve": { "kind": "constant", "value": 50 } },
///     "effects": [{
///         "kind": "modifyGeneratorRate",
///         "generatorId": "sample-pack.reactor",
///         "operation": "multiply",
///         "value": { "kind": "constant", "value": 2 }
///     }],
///     "prerequisites": ["sample-pack.starter"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpgradeData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Grouping used by UIs.
    #[serde(default)]
    pub category: Option<String>,

    /// What the upgrade applies to.
    #[serde(default)]
    pub targets: Vec<UpgradeTarget>,

    /// Purchase price.
    pub cost: UpgradeCost,

    /// Present when the upgrade can be bought more than once.
    #[serde(default)]
    pub repeatable: Option<RepeatableCost>,

    /// Effects applied on purchase.
    #[serde(default)]
    pub effects: Vec<UpgradeEffect>,

    /// Upgrades or conditions required before purchase.
    #[serde(default)]
    pub prerequisites: Vec<UpgradePrerequisite>,

    /// Condition unlocking the upgrade.
    #[serde(default)]
    pub unlock_condition: Option<Condition>,

    /// Condition revealing the upgrade.
    #[serde(default)]
    pub visibility_condition: Option<Condition>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// What an upgrade applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum UpgradeTarget {
    /// The whole game.
    Global,
    /// One resource.
    Resource {
        /// Resource id.
        id: String,
    },
    /// One generator.
    Generator {
        /// Generator id.
        id: String,
    },
    /// One automation.
    Automation {
        /// Automation id.
        id: String,
    },
    /// One prestige layer.
    PrestigeLayer {
        /// Prestige layer id.
        id: String,
    },
}

/// Purchase price of an upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpgradeCost {
    /// Resource spent.
    pub currency_id: String,

    /// Scalar applied to the curve.
    #[serde(default = "default_cost_multiplier")]
    pub cost_multiplier: f64,

    /// Price as a function of purchases made.
    pub cost_curve: NumericFormula,
}

/// Repeat-purchase parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepeatableCost {
    /// Purchase cap. `None` for unlimited.
    #[serde(default)]
    pub max_purchases: Option<u32>,

    /// Price scaling over repeated purchases.
    #[serde(default)]
    pub cost_curve: Option<NumericFormula>,
}

/// How an effect combines with the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectOperation {
    /// Added to the current value.
    Add,
    /// Multiplies the current value.
    Multiply,
    /// Replaces the current value.
    Set,
}

/// Effect applied when an upgrade is bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum UpgradeEffect {
    /// Change a resource's passive rate.
    ModifyResourceRate {
        /// Resource changed.
        resource_id: String,
        /// Combination rule.
        operation: EffectOperation,
        /// Operand.
        value: NumericFormula,
    },

    /// Change a resource's capacity.
    ModifyResourceCapacity {
        /// Resource changed.
        resource_id: String,
        /// Combination rule.
        operation: EffectOperation,
        /// Operand.
        value: NumericFormula,
    },

    /// Unlock a resource.
    UnlockResource {
        /// Resource unlocked.
        resource_id: String,
    },

    /// Change a resource's dirty tolerance.
    AlterDirtyTolerance {
        /// Resource changed.
        resource_id: String,
        /// Combination rule.
        operation: EffectOperation,
        /// Operand.
        value: NumericFormula,
    },

    /// Change a generator's production rate.
    ModifyGeneratorRate {
        /// Generator changed.
        generator_id: String,
        /// Combination rule.
        operation: EffectOperation,
        /// Operand.
        value: NumericFormula,
    },

    /// Change a generator's purchase cost.
    ModifyGeneratorCost {
        /// Generator changed.
        generator_id: String,
        /// Combination rule.
        operation: EffectOperation,
        /// Operand.
        value: NumericFormula,
    },

    /// Change a generator's consumption, optionally for a single resource.
    ModifyGeneratorConsumption {
        /// Generator changed.
        generator_id: String,
        /// Consumed resource narrowed to, if any.
        #[serde(default)]
        resource_id: Option<String>,
        /// Combination rule.
        operation: EffectOperation,
        /// Operand.
        value: NumericFormula,
    },

    /// Unlock a generator.
    UnlockGenerator {
        /// Generator unlocked.
        generator_id: String,
    },

    /// Grant an automation.
    GrantAutomation {
        /// Automation granted.
        automation_id: String,
    },

    /// Set a runtime flag.
    GrantFlag {
        /// Flag id, checked against the flag allowlist.
        flag_id: String,
        /// Value the flag is set to.
        #[serde(default = "default_true")]
        value: bool,
    },

    /// Publish a runtime event.
    EmitEvent {
        /// Event id.
        event_id: String,
    },
}

/// A prerequisite: either another upgrade's id or a full condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpgradePrerequisite {
    /// Shorthand for owning the upgrade once.
    UpgradeId(String),
    /// Arbitrary condition.
    Condition(Condition),
}

impl UpgradePrerequisite {
    /// The equivalent condition.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::UpgradeId(upgrade_id) => Condition::UpgradeOwned {
                upgrade_id: upgrade_id.clone(),
                required_purchases: 1,
            },
            Self::Condition(condition) => condition.clone(),
        }
    }
}

impl UpgradeData {
    /// Check if this upgrade can be bought repeatedly.
    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        self.repeatable.is_some()
    }

    /// Check if this upgrade has the specified tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
