//! Boolean gating conditions.

use serde::{Deserialize, Serialize};

use super::formula::NumericFormula;

/// Comparison used by threshold conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparator {
    /// Greater than or equal.
    #[default]
    Gte,
    /// Strictly greater.
    Gt,
    /// Less than or equal.
    Lte,
    /// Strictly less.
    Lt,
}

/// A condition tree gating unlocks, visibility and triggers.
///
/// # Example
///
/// ```json
/// {
///     "kind": "allOf",
///     "conditions": [
///         { "kind": "resourceThreshold", "resourceId": "pack.energy", "amount": { "kind": "constant", "value": 25 } },
///         { "kind": "not", "condition": { "kind": "flag", "flagId": "pack.tutorial" } }
///     ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum Condition {
    /// Always true.
    Always,

    /// Always false.
    Never,

    /// Resource amount compared against a threshold.
    ResourceThreshold {
        /// Resource read.
        resource_id: String,
        /// Comparison.
        #[serde(default)]
        comparator: Comparator,
        /// Threshold.
        amount: NumericFormula,
    },

    /// Generator level compared against a threshold.
    GeneratorLevel {
        /// Generator read.
        generator_id: String,
        /// Comparison.
        #[serde(default)]
        comparator: Comparator,
        /// Threshold.
        level: NumericFormula,
    },

    /// Upgrade bought at least `required_purchases` times.
    UpgradeOwned {
        /// Upgrade read.
        upgrade_id: String,
        /// Purchases needed.
        #[serde(default = "default_required_purchases")]
        required_purchases: u32,
    },

    /// Prestige layer completion count compared against a threshold.
    PrestigeCountThreshold {
        /// Layer read.
        prestige_layer_id: String,
        /// Comparison.
        #[serde(default)]
        comparator: Comparator,
        /// Threshold.
        count: u32,
    },

    /// Prestige layer completed at least once.
    PrestigeCompleted {
        /// Layer read.
        prestige_layer_id: String,
    },

    /// Prestige layer unlocked.
    PrestigeUnlocked {
        /// Layer read.
        prestige_layer_id: String,
    },

    /// Runtime flag set.
    Flag {
        /// Flag id, checked against the flag allowlist.
        flag_id: String,
    },

    /// Script predicate.
    Script {
        /// Script id, checked against the script allowlist.
        script_id: String,
    },

    /// Every child holds.
    AllOf {
        /// Children.
        conditions: Vec<Condition>,
    },

    /// At least one child holds.
    AnyOf {
        /// Children.
        conditions: Vec<Condition>,
    },

    /// Child does not hold.
    Not {
        /// Negated child.
        condition: Box<Condition>,
    },
}

const fn default_required_purchases() -> u32 {
    1
}
