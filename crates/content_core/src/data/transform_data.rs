//! Transform data structures: recipes turning resources into resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::default_true;
use super::formula::NumericFormula;
use super::text::LocalizedText;

/// Data-driven transform definition.
///
/// # Example
///
/// ```json
/// {
///     "id": "sample-pack.refine",
///     "name": "Refine",
///     "mode": "batch",
///     "inputs": [{ "resourceId": "sample-pack.ore", "amount": { "kind": "constant", "value": 5 } }],
///     "outputs": [{ "resourceId": "sample-pack.ingot", "amount": { "kind": "constant", "value": 1 } }],
///     "duration": { "kind": "constant", "value": 30 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Description shown to the player.
    #[serde(default)]
    pub description: Option<LocalizedText>,

    /// How the transform runs.
    pub mode: TransformMode,

    /// Resources consumed.
    #[serde(default)]
    pub inputs: Vec<ResourceAmount>,

    /// Resources produced.
    #[serde(default)]
    pub outputs: Vec<ResourceAmount>,

    /// Time to complete, required for `batch` and `mission`.
    #[serde(default)]
    pub duration: Option<NumericFormula>,

    /// Minimum time between runs.
    #[serde(default)]
    pub cooldown: Option<NumericFormula>,

    /// What starts a run.
    #[serde(default)]
    pub trigger: TransformTrigger,

    /// Entities sent on a `mission`.
    #[serde(default)]
    pub entity_requirements: Vec<EntityRequirement>,

    /// Condition unlocking the transform.
    #[serde(default)]
    pub unlock_condition: Option<Condition>,

    /// Condition revealing the transform.
    #[serde(default)]
    pub visibility_condition: Option<Condition>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// How a transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformMode {
    /// Completes immediately.
    Instant,
    /// Runs every tick while active.
    Continuous,
    /// Completes after `duration`.
    Batch,
    /// Sends entities away for `duration`.
    Mission,
}

impl TransformMode {
    /// Whether the mode needs a `duration`.
    #[must_use]
    pub const fn requires_duration(self) -> bool {
        matches!(self, Self::Batch | Self::Mission)
    }
}

/// A fixed quantity of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceAmount {
    /// Resource moved.
    pub resource_id: String,

    /// Quantity moved.
    pub amount: NumericFormula,
}

/// What starts a transform run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum TransformTrigger {
    /// The player starts it.
    #[default]
    Manual,
    /// Starts when a condition holds.
    Condition {
        /// Condition watched.
        condition: Condition,
    },
    /// Starts when a runtime event is published.
    Event {
        /// Event id.
        event_id: String,
    },
    /// Started by an automation.
    Automation {
        /// Automation id.
        automation_id: String,
    },
}

/// Entities a mission needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityRequirement {
    /// Entity type sent.
    pub entity_id: String,

    /// How many are sent.
    #[serde(default = "default_count")]
    pub count: NumericFormula,

    /// Minimum stat values, keyed by the entity's stat ids.
    #[serde(default)]
    pub min_stats: BTreeMap<String, NumericFormula>,

    /// Whether the entities come back when the mission completes.
    #[serde(default = "default_true")]
    pub return_on_completion: bool,
}

const fn default_count() -> NumericFormula {
    NumericFormula::constant(1.0)
}

impl TransformData {
    /// Check if this transform consumes the given resource.
    #[must_use]
    pub fn consumes(&self, resource_id: &str) -> bool {
        self.inputs.iter().any(|i| i.resource_id == resource_id)
    }

    /// Check if this transform produces the given resource.
    #[must_use]
    pub fn produces(&self, resource_id: &str) -> bool {
        self.outputs.iter().any(|o| o.resource_id == resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mission_defaults() {
        let transform: TransformData = serde_json::from_value(json!({
            "id": "pack.expedition",
            "name": "Expedition",
            "mode": "mission",
            "duration": { "kind": "constant", "value": 60 },
            "entityRequirements": [{
                "entityId": "pack.scout",
                "minStats": { "speed": { "kind": "constant", "value": 3 } }
            }]
        }))
        .unwrap();

        assert_eq!(transform.trigger, TransformTrigger::Manual);
        let requirement = &transform.entity_requirements[0];
        assert_eq!(requirement.count, NumericFormula::constant(1.0));
        assert!(requirement.return_on_completion);
        assert!(requirement.min_stats.contains_key("speed"));
    }

    #[test]
    fn test_duration_requirement() {
        assert!(TransformMode::Batch.requires_duration());
        assert!(TransformMode::Mission.requires_duration());
        assert!(!TransformMode::Instant.requires_duration());
    }
}
