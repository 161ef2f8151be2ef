//! Automation data structures.

use serde::{Deserialize, Serialize};

use super::condition::{Comparator, Condition};
use super::formula::NumericFormula;
use super::generator_data::ResourceRate;
use super::text::LocalizedText;
use super::EntityKind;

/// Data-driven automation definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AutomationData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Description shown to the player.
    #[serde(default)]
    pub description: Option<LocalizedText>,

    /// What kind of thing the automation acts on.
    pub target_type: AutomationTargetType,

    /// Entity acted on, for every target type except `system`.
    #[serde(default)]
    pub target_id: Option<String>,

    /// Runtime system acted on, for the `system` target type.
    #[serde(default)]
    pub system_target_id: Option<String>,

    /// When the automation fires.
    pub trigger: AutomationTrigger,

    /// Resource drained while running.
    #[serde(default)]
    pub resource_cost: Option<ResourceRate>,

    /// Minimum time between firings.
    #[serde(default)]
    pub cooldown: Option<NumericFormula>,

    /// Condition unlocking the automation.
    #[serde(default)]
    pub unlock_condition: Option<Condition>,

    /// Whether the automation starts enabled once unlocked.
    #[serde(default)]
    pub enabled_by_default: bool,

    /// Sort key for display.
    #[serde(default)]
    pub order: Option<f64>,
}

/// What an automation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutomationTargetType {
    /// Toggles a generator.
    Generator,
    /// Buys an upgrade.
    Upgrade,
    /// Buys generator levels.
    PurchaseGenerator,
    /// Collects a resource.
    CollectResource,
    /// Drives a runtime system named by `systemTargetId`.
    System,
}

impl AutomationTargetType {
    /// Kind of entity `targetId` must name, or `None` for `system`.
    #[must_use]
    pub const fn target_kind(self) -> Option<EntityKind> {
        match self {
            Self::Generator | Self::PurchaseGenerator => Some(EntityKind::Generator),
            Self::Upgrade => Some(EntityKind::Upgrade),
            Self::CollectResource => Some(EntityKind::Resource),
            Self::System => None,
        }
    }
}

/// When an automation fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum AutomationTrigger {
    /// Fixed period.
    Interval {
        /// Seconds between firings.
        interval: NumericFormula,
    },
    /// A resource crosses a threshold.
    ResourceThreshold {
        /// Resource read.
        resource_id: String,
        /// Comparison.
        #[serde(default)]
        comparator: Comparator,
        /// Threshold.
        threshold: NumericFormula,
    },
    /// The runtime command queue drains.
    CommandQueueEmpty,
    /// A runtime event is published.
    Event {
        /// Event id.
        event_id: String,
    },
}
