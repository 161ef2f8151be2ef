//! Data structures for content-pack definitions.
//!
//! This module contains pure data structures describing one pack's economy:
//! resources, generators, upgrades, achievements, automations, transforms,
//! prestige layers, entities, metrics and runtime events. All structs are
//! designed to be deserialized from JSON or RON documents.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `content_tools`.

use std::fmt;

use serde::{Deserialize, Serialize};

mod achievement_data;
mod automation_data;
mod condition;
mod entity_data;
mod formula;
mod generator_data;
mod metric_data;
mod pack_data;
mod prestige_data;
mod resource_data;
mod runtime_event_data;
mod text;
mod transform_data;
mod upgrade_data;

pub use achievement_data::{
    AchievementData, AchievementProgress, AchievementReward, AchievementTrack, ProgressMode,
};
pub use automation_data::{AutomationData, AutomationTargetType, AutomationTrigger};
pub use condition::{Comparator, Condition};
pub use entity_data::{EntityData, EntityProgression, EntityStat};
pub use formula::{
    BinaryOperator, EntityReference, ExpressionNode, NumericFormula, PiecewiseSegment, RefTarget,
    UnaryOperator, VariableName,
};
pub use generator_data::{GeneratorData, GeneratorPurchase, ResourceRate};
pub use metric_data::{MetricData, MetricKind, MetricSource};
pub use pack_data::{ContentPackMetadata, PackDependencies, PackDependency, ParsedContentPack};
pub use prestige_data::{PrestigeLayerData, PrestigeRetention, PrestigeReward};
pub use resource_data::ResourceData;
pub use runtime_event_data::{EmitterSource, EventEmitter, EventPayload, RuntimeEventData};
pub use text::LocalizedText;
pub use transform_data::{
    EntityRequirement, ResourceAmount, TransformData, TransformMode, TransformTrigger,
};
pub use upgrade_data::{
    EffectOperation, RepeatableCost, UpgradeCost, UpgradeData, UpgradeEffect,
    UpgradePrerequisite, UpgradeTarget,
};

/// The kind of entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Entry of `resources`.
    Resource,
    /// Entry of `generators`.
    Generator,
    /// Entry of `upgrades`.
    Upgrade,
    /// Entry of `achievements`.
    Achievement,
    /// Entry of `automations`.
    Automation,
    /// Entry of `transforms`.
    Transform,
    /// Entry of `prestigeLayers`.
    PrestigeLayer,
    /// Entry of `entities`.
    Entity,
    /// Entry of `metrics`.
    Metric,
    /// Entry of `runtimeEvents`.
    RuntimeEvent,
}

impl EntityKind {
    /// Lowercase label used in diagnostics ("unknown resource '...'").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Generator => "generator",
            Self::Upgrade => "upgrade",
            Self::Achievement => "achievement",
            Self::Automation => "automation",
            Self::Transform => "transform",
            Self::PrestigeLayer => "prestige layer",
            Self::Entity => "entity",
            Self::Metric => "metric",
            Self::RuntimeEvent => "runtime event",
        }
    }

    /// Collection holding entities of this kind.
    #[must_use]
    pub const fn module(self) -> PackModule {
        match self {
            Self::Resource => PackModule::Resources,
            Self::Generator => PackModule::Generators,
            Self::Upgrade => PackModule::Upgrades,
            Self::Achievement => PackModule::Achievements,
            Self::Automation => PackModule::Automations,
            Self::Transform => PackModule::Transforms,
            Self::PrestigeLayer => PackModule::PrestigeLayers,
            Self::Entity => PackModule::Entities,
            Self::Metric => PackModule::Metrics,
            Self::RuntimeEvent => PackModule::RuntimeEvents,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entity collection of a pack, named by its document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PackModule {
    /// `resources`
    Resources,
    /// `generators`
    Generators,
    /// `upgrades`
    Upgrades,
    /// `achievements`
    Achievements,
    /// `automations`
    Automations,
    /// `transforms`
    Transforms,
    /// `prestigeLayers`
    PrestigeLayers,
    /// `entities`
    Entities,
    /// `metrics`
    Metrics,
    /// `runtimeEvents`
    RuntimeEvents,
}

impl PackModule {
    /// Every collection, in document order.
    pub const ALL: [Self; 10] = [
        Self::Resources,
        Self::Generators,
        Self::Upgrades,
        Self::Achievements,
        Self::Automations,
        Self::Transforms,
        Self::PrestigeLayers,
        Self::Entities,
        Self::Metrics,
        Self::RuntimeEvents,
    ];

    /// Document key of the collection.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Generators => "generators",
            Self::Upgrades => "upgrades",
            Self::Achievements => "achievements",
            Self::Automations => "automations",
            Self::Transforms => "transforms",
            Self::PrestigeLayers => "prestigeLayers",
            Self::Entities => "entities",
            Self::Metrics => "metrics",
            Self::RuntimeEvents => "runtimeEvents",
        }
    }

    /// Look up a collection by document key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|module| module.key() == key)
    }
}

impl fmt::Display for PackModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Common view over every collection entry.
pub trait ContentEntity {
    /// Kind of entity stored in this collection.
    const KIND: EntityKind;

    /// Unique id within the collection.
    fn id(&self) -> &str;

    /// Display name, when the entity has one.
    fn display_name(&self) -> Option<&LocalizedText> {
        None
    }
}

macro_rules! content_entity {
    ($ty:ty, $kind:ident) => {
        impl ContentEntity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn display_name(&self) -> Option<&LocalizedText> {
                Some(&self.name)
            }
        }
    };
    ($ty:ty, $kind:ident, unnamed) => {
        impl ContentEntity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

content_entity!(ResourceData, Resource);
content_entity!(GeneratorData, Generator);
content_entity!(UpgradeData, Upgrade);
content_entity!(AchievementData, Achievement);
content_entity!(AutomationData, Automation);
content_entity!(TransformData, Transform);
content_entity!(PrestigeLayerData, PrestigeLayer);
content_entity!(EntityData, Entity);
content_entity!(MetricData, Metric);
content_entity!(RuntimeEventData, RuntimeEvent, unnamed);

/// Default for `true`-valued flags.
pub(crate) const fn default_true() -> bool {
    true
}
