//! Pack data structure combining metadata and every entity collection.

use serde::{Deserialize, Serialize};

use super::achievement_data::AchievementData;
use super::automation_data::AutomationData;
use super::entity_data::EntityData;
use super::generator_data::GeneratorData;
use super::metric_data::MetricData;
use super::prestige_data::PrestigeLayerData;
use super::resource_data::ResourceData;
use super::runtime_event_data::RuntimeEventData;
use super::text::LocalizedText;
use super::transform_data::TransformData;
use super::upgrade_data::UpgradeData;
use super::{ContentEntity, PackModule};

/// Identity and compatibility information of a pack.
///
/// # Example
///
/// ```json
/// {
///     "id": "sample-pack",
///     "title": "Sample Pack",
///     "version": "0.1.0",
///     "engine": "^0.4.0",
///     "dependencies": { "requires": [{ "packId": "core", "version": ">=1.0.0" }] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContentPackMetadata {
    /// Pack id.
    pub id: String,

    /// Display title.
    pub title: LocalizedText,

    /// Short description.
    #[serde(default)]
    pub summary: Option<LocalizedText>,

    /// Pack version, `MAJOR.MINOR.PATCH[-pre]`.
    pub version: String,

    /// Runtime versions the pack targets.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Authors.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Locale of default texts.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Locales with translated variants.
    #[serde(default)]
    pub supported_locales: Vec<String>,

    /// Relations to other packs.
    #[serde(default)]
    pub dependencies: PackDependencies,
}

/// Relations of a pack to other packs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PackDependencies {
    /// Packs that must be loaded first.
    #[serde(default)]
    pub requires: Vec<PackDependency>,

    /// Packs used when present.
    #[serde(default)]
    pub optional: Vec<PackDependency>,

    /// Packs that must not be active alongside this one.
    #[serde(default)]
    pub conflicts: Vec<PackDependency>,

    /// Capability ids this pack provides.
    #[serde(default)]
    pub provides: Vec<String>,
}

/// Reference to another pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PackDependency {
    /// Referenced pack.
    pub pack_id: String,

    /// Acceptable versions. Any when absent.
    #[serde(default)]
    pub version: Option<String>,
}

fn default_engine() -> String {
    "*".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

/// A pack after schema-shape parsing, with defaults applied.
///
/// Built once per validation call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContentPack {
    /// Identity and compatibility information.
    pub metadata: ContentPackMetadata,
    /// Resources.
    pub resources: Vec<ResourceData>,
    /// Generators.
    pub generators: Vec<GeneratorData>,
    /// Upgrades.
    pub upgrades: Vec<UpgradeData>,
    /// Achievements.
    pub achievements: Vec<AchievementData>,
    /// Automations.
    pub automations: Vec<AutomationData>,
    /// Transforms.
    pub transforms: Vec<TransformData>,
    /// Prestige layers.
    pub prestige_layers: Vec<PrestigeLayerData>,
    /// Entities.
    pub entities: Vec<EntityData>,
    /// Metrics.
    pub metrics: Vec<MetricData>,
    /// Runtime event contributions.
    pub runtime_events: Vec<RuntimeEventData>,
}

impl ParsedContentPack {
    /// An empty pack with the given metadata.
    #[must_use]
    pub fn new(metadata: ContentPackMetadata) -> Self {
        Self {
            metadata,
            resources: Vec::new(),
            generators: Vec::new(),
            upgrades: Vec::new(),
            achievements: Vec::new(),
            automations: Vec::new(),
            transforms: Vec::new(),
            prestige_layers: Vec::new(),
            entities: Vec::new(),
            metrics: Vec::new(),
            runtime_events: Vec::new(),
        }
    }

    /// Pack id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Ids of one collection, in document order.
    #[must_use]
    pub fn module_ids(&self, module: PackModule) -> Vec<&str> {
        fn ids<T: ContentEntity>(items: &[T]) -> Vec<&str> {
            items.iter().map(ContentEntity::id).collect()
        }
        match module {
            PackModule::Resources => ids(&self.resources),
            PackModule::Generators => ids(&self.generators),
            PackModule::Upgrades => ids(&self.upgrades),
            PackModule::Achievements => ids(&self.achievements),
            PackModule::Automations => ids(&self.automations),
            PackModule::Transforms => ids(&self.transforms),
            PackModule::PrestigeLayers => ids(&self.prestige_layers),
            PackModule::Entities => ids(&self.entities),
            PackModule::Metrics => ids(&self.metrics),
            PackModule::RuntimeEvents => ids(&self.runtime_events),
        }
    }

    /// Number of entries in one collection.
    #[must_use]
    pub fn module_len(&self, module: PackModule) -> usize {
        match module {
            PackModule::Resources => self.resources.len(),
            PackModule::Generators => self.generators.len(),
            PackModule::Upgrades => self.upgrades.len(),
            PackModule::Achievements => self.achievements.len(),
            PackModule::Automations => self.automations.len(),
            PackModule::Transforms => self.transforms.len(),
            PackModule::PrestigeLayers => self.prestige_layers.len(),
            PackModule::Entities => self.entities.len(),
            PackModule::Metrics => self.metrics.len(),
            PackModule::RuntimeEvents => self.runtime_events.len(),
        }
    }

    /// Find a resource by its ID.
    #[must_use]
    pub fn get_resource(&self, id: &str) -> Option<&ResourceData> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Find an entity by its ID.
    #[must_use]
    pub fn get_entity(&self, id: &str) -> Option<&EntityData> {
        self.entities.iter().find(|e| e.id == id)
    }
}
