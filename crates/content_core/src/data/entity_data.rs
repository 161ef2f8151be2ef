//! Entity data structures: typed units with stats (workers, explorers).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::formula::NumericFormula;
use super::text::LocalizedText;

/// Data-driven entity definition.
///
/// # Example
///
/// ```json
/// {
///     "id": "sample-pack.scout",
///     "name": "Scout",
///     "stats": [
///         { "id": "speed", "name": "Speed", "baseValue": { "kind": "constant", "value": 2 } }
///     ],
///     "maxCount": { "kind": "constant", "value": 5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Description shown to the player.
    #[serde(default)]
    pub description: Option<LocalizedText>,

    /// Stats every instance carries.
    #[serde(default)]
    pub stats: Vec<EntityStat>,

    /// Cap on owned instances.
    #[serde(default)]
    pub max_count: Option<NumericFormula>,

    /// Instances owned at the start of a run.
    #[serde(default)]
    pub start_count: u32,

    /// Whether the runtime tracks instances individually.
    #[serde(default)]
    pub track_instances: bool,

    /// Levelling parameters.
    #[serde(default)]
    pub progression: Option<EntityProgression>,

    /// Condition unlocking the entity.
    #[serde(default)]
    pub unlock_condition: Option<Condition>,

    /// Condition revealing the entity.
    #[serde(default)]
    pub visibility_condition: Option<Condition>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A stat carried by an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityStat {
    /// Stat id, unique within the entity.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Value at level zero.
    pub base_value: NumericFormula,

    /// Floor.
    #[serde(default)]
    pub min_value: Option<NumericFormula>,

    /// Ceiling.
    #[serde(default)]
    pub max_value: Option<NumericFormula>,
}

/// Levelling parameters of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityProgression {
    /// Resource accumulated as experience.
    #[serde(default)]
    pub experience_resource: Option<String>,

    /// Experience needed per level.
    pub level_formula: NumericFormula,

    /// Level cap.
    #[serde(default)]
    pub max_level: Option<u32>,

    /// Stat growth per level, keyed by stat id.
    #[serde(default)]
    pub stat_growth: BTreeMap<String, NumericFormula>,
}

impl EntityData {
    /// Find a stat by its id.
    #[must_use]
    pub fn get_stat(&self, stat_id: &str) -> Option<&EntityStat> {
        self.stats.iter().find(|s| s.id == stat_id)
    }

    /// Check if this entity has the specified tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
