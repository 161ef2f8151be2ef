//! Id lookup tables over a parsed pack.
//!
//! Duplicate ids shadow earlier entries (last write wins). The schema pass
//! already reports duplicates, so by the time an index is built on a pack
//! that passed it, ids are unique.

use std::collections::HashMap;

use crate::data::{
    AchievementData, AutomationData, ContentEntity, EntityData, EntityKind, GeneratorData,
    MetricData, ParsedContentPack, PrestigeLayerData, ResourceData, RuntimeEventData,
    TransformData, UpgradeData,
};

/// An entity together with its position in the raw collection.
#[derive(Debug)]
pub struct IndexedEntity<'a, T> {
    /// Position in the collection array.
    pub position: usize,
    /// The entity.
    pub entity: &'a T,
}

impl<T> Clone for IndexedEntity<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IndexedEntity<'_, T> {}

/// Id to entity mapping for one collection.
#[derive(Debug)]
pub struct EntityIndex<'a, T> {
    entries: HashMap<&'a str, IndexedEntity<'a, T>>,
}

impl<'a, T: ContentEntity> EntityIndex<'a, T> {
    /// Index `items` by id.
    #[must_use]
    pub fn build(items: &'a [T]) -> Self {
        let entries = items
            .iter()
            .enumerate()
            .map(|(position, entity)| (entity.id(), IndexedEntity { position, entity }))
            .collect();
        Self { entries }
    }

    /// Look up an id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<IndexedEntity<'a, T>> {
        self.entries.get(id).copied()
    }

    /// Whether an id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Position of an id in the raw collection.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.get(id).map(|entry| entry.position)
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Indexes for every collection of a pack.
#[derive(Debug)]
pub struct PackIndex<'a> {
    /// Resources.
    pub resources: EntityIndex<'a, ResourceData>,
    /// Generators.
    pub generators: EntityIndex<'a, GeneratorData>,
    /// Upgrades.
    pub upgrades: EntityIndex<'a, UpgradeData>,
    /// Achievements.
    pub achievements: EntityIndex<'a, AchievementData>,
    /// Automations.
    pub automations: EntityIndex<'a, AutomationData>,
    /// Transforms.
    pub transforms: EntityIndex<'a, TransformData>,
    /// Prestige layers.
    pub prestige_layers: EntityIndex<'a, PrestigeLayerData>,
    /// Entities.
    pub entities: EntityIndex<'a, EntityData>,
    /// Metrics.
    pub metrics: EntityIndex<'a, MetricData>,
    /// Runtime event contributions.
    pub runtime_events: EntityIndex<'a, RuntimeEventData>,
}

impl<'a> PackIndex<'a> {
    /// Index every collection of `pack`.
    #[must_use]
    pub fn build(pack: &'a ParsedContentPack) -> Self {
        Self {
            resources: EntityIndex::build(&pack.resources),
            generators: EntityIndex::build(&pack.generators),
            upgrades: EntityIndex::build(&pack.upgrades),
            achievements: EntityIndex::build(&pack.achievements),
            automations: EntityIndex::build(&pack.automations),
            transforms: EntityIndex::build(&pack.transforms),
            prestige_layers: EntityIndex::build(&pack.prestige_layers),
            entities: EntityIndex::build(&pack.entities),
            metrics: EntityIndex::build(&pack.metrics),
            runtime_events: EntityIndex::build(&pack.runtime_events),
        }
    }

    /// Whether an entity of `kind` with `id` exists.
    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        match kind {
            EntityKind::Resource => self.resources.contains(id),
            EntityKind::Generator => self.generators.contains(id),
            EntityKind::Upgrade => self.upgrades.contains(id),
            EntityKind::Achievement => self.achievements.contains(id),
            EntityKind::Automation => self.automations.contains(id),
            EntityKind::Transform => self.transforms.contains(id),
            EntityKind::PrestigeLayer => self.prestige_layers.contains(id),
            EntityKind::Entity => self.entities.contains(id),
            EntityKind::Metric => self.metrics.contains(id),
            EntityKind::RuntimeEvent => self.runtime_events.contains(id),
        }
    }
}
