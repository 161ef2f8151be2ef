//! Frozen, digest-stamped output of a successful validation.
//!
//! Every collection becomes a [`FrozenCollection`]: one shared allocation per
//! entity, viewed as an ordered slice, an id lookup map and an id-sorted
//! record map. Nothing here can be mutated once built, and cloning a
//! normalized pack only bumps reference counts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::data::{
    AchievementData, AutomationData, ContentEntity, ContentPackMetadata, EntityData,
    GeneratorData, MetricData, PackModule, ParsedContentPack, PrestigeLayerData, ResourceData,
    RuntimeEventData, TransformData, UpgradeData,
};
use crate::digest::{compute_digest, PackDigest, PackShape};

/// Immutable collection with three views over the same entities.
#[derive(Debug)]
pub struct FrozenCollection<T> {
    items: Arc<[Arc<T>]>,
    by_id: HashMap<String, Arc<T>>,
    records: BTreeMap<String, Arc<T>>,
}

impl<T> Clone for FrozenCollection<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            by_id: self.by_id.clone(),
            records: self.records.clone(),
        }
    }
}

impl<T: ContentEntity> FrozenCollection<T> {
    /// Freeze `items`, keeping their order.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let items: Arc<[Arc<T>]> = items.into_iter().map(Arc::new).collect();
        let by_id: HashMap<String, Arc<T>> = items
            .iter()
            .map(|item| (item.id().to_string(), Arc::clone(item)))
            .collect();
        let records = by_id
            .iter()
            .map(|(id, item)| (id.clone(), Arc::clone(item)))
            .collect();
        Self {
            items,
            by_id,
            records,
        }
    }

    /// Ids in document order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id()).collect()
    }
}

impl<T> FrozenCollection<T> {
    /// Entities in document order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(AsRef::as_ref)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an entity by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(AsRef::as_ref)
    }

    /// Ordered view.
    #[must_use]
    pub fn as_slice(&self) -> &[Arc<T>] {
        &self.items
    }

    /// Id lookup view.
    #[must_use]
    pub fn by_id(&self) -> &HashMap<String, Arc<T>> {
        &self.by_id
    }

    /// Id-sorted record view.
    #[must_use]
    pub fn records(&self) -> &BTreeMap<String, Arc<T>> {
        &self.records
    }
}

impl<T: Serialize> Serialize for FrozenCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in self.items.iter() {
            seq.serialize_element(item.as_ref())?;
        }
        seq.end()
    }
}

/// A validated content pack.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedContentPack {
    metadata: Arc<ContentPackMetadata>,
    resources: FrozenCollection<ResourceData>,
    generators: FrozenCollection<GeneratorData>,
    upgrades: FrozenCollection<UpgradeData>,
    achievements: FrozenCollection<AchievementData>,
    automations: FrozenCollection<AutomationData>,
    transforms: FrozenCollection<TransformData>,
    prestige_layers: FrozenCollection<PrestigeLayerData>,
    entities: FrozenCollection<EntityData>,
    metrics: FrozenCollection<MetricData>,
    runtime_events: FrozenCollection<RuntimeEventData>,
    digest: PackDigest,
}

impl NormalizedContentPack {
    /// Pack metadata.
    #[must_use]
    pub fn metadata(&self) -> &ContentPackMetadata {
        &self.metadata
    }

    /// Pack id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Id-shape digest.
    #[must_use]
    pub const fn digest(&self) -> PackDigest {
        self.digest
    }

    /// Resources.
    #[must_use]
    pub const fn resources(&self) -> &FrozenCollection<ResourceData> {
        &self.resources
    }

    /// Generators.
    #[must_use]
    pub const fn generators(&self) -> &FrozenCollection<GeneratorData> {
        &self.generators
    }

    /// Upgrades.
    #[must_use]
    pub const fn upgrades(&self) -> &FrozenCollection<UpgradeData> {
        &self.upgrades
    }

    /// Achievements.
    #[must_use]
    pub const fn achievements(&self) -> &FrozenCollection<AchievementData> {
        &self.achievements
    }

    /// Automations.
    #[must_use]
    pub const fn automations(&self) -> &FrozenCollection<AutomationData> {
        &self.automations
    }

    /// Transforms.
    #[must_use]
    pub const fn transforms(&self) -> &FrozenCollection<TransformData> {
        &self.transforms
    }

    /// Prestige layers.
    #[must_use]
    pub const fn prestige_layers(&self) -> &FrozenCollection<PrestigeLayerData> {
        &self.prestige_layers
    }

    /// Entities.
    #[must_use]
    pub const fn entities(&self) -> &FrozenCollection<EntityData> {
        &self.entities
    }

    /// Metrics.
    #[must_use]
    pub const fn metrics(&self) -> &FrozenCollection<MetricData> {
        &self.metrics
    }

    /// Runtime event contributions.
    #[must_use]
    pub const fn runtime_events(&self) -> &FrozenCollection<RuntimeEventData> {
        &self.runtime_events
    }
}

impl PackShape for NormalizedContentPack {
    fn pack_id(&self) -> &str {
        &self.metadata.id
    }

    fn pack_version(&self) -> &str {
        &self.metadata.version
    }

    fn module_ids(&self, module: PackModule) -> Vec<&str> {
        match module {
            PackModule::Resources => self.resources.ids(),
            PackModule::Generators => self.generators.ids(),
            PackModule::Upgrades => self.upgrades.ids(),
            PackModule::Achievements => self.achievements.ids(),
            PackModule::Automations => self.automations.ids(),
            PackModule::Transforms => self.transforms.ids(),
            PackModule::PrestigeLayers => self.prestige_layers.ids(),
            PackModule::Entities => self.entities.ids(),
            PackModule::Metrics => self.metrics.ids(),
            PackModule::RuntimeEvents => self.runtime_events.ids(),
        }
    }
}

/// Freeze a pack that passed validation and stamp its digest.
#[must_use]
pub fn normalize(pack: ParsedContentPack) -> NormalizedContentPack {
    let digest = compute_digest(&pack);
    NormalizedContentPack {
        metadata: Arc::new(pack.metadata),
        resources: FrozenCollection::new(pack.resources),
        generators: FrozenCollection::new(pack.generators),
        upgrades: FrozenCollection::new(pack.upgrades),
        achievements: FrozenCollection::new(pack.achievements),
        automations: FrozenCollection::new(pack.automations),
        transforms: FrozenCollection::new(pack.transforms),
        prestige_layers: FrozenCollection::new(pack.prestige_layers),
        entities: FrozenCollection::new(pack.entities),
        metrics: FrozenCollection::new(pack.metrics),
        runtime_events: FrozenCollection::new(pack.runtime_events),
        digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::schema::parse_content_pack;
    use content_test_utils::fixtures;

    fn normalized_sample() -> NormalizedContentPack {
        let mut diagnostics = Diagnostics::new(None);
        let pack = parse_content_pack(&fixtures::sample_pack(), &mut diagnostics).unwrap();
        normalize(pack)
    }

    #[test]
    fn test_views_agree() {
        let pack = normalized_sample();
        let resources = pack.resources();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources.ids(), vec!["sample-pack.energy", "sample-pack.crystal"]);
        assert_eq!(resources.by_id().len(), 2);
        assert_eq!(
            resources.records().keys().collect::<Vec<_>>(),
            vec!["sample-pack.crystal", "sample-pack.energy"]
        );

        let energy = resources.get("sample-pack.energy").unwrap();
        assert!(Arc::ptr_eq(
            &resources.as_slice()[0],
            &resources.records()["sample-pack.energy"]
        ));
        assert!((energy.start_amount - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_digest_matches_parsed_shape() {
        let mut diagnostics = Diagnostics::new(None);
        let parsed = parse_content_pack(&fixtures::sample_pack(), &mut diagnostics).unwrap();
        let expected = compute_digest(&parsed);
        let pack = normalize(parsed);
        assert_eq!(pack.digest(), expected);
        assert_eq!(compute_digest(&pack), expected);
    }

    #[test]
    fn test_serializes_collections_in_order() {
        let pack = normalized_sample();
        let json = serde_json::to_value(&pack).unwrap();
        assert_eq!(json["resources"][0]["id"], "sample-pack.energy");
        assert_eq!(json["generators"].as_array().unwrap().len(), 2);
        assert_eq!(json["digest"], pack.digest().to_string());
        assert!(json["prestigeLayers"].as_array().unwrap().is_empty());
    }
}
