//! The three dependency graphs checked for cycles.

use std::collections::{BTreeSet, HashMap};

use crate::data::{Condition, ContentPackMetadata, PackDependency, ParsedContentPack, TransformData};
use crate::diagnostics::{Diagnostics, FieldPath, WarningCode};
use crate::options::KnownPack;
use crate::validation::cycles::{cycle_key, find_cycles, Adjacency, CycleSearch};
use crate::validation::index::EntityIndex;
use crate::validation::references::condition_dependencies;
use crate::version::{Version, VersionRange};

/// Edges producer -> consumer between transforms sharing a resource.
///
/// A transform feeding its own inputs (a catalyst loop) is not an edge.
#[must_use]
pub fn build_transform_graph(pack: &ParsedContentPack) -> Adjacency {
    let mut consumers: HashMap<&str, Vec<&str>> = HashMap::new();
    for transform in &pack.transforms {
        for input in &transform.inputs {
            consumers
                .entry(input.resource_id.as_str())
                .or_default()
                .push(transform.id.as_str());
        }
    }

    let mut adjacency = Adjacency::new();
    for producer in &pack.transforms {
        for output in &producer.outputs {
            let Some(targets) = consumers.get(output.resource_id.as_str()) else {
                continue;
            };
            for consumer in targets {
                if *consumer != producer.id {
                    adjacency
                        .entry(producer.id.clone())
                        .or_default()
                        .insert((*consumer).to_string());
                }
            }
        }
    }
    adjacency
}

/// Report a cycle in the transform resource graph.
pub fn check_transform_cycles(
    pack: &ParsedContentPack,
    transforms: &EntityIndex<'_, TransformData>,
    diagnostics: &mut Diagnostics<'_>,
) {
    let adjacency = build_transform_graph(pack);
    let nodes = pack.transforms.iter().map(|t| t.id.as_str());

    for cycle in find_cycles(&adjacency, nodes, CycleSearch::FirstOnly) {
        let links: Vec<String> = cycle
            .windows(2)
            .map(|pair| {
                let shared = shared_resources(transforms, &pair[0], &pair[1]);
                format!("{} -> {} via {}", pair[0], pair[1], quoted(&shared))
            })
            .collect();
        let position = transforms.position(&cycle[0]).unwrap_or_default();
        diagnostics.error(
            FieldPath::from("transforms").index(position),
            format!(
                "transform dependency cycle detected: {} ({})",
                cycle_key(&cycle),
                links.join("; ")
            ),
        );
    }
}

/// Resources output by `producer` and input by `consumer`.
fn shared_resources(
    transforms: &EntityIndex<'_, TransformData>,
    producer: &str,
    consumer: &str,
) -> BTreeSet<String> {
    let (Some(producer), Some(consumer)) = (transforms.get(producer), transforms.get(consumer)) else {
        return BTreeSet::new();
    };
    let outputs: BTreeSet<&str> = producer
        .entity
        .outputs
        .iter()
        .map(|output| output.resource_id.as_str())
        .collect();
    consumer
        .entity
        .inputs
        .iter()
        .map(|input| input.resource_id.as_str())
        .filter(|resource| outputs.contains(resource))
        .map(ToString::to_string)
        .collect()
}

fn quoted(ids: &BTreeSet<String>) -> String {
    ids.iter()
        .map(|id| format!("'{id}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unlock-dependency graph: edge X -> Y when Y's unlock gating reads X.
#[derive(Debug, Default)]
pub struct UnlockGraph {
    /// Edges.
    pub adjacency: Adjacency,
    /// Every gated or gating entity, in collection order.
    pub nodes: Vec<String>,
    /// First field creating each `(from, to)` edge.
    pub origins: HashMap<(String, String), FieldPath>,
}

impl UnlockGraph {
    fn add_node(&mut self, id: &str) {
        self.nodes.push(id.to_string());
    }

    fn add_condition(&mut self, id: &str, condition: &Condition, origin: FieldPath) {
        for dependency in condition_dependencies(condition) {
            self.adjacency
                .entry(dependency.clone())
                .or_default()
                .insert(id.to_string());
            self.origins
                .entry((dependency, id.to_string()))
                .or_insert_with(|| origin.clone());
        }
    }
}

/// Build the unlock graph over resources, generators, upgrades,
/// achievements, transforms and prestige layers.
#[must_use]
pub fn build_unlock_graph(pack: &ParsedContentPack) -> UnlockGraph {
    let mut graph = UnlockGraph::default();

    for (position, resource) in pack.resources.iter().enumerate() {
        graph.add_node(&resource.id);
        if let Some(condition) = &resource.unlock_condition {
            let origin = FieldPath::from("resources").index(position).key("unlockCondition");
            graph.add_condition(&resource.id, condition, origin);
        }
    }
    for (position, generator) in pack.generators.iter().enumerate() {
        graph.add_node(&generator.id);
        if let Some(condition) = &generator.base_unlock {
            let origin = FieldPath::from("generators").index(position).key("baseUnlock");
            graph.add_condition(&generator.id, condition, origin);
        }
    }
    for (position, upgrade) in pack.upgrades.iter().enumerate() {
        graph.add_node(&upgrade.id);
        let path = FieldPath::from("upgrades").index(position);
        if let Some(condition) = &upgrade.unlock_condition {
            graph.add_condition(&upgrade.id, condition, path.key("unlockCondition"));
        }
        for (index, prerequisite) in upgrade.prerequisites.iter().enumerate() {
            let origin = path.key("prerequisites").index(index);
            graph.add_condition(&upgrade.id, &prerequisite.to_condition(), origin);
        }
    }
    for (position, achievement) in pack.achievements.iter().enumerate() {
        graph.add_node(&achievement.id);
        if let Some(condition) = &achievement.unlock_condition {
            let origin = FieldPath::from("achievements").index(position).key("unlockCondition");
            graph.add_condition(&achievement.id, condition, origin);
        }
    }
    for (position, transform) in pack.transforms.iter().enumerate() {
        graph.add_node(&transform.id);
        if let Some(condition) = &transform.unlock_condition {
            let origin = FieldPath::from("transforms").index(position).key("unlockCondition");
            graph.add_condition(&transform.id, condition, origin);
        }
    }
    for (position, layer) in pack.prestige_layers.iter().enumerate() {
        graph.add_node(&layer.id);
        let origin = FieldPath::from("prestigeLayers").index(position).key("unlockCondition");
        graph.add_condition(&layer.id, &layer.unlock_condition, origin);
    }

    graph
}

/// Report a cycle in the unlock-dependency graph.
pub fn check_unlock_cycles(pack: &ParsedContentPack, diagnostics: &mut Diagnostics<'_>) {
    let graph = build_unlock_graph(pack);
    let nodes = graph.nodes.iter().map(String::as_str);

    for cycle in find_cycles(&graph.adjacency, nodes, CycleSearch::FirstOnly) {
        // Report at the field that created the edge cycle[0] -> cycle[1].
        let path = match cycle.as_slice() {
            [from, to, ..] => graph
                .origins
                .get(&(from.clone(), to.clone()))
                .cloned()
                .unwrap_or_default(),
            _ => FieldPath::root(),
        };
        diagnostics.error(
            path,
            format!("unlock condition cycle detected: {}", cycle_key(&cycle)),
        );
    }
}

/// Check the pack's relations to other packs.
///
/// Self-references are rejected before the dependency graph is built. The
/// graph joins this pack's `requires` with every known pack's own
/// requirements.
pub fn check_pack_dependencies(
    metadata: &ContentPackMetadata,
    known_packs: &[KnownPack],
    active_pack_ids: &[String],
    diagnostics: &mut Diagnostics<'_>,
) {
    let path = FieldPath::from("metadata").key("dependencies");
    let dependencies = &metadata.dependencies;

    for (field, entries) in [
        ("requires", &dependencies.requires),
        ("optional", &dependencies.optional),
        ("conflicts", &dependencies.conflicts),
    ] {
        for (position, dependency) in entries.iter().enumerate() {
            if dependency.pack_id == metadata.id {
                diagnostics.error(
                    path.key(field).index(position).key("packId"),
                    format!("pack '{}' cannot depend on itself", metadata.id),
                );
            }
        }
    }

    let mut adjacency = Adjacency::new();
    let requires: BTreeSet<String> = dependencies
        .requires
        .iter()
        .filter(|dependency| dependency.pack_id != metadata.id)
        .map(|dependency| dependency.pack_id.clone())
        .collect();
    adjacency.insert(metadata.id.clone(), requires);
    for known in known_packs.iter().filter(|known| known.id != metadata.id) {
        adjacency
            .entry(known.id.clone())
            .or_default()
            .extend(known.requires.iter().cloned());
    }
    let nodes = std::iter::once(metadata.id.as_str())
        .chain(known_packs.iter().map(|known| known.id.as_str()));
    for cycle in find_cycles(&adjacency, nodes, CycleSearch::FirstOnly) {
        diagnostics.error(
            path.key("requires"),
            format!("pack dependency cycle detected: {}", cycle_key(&cycle)),
        );
    }

    for (position, dependency) in dependencies.requires.iter().enumerate() {
        if dependency.pack_id == metadata.id {
            continue;
        }
        let entry = path.key("requires").index(position);
        match known_packs.iter().find(|known| known.id == dependency.pack_id) {
            Some(known) => {
                if let Some(message) = version_mismatch(dependency, known) {
                    diagnostics.error(entry.key("version"), message);
                }
            }
            None if !known_packs.is_empty() => diagnostics.warn(
                WarningCode::UnknownDependency,
                entry.key("packId"),
                format!("required pack '{}' is not among the known packs", dependency.pack_id),
            ),
            None => {}
        }
    }

    for (position, conflict) in dependencies.conflicts.iter().enumerate() {
        if conflict.pack_id == metadata.id || !active_pack_ids.contains(&conflict.pack_id) {
            continue;
        }
        let known = known_packs.iter().find(|known| known.id == conflict.pack_id);
        let in_range = known.map_or(true, |known| version_mismatch(conflict, known).is_none());
        if in_range {
            diagnostics.error(
                path.key("conflicts").index(position).key("packId"),
                format!("pack conflicts with active pack '{}'", conflict.pack_id),
            );
        }
    }
}

/// Describe why `known` does not satisfy `dependency`'s version range.
fn version_mismatch(dependency: &PackDependency, known: &KnownPack) -> Option<String> {
    let range: VersionRange = dependency.version.as_deref()?.parse().ok()?;
    match known.version.parse::<Version>() {
        Ok(version) if range.matches(&version) => None,
        Ok(version) => Some(format!(
            "pack '{}' version {version} does not satisfy '{range}'",
            known.id
        )),
        Err(error) => Some(format!("known pack '{}' has {error}", known.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LocalizedText;

    fn metadata(id: &str, requires: &[&str]) -> ContentPackMetadata {
        ContentPackMetadata {
            id: id.to_string(),
            title: LocalizedText::plain(id),
            summary: None,
            version: "1.0.0".to_string(),
            engine: "*".to_string(),
            authors: Vec::new(),
            tags: Vec::new(),
            default_locale: "en-US".to_string(),
            supported_locales: Vec::new(),
            dependencies: crate::data::PackDependencies {
                requires: requires
                    .iter()
                    .map(|id| PackDependency {
                        pack_id: (*id).to_string(),
                        version: None,
                    })
                    .collect(),
                ..Default::default()
            },
        }
    }

    fn known(id: &str, version: &str, requires: &[&str]) -> KnownPack {
        KnownPack {
            id: id.to_string(),
            version: version.to_string(),
            requires: requires.iter().map(ToString::to_string).collect(),
        }
    }

    fn check(metadata: &ContentPackMetadata, known_packs: &[KnownPack]) -> Diagnostics<'static> {
        let mut diagnostics = Diagnostics::new(None);
        check_pack_dependencies(metadata, known_packs, &[], &mut diagnostics);
        diagnostics
    }

    #[test]
    fn test_self_dependency_always_rejected() {
        let diagnostics = check(&metadata("pack", &["pack"]), &[]);
        assert_eq!(diagnostics.issues().len(), 1);
        assert_eq!(
            diagnostics.issues()[0].path.to_string(),
            "metadata.dependencies.requires[0].packId"
        );
    }

    #[test]
    fn test_cycle_through_known_packs() {
        let diagnostics = check(
            &metadata("pack", &["core"]),
            &[known("core", "1.0.0", &["extras"]), known("extras", "1.0.0", &["pack"])],
        );
        assert_eq!(diagnostics.issues().len(), 1);
        assert_eq!(
            diagnostics.issues()[0].message,
            "pack dependency cycle detected: core -> extras -> pack -> core"
        );
    }

    #[test]
    fn test_version_range_checked_against_known_pack() {
        let mut pack = metadata("pack", &["core"]);
        pack.dependencies.requires[0].version = Some("^2.0.0".to_string());
        let diagnostics = check(&pack, &[known("core", "1.4.0", &[])]);
        assert_eq!(
            diagnostics.issues()[0].message,
            "pack 'core' version 1.4.0 does not satisfy '^2.0.0'"
        );
    }

    #[test]
    fn test_unknown_dependency_warns() {
        let diagnostics = check(&metadata("pack", &["missing"]), &[known("core", "1.0.0", &[])]);
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warnings()[0].code, WarningCode::UnknownDependency);
    }

    #[test]
    fn test_active_conflict() {
        let mut pack = metadata("pack", &[]);
        pack.dependencies.conflicts.push(PackDependency {
            pack_id: "legacy".to_string(),
            version: None,
        });
        let mut diagnostics = Diagnostics::new(None);
        check_pack_dependencies(&pack, &[], &["legacy".to_string()], &mut diagnostics);
        assert_eq!(
            diagnostics.issues()[0].path.to_string(),
            "metadata.dependencies.conflicts[0].packId"
        );
    }
}
