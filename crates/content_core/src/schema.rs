//! Schema-shape parse: raw document to [`ParsedContentPack`].
//!
//! Each collection entry is deserialized on its own so one malformed entry
//! does not hide problems in the others. Shape errors are reported at the
//! offending field inside the entry, not just at `[collection, index]`. Entries that parse are then
//! checked for the structural rules serde cannot express (id shape,
//! duplicate ids, mode-dependent fields).

use std::collections::{BTreeSet, HashMap};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use serde_path_to_error::Segment;

use crate::data::{
    AutomationTargetType, ContentEntity, ContentPackMetadata, LocalizedText, PackDependency,
    PackModule, ParsedContentPack, TransformMode,
};
use crate::diagnostics::{Diagnostics, FieldPath, WarningCode};
use crate::ids::is_valid_content_id;
use crate::version::{Version, VersionRange};

/// Parse `raw` into a pack, applying defaults.
///
/// Returns `None` when the document's shape is wrong; the reasons are in
/// `diagnostics`. A returned pack may still carry structural issues, which
/// are also recorded in `diagnostics`.
pub fn parse_content_pack(raw: &Value, diagnostics: &mut Diagnostics<'_>) -> Option<ParsedContentPack> {
    let Some(object) = raw.as_object() else {
        diagnostics.error(FieldPath::root(), "content pack must be an object");
        return None;
    };
    let issues_before = diagnostics.issues().len();

    for key in object.keys() {
        if key != "metadata" && PackModule::from_key(key).is_none() {
            diagnostics.error(FieldPath::from(key.as_str()), format!("unknown property '{key}'"));
        }
    }

    let metadata = match object.get("metadata") {
        Some(value) => deserialize_at::<ContentPackMetadata>(value, FieldPath::from("metadata"), diagnostics),
        None => {
            diagnostics.error(FieldPath::root(), "missing required property 'metadata'");
            None
        }
    };

    let resources = parse_collection(object, PackModule::Resources, diagnostics);
    let generators = parse_collection(object, PackModule::Generators, diagnostics);
    let upgrades = parse_collection(object, PackModule::Upgrades, diagnostics);
    let achievements = parse_collection(object, PackModule::Achievements, diagnostics);
    let automations = parse_collection(object, PackModule::Automations, diagnostics);
    let transforms = parse_collection(object, PackModule::Transforms, diagnostics);
    let prestige_layers = parse_collection(object, PackModule::PrestigeLayers, diagnostics);
    let entities = parse_collection(object, PackModule::Entities, diagnostics);
    let metrics = parse_collection(object, PackModule::Metrics, diagnostics);
    let runtime_events = parse_collection(object, PackModule::RuntimeEvents, diagnostics);

    let metadata = metadata?;
    if diagnostics.issues().len() > issues_before {
        return None;
    }

    let pack = ParsedContentPack {
        metadata,
        resources,
        generators,
        upgrades,
        achievements,
        automations,
        transforms,
        prestige_layers,
        entities,
        metrics,
        runtime_events,
    };
    check_structure(&pack, diagnostics);
    Some(pack)
}

fn parse_collection<T: DeserializeOwned>(
    object: &Map<String, Value>,
    module: PackModule,
    diagnostics: &mut Diagnostics<'_>,
) -> Vec<T> {
    let path = FieldPath::from(module.key());
    let Some(value) = object.get(module.key()) else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        diagnostics.error(path, format!("'{module}' must be an array"));
        return Vec::new();
    };

    let mut items = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        if let Some(item) = deserialize_at(entry, path.index(position), diagnostics) {
            items.push(item);
        }
    }
    items
}

/// Deserialize `value`, reporting a failure at the deepest field serde
/// reached below `path`.
fn deserialize_at<T: DeserializeOwned>(
    value: &Value,
    path: FieldPath,
    diagnostics: &mut Diagnostics<'_>,
) -> Option<T> {
    match serde_path_to_error::deserialize(value) {
        Ok(item) => Some(item),
        Err(error) => {
            let at = error.path().iter().fold(path, |at, segment| match segment {
                Segment::Seq { index } => at.index(*index),
                Segment::Map { key } => at.key(key.as_str()),
                // Tag values and unrecognized keys are not positions in the document.
                _ => at,
            });
            diagnostics.error(at, error.into_inner().to_string());
            None
        }
    }
}

fn check_structure(pack: &ParsedContentPack, diagnostics: &mut Diagnostics<'_>) {
    check_metadata(&pack.metadata, diagnostics);

    check_ids(PackModule::Resources, &pack.resources, diagnostics);
    check_ids(PackModule::Generators, &pack.generators, diagnostics);
    check_ids(PackModule::Upgrades, &pack.upgrades, diagnostics);
    check_ids(PackModule::Achievements, &pack.achievements, diagnostics);
    check_ids(PackModule::Automations, &pack.automations, diagnostics);
    check_ids(PackModule::Transforms, &pack.transforms, diagnostics);
    check_ids(PackModule::PrestigeLayers, &pack.prestige_layers, diagnostics);
    check_ids(PackModule::Entities, &pack.entities, diagnostics);
    check_ids(PackModule::Metrics, &pack.metrics, diagnostics);
    check_ids(PackModule::RuntimeEvents, &pack.runtime_events, diagnostics);

    for (position, resource) in pack.resources.iter().enumerate() {
        let path = FieldPath::from("resources").index(position);
        if resource.start_amount < 0.0 {
            diagnostics.error(
                path.key("startAmount"),
                format!(
                    "resource '{}' has negative startAmount {}",
                    resource.id, resource.start_amount
                ),
            );
        }
        if !resource.capacity_admits_start() {
            diagnostics.error(
                path.key("capacity"),
                format!(
                    "resource '{}' capacity is below its startAmount {}",
                    resource.id, resource.start_amount
                ),
            );
        }
    }

    for (position, automation) in pack.automations.iter().enumerate() {
        let path = FieldPath::from("automations").index(position);
        if automation.target_type == AutomationTargetType::System {
            if automation.system_target_id.is_none() {
                diagnostics.error(
                    path.key("systemTargetId"),
                    format!("system automation '{}' requires systemTargetId", automation.id),
                );
            }
        } else if automation.target_id.is_none() {
            diagnostics.error(
                path.key("targetId"),
                format!("automation '{}' requires targetId", automation.id),
            );
        }
    }

    for (position, transform) in pack.transforms.iter().enumerate() {
        let path = FieldPath::from("transforms").index(position);
        if transform.mode.requires_duration() && transform.duration.is_none() {
            diagnostics.error(
                path.key("duration"),
                format!("transform '{}' requires a duration", transform.id),
            );
        }
        match (transform.mode, transform.entity_requirements.is_empty()) {
            (TransformMode::Mission, true) => diagnostics.error(
                path.key("entityRequirements"),
                format!("mission transform '{}' requires entityRequirements", transform.id),
            ),
            (TransformMode::Instant | TransformMode::Continuous | TransformMode::Batch, false) => {
                diagnostics.error(
                    path.key("entityRequirements"),
                    format!(
                        "transform '{}' declares entityRequirements but is not a mission",
                        transform.id
                    ),
                );
            }
            _ => {}
        }
    }

    for (position, entity) in pack.entities.iter().enumerate() {
        let mut seen = BTreeSet::new();
        for (stat_position, stat) in entity.stats.iter().enumerate() {
            if !seen.insert(stat.id.as_str()) {
                diagnostics.error(
                    FieldPath::from("entities")
                        .index(position)
                        .key("stats")
                        .index(stat_position)
                        .key("id"),
                    format!("entity '{}' declares stat '{}' twice", entity.id, stat.id),
                );
            }
        }
    }

    check_locales(pack, diagnostics);
}

fn check_metadata(metadata: &ContentPackMetadata, diagnostics: &mut Diagnostics<'_>) {
    let path = FieldPath::from("metadata");
    if !is_valid_content_id(&metadata.id) {
        diagnostics.error(path.key("id"), format!("invalid pack id '{}'", metadata.id));
    }
    if let Err(error) = metadata.version.parse::<Version>() {
        diagnostics.error(path.key("version"), error.to_string());
    }
    if let Err(error) = metadata.engine.parse::<VersionRange>() {
        diagnostics.error(path.key("engine"), error.to_string());
    }

    let dependencies = path.key("dependencies");
    for (field, entries) in [
        ("requires", &metadata.dependencies.requires),
        ("optional", &metadata.dependencies.optional),
        ("conflicts", &metadata.dependencies.conflicts),
    ] {
        check_dependency_list(&dependencies.key(field), entries, diagnostics);
    }
}

fn check_dependency_list(path: &FieldPath, entries: &[PackDependency], diagnostics: &mut Diagnostics<'_>) {
    for (position, dependency) in entries.iter().enumerate() {
        let entry = path.index(position);
        if !is_valid_content_id(&dependency.pack_id) {
            diagnostics.error(
                entry.key("packId"),
                format!("invalid pack id '{}'", dependency.pack_id),
            );
        }
        if let Some(range) = &dependency.version {
            if let Err(error) = range.parse::<VersionRange>() {
                diagnostics.error(entry.key("version"), error.to_string());
            }
        }
    }
}

/// Report malformed ids and ids repeated within one collection.
fn check_ids<T: ContentEntity>(module: PackModule, items: &[T], diagnostics: &mut Diagnostics<'_>) {
    let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let id = item.id();
        let path = FieldPath::from(module.key()).index(position).key("id");
        if !is_valid_content_id(id) {
            diagnostics.error(path.clone(), format!("invalid {} id '{id}'", T::KIND));
        }
        if let Some(first) = first_seen.get(id) {
            diagnostics.error(
                path,
                format!("duplicate {} id '{id}' (first declared at {module}[{first}])", T::KIND),
            );
        } else {
            first_seen.insert(id, position);
        }
    }
}

fn check_locales(pack: &ParsedContentPack, diagnostics: &mut Diagnostics<'_>) {
    let metadata = &pack.metadata;
    let supported: BTreeSet<&str> = metadata
        .supported_locales
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(metadata.default_locale.as_str()))
        .collect();

    let mut check = |text: &LocalizedText, path: FieldPath| {
        for locale in text.variants.keys() {
            if !supported.contains(locale.as_str()) {
                diagnostics.warn(
                    WarningCode::UnsupportedLocale,
                    path.key("variants").key(locale.as_str()),
                    format!("locale '{locale}' is not listed in supportedLocales"),
                );
            }
        }
    };

    check(&metadata.title, FieldPath::from("metadata").key("title"));
    if let Some(summary) = &metadata.summary {
        check(summary, FieldPath::from("metadata").key("summary"));
    }

    let named = [
        (PackModule::Resources, names(&pack.resources).collect::<Vec<_>>()),
        (PackModule::Generators, names(&pack.generators).collect()),
        (PackModule::Upgrades, names(&pack.upgrades).collect()),
        (PackModule::Achievements, names(&pack.achievements).collect()),
        (PackModule::Automations, names(&pack.automations).collect()),
        (PackModule::Transforms, names(&pack.transforms).collect()),
        (PackModule::PrestigeLayers, names(&pack.prestige_layers).collect()),
        (PackModule::Entities, names(&pack.entities).collect()),
        (PackModule::Metrics, names(&pack.metrics).collect()),
    ];
    for (module, entries) in named {
        for (position, name) in entries {
            check(name, FieldPath::from(module.key()).index(position).key("name"));
        }
    }
}

fn names<T: ContentEntity>(items: &[T]) -> impl Iterator<Item = (usize, &LocalizedText)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| item.display_name().map(|name| (position, name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_test_utils::fixtures;
    use serde_json::json;

    fn parse(raw: &Value) -> (Option<ParsedContentPack>, Diagnostics<'static>) {
        let mut diagnostics = Diagnostics::new(None);
        let pack = parse_content_pack(raw, &mut diagnostics);
        (pack, diagnostics)
    }

    fn paths(diagnostics: &Diagnostics<'_>) -> Vec<String> {
        diagnostics
            .issues()
            .iter()
            .map(|issue| issue.path.to_string())
            .collect()
    }

    #[test]
    fn test_sample_pack_parses_cleanly() {
        let (pack, diagnostics) = parse(&fixtures::sample_pack());
        let pack = pack.unwrap();
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.issues());
        assert!(diagnostics.warnings().is_empty());
        assert_eq!(pack.resources.len(), 2);
        assert_eq!(pack.generators.len(), 2);
        assert_eq!(pack.metadata.engine, "*");
    }

    #[test]
    fn test_shape_errors_keep_entry_positions() {
        let mut raw = fixtures::sample_pack();
        raw["resources"][1] = json!({ "id": "sample-pack.crystal" });
        raw["generators"][0]["purchase"] = json!("free");

        let (pack, diagnostics) = parse(&raw);
        assert!(pack.is_none());
        assert_eq!(paths(&diagnostics), vec!["resources[1]", "generators[0].purchase"]);
        assert!(diagnostics.issues()[0].message.contains("name"));
    }

    #[test]
    fn test_shape_errors_point_at_the_field() {
        let mut raw = fixtures::sample_pack();
        raw["metadata"]["version"] = json!(5);
        raw["generators"][0]["produces"][0]["rate"] = json!("fast");
        raw["generators"][1]["consumes"][0]["rate"] = json!({ "kind": "piecewise", "pieces": [] });

        let (pack, diagnostics) = parse(&raw);
        assert!(pack.is_none());
        assert_eq!(
            paths(&diagnostics),
            vec![
                "metadata.version",
                "generators[0].produces[0].rate",
                "generators[1].consumes[0].rate",
            ]
        );
        assert!(diagnostics.issues()[1].message.contains("fast"));
    }

    #[test]
    fn test_misspelled_entry_field_rejected() {
        let mut raw = fixtures::sample_pack();
        let condition = raw["resources"][1]
            .as_object_mut()
            .unwrap()
            .remove("unlockCondition")
            .unwrap();
        raw["resources"][1]["unlockConditon"] = condition;

        let (pack, diagnostics) = parse(&raw);
        assert!(pack.is_none());
        assert_eq!(diagnostics.issues().len(), 1);
        assert!(diagnostics.issues()[0].path.to_string().starts_with("resources[1]"));
        assert!(diagnostics.issues()[0].message.contains("unlockConditon"));
    }

    #[test]
    fn test_misspelled_nested_field_rejected() {
        let mut raw = fixtures::sample_pack();
        raw["generators"][0]["purchase"]["currencyID"] = json!("sample-pack.nonexistent");

        let (pack, diagnostics) = parse(&raw);
        assert!(pack.is_none());
        assert!(diagnostics.issues()[0]
            .path
            .to_string()
            .starts_with("generators[0].purchase"));
        assert!(diagnostics.issues()[0].message.contains("currencyID"));
    }

    #[test]
    fn test_unknown_top_level_property() {
        let mut raw = fixtures::sample_pack();
        raw["buildings"] = json!([]);
        let (pack, diagnostics) = parse(&raw);
        assert!(pack.is_none());
        assert_eq!(paths(&diagnostics), vec!["buildings"]);
    }

    #[test]
    fn test_missing_metadata() {
        let (pack, diagnostics) = parse(&json!({ "resources": [] }));
        assert!(pack.is_none());
        assert_eq!(
            diagnostics.issues()[0].message,
            "missing required property 'metadata'"
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut raw = fixtures::sample_pack();
        raw["resources"][1]["id"] = json!("sample-pack.energy");
        let (pack, diagnostics) = parse(&raw);
        assert!(pack.is_some());
        assert_eq!(paths(&diagnostics), vec!["resources[1].id"]);
        assert!(diagnostics.issues()[0].message.contains("duplicate resource id"));
    }

    #[test]
    fn test_invalid_id_shape() {
        let mut raw = fixtures::sample_pack();
        raw["generators"][1]["id"] = json!("Sample Pack.Harvester");
        let (_, diagnostics) = parse(&raw);
        assert_eq!(paths(&diagnostics), vec!["generators[1].id"]);
    }

    #[test]
    fn test_resource_amount_rules() {
        let mut raw = fixtures::sample_pack();
        raw["resources"][0]["capacity"] = json!(5);
        raw["resources"][1]["startAmount"] = json!(-1);
        let (_, diagnostics) = parse(&raw);
        assert_eq!(
            paths(&diagnostics),
            vec!["resources[0].capacity", "resources[1].startAmount"]
        );
    }

    #[test]
    fn test_transform_mode_rules() {
        let mut raw = fixtures::sample_pack();
        raw["transforms"] = json!([
            {
                "id": "sample-pack.condense",
                "name": "Condense",
                "mode": "batch",
                "inputs": [{ "resourceId": "sample-pack.energy", "amount": { "kind": "constant", "value": 5 } }],
                "outputs": [{ "resourceId": "sample-pack.crystal", "amount": { "kind": "constant", "value": 1 } }]
            },
            {
                "id": "sample-pack.expedition",
                "name": "Expedition",
                "mode": "mission",
                "duration": { "kind": "constant", "value": 60 }
            }
        ]);
        let (_, diagnostics) = parse(&raw);
        assert_eq!(
            paths(&diagnostics),
            vec!["transforms[0].duration", "transforms[1].entityRequirements"]
        );
    }

    #[test]
    fn test_automation_target_required() {
        let mut raw = fixtures::sample_pack();
        raw["automations"] = json!([{
            "id": "sample-pack.auto-reactor",
            "name": "Auto Reactor",
            "targetType": "purchaseGenerator",
            "trigger": { "kind": "interval", "interval": { "kind": "constant", "value": 10 } }
        }]);
        let (_, diagnostics) = parse(&raw);
        assert_eq!(paths(&diagnostics), vec!["automations[0].targetId"]);
    }

    #[test]
    fn test_bad_versions() {
        let mut raw = fixtures::sample_pack();
        raw["metadata"]["version"] = json!("1.0");
        raw["metadata"]["engine"] = json!(">=banana");
        let (_, diagnostics) = parse(&raw);
        assert_eq!(
            paths(&diagnostics),
            vec!["metadata.version", "metadata.engine"]
        );
    }

    #[test]
    fn test_engine_range_at_numeric_limit() {
        let mut raw = fixtures::sample_pack();
        raw["metadata"]["engine"] = json!(format!("^{}.0.0", u64::MAX));
        let (_, diagnostics) = parse(&raw);
        assert_eq!(paths(&diagnostics), vec!["metadata.engine"]);
    }

    #[test]
    fn test_unsupported_locale_warns() {
        let mut raw = fixtures::sample_pack();
        raw["resources"][0]["name"] = json!({ "default": "Energy", "variants": { "de-DE": "Energie" } });
        let (_, diagnostics) = parse(&raw);
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warnings().len(), 1);
        assert_eq!(
            diagnostics.warnings()[0].path.to_string(),
            "resources[0].name.variants.de-DE"
        );
    }
}
