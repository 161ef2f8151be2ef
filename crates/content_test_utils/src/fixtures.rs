//! Test fixtures and helpers.
//!
//! Raw pack documents as `serde_json::Value`, so the same fixtures serve
//! the core crate's unit tests, its integration tests, the benches and the
//! CLI tests.

use serde_json::{json, Map, Value};

/// Id of the pack returned by [`sample_pack`].
pub const SAMPLE_PACK_ID: &str = "sample-pack";

/// Qualify a local name with the sample pack id.
#[must_use]
pub fn sample_id(local: &str) -> String {
    format!("{SAMPLE_PACK_ID}.{local}")
}

/// `{ "kind": "constant", "value": value }`.
#[must_use]
pub fn constant(value: f64) -> Value {
    json!({ "kind": "constant", "value": value })
}

/// `{ "kind": "exponential", "base": base, "growth": growth }`.
#[must_use]
pub fn exponential(base: f64, growth: f64) -> Value {
    json!({ "kind": "exponential", "base": base, "growth": growth })
}

/// Expression formula reading one entity.
#[must_use]
pub fn entity_ref(target_type: &str, id: &str) -> Value {
    json!({
        "kind": "expression",
        "expression": { "kind": "ref", "target": { "type": target_type, "id": id } }
    })
}

/// `resource >= amount`.
#[must_use]
pub fn resource_at_least(resource_id: &str, amount: f64) -> Value {
    json!({
        "kind": "resourceThreshold",
        "resourceId": resource_id,
        "comparator": "gte",
        "amount": constant(amount)
    })
}

/// `upgrade owned at least once`.
#[must_use]
pub fn upgrade_owned(upgrade_id: &str) -> Value {
    json!({ "kind": "upgradeOwned", "upgradeId": upgrade_id })
}

/// `{ "resourceId": id, "rate": constant(rate) }`.
#[must_use]
pub fn rate(resource_id: &str, rate: f64) -> Value {
    json!({ "resourceId": resource_id, "rate": constant(rate) })
}

/// `{ "resourceId": id, "amount": constant(amount) }`.
#[must_use]
pub fn amount(resource_id: &str, amount: f64) -> Value {
    json!({ "resourceId": resource_id, "amount": constant(amount) })
}

/// The reference pack: two resources and two generators that validate with
/// no issues and no warnings.
///
/// - `energy`: starts at 10, capacity 100
/// - `crystal`: starts at 0, unlocks at 25 energy
/// - `reactor`: produces 1 energy/s, costs 10 energy growing by 1.15
/// - `harvester`: turns 0.5 energy/s into 0.25 crystal/s, unlocks at 15 energy
#[must_use]
pub fn sample_pack() -> Value {
    let energy = sample_id("energy");
    let crystal = sample_id("crystal");
    json!({
        "metadata": {
            "id": SAMPLE_PACK_ID,
            "title": "Sample Pack",
            "version": "0.1.0"
        },
        "resources": [
            {
                "id": energy,
                "name": "Energy",
                "startAmount": 10,
                "capacity": 100
            },
            {
                "id": crystal,
                "name": "Crystal",
                "startAmount": 0,
                "unlocked": false,
                "unlockCondition": resource_at_least(&energy, 25.0)
            }
        ],
        "generators": [
            {
                "id": sample_id("reactor"),
                "name": "Reactor",
                "produces": [rate(&energy, 1.0)],
                "purchase": { "currencyId": energy, "costCurve": exponential(10.0, 1.15) }
            },
            {
                "id": sample_id("harvester"),
                "name": "Harvester",
                "consumes": [rate(&energy, 0.5)],
                "produces": [rate(&crystal, 0.25)],
                "purchase": { "currencyId": energy, "costCurve": exponential(25.0, 1.2) },
                "baseUnlock": resource_at_least(&energy, 15.0)
            }
        ]
    })
}

/// Incremental builder for raw pack documents.
///
/// ```
/// use content_test_utils::fixtures::{PackBuilder, resource_at_least};
///
/// let raw = PackBuilder::new("demo")
///     .resource("gold")
///     .resource_with("gem", |gem| {
///         gem["unlockCondition"] = resource_at_least("demo.gold", 5.0);
///     })
///     .build();
/// assert_eq!(raw["resources"].as_array().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PackBuilder {
    pack_id: String,
    document: Map<String, Value>,
}

impl PackBuilder {
    /// Start an empty pack with version `1.0.0`.
    #[must_use]
    pub fn new(pack_id: &str) -> Self {
        let mut document = Map::new();
        document.insert(
            "metadata".to_string(),
            json!({ "id": pack_id, "title": pack_id, "version": "1.0.0" }),
        );
        Self {
            pack_id: pack_id.to_string(),
            document,
        }
    }

    /// Start from an existing document.
    #[must_use]
    pub fn from_document(document: Value) -> Self {
        let pack_id = document
            .pointer("/metadata/id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let document = match document {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { pack_id, document }
    }

    /// Qualify a local name with this pack's id.
    #[must_use]
    pub fn id(&self, local: &str) -> String {
        format!("{}.{local}", self.pack_id)
    }

    /// Edit the metadata object.
    #[must_use]
    pub fn metadata(mut self, edit: impl FnOnce(&mut Value)) -> Self {
        if let Some(metadata) = self.document.get_mut("metadata") {
            edit(metadata);
        }
        self
    }

    /// Append a raw entry to a collection.
    #[must_use]
    pub fn push(mut self, module: &str, entry: Value) -> Self {
        let collection = self
            .document
            .entry(module.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(entries) = collection {
            entries.push(entry);
        }
        self
    }

    /// Append a resource with only an id and a name.
    #[must_use]
    pub fn resource(self, local: &str) -> Self {
        self.resource_with(local, |_| {})
    }

    /// Append a resource, then edit it.
    #[must_use]
    pub fn resource_with(self, local: &str, edit: impl FnOnce(&mut Value)) -> Self {
        let mut entry = json!({ "id": self.id(local), "name": local });
        edit(&mut entry);
        self.push("resources", entry)
    }

    /// Append a generator producing `produces` at rate 1, bought with `currency`.
    #[must_use]
    pub fn generator(self, local: &str, produces: &str, currency: &str) -> Self {
        let entry = json!({
            "id": self.id(local),
            "name": local,
            "produces": [rate(&self.id(produces), 1.0)],
            "purchase": { "currencyId": self.id(currency), "costCurve": exponential(10.0, 1.15) }
        });
        self.push("generators", entry)
    }

    /// Append an upgrade costing 10 of `currency`, then edit it.
    #[must_use]
    pub fn upgrade_with(self, local: &str, currency: &str, edit: impl FnOnce(&mut Value)) -> Self {
        let mut entry = json!({
            "id": self.id(local),
            "name": local,
            "cost": { "currencyId": self.id(currency), "costCurve": constant(10.0) }
        });
        edit(&mut entry);
        self.push("upgrades", entry)
    }

    /// Append an instant transform from `inputs` to `outputs` (local ids).
    #[must_use]
    pub fn transform(self, local: &str, inputs: &[&str], outputs: &[&str]) -> Self {
        let entry = json!({
            "id": self.id(local),
            "name": local,
            "mode": "instant",
            "inputs": inputs.iter().map(|input| amount(&self.id(input), 1.0)).collect::<Vec<_>>(),
            "outputs": outputs.iter().map(|output| amount(&self.id(output), 1.0)).collect::<Vec<_>>()
        });
        self.push("transforms", entry)
    }

    /// Append a prestige layer rewarding `reward` and unlocked by `always`.
    ///
    /// The companion count resource is not added.
    #[must_use]
    pub fn prestige_layer(self, local: &str, reward: &str) -> Self {
        let entry = json!({
            "id": self.id(local),
            "name": local,
            "unlockCondition": { "kind": "always" },
            "reward": { "resourceId": self.id(reward), "baseReward": constant(1.0) }
        });
        self.push("prestigeLayers", entry)
    }

    /// Add `requires` dependencies on other packs.
    #[must_use]
    pub fn requires(self, pack_ids: &[&str]) -> Self {
        let requires: Vec<Value> = pack_ids.iter().map(|id| json!({ "packId": id })).collect();
        self.metadata(|metadata| {
            metadata["dependencies"]["requires"] = Value::Array(requires);
        })
    }

    /// Finish the document.
    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.document)
    }
}

/// A valid pack with `size` resources, generators, upgrades and transforms.
///
/// Generator `i` produces resource `i` and is bought with resource `i - 1`;
/// transform `i` turns resource `i` into resource `i + 1`, so the transform
/// graph is a chain.
#[must_use]
pub fn large_pack(size: usize) -> Value {
    let size = size.max(1);
    let mut builder = PackBuilder::new("bench-pack");
    for i in 0..size {
        builder = builder.resource(&format!("res-{i}"));
    }
    for i in 0..size {
        let currency = format!("res-{}", i.saturating_sub(1));
        builder = builder.generator(&format!("gen-{i}"), &format!("res-{i}"), &currency);
    }
    for i in 0..size {
        let previous = i.checked_sub(1).map(|p| builder.id(&format!("upg-{p}")));
        let resource = builder.id(&format!("res-{i}"));
        builder = builder.upgrade_with(&format!("upg-{i}"), &format!("res-{i}"), |upgrade| {
            upgrade["effects"] = json!([{
                "kind": "modifyResourceRate",
                "resourceId": resource,
                "operation": "multiply",
                "value": constant(1.1)
            }]);
            if let Some(previous) = previous {
                upgrade["prerequisites"] = json!([previous]);
            }
        });
    }
    for i in 0..size.saturating_sub(1) {
        builder = builder.transform(
            &format!("tx-{i}"),
            &[format!("res-{i}").as_str()],
            &[format!("res-{}", i + 1).as_str()],
        );
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_pack_shape() {
        let raw = sample_pack();
        assert_eq!(raw["metadata"]["id"], SAMPLE_PACK_ID);
        assert_eq!(raw["resources"][0]["id"], "sample-pack.energy");
        assert_eq!(raw["generators"][1]["consumes"][0]["rate"]["value"], 0.5);
    }

    #[test]
    fn test_large_pack_sizes() {
        let raw = large_pack(5);
        assert_eq!(raw["resources"].as_array().unwrap().len(), 5);
        assert_eq!(raw["upgrades"].as_array().unwrap().len(), 5);
        assert_eq!(raw["transforms"].as_array().unwrap().len(), 4);
        assert_eq!(raw["upgrades"][1]["prerequisites"][0], "bench-pack.upg-0");
    }
}
