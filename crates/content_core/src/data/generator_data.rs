//! Generator data structures for data-driven production buildings.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::formula::NumericFormula;
use super::text::LocalizedText;

/// Data-driven generator definition.
///
/// A generator produces and consumes resources per second, scaled by its
/// level, and is bought with a currency resource along a cost curve.
///
/// # Example
///
/// ```json
/// {
///     "id": "sample-pack.reactor",
///     "name": "Reactor",
///     "produces": [{ "resourceId": "sample-pack.energy", "rate": { "kind": "constant", "value": 1 } }],
///     "purchase": {
///         "currencyId": "sample-pack.energy",
///         "costCurve": { "kind": "exponential", "base": 10, "growth": 1.15 }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Resources produced per second.
    #[serde(default)]
    pub produces: Vec<ResourceRate>,

    /// Resources consumed per second.
    #[serde(default)]
    pub consumes: Vec<ResourceRate>,

    /// How the generator is bought.
    pub purchase: GeneratorPurchase,

    /// Highest level that can be bought.
    #[serde(default)]
    pub max_level: Option<u32>,

    /// Level owned at the start of a run.
    #[serde(default)]
    pub initial_level: u32,

    /// Condition unlocking the generator.
    #[serde(default)]
    pub base_unlock: Option<Condition>,

    /// Condition revealing the generator.
    #[serde(default)]
    pub visibility_condition: Option<Condition>,

    /// Sort key for display.
    #[serde(default)]
    pub order: Option<f64>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A per-second flow of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceRate {
    /// Resource flowing.
    pub resource_id: String,

    /// Amount per second.
    pub rate: NumericFormula,
}

/// Purchase parameters of a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorPurchase {
    /// Resource spent.
    pub currency_id: String,

    /// Scalar applied to the curve.
    #[serde(default = "default_cost_multiplier")]
    pub cost_multiplier: f64,

    /// Cost of the next level as a function of the current level.
    pub cost_curve: NumericFormula,

    /// Largest bulk purchase allowed.
    #[serde(default)]
    pub max_bulk: Option<u32>,
}

pub(crate) const fn default_cost_multiplier() -> f64 {
    1.0
}

impl GeneratorData {
    /// Check if this generator produces the given resource.
    #[must_use]
    pub fn produces_resource(&self, resource_id: &str) -> bool {
        self.produces.iter().any(|p| p.resource_id == resource_id)
    }

    /// Check if this generator consumes the given resource.
    #[must_use]
    pub fn consumes_resource(&self, resource_id: &str) -> bool {
        self.consumes.iter().any(|c| c.resource_id == resource_id)
    }

    /// Check if this generator has the specified tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
