//! Resource data structures.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::default_true;
use super::text::LocalizedText;

/// Data-driven resource definition.
///
/// # Example
///
/// ```json
/// {
///     "id": "sample-pack.energy",
///     "name": "Energy",
///     "category": "primary",
///     "tier": 1,
///     "startAmount": 10,
///     "capacity": 100
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Free-form grouping used by UIs ("primary", "currency", ...).
    #[serde(default = "default_category")]
    pub category: String,

    /// Progression tier.
    #[serde(default = "default_tier")]
    pub tier: u32,

    /// Icon asset key.
    #[serde(default)]
    pub icon: Option<String>,

    /// Amount held at the start of a run.
    #[serde(default)]
    pub start_amount: f64,

    /// Upper bound on the amount. `None` for unbounded.
    #[serde(default)]
    pub capacity: Option<f64>,

    /// Visible from the start.
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Unlocked from the start.
    #[serde(default = "default_true")]
    pub unlocked: bool,

    /// Condition unlocking the resource.
    #[serde(default)]
    pub unlock_condition: Option<Condition>,

    /// Condition revealing the resource.
    #[serde(default)]
    pub visibility_condition: Option<Condition>,

    /// Relative change below which the runtime skips publishing an update.
    #[serde(default)]
    pub dirty_tolerance: Option<f64>,

    /// Sort key for display.
    #[serde(default)]
    pub order: Option<f64>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_category() -> String {
    "primary".to_string()
}

const fn default_tier() -> u32 {
    1
}

impl ResourceData {
    /// Check if this resource has the specified tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the capacity admits the starting amount.
    #[must_use]
    pub fn capacity_admits_start(&self) -> bool {
        self.capacity.map_or(true, |capacity| capacity >= self.start_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let resource: ResourceData =
            serde_json::from_value(json!({ "id": "pack.gold", "name": "Gold" })).unwrap();
        assert_eq!(resource.category, "primary");
        assert_eq!(resource.tier, 1);
        assert!(resource.visible && resource.unlocked);
        assert!(resource.capacity.is_none());
        assert!(resource.capacity_admits_start());
    }

    #[test]
    fn test_capacity_below_start() {
        let resource: ResourceData = serde_json::from_value(json!({
            "id": "pack.gold",
            "name": "Gold",
            "startAmount": 50,
            "capacity": 10
        }))
        .unwrap();
        assert!(!resource.capacity_admits_start());
    }
}
