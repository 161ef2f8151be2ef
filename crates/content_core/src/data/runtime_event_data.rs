//! Runtime event contributions declared by a pack.

use serde::{Deserialize, Serialize};

/// A runtime event type contributed by the pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuntimeEventData {
    /// Event id. Must not collide with the runtime's own catalogue.
    pub id: String,

    /// Payload schema version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Payload description.
    #[serde(default)]
    pub payload: Option<EventPayload>,

    /// Declared publishers of this event.
    #[serde(default)]
    pub emits: Vec<EventEmitter>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload description of a runtime event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventPayload {
    /// Payload encoding ("json", "struct", ...).
    pub kind: String,

    /// Reference to an external schema.
    #[serde(default)]
    pub schema_ref: Option<String>,
}

/// A declared publisher of a runtime event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventEmitter {
    /// Who publishes.
    pub source: EmitterSource,
}

/// Origin of an event emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum EmitterSource {
    /// Published when an achievement completes.
    Achievement {
        /// Achievement id.
        achievement_id: String,
    },
    /// Published when an upgrade is bought.
    Upgrade {
        /// Upgrade id.
        upgrade_id: String,
    },
    /// Published when a transform completes.
    Transform {
        /// Transform id.
        transform_id: String,
    },
    /// Published by a script.
    Script {
        /// Script id, checked against the script allowlist.
        script_id: String,
    },
}

const fn default_version() -> u32 {
    1
}
