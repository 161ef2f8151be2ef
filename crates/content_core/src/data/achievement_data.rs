//! Achievement data structures.

use serde::{Deserialize, Serialize};

use super::condition::{Comparator, Condition};
use super::formula::NumericFormula;
use super::text::LocalizedText;

/// Data-driven achievement definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AchievementData {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: LocalizedText,

    /// Description shown to the player.
    #[serde(default)]
    pub description: Option<LocalizedText>,

    /// Grouping used by UIs.
    #[serde(default)]
    pub category: Option<String>,

    /// What is tracked towards completion.
    pub track: AchievementTrack,

    /// Progress display parameters.
    #[serde(default)]
    pub progress: Option<AchievementProgress>,

    /// Granted on completion.
    #[serde(default)]
    pub reward: Option<AchievementReward>,

    /// Events published on completion.
    #[serde(default)]
    pub on_unlock_events: Vec<String>,

    /// Condition unlocking the achievement.
    #[serde(default)]
    pub unlock_condition: Option<Condition>,

    /// Condition revealing the achievement.
    #[serde(default)]
    pub visibility_condition: Option<Condition>,

    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Value an achievement tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum AchievementTrack {
    /// Resource amount.
    Resource {
        /// Resource read.
        resource_id: String,
        /// Comparison.
        #[serde(default)]
        comparator: Comparator,
        /// Threshold.
        threshold: NumericFormula,
    },
    /// Generator level.
    GeneratorLevel {
        /// Generator read.
        generator_id: String,
        /// Threshold.
        level: NumericFormula,
    },
    /// Upgrade purchase count.
    UpgradeOwned {
        /// Upgrade read.
        upgrade_id: String,
        /// Purchases needed, one when absent.
        #[serde(default)]
        purchases: Option<NumericFormula>,
    },
    /// Runtime flag.
    Flag {
        /// Flag id, checked against the flag allowlist.
        flag_id: String,
    },
    /// Script predicate.
    Script {
        /// Script id, checked against the script allowlist.
        script_id: String,
    },
    /// Runtime metric value.
    CustomMetric {
        /// Metric read.
        metric_id: String,
        /// Threshold.
        threshold: NumericFormula,
    },
}

/// How progress is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressMode {
    /// Completes once.
    #[default]
    OneShot,
    /// Progress bar towards a target.
    Incremental,
    /// Completes again each time the target is reached.
    Repeatable,
}

/// Progress display parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AchievementProgress {
    /// Target value for the progress bar.
    #[serde(default)]
    pub target: Option<NumericFormula>,

    /// Display mode.
    #[serde(default)]
    pub mode: ProgressMode,
}

/// Reward granted on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum AchievementReward {
    /// Amount of a resource.
    GrantResource {
        /// Resource granted.
        resource_id: String,
        /// Amount granted.
        amount: NumericFormula,
    },
    /// A free upgrade.
    GrantUpgrade {
        /// Upgrade granted.
        upgrade_id: String,
    },
    /// A runtime event.
    EmitEvent {
        /// Event id.
        event_id: String,
    },
    /// An automation.
    UnlockAutomation {
        /// Automation unlocked.
        automation_id: String,
    },
    /// A runtime flag.
    GrantFlag {
        /// Flag id, checked against the flag allowlist.
        flag_id: String,
        /// Value the flag is set to.
        #[serde(default = "super::default_true")]
        value: bool,
    },
}
