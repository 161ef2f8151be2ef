//! Cross-reference validation.
//!
//! Walks every reference-bearing field of every collection and checks that
//! the id resolves: against the pack's own indexes, an allowlist, or the
//! runtime event catalogue. Every miss is recorded with the exact path of
//! the offending field; nothing short-circuits.

use std::collections::HashSet;

use crate::data::{
    AchievementReward, AchievementTrack, AutomationTrigger, Condition, EmitterSource, EntityKind,
    MetricSource, NumericFormula, ParsedContentPack, PrestigeRetention, TransformMode, TransformTrigger,
    UpgradeEffect, UpgradePrerequisite, UpgradeTarget,
};
use crate::diagnostics::{Diagnostics, FieldPath, Severity, WarningCode};
use crate::options::ValidationConfig;
use crate::validation::allowlist::{assert_allowlisted, AllowlistCategory, NormalizedAllowlists};
use crate::validation::index::PackIndex;
use crate::validation::references::collect_formula_entity_references;

/// Resolves ids for one pack.
#[derive(Debug)]
pub struct CrossReferenceValidator<'a> {
    pack: &'a ParsedContentPack,
    index: &'a PackIndex<'a>,
    allowlists: &'a NormalizedAllowlists,
    catalogue: HashSet<&'a str>,
    known_events: HashSet<&'a str>,
    event_severity: Severity,
}

impl<'a> CrossReferenceValidator<'a> {
    /// Create a validator for `pack`.
    #[must_use]
    pub fn new(
        pack: &'a ParsedContentPack,
        index: &'a PackIndex<'a>,
        allowlists: &'a NormalizedAllowlists,
        config: &'a ValidationConfig,
    ) -> Self {
        let catalogue: HashSet<&str> = config
            .runtime_event_catalogue
            .iter()
            .map(String::as_str)
            .collect();
        let known_events = catalogue
            .iter()
            .copied()
            .chain(pack.runtime_events.iter().map(|event| event.id.as_str()))
            .collect();
        Self {
            pack,
            index,
            allowlists,
            catalogue,
            known_events,
            event_severity: config.runtime_event_severity(),
        }
    }

    /// Check every collection.
    pub fn validate(&self, diagnostics: &mut Diagnostics<'_>) {
        self.validate_resources(diagnostics);
        self.validate_generators(diagnostics);
        self.validate_upgrades(diagnostics);
        self.validate_achievements(diagnostics);
        self.validate_automations(diagnostics);
        self.validate_transforms(diagnostics);
        self.validate_prestige_layers(diagnostics);
        self.validate_entities(diagnostics);
        self.validate_metrics(diagnostics);
        self.validate_runtime_events(diagnostics);
    }

    /// Require an entity of `kind` with `id`.
    pub fn require(&self, kind: EntityKind, id: &str, path: FieldPath, diagnostics: &mut Diagnostics<'_>) {
        if !self.index.contains(kind, id) {
            diagnostics.error(path, format!("unknown {kind} '{id}'"));
        }
    }

    /// Require every entity referenced inside `formula`.
    pub fn validate_formula(&self, formula: &NumericFormula, path: &FieldPath, diagnostics: &mut Diagnostics<'_>) {
        collect_formula_entity_references(formula, &mut |reference| {
            self.require(reference.kind, reference.id, path.clone(), diagnostics);
        });
    }

    fn validate_optional_formula(
        &self,
        formula: Option<&NumericFormula>,
        path: FieldPath,
        diagnostics: &mut Diagnostics<'_>,
    ) {
        if let Some(formula) = formula {
            self.validate_formula(formula, &path, diagnostics);
        }
    }

    /// Check every reference inside a condition tree.
    pub fn validate_condition(&self, condition: &Condition, path: &FieldPath, diagnostics: &mut Diagnostics<'_>) {
        match condition {
            Condition::Always | Condition::Never => {}
            Condition::ResourceThreshold {
                resource_id, amount, ..
            } => {
                self.require(EntityKind::Resource, resource_id, path.key("resourceId"), diagnostics);
                self.validate_formula(amount, &path.key("amount"), diagnostics);
            }
            Condition::GeneratorLevel {
                generator_id, level, ..
            } => {
                self.require(EntityKind::Generator, generator_id, path.key("generatorId"), diagnostics);
                self.validate_formula(level, &path.key("level"), diagnostics);
            }
            Condition::UpgradeOwned { upgrade_id, .. } => {
                self.require(EntityKind::Upgrade, upgrade_id, path.key("upgradeId"), diagnostics);
            }
            Condition::PrestigeCountThreshold {
                prestige_layer_id, ..
            }
            | Condition::PrestigeCompleted { prestige_layer_id }
            | Condition::PrestigeUnlocked { prestige_layer_id } => {
                self.require(
                    EntityKind::PrestigeLayer,
                    prestige_layer_id,
                    path.key("prestigeLayerId"),
                    diagnostics,
                );
            }
            Condition::Flag { flag_id } => {
                self.allowlisted(AllowlistCategory::Flags, flag_id, path.key("flagId"), diagnostics);
            }
            Condition::Script { script_id } => {
                self.allowlisted(AllowlistCategory::Scripts, script_id, path.key("scriptId"), diagnostics);
            }
            Condition::AllOf { conditions } | Condition::AnyOf { conditions } => {
                for (position, child) in conditions.iter().enumerate() {
                    self.validate_condition(child, &path.key("conditions").index(position), diagnostics);
                }
            }
            Condition::Not { condition } => {
                self.validate_condition(condition, &path.key("condition"), diagnostics);
            }
        }
    }

    fn validate_optional_condition(
        &self,
        condition: Option<&Condition>,
        path: FieldPath,
        diagnostics: &mut Diagnostics<'_>,
    ) {
        if let Some(condition) = condition {
            self.validate_condition(condition, &path, diagnostics);
        }
    }

    fn allowlisted(
        &self,
        category: AllowlistCategory,
        id: &str,
        path: FieldPath,
        diagnostics: &mut Diagnostics<'_>,
    ) {
        assert_allowlisted(self.allowlists.get(category), category, id, path, diagnostics);
    }

    /// Check a runtime event reference.
    pub fn check_runtime_event(&self, event_id: &str, path: FieldPath, diagnostics: &mut Diagnostics<'_>) {
        if !self.known_events.contains(event_id) {
            diagnostics.report(
                self.event_severity,
                WarningCode::UnknownRuntimeEvent,
                path,
                format!("unknown runtime event '{event_id}'"),
            );
        }
    }

    /// Check the id fields and formula of one upgrade effect.
    pub fn validate_upgrade_effect(&self, effect: &UpgradeEffect, path: &FieldPath, diagnostics: &mut Diagnostics<'_>) {
        match effect {
            UpgradeEffect::ModifyResourceRate {
                resource_id, value, ..
            }
            | UpgradeEffect::ModifyResourceCapacity {
                resource_id, value, ..
            }
            | UpgradeEffect::AlterDirtyTolerance {
                resource_id, value, ..
            } => {
                self.require(EntityKind::Resource, resource_id, path.key("resourceId"), diagnostics);
                self.validate_formula(value, &path.key("value"), diagnostics);
            }
            UpgradeEffect::UnlockResource { resource_id } => {
                self.require(EntityKind::Resource, resource_id, path.key("resourceId"), diagnostics);
            }
            UpgradeEffect::ModifyGeneratorRate {
                generator_id, value, ..
            }
            | UpgradeEffect::ModifyGeneratorCost {
                generator_id, value, ..
            } => {
                self.require(EntityKind::Generator, generator_id, path.key("generatorId"), diagnostics);
                self.validate_formula(value, &path.key("value"), diagnostics);
            }
            UpgradeEffect::ModifyGeneratorConsumption {
                generator_id,
                resource_id,
                value,
                ..
            } => {
                self.require(EntityKind::Generator, generator_id, path.key("generatorId"), diagnostics);
                if let Some(resource_id) = resource_id {
                    self.require(EntityKind::Resource, resource_id, path.key("resourceId"), diagnostics);
                }
                self.validate_formula(value, &path.key("value"), diagnostics);
            }
            UpgradeEffect::UnlockGenerator { generator_id } => {
                self.require(EntityKind::Generator, generator_id, path.key("generatorId"), diagnostics);
            }
            UpgradeEffect::GrantAutomation { automation_id } => {
                self.require(EntityKind::Automation, automation_id, path.key("automationId"), diagnostics);
            }
            UpgradeEffect::GrantFlag { flag_id, .. } => {
                self.allowlisted(AllowlistCategory::Flags, flag_id, path.key("flagId"), diagnostics);
            }
            UpgradeEffect::EmitEvent { event_id } => {
                self.check_runtime_event(event_id, path.key("eventId"), diagnostics);
            }
        }
    }

    fn validate_resources(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, resource) in self.pack.resources.iter().enumerate() {
            let path = FieldPath::from("resources").index(position);
            self.validate_optional_condition(
                resource.unlock_condition.as_ref(),
                path.key("unlockCondition"),
                diagnostics,
            );
            self.validate_optional_condition(
                resource.visibility_condition.as_ref(),
                path.key("visibilityCondition"),
                diagnostics,
            );
        }
    }

    fn validate_generators(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, generator) in self.pack.generators.iter().enumerate() {
            let path = FieldPath::from("generators").index(position);
            for (field, rates) in [("produces", &generator.produces), ("consumes", &generator.consumes)] {
                for (index, rate) in rates.iter().enumerate() {
                    let entry = path.key(field).index(index);
                    self.require(EntityKind::Resource, &rate.resource_id, entry.key("resourceId"), diagnostics);
                    self.validate_formula(&rate.rate, &entry.key("rate"), diagnostics);
                }
            }

            let purchase = path.key("purchase");
            self.require(
                EntityKind::Resource,
                &generator.purchase.currency_id,
                purchase.key("currencyId"),
                diagnostics,
            );
            self.validate_formula(&generator.purchase.cost_curve, &purchase.key("costCurve"), diagnostics);

            self.validate_optional_condition(generator.base_unlock.as_ref(), path.key("baseUnlock"), diagnostics);
            self.validate_optional_condition(
                generator.visibility_condition.as_ref(),
                path.key("visibilityCondition"),
                diagnostics,
            );
        }
    }

    fn validate_upgrades(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, upgrade) in self.pack.upgrades.iter().enumerate() {
            let path = FieldPath::from("upgrades").index(position);

            for (index, target) in upgrade.targets.iter().enumerate() {
                let entry = path.key("targets").index(index).key("id");
                match target {
                    UpgradeTarget::Global => {}
                    UpgradeTarget::Resource { id } => self.require(EntityKind::Resource, id, entry, diagnostics),
                    UpgradeTarget::Generator { id } => self.require(EntityKind::Generator, id, entry, diagnostics),
                    UpgradeTarget::Automation { id } => self.require(EntityKind::Automation, id, entry, diagnostics),
                    UpgradeTarget::PrestigeLayer { id } => {
                        self.require(EntityKind::PrestigeLayer, id, entry, diagnostics);
                    }
                }
            }

            let cost = path.key("cost");
            self.require(EntityKind::Resource, &upgrade.cost.currency_id, cost.key("currencyId"), diagnostics);
            self.validate_formula(&upgrade.cost.cost_curve, &cost.key("costCurve"), diagnostics);
            if let Some(repeatable) = &upgrade.repeatable {
                self.validate_optional_formula(
                    repeatable.cost_curve.as_ref(),
                    path.key("repeatable").key("costCurve"),
                    diagnostics,
                );
            }

            for (index, effect) in upgrade.effects.iter().enumerate() {
                self.validate_upgrade_effect(effect, &path.key("effects").index(index), diagnostics);
            }

            for (index, prerequisite) in upgrade.prerequisites.iter().enumerate() {
                let entry = path.key("prerequisites").index(index);
                match prerequisite {
                    UpgradePrerequisite::UpgradeId(upgrade_id) => {
                        self.require(EntityKind::Upgrade, upgrade_id, entry, diagnostics);
                    }
                    UpgradePrerequisite::Condition(condition) => {
                        self.validate_condition(condition, &entry, diagnostics);
                    }
                }
            }

            self.validate_optional_condition(
                upgrade.unlock_condition.as_ref(),
                path.key("unlockCondition"),
                diagnostics,
            );
            self.validate_optional_condition(
                upgrade.visibility_condition.as_ref(),
                path.key("visibilityCondition"),
                diagnostics,
            );
        }
    }

    fn validate_achievements(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, achievement) in self.pack.achievements.iter().enumerate() {
            let path = FieldPath::from("achievements").index(position);

            let track = path.key("track");
            match &achievement.track {
                AchievementTrack::Resource {
                    resource_id,
                    threshold,
                    ..
                } => {
                    self.require(EntityKind::Resource, resource_id, track.key("resourceId"), diagnostics);
                    self.validate_formula(threshold, &track.key("threshold"), diagnostics);
                }
                AchievementTrack::GeneratorLevel { generator_id, level } => {
                    self.require(EntityKind::Generator, generator_id, track.key("generatorId"), diagnostics);
                    self.validate_formula(level, &track.key("level"), diagnostics);
                }
                AchievementTrack::UpgradeOwned {
                    upgrade_id,
                    purchases,
                } => {
                    self.require(EntityKind::Upgrade, upgrade_id, track.key("upgradeId"), diagnostics);
                    self.validate_optional_formula(purchases.as_ref(), track.key("purchases"), diagnostics);
                }
                AchievementTrack::Flag { flag_id } => {
                    self.allowlisted(AllowlistCategory::Flags, flag_id, track.key("flagId"), diagnostics);
                }
                AchievementTrack::Script { script_id } => {
                    self.allowlisted(AllowlistCategory::Scripts, script_id, track.key("scriptId"), diagnostics);
                }
                AchievementTrack::CustomMetric {
                    metric_id,
                    threshold,
                } => {
                    self.require(EntityKind::Metric, metric_id, track.key("metricId"), diagnostics);
                    self.validate_formula(threshold, &track.key("threshold"), diagnostics);
                }
            }

            if let Some(progress) = &achievement.progress {
                self.validate_optional_formula(
                    progress.target.as_ref(),
                    path.key("progress").key("target"),
                    diagnostics,
                );
            }

            if let Some(reward) = &achievement.reward {
                let reward_path = path.key("reward");
                match reward {
                    AchievementReward::GrantResource { resource_id, amount } => {
                        self.require(EntityKind::Resource, resource_id, reward_path.key("resourceId"), diagnostics);
                        self.validate_formula(amount, &reward_path.key("amount"), diagnostics);
                    }
                    AchievementReward::GrantUpgrade { upgrade_id } => {
                        self.require(EntityKind::Upgrade, upgrade_id, reward_path.key("upgradeId"), diagnostics);
                    }
                    AchievementReward::EmitEvent { event_id } => {
                        self.check_runtime_event(event_id, reward_path.key("eventId"), diagnostics);
                    }
                    AchievementReward::UnlockAutomation { automation_id } => {
                        self.require(
                            EntityKind::Automation,
                            automation_id,
                            reward_path.key("automationId"),
                            diagnostics,
                        );
                    }
                    AchievementReward::GrantFlag { flag_id, .. } => {
                        self.allowlisted(AllowlistCategory::Flags, flag_id, reward_path.key("flagId"), diagnostics);
                    }
                }
            }

            for (index, event_id) in achievement.on_unlock_events.iter().enumerate() {
                self.check_runtime_event(event_id, path.key("onUnlockEvents").index(index), diagnostics);
            }

            self.validate_optional_condition(
                achievement.unlock_condition.as_ref(),
                path.key("unlockCondition"),
                diagnostics,
            );
            self.validate_optional_condition(
                achievement.visibility_condition.as_ref(),
                path.key("visibilityCondition"),
                diagnostics,
            );
        }
    }

    fn validate_automations(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, automation) in self.pack.automations.iter().enumerate() {
            let path = FieldPath::from("automations").index(position);

            match automation.target_type.target_kind() {
                Some(kind) => {
                    if let Some(target_id) = &automation.target_id {
                        self.require(kind, target_id, path.key("targetId"), diagnostics);
                    }
                }
                None => {
                    if let Some(system_target_id) = &automation.system_target_id {
                        self.allowlisted(
                            AllowlistCategory::SystemAutomationTargets,
                            system_target_id,
                            path.key("systemTargetId"),
                            diagnostics,
                        );
                    }
                }
            }

            let trigger = path.key("trigger");
            match &automation.trigger {
                AutomationTrigger::Interval { interval } => {
                    self.validate_formula(interval, &trigger.key("interval"), diagnostics);
                }
                AutomationTrigger::ResourceThreshold {
                    resource_id,
                    threshold,
                    ..
                } => {
                    self.require(EntityKind::Resource, resource_id, trigger.key("resourceId"), diagnostics);
                    self.validate_formula(threshold, &trigger.key("threshold"), diagnostics);
                }
                AutomationTrigger::CommandQueueEmpty => {}
                AutomationTrigger::Event { event_id } => {
                    self.check_runtime_event(event_id, trigger.key("eventId"), diagnostics);
                }
            }

            if let Some(cost) = &automation.resource_cost {
                let cost_path = path.key("resourceCost");
                self.require(EntityKind::Resource, &cost.resource_id, cost_path.key("resourceId"), diagnostics);
                self.validate_formula(&cost.rate, &cost_path.key("rate"), diagnostics);
            }
            self.validate_optional_formula(automation.cooldown.as_ref(), path.key("cooldown"), diagnostics);
            self.validate_optional_condition(
                automation.unlock_condition.as_ref(),
                path.key("unlockCondition"),
                diagnostics,
            );
        }
    }

    fn validate_transforms(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, transform) in self.pack.transforms.iter().enumerate() {
            let path = FieldPath::from("transforms").index(position);

            for (field, amounts) in [("inputs", &transform.inputs), ("outputs", &transform.outputs)] {
                for (index, amount) in amounts.iter().enumerate() {
                    let entry = path.key(field).index(index);
                    self.require(EntityKind::Resource, &amount.resource_id, entry.key("resourceId"), diagnostics);
                    self.validate_formula(&amount.amount, &entry.key("amount"), diagnostics);
                }
            }
            self.validate_optional_formula(transform.duration.as_ref(), path.key("duration"), diagnostics);
            self.validate_optional_formula(transform.cooldown.as_ref(), path.key("cooldown"), diagnostics);

            let trigger = path.key("trigger");
            match &transform.trigger {
                TransformTrigger::Manual => {}
                TransformTrigger::Condition { condition } => {
                    self.validate_condition(condition, &trigger.key("condition"), diagnostics);
                }
                TransformTrigger::Event { event_id } => {
                    self.check_runtime_event(event_id, trigger.key("eventId"), diagnostics);
                }
                TransformTrigger::Automation { automation_id } => {
                    self.require(EntityKind::Automation, automation_id, trigger.key("automationId"), diagnostics);
                }
            }

            if transform.mode == TransformMode::Mission {
                self.validate_entity_requirements(position, diagnostics);
            }

            self.validate_optional_condition(
                transform.unlock_condition.as_ref(),
                path.key("unlockCondition"),
                diagnostics,
            );
            self.validate_optional_condition(
                transform.visibility_condition.as_ref(),
                path.key("visibilityCondition"),
                diagnostics,
            );
        }
    }

    /// Mission requirements: the entity must exist and every `minStats`
    /// key must be one of its declared stats.
    fn validate_entity_requirements(&self, position: usize, diagnostics: &mut Diagnostics<'_>) {
        let transform = &self.pack.transforms[position];
        let path = FieldPath::from("transforms").index(position).key("entityRequirements");

        for (index, requirement) in transform.entity_requirements.iter().enumerate() {
            let entry = path.index(index);
            self.require(EntityKind::Entity, &requirement.entity_id, entry.key("entityId"), diagnostics);
            self.validate_formula(&requirement.count, &entry.key("count"), diagnostics);

            let entity = self.index.entities.get(&requirement.entity_id);
            for (stat_id, minimum) in &requirement.min_stats {
                let stat_path = entry.key("minStats").key(stat_id.as_str());
                if let Some(entity) = entity {
                    if entity.entity.get_stat(stat_id).is_none() {
                        diagnostics.error(
                            stat_path.clone(),
                            format!(
                                "entity '{}' has no stat '{stat_id}'",
                                requirement.entity_id
                            ),
                        );
                    }
                }
                self.validate_formula(minimum, &stat_path, diagnostics);
            }
        }
    }

    fn validate_prestige_layers(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, layer) in self.pack.prestige_layers.iter().enumerate() {
            let path = FieldPath::from("prestigeLayers").index(position);

            for (field, kind, ids) in [
                ("resetTargets", EntityKind::Resource, &layer.reset_targets),
                ("resetGenerators", EntityKind::Generator, &layer.reset_generators),
                ("resetUpgrades", EntityKind::Upgrade, &layer.reset_upgrades),
            ] {
                for (index, id) in ids.iter().enumerate() {
                    self.require(kind, id, path.key(field).index(index), diagnostics);
                }
            }

            self.validate_condition(&layer.unlock_condition, &path.key("unlockCondition"), diagnostics);

            let reward = path.key("reward");
            self.require(EntityKind::Resource, &layer.reward.resource_id, reward.key("resourceId"), diagnostics);
            self.validate_formula(&layer.reward.base_reward, &reward.key("baseReward"), diagnostics);
            self.validate_optional_formula(
                layer.reward.multiplier_curve.as_ref(),
                reward.key("multiplierCurve"),
                diagnostics,
            );

            for (index, retention) in layer.retention.iter().enumerate() {
                let entry = path.key("retention").index(index);
                match retention {
                    PrestigeRetention::Resource { resource_id, amount } => {
                        self.require(EntityKind::Resource, resource_id, entry.key("resourceId"), diagnostics);
                        self.validate_optional_formula(amount.as_ref(), entry.key("amount"), diagnostics);
                    }
                    PrestigeRetention::Generator { generator_id } => {
                        self.require(EntityKind::Generator, generator_id, entry.key("generatorId"), diagnostics);
                    }
                    PrestigeRetention::Upgrade { upgrade_id } => {
                        self.require(EntityKind::Upgrade, upgrade_id, entry.key("upgradeId"), diagnostics);
                    }
                }
            }

            let count_resource = layer.count_resource_id();
            if !self.index.resources.contains(&count_resource) {
                diagnostics.error(
                    path.key("id"),
                    format!(
                        "prestige layer '{}' requires resource '{count_resource}'",
                        layer.id
                    ),
                );
            }
        }
    }

    fn validate_entities(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, entity) in self.pack.entities.iter().enumerate() {
            let path = FieldPath::from("entities").index(position);

            for (index, stat) in entity.stats.iter().enumerate() {
                let stat_path = path.key("stats").index(index);
                self.validate_formula(&stat.base_value, &stat_path.key("baseValue"), diagnostics);
                self.validate_optional_formula(stat.min_value.as_ref(), stat_path.key("minValue"), diagnostics);
                self.validate_optional_formula(stat.max_value.as_ref(), stat_path.key("maxValue"), diagnostics);
            }
            self.validate_optional_formula(entity.max_count.as_ref(), path.key("maxCount"), diagnostics);

            if let Some(progression) = &entity.progression {
                let progression_path = path.key("progression");
                if let Some(resource_id) = &progression.experience_resource {
                    self.require(
                        EntityKind::Resource,
                        resource_id,
                        progression_path.key("experienceResource"),
                        diagnostics,
                    );
                }
                self.validate_formula(
                    &progression.level_formula,
                    &progression_path.key("levelFormula"),
                    diagnostics,
                );
                for (stat_id, growth) in &progression.stat_growth {
                    let growth_path = progression_path.key("statGrowth").key(stat_id.as_str());
                    if entity.get_stat(stat_id).is_none() {
                        diagnostics.error(
                            growth_path.clone(),
                            format!("entity '{}' has no stat '{stat_id}'", entity.id),
                        );
                    }
                    self.validate_formula(growth, &growth_path, diagnostics);
                }
            }

            self.validate_optional_condition(
                entity.unlock_condition.as_ref(),
                path.key("unlockCondition"),
                diagnostics,
            );
            self.validate_optional_condition(
                entity.visibility_condition.as_ref(),
                path.key("visibilityCondition"),
                diagnostics,
            );
        }
    }

    fn validate_metrics(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, metric) in self.pack.metrics.iter().enumerate() {
            if let MetricSource::Script { script_id } = &metric.source {
                self.allowlisted(
                    AllowlistCategory::Scripts,
                    script_id,
                    FieldPath::from("metrics").index(position).key("source").key("scriptId"),
                    diagnostics,
                );
            }
        }
    }

    fn validate_runtime_events(&self, diagnostics: &mut Diagnostics<'_>) {
        for (position, event) in self.pack.runtime_events.iter().enumerate() {
            let path = FieldPath::from("runtimeEvents").index(position);
            if self.catalogue.contains(event.id.as_str()) {
                diagnostics.error(
                    path.key("id"),
                    format!("runtime event '{}' collides with a runtime-defined event", event.id),
                );
            }

            for (index, emitter) in event.emits.iter().enumerate() {
                let source = path.key("emits").index(index).key("source");
                match &emitter.source {
                    EmitterSource::Achievement { achievement_id } => {
                        self.require(EntityKind::Achievement, achievement_id, source.key("achievementId"), diagnostics);
                    }
                    EmitterSource::Upgrade { upgrade_id } => {
                        self.require(EntityKind::Upgrade, upgrade_id, source.key("upgradeId"), diagnostics);
                    }
                    EmitterSource::Transform { transform_id } => {
                        self.require(EntityKind::Transform, transform_id, source.key("transformId"), diagnostics);
                    }
                    EmitterSource::Script { script_id } => {
                        self.allowlisted(AllowlistCategory::Scripts, script_id, source.key("scriptId"), diagnostics);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_content_pack;
    use crate::validation::allowlist::normalize_allowlists;
    use content_test_utils::fixtures;
    use serde_json::{json, Value};

    fn cross_reference(raw: &Value, config: &ValidationConfig) -> Diagnostics<'static> {
        let mut diagnostics = Diagnostics::new(None);
        let allowlists = normalize_allowlists(&config.allowlists, &mut diagnostics).unwrap();
        let pack = parse_content_pack(raw, &mut diagnostics).unwrap();
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.issues());
        let index = PackIndex::build(&pack);
        CrossReferenceValidator::new(&pack, &index, &allowlists, config).validate(&mut diagnostics);
        diagnostics
    }

    fn paths(diagnostics: &Diagnostics<'_>) -> Vec<String> {
        diagnostics
            .issues()
            .iter()
            .map(|issue| issue.path.to_string())
            .collect()
    }

    #[test]
    fn test_sample_pack_resolves() {
        let diagnostics = cross_reference(&fixtures::sample_pack(), &ValidationConfig::default());
        assert!(!diagnostics.has_errors());
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_formula_reference_reported_at_formula_path() {
        let mut raw = fixtures::sample_pack();
        raw["generators"][0]["purchase"]["costCurve"] = json!({
            "kind": "expression",
            "expression": { "kind": "ref", "target": { "type": "upgrade", "id": "sample-pack.missing" } }
        });
        let diagnostics = cross_reference(&raw, &ValidationConfig::default());
        assert_eq!(paths(&diagnostics), vec!["generators[0].purchase.costCurve"]);
        assert_eq!(
            diagnostics.issues()[0].message,
            "unknown upgrade 'sample-pack.missing'"
        );
    }

    #[test]
    fn test_nested_condition_paths() {
        let mut raw = fixtures::sample_pack();
        raw["resources"][1]["unlockCondition"] = json!({
            "kind": "allOf",
            "conditions": [
                { "kind": "always" },
                { "kind": "not", "condition": { "kind": "generatorLevel",
                  "generatorId": "sample-pack.ghost", "level": { "kind": "constant", "value": 1 } } }
            ]
        });
        let diagnostics = cross_reference(&raw, &ValidationConfig::default());
        assert_eq!(
            paths(&diagnostics),
            vec!["resources[1].unlockCondition.conditions[1].condition.generatorId"]
        );
    }

    #[test]
    fn test_upgrade_effects_and_prerequisites() {
        let mut raw = fixtures::sample_pack();
        raw["upgrades"] = json!([{
            "id": "sample-pack.overclock",
            "name": "Overclock",
            "targets": [{ "kind": "generator", "id": "sample-pack.reactor" }],
            "cost": { "currencyId": "sample-pack.energy", "costCurve": { "kind": "constant", "value": 50 } },
            "effects": [
                { "kind": "modifyGeneratorRate", "generatorId": "sample-pack.reactor",
                  "operation": "multiply", "value": { "kind": "constant", "value": 2 } },
                { "kind": "grantAutomation", "automationId": "sample-pack.nope" },
                { "kind": "emitEvent", "eventId": "sample-pack.boom" }
            ],
            "prerequisites": ["sample-pack.starter"]
        }]);
        let diagnostics = cross_reference(&raw, &ValidationConfig::default());
        assert_eq!(
            paths(&diagnostics),
            vec!["upgrades[0].effects[1].automationId", "upgrades[0].prerequisites[0]"]
        );
        // No catalogue: unknown events only warn.
        assert_eq!(diagnostics.warnings().len(), 1);
        assert_eq!(
            diagnostics.warnings()[0].path.to_string(),
            "upgrades[0].effects[2].eventId"
        );
    }

    #[test]
    fn test_unknown_event_is_error_with_catalogue() {
        let mut raw = fixtures::sample_pack();
        raw["achievements"] = json!([{
            "id": "sample-pack.first-light",
            "name": "First Light",
            "track": { "kind": "resource", "resourceId": "sample-pack.energy",
                       "threshold": { "kind": "constant", "value": 100 } },
            "onUnlockEvents": ["sample-pack.declared", "runtime.tick", "sample-pack.unknown"]
        }]);
        raw["runtimeEvents"] = json!([{ "id": "sample-pack.declared" }]);
        let config = ValidationConfig {
            runtime_event_catalogue: vec!["runtime.tick".to_string()],
            ..ValidationConfig::default()
        };
        let diagnostics = cross_reference(&raw, &config);
        assert_eq!(paths(&diagnostics), vec!["achievements[0].onUnlockEvents[2]"]);
    }

    #[test]
    fn test_catalogue_collision() {
        let mut raw = fixtures::sample_pack();
        raw["runtimeEvents"] = json!([{ "id": "runtime.tick" }]);
        let config = ValidationConfig {
            runtime_event_catalogue: vec!["runtime.tick".to_string()],
            ..ValidationConfig::default()
        };
        let diagnostics = cross_reference(&raw, &config);
        assert_eq!(paths(&diagnostics), vec!["runtimeEvents[0].id"]);
    }

    #[test]
    fn test_mission_min_stats_checked_against_entity() {
        let mut raw = fixtures::sample_pack();
        raw["entities"] = json!([{
            "id": "sample-pack.scout",
            "name": "Scout",
            "stats": [{ "id": "speed", "name": "Speed", "baseValue": { "kind": "constant", "value": 2 } }]
        }]);
        raw["transforms"] = json!([{
            "id": "sample-pack.expedition",
            "name": "Expedition",
            "mode": "mission",
            "duration": { "kind": "constant", "value": 60 },
            "outputs": [{ "resourceId": "sample-pack.crystal", "amount": { "kind": "constant", "value": 3 } }],
            "entityRequirements": [{
                "entityId": "sample-pack.scout",
                "minStats": {
                    "speed": { "kind": "constant", "value": 1 },
                    "strength": { "kind": "constant", "value": 1 }
                }
            }]
        }]);
        let diagnostics = cross_reference(&raw, &ValidationConfig::default());
        assert_eq!(
            paths(&diagnostics),
            vec!["transforms[0].entityRequirements[0].minStats.strength"]
        );
    }

    #[test]
    fn test_system_automation_allowlist() {
        let mut raw = fixtures::sample_pack();
        raw["automations"] = json!([{
            "id": "sample-pack.autosave",
            "name": "Autosave",
            "targetType": "system",
            "systemTargetId": "offline-catchup",
            "trigger": { "kind": "commandQueueEmpty" }
        }]);
        let mut config = ValidationConfig::default();
        config.allowlists.system_automation_targets =
            Some(crate::options::AllowlistSpec::required(["research-daemon"]));
        let diagnostics = cross_reference(&raw, &config);
        assert_eq!(paths(&diagnostics), vec!["automations[0].systemTargetId"]);
    }
}
