//! Entity references embedded in formula and condition trees.

use crate::data::{Condition, EntityReference, ExpressionNode, NumericFormula};
use crate::ids::prestige_count_resource_id;

/// Call `collector` once for every entity reference inside `formula`.
///
/// References are reported per occurrence; a tree mentioning the same
/// resource twice reports it twice. Variable reads are not references.
pub fn collect_formula_entity_references<'a, F>(formula: &'a NumericFormula, collector: &mut F)
where
    F: FnMut(EntityReference<'a>),
{
    match formula {
        NumericFormula::Constant { .. }
        | NumericFormula::Linear { .. }
        | NumericFormula::Exponential { .. }
        | NumericFormula::Polynomial { .. } => {}
        NumericFormula::Piecewise { pieces } => {
            for piece in pieces {
                collect_formula_entity_references(&piece.formula, collector);
            }
        }
        NumericFormula::Expression { expression } => {
            collect_expression_entity_references(expression, collector);
        }
    }
}

/// Call `collector` once for every entity reference inside `node`.
pub fn collect_expression_entity_references<'a, F>(node: &'a ExpressionNode, collector: &mut F)
where
    F: FnMut(EntityReference<'a>),
{
    match node {
        ExpressionNode::Literal { .. } => {}
        ExpressionNode::Ref { target } => {
            if let Some(reference) = target.entity_reference() {
                collector(reference);
            }
        }
        ExpressionNode::Binary { left, right, .. } => {
            collect_expression_entity_references(left, collector);
            collect_expression_entity_references(right, collector);
        }
        ExpressionNode::Unary { operand, .. } => {
            collect_expression_entity_references(operand, collector);
        }
        ExpressionNode::Call { args, .. } => {
            for arg in args {
                collect_expression_entity_references(arg, collector);
            }
        }
    }
}

/// Every entity reference inside `formula`, in tree order.
#[must_use]
pub fn formula_entity_references(formula: &NumericFormula) -> Vec<EntityReference<'_>> {
    let mut references = Vec::new();
    collect_formula_entity_references(formula, &mut |reference| references.push(reference));
    references
}

/// Ids a condition depends on, for the unlock graph.
///
/// Only direct id fields count. Prestige count thresholds and completion
/// checks depend on the layer's companion count resource rather than the
/// layer itself. Flags and scripts are external and contribute nothing.
#[must_use]
pub fn condition_dependencies(condition: &Condition) -> Vec<String> {
    let mut dependencies = Vec::new();
    collect_condition_dependencies(condition, &mut dependencies);
    dependencies
}

fn collect_condition_dependencies(condition: &Condition, out: &mut Vec<String>) {
    match condition {
        Condition::Always | Condition::Never | Condition::Flag { .. } | Condition::Script { .. } => {}
        Condition::ResourceThreshold { resource_id, .. } => out.push(resource_id.clone()),
        Condition::GeneratorLevel { generator_id, .. } => out.push(generator_id.clone()),
        Condition::UpgradeOwned { upgrade_id, .. } => out.push(upgrade_id.clone()),
        Condition::PrestigeCountThreshold {
            prestige_layer_id, ..
        }
        | Condition::PrestigeCompleted { prestige_layer_id } => {
            out.push(prestige_count_resource_id(prestige_layer_id));
        }
        Condition::PrestigeUnlocked { prestige_layer_id } => out.push(prestige_layer_id.clone()),
        Condition::AllOf { conditions } | Condition::AnyOf { conditions } => {
            for child in conditions {
                collect_condition_dependencies(child, out);
            }
        }
        Condition::Not { condition } => collect_condition_dependencies(condition, out),
    }
}
