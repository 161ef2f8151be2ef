//! Numeric formula and expression trees.
//!
//! The compiler never evaluates these. It only walks them to find the
//! entities they reference (see [`crate::validation::references`]).

use serde::{Deserialize, Deserializer, Serialize};

use super::EntityKind;

/// A numeric computation, usually parameterized by level or time.
///
/// # Example
///
/// ```json
/// { "kind": "exponential", "base": 10.0, "growth": 1.15 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum NumericFormula {
    /// Fixed value.
    Constant {
        /// The value.
        value: f64,
    },

    /// `base + slope * level`.
    Linear {
        /// Value at level zero.
        base: f64,
        /// Increase per level.
        slope: f64,
    },

    /// `base * growth^level + offset`.
    Exponential {
        /// Value at level zero.
        base: f64,
        /// Growth factor per level.
        growth: f64,
        /// Constant added after growth.
        #[serde(default)]
        offset: f64,
    },

    /// `c0 + c1 * level + c2 * level^2 + ...`.
    Polynomial {
        /// Coefficients, lowest order first.
        #[serde(deserialize_with = "non_empty")]
        coefficients: Vec<f64>,
    },

    /// Different formulas over consecutive level ranges.
    Piecewise {
        /// Pieces in ascending level order.
        #[serde(deserialize_with = "non_empty")]
        pieces: Vec<PiecewiseSegment>,
    },

    /// Arbitrary expression tree.
    Expression {
        /// Root node.
        expression: ExpressionNode,
    },
}

impl NumericFormula {
    /// Shorthand for a constant formula.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Constant { value }
    }
}

/// One range of a piecewise formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PiecewiseSegment {
    /// Last level (exclusive) this piece applies to. `None` for the tail.
    #[serde(default)]
    pub until_level: Option<f64>,

    /// Formula used within the range.
    pub formula: NumericFormula,
}

/// Node of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase", deny_unknown_fields)]
pub enum ExpressionNode {
    /// Numeric literal.
    Literal {
        /// The value.
        value: f64,
    },

    /// Value read from a variable or from another entity.
    Ref {
        /// What is read.
        target: RefTarget,
    },

    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOperator,
        /// Left operand.
        left: Box<ExpressionNode>,
        /// Right operand.
        right: Box<ExpressionNode>,
    },

    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOperator,
        /// Operand.
        operand: Box<ExpressionNode>,
    },

    /// Named function call.
    Call {
        /// Function name.
        name: String,
        /// Arguments in call order.
        #[serde(default)]
        args: Vec<ExpressionNode>,
    },
}

/// Target of a `ref` expression node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", deny_unknown_fields)]
pub enum RefTarget {
    /// Runtime-provided variable; not an entity reference.
    Variable {
        /// Variable name.
        name: VariableName,
    },
    /// Resource amount.
    Resource {
        /// Resource id.
        id: String,
    },
    /// Generator level.
    Generator {
        /// Generator id.
        id: String,
    },
    /// Upgrade purchase count.
    Upgrade {
        /// Upgrade id.
        id: String,
    },
    /// Automation state.
    Automation {
        /// Automation id.
        id: String,
    },
    /// Prestige layer state.
    PrestigeLayer {
        /// Prestige layer id.
        id: String,
    },
}

impl RefTarget {
    /// The entity this target points at, or `None` for variables.
    #[must_use]
    pub fn entity_reference(&self) -> Option<EntityReference<'_>> {
        let (kind, id) = match self {
            Self::Variable { .. } => return None,
            Self::Resource { id } => (EntityKind::Resource, id),
            Self::Generator { id } => (EntityKind::Generator, id),
            Self::Upgrade { id } => (EntityKind::Upgrade, id),
            Self::Automation { id } => (EntityKind::Automation, id),
            Self::PrestigeLayer { id } => (EntityKind::PrestigeLayer, id),
        };
        Some(EntityReference { kind, id })
    }
}

/// Variables supplied by the runtime when evaluating formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableName {
    /// Current level or purchase count.
    Level,
    /// Elapsed time in seconds.
    Time,
    /// Step duration in seconds.
    DeltaTime,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Exponentiation.
    Pow,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOperator {
    /// Absolute value.
    Abs,
    /// Round up.
    Ceil,
    /// Round down.
    Floor,
    /// Round to nearest.
    Round,
    /// Square root.
    Sqrt,
    /// Base-10 logarithm.
    Log10,
    /// Natural logarithm.
    Ln,
    /// Negation.
    Neg,
}

/// A typed reference to another entity found inside a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityReference<'a> {
    /// Collection the id must resolve in.
    pub kind: EntityKind,
    /// Referenced id.
    pub id: &'a str,
}

fn non_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Vec::<T>::deserialize(deserializer)?;
    if items.is_empty() {
        return Err(serde::de::Error::custom("expected at least one element"));
    }
    Ok(items)
}
