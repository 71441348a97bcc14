//! Expression trees and their evaluation.

use thiserror::Error;

use family_rules::{CharacterId, PlayerStats, Stat};

use crate::cards::{Card, CardId};
use crate::social_graph::{AffinityPair, SocialGraph};

/// Absolute tolerance for float equality, absorbing accumulated rounding.
pub const EQUALITY_TOLERANCE: f32 = 0.01;

/// Everything an expression may read: the bound card, the social graph, and
/// the player's scalar state. Evaluation never mutates any of it.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub card: &'a Card,
    pub graph: &'a SocialGraph,
    pub stats: &'a PlayerStats,
    pub compatibility: i32,
}

/// Errors raised during expression evaluation.
///
/// An unbound role is a content bug, fatal to the evaluation it occurs in;
/// it carries the offending token and template so the author can find it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("role {token} is not bound in card template {template_id}")]
    UnboundRole { token: String, template_id: CardId },
}

/// Character-valued expression nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterExpr {
    /// The character bound to a role token in the current card.
    Role(String),
}

impl CharacterExpr {
    /// Reference the character bound to `token`.
    pub fn role(token: impl Into<String>) -> Self {
        CharacterExpr::Role(token.into())
    }

    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<CharacterId, EvalError> {
        match self {
            CharacterExpr::Role(token) => {
                ctx.card
                    .role_character(token)
                    .ok_or_else(|| EvalError::UnboundRole {
                        token: token.clone(),
                        template_id: ctx.card.template_id(),
                    })
            }
        }
    }
}

/// Integer-valued expression nodes: constants and player-state readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntExpr {
    Constant(i32),
    Reputation,
    Money,
    Health,
    /// The running family-compatibility counter.
    Compatibility,
}

impl IntExpr {
    pub fn constant(value: i32) -> Self {
        IntExpr::Constant(value)
    }

    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> i32 {
        match self {
            IntExpr::Constant(value) => *value,
            IntExpr::Reputation => ctx.stats.get(Stat::Reputation),
            IntExpr::Money => ctx.stats.get(Stat::Money),
            IntExpr::Health => ctx.stats.get(Stat::Health),
            IntExpr::Compatibility => ctx.compatibility,
        }
    }
}

/// Float-valued expression nodes.
///
/// The affinity readers resolve two characters and read their edge; a
/// disconnected pair reads as neutral 0.0 (the graph API itself still
/// distinguishes "no relationship" - boolean predicates branch on it).
#[derive(Debug, Clone, PartialEq)]
pub enum FloatExpr {
    Constant(f32),
    /// Explicit lift of an integer expression; there is no implicit
    /// coercion.
    Int(IntExpr),
    PositiveAffinity(CharacterExpr, CharacterExpr),
    NegativeAffinity(CharacterExpr, CharacterExpr),
    NetAffinity(CharacterExpr, CharacterExpr),
}

impl FloatExpr {
    pub fn constant(value: f32) -> Self {
        FloatExpr::Constant(value)
    }

    pub fn from_int(expr: IntExpr) -> Self {
        FloatExpr::Int(expr)
    }

    pub fn positive_affinity(one: CharacterExpr, two: CharacterExpr) -> Self {
        FloatExpr::PositiveAffinity(one, two)
    }

    pub fn negative_affinity(one: CharacterExpr, two: CharacterExpr) -> Self {
        FloatExpr::NegativeAffinity(one, two)
    }

    pub fn net_affinity(one: CharacterExpr, two: CharacterExpr) -> Self {
        FloatExpr::NetAffinity(one, two)
    }

    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<f32, EvalError> {
        match self {
            FloatExpr::Constant(value) => Ok(*value),
            FloatExpr::Int(expr) => Ok(expr.evaluate(ctx) as f32),
            FloatExpr::PositiveAffinity(one, two) => {
                Ok(affinity(ctx, one, two)?.map(|pair| pair.positive).unwrap_or(0.0))
            }
            FloatExpr::NegativeAffinity(one, two) => {
                Ok(affinity(ctx, one, two)?.map(|pair| pair.negative).unwrap_or(0.0))
            }
            FloatExpr::NetAffinity(one, two) => {
                Ok(affinity(ctx, one, two)?.map(|pair| pair.net()).unwrap_or(0.0))
            }
        }
    }
}

/// Boolean-valued expression nodes: the preconditions themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    /// Whether two characters are connected in the social graph.
    HasMet(CharacterExpr, CharacterExpr),
    LessThan(FloatExpr, FloatExpr),
    GreaterThan(FloatExpr, FloatExpr),
    /// Equality within [`EQUALITY_TOLERANCE`], never exact.
    EqualTo(FloatExpr, FloatExpr),
    /// Connected with net affinity strictly above the threshold.
    Likes {
        one: CharacterExpr,
        two: CharacterExpr,
        min_threshold: FloatExpr,
    },
    /// Connected with net affinity strictly below the threshold.
    Dislikes {
        one: CharacterExpr,
        two: CharacterExpr,
        max_threshold: FloatExpr,
    },
    And(Vec<BoolExpr>),
    Or(Vec<BoolExpr>),
}

impl BoolExpr {
    pub fn has_met(one: CharacterExpr, two: CharacterExpr) -> Self {
        BoolExpr::HasMet(one, two)
    }

    pub fn less_than(left: FloatExpr, right: FloatExpr) -> Self {
        BoolExpr::LessThan(left, right)
    }

    pub fn greater_than(left: FloatExpr, right: FloatExpr) -> Self {
        BoolExpr::GreaterThan(left, right)
    }

    pub fn equal_to(left: FloatExpr, right: FloatExpr) -> Self {
        BoolExpr::EqualTo(left, right)
    }

    pub fn likes(one: CharacterExpr, two: CharacterExpr, min_threshold: FloatExpr) -> Self {
        BoolExpr::Likes {
            one,
            two,
            min_threshold,
        }
    }

    pub fn dislikes(one: CharacterExpr, two: CharacterExpr, max_threshold: FloatExpr) -> Self {
        BoolExpr::Dislikes {
            one,
            two,
            max_threshold,
        }
    }

    pub fn and_of(conjuncts: Vec<BoolExpr>) -> Self {
        BoolExpr::And(conjuncts)
    }

    pub fn or_of(disjuncts: Vec<BoolExpr>) -> Self {
        BoolExpr::Or(disjuncts)
    }

    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<bool, EvalError> {
        match self {
            BoolExpr::HasMet(one, two) => {
                let a = one.evaluate(ctx)?;
                let b = two.evaluate(ctx)?;
                Ok(ctx.graph.are_connected(a, b))
            }
            BoolExpr::LessThan(left, right) => Ok(left.evaluate(ctx)? < right.evaluate(ctx)?),
            BoolExpr::GreaterThan(left, right) => Ok(left.evaluate(ctx)? > right.evaluate(ctx)?),
            BoolExpr::EqualTo(left, right) => {
                Ok((left.evaluate(ctx)? - right.evaluate(ctx)?).abs() < EQUALITY_TOLERANCE)
            }
            BoolExpr::Likes {
                one,
                two,
                min_threshold,
            } => match affinity(ctx, one, two)? {
                Some(pair) => Ok(pair.net() > min_threshold.evaluate(ctx)?),
                None => Ok(false),
            },
            BoolExpr::Dislikes {
                one,
                two,
                max_threshold,
            } => match affinity(ctx, one, two)? {
                Some(pair) => Ok(pair.net() < max_threshold.evaluate(ctx)?),
                None => Ok(false),
            },
            BoolExpr::And(conjuncts) => {
                for conjunct in conjuncts {
                    if !conjunct.evaluate(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BoolExpr::Or(disjuncts) => {
                for disjunct in disjuncts {
                    if disjunct.evaluate(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

fn affinity(
    ctx: &EvalContext<'_>,
    one: &CharacterExpr,
    two: &CharacterExpr,
) -> Result<Option<AffinityPair>, EvalError> {
    let a = one.evaluate(ctx)?;
    let b = two.evaluate(ctx)?;
    Ok(ctx.graph.affinity_between(a, b).copied())
}
