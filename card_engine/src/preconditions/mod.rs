//! The precondition language: typed expression trees over a bound card and
//! game state.
//!
//! Expressions come in four closed families, one per result type
//! ([`BoolExpr`], [`IntExpr`], [`FloatExpr`], [`CharacterExpr`]), so mixing
//! families is ill-typed at construction rather than a runtime surprise.
//! Evaluation is a pure function of the tree and an [`EvalContext`]; nothing
//! is mutated.
//!
//! Content data carries preconditions as tagged JSON objects
//! ([`PreconditionSpec`]), which compile into [`BoolExpr`] trees.

mod expression;
mod wire;

pub use expression::*;
pub use wire::*;
