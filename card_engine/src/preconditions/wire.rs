//! The tagged-JSON wire representation of preconditions.
//!
//! Each supported kind is a JSON object with a `Type` discriminant and
//! kind-specific fields. Decoding matches on the discriminant explicitly so
//! an unknown tag is reported with the raw string rather than a generic
//! serde error.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::{BoolExpr, CharacterExpr, FloatExpr};

/// Errors raised while decoding a precondition from content data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("unsupported precondition type: {tag}")]
    UnsupportedType { tag: String },

    #[error("precondition has a missing or malformed {field} field")]
    MalformedField { field: &'static str },
}

/// A precondition as it appears on the wire.
///
/// Thresholds default to 0 when omitted; [`Self::to_expr`] compiles the
/// decoded form into an evaluatable [`BoolExpr`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum PreconditionSpec {
    HasMet {
        #[serde(rename = "RoleOne")]
        role_one: String,
        #[serde(rename = "RoleTwo")]
        role_two: String,
    },
    LessThan {
        #[serde(rename = "Left")]
        left: f32,
        #[serde(rename = "Right")]
        right: f32,
    },
    GreaterThan {
        #[serde(rename = "Left")]
        left: f32,
        #[serde(rename = "Right")]
        right: f32,
    },
    EqualTo {
        #[serde(rename = "Left")]
        left: f32,
        #[serde(rename = "Right")]
        right: f32,
    },
    Likes {
        #[serde(rename = "RoleOne")]
        role_one: String,
        #[serde(rename = "RoleTwo")]
        role_two: String,
        #[serde(rename = "MinThreshold")]
        min_threshold: f32,
    },
    Dislikes {
        #[serde(rename = "RoleOne")]
        role_one: String,
        #[serde(rename = "RoleTwo")]
        role_two: String,
        #[serde(rename = "MaxThreshold")]
        max_threshold: f32,
    },
}

impl PreconditionSpec {
    /// Decode a precondition from its wire representation.
    pub fn from_value(value: &Value) -> Result<Self, PreconditionError> {
        let tag = require_str(value, "Type")?;

        match tag.as_str() {
            "HasMet" => Ok(PreconditionSpec::HasMet {
                role_one: require_str(value, "RoleOne")?,
                role_two: require_str(value, "RoleTwo")?,
            }),
            "LessThan" => Ok(PreconditionSpec::LessThan {
                left: require_f32(value, "Left")?,
                right: require_f32(value, "Right")?,
            }),
            "GreaterThan" => Ok(PreconditionSpec::GreaterThan {
                left: require_f32(value, "Left")?,
                right: require_f32(value, "Right")?,
            }),
            "EqualTo" => Ok(PreconditionSpec::EqualTo {
                left: require_f32(value, "Left")?,
                right: require_f32(value, "Right")?,
            }),
            "Likes" => Ok(PreconditionSpec::Likes {
                role_one: require_str(value, "RoleOne")?,
                role_two: require_str(value, "RoleTwo")?,
                min_threshold: optional_f32(value, "MinThreshold")?,
            }),
            "Dislikes" => Ok(PreconditionSpec::Dislikes {
                role_one: require_str(value, "RoleOne")?,
                role_two: require_str(value, "RoleTwo")?,
                max_threshold: optional_f32(value, "MaxThreshold")?,
            }),
            other => Err(PreconditionError::UnsupportedType {
                tag: other.to_string(),
            }),
        }
    }

    /// Compile into an evaluatable expression tree.
    pub fn to_expr(&self) -> BoolExpr {
        match self {
            PreconditionSpec::HasMet { role_one, role_two } => BoolExpr::has_met(
                CharacterExpr::role(role_one.clone()),
                CharacterExpr::role(role_two.clone()),
            ),
            PreconditionSpec::LessThan { left, right } => {
                BoolExpr::less_than(FloatExpr::constant(*left), FloatExpr::constant(*right))
            }
            PreconditionSpec::GreaterThan { left, right } => {
                BoolExpr::greater_than(FloatExpr::constant(*left), FloatExpr::constant(*right))
            }
            PreconditionSpec::EqualTo { left, right } => {
                BoolExpr::equal_to(FloatExpr::constant(*left), FloatExpr::constant(*right))
            }
            PreconditionSpec::Likes {
                role_one,
                role_two,
                min_threshold,
            } => BoolExpr::likes(
                CharacterExpr::role(role_one.clone()),
                CharacterExpr::role(role_two.clone()),
                FloatExpr::constant(*min_threshold),
            ),
            PreconditionSpec::Dislikes {
                role_one,
                role_two,
                max_threshold,
            } => BoolExpr::dislikes(
                CharacterExpr::role(role_one.clone()),
                CharacterExpr::role(role_two.clone()),
                FloatExpr::constant(*max_threshold),
            ),
        }
    }
}

fn require_str(value: &Value, field: &'static str) -> Result<String, PreconditionError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(PreconditionError::MalformedField { field })
}

fn require_f32(value: &Value, field: &'static str) -> Result<f32, PreconditionError> {
    value
        .get(field)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .ok_or(PreconditionError::MalformedField { field })
}

fn optional_f32(value: &Value, field: &'static str) -> Result<f32, PreconditionError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(0.0),
        Some(present) => present
            .as_f64()
            .map(|v| v as f32)
            .ok_or(PreconditionError::MalformedField { field }),
    }
}
