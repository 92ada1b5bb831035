//! Hyperparameter values

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A concrete hyperparameter value (range bound or grid candidate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Categorical(String),
}

impl ParameterValue {
    /// Get as float (converts int to float if needed)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as int; floats are not truncated
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Categorical(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ParameterValue::Int(_) | ParameterValue::Float(_))
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Int(_) => "int",
            ParameterValue::Float(_) => "float",
            ParameterValue::Categorical(_) => "string",
        }
    }

    /// Convert into the JSON representation used for config fields
    pub fn to_json(&self) -> Value {
        match self {
            ParameterValue::Bool(b) => Value::Bool(*b),
            ParameterValue::Int(v) => Value::from(*v),
            ParameterValue::Float(v) => Value::from(*v),
            ParameterValue::Categorical(s) => Value::String(s.clone()),
        }
    }

    /// Read a scalar JSON value; arrays, objects and null have no
    /// parameter representation
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ParameterValue::Bool(*b)),
            Value::Number(n) if n.is_f64() => n.as_f64().map(ParameterValue::Float),
            Value::Number(n) => n
                .as_i64()
                .map(ParameterValue::Int)
                .or_else(|| n.as_f64().map(ParameterValue::Float)),
            Value::String(s) => Some(ParameterValue::Categorical(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(b) => write!(f, "{b}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Categorical(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Int(v)
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Categorical(v.to_string())
    }
}
