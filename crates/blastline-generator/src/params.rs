//! Parameter schemas and typed parameter values.
//!
//! Each generator publishes a list of [`ParamSpec`]s. A UI collaborator
//! renders them, the user edits values, and the generator reads them back
//! through the typed getters on [`ParamValues`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParamError;

/// Kind of a parameter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// Boolean flag.
    Bool,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// A single parameter value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
}

impl ParamValue {
    /// The value's kind.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Int(_) => ParamKind::Int,
            Self::Float(_) => ParamKind::Float,
            Self::Bool(_) => ParamKind::Bool,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Schema entry describing one generator parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Lookup key, e.g. `raysPerAxis`.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Expected kind.
    pub kind: ParamKind,
    /// Value used when the caller supplies none.
    pub default: ParamValue,
}

impl ParamSpec {
    /// An integer parameter.
    pub fn int(key: &str, label: &str, default: i64) -> Self {
        Self::new(key, label, ParamKind::Int, ParamValue::Int(default))
    }

    /// A float parameter.
    pub fn float(key: &str, label: &str, default: f64) -> Self {
        Self::new(key, label, ParamKind::Float, ParamValue::Float(default))
    }

    /// A boolean parameter.
    pub fn boolean(key: &str, label: &str, default: bool) -> Self {
        Self::new(key, label, ParamKind::Bool, ParamValue::Bool(default))
    }

    fn new(key: &str, label: &str, kind: ParamKind, default: ParamValue) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            default,
        }
    }
}

/// Parameter values keyed by [`ParamSpec::key`], in schema order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamValues {
    values: IndexMap<String, ParamValue>,
}

impl ParamValues {
    /// An empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every parameter of `schema` set to its default.
    pub fn defaults(schema: &[ParamSpec]) -> Self {
        Self {
            values: schema
                .iter()
                .map(|spec| (spec.key.clone(), spec.default))
                .collect(),
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Overlay `overrides` on top of these values.
    pub fn merged(mut self, overrides: &ParamValues) -> Self {
        for (key, value) in &overrides.values {
            self.values.insert(key.clone(), *value);
        }
        self
    }

    /// Raw value under `key`.
    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.values.get(key).copied()
    }

    /// Integer value under `key`.
    pub fn get_int(&self, key: &str) -> Result<i64, ParamError> {
        match self.require(key)? {
            ParamValue::Int(v) => Ok(v),
            other => Err(wrong_kind(key, ParamKind::Int, other)),
        }
    }

    /// Float value under `key`. Integers are widened.
    pub fn get_float(&self, key: &str) -> Result<f64, ParamError> {
        match self.require(key)? {
            ParamValue::Float(v) => Ok(v),
            ParamValue::Int(v) => Ok(v as f64),
            other => Err(wrong_kind(key, ParamKind::Float, other)),
        }
    }

    /// Boolean value under `key`.
    pub fn get_bool(&self, key: &str) -> Result<bool, ParamError> {
        match self.require(key)? {
            ParamValue::Bool(v) => Ok(v),
            other => Err(wrong_kind(key, ParamKind::Bool, other)),
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn require(&self, key: &str) -> Result<ParamValue, ParamError> {
        self.get(key).ok_or_else(|| ParamError::Missing {
            key: key.to_string(),
        })
    }
}

fn wrong_kind(key: &str, expected: ParamKind, found: ParamValue) -> ParamError {
    ParamError::WrongKind {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
