//! # Claim Tree
//!
//! [`ClaimNode`] is the tagged variant over which digest reconciliation
//! recurses: objects, arrays, and everything else as an opaque scalar.
//! Converting from and back into `serde_json::Value` is lossless.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::reserved::ARRAY_ELEMENT_DIGEST;

/// A node in a decoded token payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimNode {
    /// A JSON object.
    Object(BTreeMap<String, ClaimNode>),
    /// A JSON array.
    Array(Vec<ClaimNode>),
    /// Any other JSON value (string, number, bool, null).
    Scalar(Value),
}

impl ClaimNode {
    /// If this node is an array element wrapper `{"...": <x>}`, return `x`.
    ///
    /// The wrapper payload is returned unvalidated so the caller can reject
    /// a non-string digest instead of silently treating it as a plain
    /// object.
    pub fn as_array_element_wrapper(&self) -> Option<&ClaimNode> {
        match self {
            Self::Object(map) if map.len() == 1 => map.get(ARRAY_ELEMENT_DIGEST),
            _ => None,
        }
    }

    /// Returns the string if this node is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Convert back into a JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Array(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
            Self::Scalar(value) => value,
        }
    }
}

impl From<Value> for ClaimNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            other => Self::Scalar(other),
        }
    }
}

impl From<ClaimNode> for Value {
    fn from(node: ClaimNode) -> Self {
        node.into_value()
    }
}
