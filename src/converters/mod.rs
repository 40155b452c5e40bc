//! Conversion between the structured record and plain map forms.
//!
//! Every entity serializes to a nested JSON map through [`to_dict`]. The
//! facade uses the same function for `dict` responses, so both return
//! types of one fetch always carry the same field values.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ChartError, Result};

/// Requested output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnType {
    /// Plain nested map, ready for JSON serialization.
    #[default]
    Dict,
    /// The validated entity as is.
    Model,
}

impl FromStr for ReturnType {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dict" => Ok(ReturnType::Dict),
            "model" => Ok(ReturnType::Model),
            other => Err(ChartError::InvalidConfig(format!(
                "return type must be 'dict' or 'model', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Dict => f.write_str("dict"),
            ReturnType::Model => f.write_str("model"),
        }
    }
}

/// Data in the representation chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData<T> {
    Dict(Value),
    Model(T),
}

impl<T: Serialize> ChartData<T> {
    /// Wrap `value` in the requested representation.
    pub fn convert(value: T, return_type: ReturnType) -> Result<Self> {
        match return_type {
            ReturnType::Dict => Ok(ChartData::Dict(to_dict(&value)?)),
            ReturnType::Model => Ok(ChartData::Model(value)),
        }
    }

    /// Get the plain map form, converting a model if needed.
    pub fn into_dict(self) -> Result<Value> {
        match self {
            ChartData::Dict(value) => Ok(value),
            ChartData::Model(model) => to_dict(&model),
        }
    }
}

impl<T> ChartData<T> {
    pub fn as_dict(&self) -> Option<&Value> {
        match self {
            ChartData::Dict(value) => Some(value),
            ChartData::Model(_) => None,
        }
    }

    pub fn as_model(&self) -> Option<&T> {
        match self {
            ChartData::Model(model) => Some(model),
            ChartData::Dict(_) => None,
        }
    }

    pub fn into_model(self) -> Option<T> {
        match self {
            ChartData::Model(model) => Some(model),
            ChartData::Dict(_) => None,
        }
    }
}

/// Convert an entity to its plain map form.
///
/// Dates render as `YYYY-MM-DD`; absent optional fields are omitted.
pub fn to_dict<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
