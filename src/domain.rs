//! Attribute domain metadata — pure value types, opaque to the graph core.
//!
//! A [`Domain`] describes the values an attribute may hold. The model stores
//! and exposes it unchanged; interpretation (validation, defaults, coercion)
//! belongs to collaborator modules.

use serde::{Deserialize, Serialize};

/// Allowed-values metadata for an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub data_type: DataType,
    #[serde(default)]
    pub constraints: Option<Constraints>,
}

impl Domain {
    /// Unconstrained domain over a data type.
    pub fn of(data_type: DataType) -> Self {
        Self {
            data_type,
            constraints: None,
        }
    }

    /// Attach constraints.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Some(constraints);
        self
    }
}

/// Supported attribute data types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    Timestamp,
    Enum(Vec<std::string::String>),
}

/// Validation constraints on attribute values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub valid_values: Option<Vec<String>>,
}
