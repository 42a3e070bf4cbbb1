//! Tool schemas — declarative argument and output contracts.
//!
//! A [`ToolSchema`] is an ordered list of named properties. Ordering matters:
//! validation reports the **first** violated constraint, so declaration order
//! is the tie-break that makes error messages deterministic.
//!
//! Validation checks, in order: required properties present, declared types
//! match, string patterns match, no unknown properties. Registration-time
//! well-formedness is weaker on purpose: only duplicate property names and
//! non-compiling patterns are rejected there.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Type of a schema property, mapped onto JSON value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
        }
    }

    /// Check whether a JSON value inhabits this type.
    ///
    /// Integers also satisfy `Number` (JSON draws no line between them).
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            PropertyType::String => value.is_string(),
            PropertyType::Integer => value.is_i64() || value.is_u64(),
            PropertyType::Number => value.is_number(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Object => value.is_object(),
            PropertyType::Array => value.is_array(),
        }
    }

    /// Describe a JSON value's kind for error messages
    fn describe(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single named property in a tool schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Property name
    pub name: String,
    /// Property description
    pub description: String,
    /// Declared type
    pub prop_type: PropertyType,
    /// Whether this property is required
    pub required: bool,
    /// Optional regex constraint (string properties only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl SchemaProperty {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prop_type: PropertyType::String,
            required,
            pattern: None,
        }
    }

    pub fn with_type(mut self, prop_type: PropertyType) -> Self {
        self.prop_type = prop_type;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// The first constraint a set of arguments violated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    MissingRequired { property: String },
    TypeMismatch { property: String, expected: String, actual: String },
    PatternMismatch { property: String, pattern: String },
    UnknownProperty { property: String },
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaViolation::MissingRequired { property } => {
                write!(f, "Missing required property '{}'", property)
            }
            SchemaViolation::TypeMismatch { property, expected, actual } => {
                write!(f, "Property '{}': expected {}, got {}", property, expected, actual)
            }
            SchemaViolation::PatternMismatch { property, pattern } => {
                write!(f, "Property '{}' does not match pattern '{}'", property, pattern)
            }
            SchemaViolation::UnknownProperty { property } => {
                write!(f, "Unknown property '{}'", property)
            }
        }
    }
}

impl std::error::Error for SchemaViolation {}

/// Ordered property schema for tool inputs and outputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSchema {
    properties: Vec<SchemaProperty>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self { properties: Vec::new() }
    }

    pub fn with_property(mut self, property: SchemaProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    /// Structural well-formedness check applied at registration time.
    ///
    /// Rejects duplicate property names and patterns that do not compile.
    /// Anything beyond that is the tool author's responsibility.
    pub fn check_well_formed(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(format!("duplicate property '{}'", property.name));
            }
            if let Some(pattern) = &property.pattern
                && Regex::new(pattern).is_err()
            {
                return Err(format!(
                    "property '{}' has invalid pattern '{}'",
                    property.name, pattern
                ));
            }
        }
        Ok(())
    }

    /// Validate arguments against this schema.
    ///
    /// Returns the first violated constraint: required properties in
    /// declaration order, then type and pattern checks in declaration
    /// order, then unknown properties in sorted order.
    pub fn validate(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<(), SchemaViolation> {
        for property in &self.properties {
            if property.required && !arguments.contains_key(&property.name) {
                return Err(SchemaViolation::MissingRequired {
                    property: property.name.clone(),
                });
            }
        }

        for property in &self.properties {
            let Some(value) = arguments.get(&property.name) else {
                continue;
            };
            if !property.prop_type.matches(value) {
                return Err(SchemaViolation::TypeMismatch {
                    property: property.name.clone(),
                    expected: property.prop_type.as_str().to_string(),
                    actual: PropertyType::describe(value).to_string(),
                });
            }
            if let Some(pattern) = &property.pattern
                && let Some(text) = value.as_str()
                && let Ok(re) = Regex::new(pattern)
                && !re.is_match(text)
            {
                return Err(SchemaViolation::PatternMismatch {
                    property: property.name.clone(),
                    pattern: pattern.clone(),
                });
            }
        }

        let declared: std::collections::HashSet<&str> =
            self.properties.iter().map(|p| p.name.as_str()).collect();
        let mut unknown: Vec<&str> = arguments
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !declared.contains(k))
            .collect();
        unknown.sort_unstable();
        if let Some(property) = unknown.first() {
            return Err(SchemaViolation::UnknownProperty {
                property: property.to_string(),
            });
        }

        Ok(())
    }

    /// Render as a JSON Schema object for `list-tools` output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for property in &self.properties {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), serde_json::json!(property.prop_type.as_str()));
            prop.insert(
                "description".to_string(),
                serde_json::json!(property.description),
            );
            if let Some(pattern) = &property.pattern {
                prop.insert("pattern".to_string(), serde_json::json!(pattern));
            }
            properties.insert(property.name.clone(), serde_json::Value::Object(prop));

            if property.required {
                required.push(serde_json::json!(property.name));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
