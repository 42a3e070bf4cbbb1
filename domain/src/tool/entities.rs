//! Tool domain entities

use serde::{Deserialize, Serialize};

use super::schema::ToolSchema;

/// Category of a tool, used for grouping in discovery output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// Read-only data retrieval (e.g. a balance lookup)
    Lookup,
    /// State-changing operations (e.g. a transfer)
    Transaction,
    /// Checks and confirmations (e.g. a compliance screen)
    Verification,
    /// Anything that fits no other category
    General,
}

impl ToolCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCategory::Lookup => "lookup",
            ToolCategory::Transaction => "transaction",
            ToolCategory::Verification => "verification",
            ToolCategory::General => "general",
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ToolCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lookup" => Ok(ToolCategory::Lookup),
            "transaction" => Ok(ToolCategory::Transaction),
            "verification" => Ok(ToolCategory::Verification),
            "general" => Ok(ToolCategory::General),
            _ => Err(format!("Invalid ToolCategory: {}", s)),
        }
    }
}

/// Definition of a tool exposed through the invocation protocol
///
/// The definition is the immutable contract half of a registered tool;
/// the executable half is a [`ToolHandler`](super::handler::ToolHandler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "balance_lookup")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Category used by the prompt catalog
    pub category: ToolCategory,
    /// Schema the call arguments are validated against
    pub input_schema: ToolSchema,
    /// Schema the handler output is checked against (best effort)
    pub output_schema: ToolSchema,
    /// Capability tags for discovery
    pub capabilities: Vec<String>,
    /// Whether successful results may be served from the result cache
    pub cacheable: bool,
    /// Cache time-to-live in seconds (ignored unless `cacheable`)
    pub cache_ttl_secs: u64,
    /// Whether invocation requires a resolvable user id
    pub requires_auth: bool,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            input_schema: ToolSchema::new(),
            output_schema: ToolSchema::new(),
            capabilities: Vec::new(),
            cacheable: false,
            cache_ttl_secs: 0,
            requires_auth: false,
        }
    }

    pub fn with_input_schema(mut self, schema: ToolSchema) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn with_output_schema(mut self, schema: ToolSchema) -> Self {
        self.output_schema = schema;
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Mark results cacheable for `ttl_secs` seconds
    pub fn cacheable_for(mut self, ttl_secs: u64) -> Self {
        self.cacheable = true;
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// Require a resolvable user id for invocation
    pub fn requiring_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::schema::{PropertyType, SchemaProperty};

    #[test]
    fn test_tool_category_roundtrip() {
        for category in [
            ToolCategory::Lookup,
            ToolCategory::Transaction,
            ToolCategory::Verification,
            ToolCategory::General,
        ] {
            let parsed: ToolCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("invalid".parse::<ToolCategory>().is_err());
    }

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new(
            "balance_lookup",
            "Look up an account balance",
            ToolCategory::Lookup,
        )
        .with_input_schema(
            ToolSchema::new().with_property(SchemaProperty::new("account_id", "Account", true)),
        )
        .with_capability("accounts")
        .cacheable_for(30)
        .requiring_auth();

        assert_eq!(tool.name, "balance_lookup");
        assert_eq!(tool.category, ToolCategory::Lookup);
        assert!(tool.cacheable);
        assert_eq!(tool.cache_ttl_secs, 30);
        assert!(tool.requires_auth);
        assert_eq!(tool.capabilities, vec!["accounts"]);
        assert_eq!(tool.input_schema.properties().len(), 1);
    }

    #[test]
    fn test_tool_definition_defaults() {
        let tool = ToolDefinition::new("echo", "Echo input", ToolCategory::General);
        assert!(!tool.cacheable);
        assert!(!tool.requires_auth);
        assert!(tool.input_schema.properties().is_empty());
    }

    #[test]
    fn test_property_type_on_builder() {
        let schema = ToolSchema::new().with_property(
            SchemaProperty::new("amount", "Amount to move", true).with_type(PropertyType::Number),
        );
        assert_eq!(schema.properties()[0].prop_type, PropertyType::Number);
    }
}
