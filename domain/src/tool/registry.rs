//! Tool Registry
//!
//! The [`ToolRegistry`] maps unique tool names to their definition plus
//! executable handler. It is the leaf of the invocation pipeline: pure
//! in-memory bookkeeping, populated at process start and read-mostly
//! afterwards.
//!
//! Registration overwrites an existing tool of the same name by default;
//! [`register_strict`](ToolRegistry::register_strict) fails with
//! `DuplicateCapability` instead. `list()` preserves first-registration
//! order so discovery output is stable.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::DomainError;

use super::entities::ToolDefinition;
use super::handler::ToolHandler;

/// A definition paired with its executable
#[derive(Clone)]
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

/// Registry of named tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool, replacing any prior tool of the same name.
    ///
    /// Fails only if either schema is structurally ill-formed. A replaced
    /// tool keeps its original position in registration order.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), DomainError> {
        Self::check_schemas(&definition)?;

        let name = definition.name.clone();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, RegisteredTool { definition, handler });
        Ok(())
    }

    /// Register a tool, failing with `DuplicateCapability` if the name is taken.
    pub fn register_strict(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), DomainError> {
        if self.tools.contains_key(&definition.name) {
            return Err(DomainError::DuplicateCapability(definition.name.clone()));
        }
        self.register(definition, handler)
    }

    /// Get a registered tool by name
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Get only the definition of a registered tool
    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|t| &t.definition)
    }

    /// Pure existence check
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool definitions in registration order
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| &t.definition)
            .collect()
    }

    /// All tool names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn check_schemas(definition: &ToolDefinition) -> Result<(), DomainError> {
        definition
            .input_schema
            .check_well_formed()
            .map_err(|reason| DomainError::MalformedSchema {
                tool: definition.name.clone(),
                reason,
            })?;
        definition
            .output_schema
            .check_well_formed()
            .map_err(|reason| DomainError::MalformedSchema {
                tool: definition.name.clone(),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCategory;
    use crate::tool::handler::FnToolHandler;
    use crate::tool::schema::{SchemaProperty, ToolSchema};
    use serde_json::json;

    fn echo_handler() -> Arc<dyn ToolHandler> {
        Arc::new(FnToolHandler::new(|_| Ok(json!({ "ok": true }))))
    }

    fn lookup_tool(name: &str) -> ToolDefinition {
        ToolDefinition::new(name, format!("Tool: {}", name), ToolCategory::Lookup)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry
            .register(lookup_tool("balance_lookup"), echo_handler())
            .unwrap();

        assert!(registry.has("balance_lookup"));
        assert!(!registry.has("unknown"));
        assert_eq!(
            registry.definition("balance_lookup").unwrap().name,
            "balance_lookup"
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_overwrites_by_default() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                lookup_tool("lookup").with_capability("v1"),
                echo_handler(),
            )
            .unwrap();
        registry
            .register(
                lookup_tool("lookup").with_capability("v2"),
                echo_handler(),
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.definition("lookup").unwrap().capabilities,
            vec!["v2"]
        );
    }

    #[test]
    fn test_register_strict_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        registry
            .register_strict(lookup_tool("lookup"), echo_handler())
            .unwrap();
        let err = registry
            .register_strict(lookup_tool("lookup"), echo_handler())
            .unwrap_err();
        assert!(err.is_duplicate_capability());
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["charlie", "alpha", "bravo"] {
            registry.register(lookup_tool(name), echo_handler()).unwrap();
        }
        // Replacing a tool keeps its original slot
        registry
            .register(lookup_tool("alpha").with_capability("v2"), echo_handler())
            .unwrap();

        let names: Vec<&str> = registry.list().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["charlie", "alpha", "bravo"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), names);
    }

    #[test]
    fn test_register_rejects_malformed_schema() {
        let mut registry = ToolRegistry::new();
        let tool = lookup_tool("broken").with_input_schema(
            ToolSchema::new()
                .with_property(SchemaProperty::new("a", "A", true))
                .with_property(SchemaProperty::new("a", "A again", false)),
        );
        let err = registry.register(tool, echo_handler()).unwrap_err();
        assert!(matches!(err, DomainError::MalformedSchema { .. }));
        assert!(!registry.has("broken"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
    }
}
