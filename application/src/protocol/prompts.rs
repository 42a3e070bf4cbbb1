//! Prompt catalog for `list-prompts`.
//!
//! Discovery surface: one example invocation template per registered tool,
//! phrased per category. The catalog is derived from the registry at call
//! time so it always reflects what is actually invocable.

use switchboard_domain::protocol::PromptTemplate;
use switchboard_domain::tool::entities::ToolCategory;
use switchboard_domain::tool::registry::ToolRegistry;

/// Example phrasing for each tool category
fn category_template(category: ToolCategory) -> &'static str {
    match category {
        ToolCategory::Lookup => "What does {tool} report right now?",
        ToolCategory::Transaction => "Please run {tool} for me",
        ToolCategory::Verification => "Can you confirm {tool} passes?",
        ToolCategory::General => "Use {tool} to help with my request",
    }
}

/// Build the prompt catalog for every registered tool, in registration order.
pub fn catalog(registry: &ToolRegistry) -> Vec<PromptTemplate> {
    registry
        .list()
        .into_iter()
        .map(|tool| PromptTemplate {
            name: format!("{}-example", tool.name),
            category: tool.category.as_str().to_string(),
            tool: tool.name.clone(),
            template: category_template(tool.category).replace("{tool}", &tool.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use switchboard_domain::tool::entities::ToolDefinition;
    use switchboard_domain::tool::handler::FnToolHandler;

    #[test]
    fn test_catalog_covers_every_tool() {
        let mut registry = ToolRegistry::new();
        let handler = || Arc::new(FnToolHandler::new(|_| Ok(serde_json::json!(null))));
        registry
            .register(
                ToolDefinition::new("balance_lookup", "Balance", ToolCategory::Lookup),
                handler(),
            )
            .unwrap();
        registry
            .register(
                ToolDefinition::new("transfer", "Transfer", ToolCategory::Transaction),
                handler(),
            )
            .unwrap();

        let catalog = catalog(&registry);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].name, "balance_lookup-example");
        assert_eq!(catalog[0].category, "lookup");
        assert!(catalog[0].template.contains("balance_lookup"));
        assert_eq!(catalog[1].category, "transaction");
    }

    #[test]
    fn test_catalog_empty_registry() {
        assert!(catalog(&ToolRegistry::new()).is_empty());
    }
}
