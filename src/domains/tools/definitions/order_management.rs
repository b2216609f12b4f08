//! Order management tool definition.
//!
//! Applies strict cart commands to the session's order. The calling model is
//! responsible for turning user intent into the command grammar; natural
//! language is answered with the guided-retry grammar reminder, never an
//! MCP-level failure.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::default_session_id;
use crate::domains::orders::{grammar_help, parse_command, CartEngine, OutcomeKind};
use crate::domains::sessions::lock_session;
use crate::domains::tools::ToolContext;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the order management tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderManagementParams {
    /// A strict cart command, e.g. "ADD:101:2" or "CLEAR".
    pub query: String,

    /// Key of the tenant (restaurant) the order is against.
    pub tenant_key: String,

    /// Conversation session identifier.
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Order management tool - mutates the session cart via strict commands.
pub struct OrderManagementTool;

impl OrderManagementTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "order_management";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "MANAGES THE ORDER CART. Requires STRICT COMMAND \
        FORMAT in the 'query' argument: 'ADD:MenuItemID:Quantity' (e.g. 'ADD:101:2'), \
        'REMOVE:MenuItemID:Quantity' (e.g. 'REMOVE:Burger:1'), 'MODIFY:MenuItemID:Quantity', \
        'NOTE:text', 'CLEAR', 'PLACE ORDER', 'CONFIRM CANCEL'. Batch with ';' \
        (e.g. 'ADD:101:2;102'). YOU (the AI) must generate these commands from user intent. \
        DO NOT pass natural language like 'I want a burger'.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(tenant_key = %params.tenant_key, session_id = %params.session_id))]
    pub async fn execute(
        params: &OrderManagementParams,
        context: &Arc<ToolContext>,
    ) -> CallToolResult {
        info!("Order management called: {}", params.query);

        let tenant = match context.tenant_context(&params.tenant_key).await {
            Ok(tenant) => tenant,
            Err(e) => {
                warn!(tenant_key = %params.tenant_key, "tenant resolution failed: {e}");
                return CallToolResult::error(vec![Content::text(format!(
                    "Configuration error: {e}"
                ))]);
            }
        };

        let command = match parse_command(&params.query) {
            Ok(command) => command,
            Err(e) => {
                warn!(
                    tenant_key = %params.tenant_key,
                    query = %params.query,
                    "cart command failed to parse: {e}"
                );
                // Guided retry, not a hard failure.
                return CallToolResult::success(vec![Content::text(grammar_help(
                    &e,
                    &tenant.menu,
                ))]);
            }
        };

        let session = context.sessions.get_or_create(&params.session_id);
        let outcome = {
            let mut record = lock_session(&session);
            CartEngine::apply_command(&command, &tenant.menu, &mut record)
        };

        match outcome.kind {
            OutcomeKind::ConfigurationError => {
                CallToolResult::error(vec![Content::text(outcome.message)])
            }
            _ => CallToolResult::success(vec![Content::text(outcome.message)]),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<OrderManagementParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp router.
    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let context = context.clone();
            async move {
                let params: OrderManagementParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &context).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::intent::RuleClassifier;
    use crate::domains::sessions::{Phase, SessionStore};
    use crate::domains::tenants::{MenuItem, StaticTenantSource, TenantCatalog, TenantContext};
    use rmcp::model::RawContent;

    fn context_with_menu(menu: Vec<MenuItem>) -> Arc<ToolContext> {
        let source = StaticTenantSource::single("spice-villa", TenantContext::with_menu(menu));
        Arc::new(ToolContext::with_parts(
            Arc::new(Config::default()),
            Arc::new(SessionStore::new()),
            Arc::new(TenantCatalog::new(Box::new(source))),
            Arc::new(RuleClassifier::new()),
        ))
    }

    fn sample_menu() -> Vec<MenuItem> {
        vec![
            MenuItem {
                menu_id: "101".to_string(),
                name: "Classic Burger".to_string(),
                price: 199.0,
                is_veg: false,
                category: "Burgers".to_string(),
            },
            MenuItem {
                menu_id: "103".to_string(),
                name: "Coke".to_string(),
                price: 49.0,
                is_veg: true,
                category: "Beverages".to_string(),
            },
        ]
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn params(query: &str) -> OrderManagementParams {
        OrderManagementParams {
            query: query.to_string(),
            tenant_key: "spice-villa".to_string(),
            session_id: "s1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_then_add_accumulates_across_calls() {
        let context = context_with_menu(sample_menu());

        let first = OrderManagementTool::execute(&params("ADD:101:2"), &context).await;
        assert!(text_of(&first).contains("Added 2x Classic Burger"));

        let second = OrderManagementTool::execute(&params("ADD:Classic Burger:3"), &context).await;
        assert!(text_of(&second).contains("5x Classic Burger"));

        let session = context.sessions.get_or_create("s1");
        let record = lock_session(&session);
        assert_eq!(record.cart.get("101"), Some(&5));
        assert_eq!(record.phase, Phase::Ordering);
    }

    #[tokio::test]
    async fn test_natural_language_gets_grammar_help() {
        let context = context_with_menu(sample_menu());
        let result =
            OrderManagementTool::execute(&params("I want a burger please"), &context).await;

        // Guided retry is a normal response, not an MCP error.
        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        let text = text_of(&result);
        assert!(text.starts_with("COMMAND_ERROR"));
        assert!(text.contains("Classic Burger=101"));
    }

    #[tokio::test]
    async fn test_empty_menu_is_error_result() {
        let context = context_with_menu(Vec::new());
        let result = OrderManagementTool::execute(&params("ADD:101:1"), &context).await;

        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("no menu data"));
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_configuration_error() {
        let context = context_with_menu(sample_menu());
        let bad = OrderManagementParams {
            query: "ADD:101:1".to_string(),
            tenant_key: "nowhere".to_string(),
            session_id: "s1".to_string(),
        };
        let result = OrderManagementTool::execute(&bad, &context).await;

        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("unknown tenant key"));
    }

    #[tokio::test]
    async fn test_full_ordering_flow() {
        let context = context_with_menu(sample_menu());

        OrderManagementTool::execute(&params("ADD:101:2;103"), &context).await;
        let placed = OrderManagementTool::execute(&params("PLACE ORDER"), &context).await;
        assert!(text_of(&placed).contains("Order placed"));

        let pending = OrderManagementTool::execute(&params("CLEAR"), &context).await;
        assert!(text_of(&pending).contains("CONFIRM CANCEL"));

        let cancelled = OrderManagementTool::execute(&params("CONFIRM CANCEL"), &context).await;
        assert!(text_of(&cancelled).contains("Order cancelled"));

        let session = context.sessions.get_or_create("s1");
        let record = lock_session(&session);
        assert_eq!(record.phase, Phase::Idle);
        assert!(record.cart.is_empty());
    }
}
