//! Menu guide tool definition.
//!
//! Answers menu questions for one tenant: category navigation, constrained
//! recommendations, or the raw menu listing for the calling model to parse.

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
use crate::domains::intent::classify_or_neutral;
use crate::domains::menu::MenuQueryEngine;
use crate::domains::sessions::lock_session;
use crate::domains::tools::ToolContext;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the menu guide tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MenuGuideParams {
    /// The user's menu question, verbatim.
    pub query: String,

    /// Key of the tenant (restaurant) whose menu to read.
    pub tenant_key: String,

    /// Conversation session identifier.
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Menu guide tool - reads the tenant menu and recommends items.
pub struct MenuGuideTool;

impl MenuGuideTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "menu_guide";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "RETURNS MENU DATA. Use this to read the tenant's \
        menu: the output is a category listing, a short recommendation, or the raw item list. \
        YOU (the AI) must parse this data to answer user questions based on the user's 'query'.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(tenant_key = %params.tenant_key, session_id = %params.session_id))]
    pub async fn execute(params: &MenuGuideParams, context: &Arc<ToolContext>) -> CallToolResult {
        info!("Menu guide called: {}", params.query);

        let tenant = match context.tenant_context(&params.tenant_key).await {
            Ok(tenant) => tenant,
            Err(e) => {
                warn!(tenant_key = %params.tenant_key, "tenant resolution failed: {e}");
                return CallToolResult::error(vec![Content::text(format!(
                    "Configuration error: {e}"
                ))]);
            }
        };

        let intent = classify_or_neutral(
            context.classifier.as_ref(),
            context.classifier_timeout(),
            &params.query,
            &tenant,
        )
        .await;

        let session = context.sessions.get_or_create(&params.session_id);
        let reply = {
            let mut record = lock_session(&session);
            MenuQueryEngine::answer(&intent, &tenant, &mut record)
        };

        CallToolResult::success(vec![Content::text(reply.transcript)])
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MenuGuideParams>(),
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
                let params: MenuGuideParams =
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
                menu_id: "201".to_string(),
                name: "Kunafa".to_string(),
                price: 149.0,
                is_veg: true,
                category: "Desserts".to_string(),
            },
        ]
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    fn params(query: &str, tenant_key: &str) -> MenuGuideParams {
        MenuGuideParams {
            query: query.to_string(),
            tenant_key: tenant_key.to_string(),
            session_id: "s1".to_string(),
        }
    }

    #[test]
    fn test_session_id_defaults() {
        let json = r#"{"query": "menu", "tenant_key": "spice-villa"}"#;
        let params: MenuGuideParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.session_id, "default");
    }

    #[tokio::test]
    async fn test_category_navigation_updates_session() {
        let context = context_with_menu(sample_menu());
        let result = MenuGuideTool::execute(&params("show me burgers", "spice-villa"), &context).await;

        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(text_of(&result).contains("Here is our Burgers menu."));

        let session = context.sessions.get_or_create("s1");
        let record = lock_session(&session);
        assert_eq!(record.phase, Phase::MenuBrowsing);
        assert_eq!(record.current_category, "Burgers");
    }

    #[tokio::test]
    async fn test_raw_menu_fallback() {
        let context = context_with_menu(sample_menu());
        let result = MenuGuideTool::execute(&params("hello there", "spice-villa"), &context).await;

        let text = text_of(&result);
        assert!(text.contains("AVAILABLE CATEGORIES"));
        assert!(text.contains("Classic Burger (ID: 101)"));
    }

    #[tokio::test]
    async fn test_empty_menu_fixed_response() {
        let context = context_with_menu(Vec::new());
        let result = MenuGuideTool::execute(&params("show me burgers", "spice-villa"), &context).await;

        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert!(text_of(&result).contains("couldn't find any menu data"));

        // The session is not mutated for a tenant without data.
        let session = context.sessions.get_or_create("s1");
        assert_eq!(lock_session(&session).phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_configuration_error() {
        let context = context_with_menu(sample_menu());
        let result = MenuGuideTool::execute(&params("menu", "nowhere"), &context).await;

        assert!(result.is_error.unwrap_or(false));
        assert!(text_of(&result).contains("Configuration error"));
    }
}
