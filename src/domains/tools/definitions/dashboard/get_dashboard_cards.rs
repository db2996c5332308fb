//! Get dashboard cards tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::canvas::{CanvasError, Query};
use crate::core::cache::{CacheTtl, cache_key};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{
    into_items, text_result, tool_model, tool_route,
};
use crate::domains::tools::format::{DASHBOARD_CARDS, format_list};
use crate::domains::tools::{ToolContext, ToolError};

/// Takes no arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetDashboardCardsParams {}

pub struct GetDashboardCardsTool;

impl GetDashboardCardsTool {
    pub const NAME: &'static str = "get_dashboard_cards";

    pub const DESCRIPTION: &'static str =
        "Get the course cards shown on the user's Canvas dashboard.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        params: GetDashboardCardsParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let response = context
                .client()
                .get::<Value>("/dashboard/dashboard_cards", &Query::new())
                .await?;
            Ok::<_, CanvasError>(response.data)
        };

        let cards = into_items(context.cached(key, CacheTtl::Medium, fetch).await?);
        info!(count = cards.len(), "Fetched dashboard cards");

        Ok(text_result(format_list(&cards, &DASHBOARD_CARDS)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetDashboardCardsParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::parse_arguments;
    use serde_json::json;

    #[test]
    fn test_accepts_empty_arguments() {
        let tool = GetDashboardCardsTool::to_tool();
        assert!(parse_arguments::<GetDashboardCardsParams>(&tool, json!({})).is_ok());
        assert_eq!(tool.input_schema.get("type").unwrap(), "object");
    }
}
