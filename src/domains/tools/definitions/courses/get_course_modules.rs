//! Get course modules tool definition.

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
    PAGE_SIZE, into_items, text_result, tool_model, tool_route,
};
use crate::domains::tools::format::{MODULES, format_list};
use crate::domains::tools::{ToolContext, ToolError};

/// Extra module data Canvas can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModuleInclude {
    Items,
    ContentDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetCourseModulesParams {
    /// Canvas course ID.
    #[schemars(range(min = 1))]
    pub course_id: u64,

    /// Embed module items and/or their content details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<ModuleInclude>>,
}

pub struct GetCourseModulesTool;

impl GetCourseModulesTool {
    pub const NAME: &'static str = "get_course_modules";

    pub const DESCRIPTION: &'static str = "List the modules of a course, optionally with their items.";

    #[instrument(skip_all, fields(tool = Self::NAME, course_id = params.course_id))]
    pub async fn execute(
        params: GetCourseModulesParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let query = Query::new()
                .push("per_page", PAGE_SIZE)
                .push_list("include", params.include.as_deref());
            let path = format!("/courses/{}/modules", params.course_id);
            let modules: Vec<Value> = context.client().get_all_pages(&path, query).await?;
            Ok::<_, CanvasError>(Value::Array(modules))
        };

        let modules = into_items(context.cached(key, CacheTtl::Medium, fetch).await?);
        info!(count = modules.len(), "Listed modules");

        Ok(text_result(format_list(&modules, &MODULES)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetCourseModulesParams>(Self::NAME, Self::DESCRIPTION)
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
    fn test_unknown_include_is_rejected() {
        let tool = GetCourseModulesTool::to_tool();
        let err = parse_arguments::<GetCourseModulesParams>(
            &tool,
            json!({"course_id": 3, "include": ["items", "everything"]}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/include/1"));
    }

    #[test]
    fn test_include_accepts_known_values() {
        let tool = GetCourseModulesTool::to_tool();
        let params: GetCourseModulesParams = parse_arguments(
            &tool,
            json!({"course_id": 3, "include": ["items", "content_details"]}),
        )
        .unwrap();
        assert_eq!(
            params.include,
            Some(vec![ModuleInclude::Items, ModuleInclude::ContentDetails])
        );
    }
}
