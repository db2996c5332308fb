//! Get assignment tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::AssignmentInclude;
use crate::canvas::{CanvasError, Query};
use crate::core::cache::{CacheTtl, cache_key};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{text_result, tool_model, tool_route};
use crate::domains::tools::format::format_value;
use crate::domains::tools::{ToolContext, ToolError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetAssignmentParams {
    /// Canvas course ID.
    #[schemars(range(min = 1))]
    pub course_id: u64,

    /// Canvas assignment ID.
    #[schemars(range(min = 1))]
    pub assignment_id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<AssignmentInclude>>,
}

pub struct GetAssignmentTool;

impl GetAssignmentTool {
    pub const NAME: &'static str = "get_assignment";

    pub const DESCRIPTION: &'static str =
        "Get one assignment, including its description and due dates.";

    #[instrument(
        skip_all,
        fields(tool = Self::NAME, course_id = params.course_id, assignment_id = params.assignment_id)
    )]
    pub async fn execute(
        params: GetAssignmentParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let query = Query::new().push_list("include", params.include.as_deref());
            let path = format!(
                "/courses/{}/assignments/{}",
                params.course_id, params.assignment_id
            );
            let response = context.client().get::<Value>(&path, &query).await?;
            Ok::<_, CanvasError>(response.data)
        };

        let assignment = context.cached(key, CacheTtl::Short, fetch).await?;
        info!("Fetched assignment");

        Ok(text_result(format_value(&assignment)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetAssignmentParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}
