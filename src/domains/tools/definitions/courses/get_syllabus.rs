//! Get syllabus tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::canvas::{CanvasError, Query};
use crate::core::cache::{CacheTtl, cache_key};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{
    error_result, text_result, tool_model, tool_route,
};
use crate::domains::tools::format::format_value;
use crate::domains::tools::{ToolContext, ToolError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetSyllabusParams {
    /// Canvas course ID.
    #[schemars(range(min = 1))]
    pub course_id: u64,
}

pub struct GetSyllabusTool;

impl GetSyllabusTool {
    pub const NAME: &'static str = "get_syllabus";

    pub const DESCRIPTION: &'static str = "Get the syllabus body (HTML) of a course.";

    #[instrument(skip_all, fields(tool = Self::NAME, course_id = params.course_id))]
    pub async fn execute(
        params: GetSyllabusParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let query = Query::new().push_list("include", Some(&["syllabus_body"][..]));
            let path = format!("/courses/{}", params.course_id);
            let response = context.client().get::<Value>(&path, &query).await?;
            Ok::<_, CanvasError>(response.data)
        };

        let course = context.cached(key, CacheTtl::Long, fetch).await?;
        let Some(syllabus) = syllabus_body(&course) else {
            return Ok(error_result(format!(
                "No syllabus found for course {}",
                params.course_id
            )));
        };
        info!(chars = syllabus.len(), "Fetched syllabus");

        Ok(text_result(format_value(&json!({
            "course_id": params.course_id,
            "syllabus_body": syllabus,
        }))))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetSyllabusParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}

/// The syllabus HTML, if the course has a non-blank one.
fn syllabus_body(course: &Value) -> Option<&str> {
    course
        .get("syllabus_body")
        .and_then(Value::as_str)
        .filter(|body| !body.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllabus_body_extraction() {
        assert_eq!(
            syllabus_body(&json!({"id": 1, "syllabus_body": "<p>Week 1</p>"})),
            Some("<p>Week 1</p>")
        );
        assert_eq!(syllabus_body(&json!({"id": 1, "syllabus_body": "  "})), None);
        assert_eq!(syllabus_body(&json!({"id": 1, "syllabus_body": null})), None);
        assert_eq!(syllabus_body(&json!({"id": 1})), None);
    }
}
