//! Get course tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::CourseInclude;
use crate::canvas::{CanvasError, Query};
use crate::core::cache::{CacheTtl, cache_key};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{text_result, tool_model, tool_route};
use crate::domains::tools::format::format_value;
use crate::domains::tools::{ToolContext, ToolError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetCourseParams {
    /// Canvas course ID.
    #[schemars(range(min = 1))]
    pub course_id: u64,

    /// Additional data to embed in the course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<CourseInclude>>,
}

pub struct GetCourseTool;

impl GetCourseTool {
    pub const NAME: &'static str = "get_course";

    pub const DESCRIPTION: &'static str = "Get details for a single course by ID.";

    #[instrument(skip_all, fields(tool = Self::NAME, course_id = params.course_id))]
    pub async fn execute(
        params: GetCourseParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let query = Query::new().push_list("include", params.include.as_deref());
            let path = format!("/courses/{}", params.course_id);
            let response = context.client().get::<Value>(&path, &query).await?;
            Ok::<_, CanvasError>(response.data)
        };

        let course = context.cached(key, CacheTtl::Long, fetch).await?;
        info!("Fetched course");

        Ok(text_result(format_value(&course)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetCourseParams>(Self::NAME, Self::DESCRIPTION)
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

    #[test]
    fn test_course_id_is_required() {
        let tool = GetCourseTool::to_tool();
        let required = tool.input_schema.get("required").unwrap();
        assert!(required.as_array().unwrap().iter().any(|v| v == "course_id"));
    }

    #[test]
    fn test_include_serializes_snake_case() {
        let params = GetCourseParams {
            course_id: 7,
            include: Some(vec![CourseInclude::SyllabusBody, CourseInclude::TotalStudents]),
        };
        let query = Query::new().push_list("include", params.include.as_deref());
        assert_eq!(
            query.pairs(),
            &[
                ("include[]".to_string(), "syllabus_body".to_string()),
                ("include[]".to_string(), "total_students".to_string()),
            ]
        );
    }
}
