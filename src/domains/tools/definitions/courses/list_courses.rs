//! List courses tool definition.

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
use crate::domains::tools::definitions::common::{
    EnrollmentType, PAGE_SIZE, into_items, text_result, tool_model, tool_route,
};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::format::{COURSES, format_list};
use crate::domains::tools::{ToolContext, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Enrollment state filter for course listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseEnrollmentState {
    Active,
    Invited,
    Completed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListCoursesParams {
    /// Only courses where the user has this enrollment type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_type: Option<EnrollmentType>,

    /// Only courses whose enrollment is in this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_state: Option<CourseEnrollmentState>,

    /// Additional data to embed in each course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<CourseInclude>>,
}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct ListCoursesTool;

impl ListCoursesTool {
    pub const NAME: &'static str = "list_courses";

    pub const DESCRIPTION: &'static str = "List courses the current user is enrolled in. \
        Large result sets are summarised; use the filters to narrow them.";

    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(
        params: ListCoursesParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        info!(?params, "Listing courses");

        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let query = Query::new()
                .push("per_page", PAGE_SIZE)
                .push_opt("enrollment_type", params.enrollment_type)
                .push_opt("enrollment_state", params.enrollment_state)
                .push_list("include", params.include.as_deref());

            let courses: Vec<Value> = context.client().get_all_pages("/courses", query).await?;
            let courses: Vec<Value> = courses.into_iter().filter(|c| !is_placeholder(c)).collect();
            Ok::<_, CanvasError>(Value::Array(courses))
        };

        let courses = into_items(context.cached(key, CacheTtl::Medium, fetch).await?);
        info!(count = courses.len(), "Listed courses");

        Ok(text_result(format_list(&courses, &COURSES)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<ListCoursesParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}

/// Canvas lists courses the user can no longer open as a stub holding only
/// `id` and `access_restricted_by_date`.
fn is_placeholder(course: &Value) -> bool {
    course.as_object().is_some_and(|fields| {
        fields.len() == 2
            && fields.contains_key("id")
            && fields.contains_key("access_restricted_by_date")
    })
}
