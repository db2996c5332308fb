//! List assignments tool definition.

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
use crate::domains::tools::definitions::common::{
    PAGE_SIZE, into_items, text_result, tool_model, tool_route,
};
use crate::domains::tools::format::{ASSIGNMENTS, format_list};
use crate::domains::tools::{ToolContext, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Canvas assignment buckets, relative to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentBucket {
    Past,
    Overdue,
    Undated,
    Ungraded,
    Unsubmitted,
    Upcoming,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentOrder {
    Position,
    Name,
    DueAt,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListAssignmentsParams {
    /// Canvas course ID.
    #[schemars(range(min = 1))]
    pub course_id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<AssignmentInclude>>,

    /// Partial match on the assignment name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,

    /// Apply the current user's due date overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_assignment_dates: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_grading_count_by_section: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<AssignmentBucket>,

    /// Restrict to these assignment IDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_ids: Option<Vec<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<AssignmentOrder>,
}

impl ListAssignmentsParams {
    fn query(&self) -> Query {
        Query::new()
            .push("per_page", PAGE_SIZE)
            .push_list("include", self.include.as_deref())
            .push_opt("search_term", self.search_term.as_deref())
            .push_opt("override_assignment_dates", self.override_assignment_dates)
            .push_opt(
                "needs_grading_count_by_section",
                self.needs_grading_count_by_section,
            )
            .push_opt("bucket", self.bucket)
            .push_list("assignment_ids", self.assignment_ids.as_deref())
            .push_opt("order_by", self.order_by)
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct ListAssignmentsTool;

impl ListAssignmentsTool {
    pub const NAME: &'static str = "list_assignments";

    pub const DESCRIPTION: &'static str = "List assignments in a course. \
        Filter with bucket or search_term when the course has many assignments.";

    #[instrument(skip_all, fields(tool = Self::NAME, course_id = params.course_id))]
    pub async fn execute(
        params: ListAssignmentsParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let path = format!("/courses/{}/assignments", params.course_id);
            let assignments: Vec<Value> =
                context.client().get_all_pages(&path, params.query()).await?;
            Ok::<_, CanvasError>(Value::Array(assignments))
        };

        let assignments = into_items(context.cached(key, CacheTtl::Short, fetch).await?);
        info!(count = assignments.len(), "Listed assignments");

        Ok(text_result(format_list(&assignments, &ASSIGNMENTS)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<ListAssignmentsParams>(Self::NAME, Self::DESCRIPTION)
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
    fn test_query_carries_filters() {
        let params: ListAssignmentsParams = parse_arguments(
            &ListAssignmentsTool::to_tool(),
            json!({
                "course_id": 12,
                "bucket": "upcoming",
                "order_by": "due_at",
                "assignment_ids": [4, 5],
                "override_assignment_dates": false
            }),
        )
        .unwrap();

        let query = params.query();
        assert_eq!(query.get("per_page"), Some("100"));
        assert_eq!(query.get("bucket"), Some("upcoming"));
        assert_eq!(query.get("order_by"), Some("due_at"));
        assert_eq!(query.get("override_assignment_dates"), Some("false"));
        let ids: Vec<_> = query
            .pairs()
            .iter()
            .filter(|(k, _)| k == "assignment_ids[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(ids, ["4", "5"]);
        assert_eq!(query.get("search_term"), None);
    }

    #[test]
    fn test_unknown_bucket_is_rejected() {
        let err = parse_arguments::<ListAssignmentsParams>(
            &ListAssignmentsTool::to_tool(),
            json!({"course_id": 12, "bucket": "someday"}),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref issues) if issues[0].path == "/bucket"));
    }
}
