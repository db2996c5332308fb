//! List users tool definition.

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
    EnrollmentType, PAGE_SIZE, into_items, text_result, tool_model, tool_route,
};
use crate::domains::tools::format::{USERS, format_list};
use crate::domains::tools::{ToolContext, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserEnrollmentState {
    Active,
    Invited,
    Rejected,
    Completed,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserInclude {
    Enrollments,
    Email,
    AvatarUrl,
    TestStudent,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListUsersParams {
    /// Canvas course ID.
    #[schemars(range(min = 1))]
    pub course_id: u64,

    /// Partial match on name, login or email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_type: Option<Vec<EnrollmentType>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_state: Option<Vec<UserEnrollmentState>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<UserInclude>>,
}

pub struct ListUsersTool;

impl ListUsersTool {
    pub const NAME: &'static str = "list_users";

    pub const DESCRIPTION: &'static str = "List the people enrolled in a course. \
        Use enrollment_type or search_term to narrow large rosters.";

    #[instrument(skip_all, fields(tool = Self::NAME, course_id = params.course_id))]
    pub async fn execute(
        params: ListUsersParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let key = cache_key(Self::NAME, &params);
        let fetch = async {
            let query = Query::new()
                .push("per_page", PAGE_SIZE)
                .push_opt("search_term", params.search_term.as_deref())
                .push_list("enrollment_type", params.enrollment_type.as_deref())
                .push_list("enrollment_state", params.enrollment_state.as_deref())
                .push_list("include", params.include.as_deref());
            let path = format!("/courses/{}/users", params.course_id);
            let users: Vec<Value> = context.client().get_all_pages(&path, query).await?;
            Ok::<_, CanvasError>(Value::Array(users))
        };

        let users = into_items(context.cached(key, CacheTtl::Medium, fetch).await?);
        info!(count = users.len(), "Listed users");

        Ok(text_result(format_list(&users, &USERS)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<ListUsersParams>(Self::NAME, Self::DESCRIPTION)
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
    fn test_roster_filters_parse() {
        let params: ListUsersParams = parse_arguments(
            &ListUsersTool::to_tool(),
            json!({
                "course_id": 5,
                "enrollment_type": ["student", "ta"],
                "enrollment_state": ["active"],
                "include": ["email", "avatar_url"]
            }),
        )
        .unwrap();
        assert_eq!(
            params.enrollment_type,
            Some(vec![EnrollmentType::Student, EnrollmentType::Ta])
        );
        assert_eq!(params.enrollment_state, Some(vec![UserEnrollmentState::Active]));
    }

    #[test]
    fn test_enrollment_type_must_be_a_list() {
        let err = parse_arguments::<ListUsersParams>(
            &ListUsersTool::to_tool(),
            json!({"course_id": 5, "enrollment_type": "student"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/enrollment_type"));
    }
}
