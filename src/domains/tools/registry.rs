//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::ToolContext;
use super::definitions::{
    GetAssignmentTool, GetCourseModulesTool, GetCourseTool, GetDashboardCardsTool,
    GetFileContentTool, GetFileMetadataTool, GetProfileTool, GetSyllabusTool,
    ListAssignmentsTool, ListCalendarEventsTool, ListCoursesTool, ListUsersTool,
    SubmitAssignmentTool,
};

/// Tool registry - lists tools and dispatches HTTP tool calls.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    context: Arc<ToolContext>,
}

impl ToolRegistry {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            ListCoursesTool::NAME,
            GetCourseTool::NAME,
            GetSyllabusTool::NAME,
            GetCourseModulesTool::NAME,
            ListAssignmentsTool::NAME,
            GetAssignmentTool::NAME,
            SubmitAssignmentTool::NAME,
            GetProfileTool::NAME,
            ListUsersTool::NAME,
            GetDashboardCardsTool::NAME,
            ListCalendarEventsTool::NAME,
            GetFileMetadataTool::NAME,
            GetFileContentTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both HTTP and STDIO/TCP transports list tools from here.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            ListCoursesTool::to_tool(),
            GetCourseTool::to_tool(),
            GetSyllabusTool::to_tool(),
            GetCourseModulesTool::to_tool(),
            ListAssignmentsTool::to_tool(),
            GetAssignmentTool::to_tool(),
            SubmitAssignmentTool::to_tool(),
            GetProfileTool::to_tool(),
            ListUsersTool::to_tool(),
            GetDashboardCardsTool::to_tool(),
            ListCalendarEventsTool::to_tool(),
            GetFileMetadataTool::to_tool(),
            GetFileContentTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, rmcp::ErrorData> {
        let context = self.context.clone();
        match name {
            ListCoursesTool::NAME => ListCoursesTool::http_handler(arguments, context).await,
            GetCourseTool::NAME => GetCourseTool::http_handler(arguments, context).await,
            GetSyllabusTool::NAME => GetSyllabusTool::http_handler(arguments, context).await,
            GetCourseModulesTool::NAME => {
                GetCourseModulesTool::http_handler(arguments, context).await
            }
            ListAssignmentsTool::NAME => {
                ListAssignmentsTool::http_handler(arguments, context).await
            }
            GetAssignmentTool::NAME => GetAssignmentTool::http_handler(arguments, context).await,
            SubmitAssignmentTool::NAME => {
                SubmitAssignmentTool::http_handler(arguments, context).await
            }
            GetProfileTool::NAME => GetProfileTool::http_handler(arguments, context).await,
            ListUsersTool::NAME => ListUsersTool::http_handler(arguments, context).await,
            GetDashboardCardsTool::NAME => {
                GetDashboardCardsTool::http_handler(arguments, context).await
            }
            ListCalendarEventsTool::NAME => {
                ListCalendarEventsTool::http_handler(arguments, context).await
            }
            GetFileMetadataTool::NAME => {
                GetFileMetadataTool::http_handler(arguments, context).await
            }
            GetFileContentTool::NAME => GetFileContentTool::http_handler(arguments, context).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(super::ToolError::not_found(name).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::test_support::offline_context;

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(offline_context());
        let names = registry.tool_names();
        assert_eq!(names.len(), 13);
        for expected in [
            "list_courses",
            "get_course",
            "get_syllabus",
            "get_course_modules",
            "list_assignments",
            "get_assignment",
            "submit_assignment",
            "get_profile",
            "list_users",
            "get_dashboard_cards",
            "list_calendar_events",
            "get_file_metadata",
            "get_file_content",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_tool_models_match_names() {
        let registry = ToolRegistry::new(offline_context());
        let models: Vec<_> = ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(models, registry.tool_names());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(offline_context());
        let err = registry
            .call_tool("unknown", serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::METHOD_NOT_FOUND);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_reports_invalid_params() {
        let registry = ToolRegistry::new(offline_context());
        let err = registry
            .call_tool("get_course", serde_json::json!({"course_id": "abc"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unsupported_submission() {
        let registry = ToolRegistry::new(offline_context());
        let err = registry
            .call_tool(
                "submit_assignment",
                serde_json::json!({
                    "course_id": 1,
                    "assignment_id": 2,
                    "submission_type": "online_url",
                    "url": "https://example.org/essay"
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("disabled"));
    }
}
