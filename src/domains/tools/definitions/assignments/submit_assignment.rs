//! Submit assignment tool definition.
//!
//! The tool is advertised so clients can discover it, but submitting on a
//! student's behalf is disabled: every call fails without contacting Canvas.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{tool_model, tool_route};
use crate::domains::tools::{ToolContext, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    OnlineTextEntry,
    OnlineUrl,
    OnlineUpload,
    MediaRecording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaCommentType {
    Audio,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubmitAssignmentParams {
    #[schemars(range(min = 1))]
    pub course_id: u64,

    #[schemars(range(min = 1))]
    pub assignment_id: u64,

    pub submission_type: SubmissionType,

    /// Text body for `online_text_entry`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// URL for `online_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Previously uploaded file IDs for `online_upload`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<u64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_comment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_comment_type: Option<MediaCommentType>,
}

pub struct SubmitAssignmentTool;

impl SubmitAssignmentTool {
    pub const NAME: &'static str = "submit_assignment";

    pub const DESCRIPTION: &'static str = "Submit an assignment. \
        Disabled on this server: calls always fail and nothing is sent to Canvas.";

    #[instrument(
        skip_all,
        fields(tool = Self::NAME, course_id = params.course_id, assignment_id = params.assignment_id)
    )]
    pub async fn execute(
        params: SubmitAssignmentParams,
        _context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        warn!(submission_type = ?params.submission_type, "Rejected submission attempt");
        Err(ToolError::unsupported(
            "Assignment submission is disabled. Submit through the Canvas web interface.",
        ))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<SubmitAssignmentParams>(Self::NAME, Self::DESCRIPTION)
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
    use crate::domains::tools::definitions::common::{run_tool, test_support::offline_context};
    use serde_json::json;

    #[tokio::test]
    async fn test_submission_is_always_unsupported() {
        let result = run_tool(
            &SubmitAssignmentTool::to_tool(),
            json!({
                "course_id": 1,
                "assignment_id": 2,
                "submission_type": "online_text_entry",
                "body": "My essay"
            }),
            offline_context(),
            &SubmitAssignmentTool::execute,
        )
        .await;
        assert!(matches!(result, Err(ToolError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_invalid_submission_type_is_a_validation_error() {
        let result = run_tool(
            &SubmitAssignmentTool::to_tool(),
            json!({"course_id": 1, "assignment_id": 2, "submission_type": "carrier_pigeon"}),
            offline_context(),
            &SubmitAssignmentTool::execute,
        )
        .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
