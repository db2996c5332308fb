//! Get file metadata tool definition.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{fetch_file, metadata};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{text_result, tool_model, tool_route};
use crate::domains::tools::format::format_value;
use crate::domains::tools::{ToolContext, ToolError};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetFileMetadataParams {
    /// Canvas file ID.
    #[schemars(range(min = 1))]
    pub file_id: u64,
}

pub struct GetFileMetadataTool;

impl GetFileMetadataTool {
    pub const NAME: &'static str = "get_file_metadata";

    pub const DESCRIPTION: &'static str = "Get a file's name, type, size and download URL, \
        and whether its text can be extracted.";

    #[instrument(skip_all, fields(tool = Self::NAME, file_id = params.file_id))]
    pub async fn execute(
        params: GetFileMetadataParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let file = fetch_file(&context, params.file_id).await?;
        info!("Fetched file metadata");

        Ok(text_result(format_value(&metadata(&file))))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetFileMetadataParams>(Self::NAME, Self::DESCRIPTION)
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
    use crate::domains::tools::definitions::common::test_support::offline_context;

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let err = GetFileMetadataTool::execute(GetFileMetadataParams { file_id: 1 }, offline_context())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Canvas(_)));
    }
}
