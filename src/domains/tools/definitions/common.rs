//! Plumbing shared by every Canvas tool.
//!
//! Each tool supplies its parameter type and an `execute` function; the
//! helpers here turn that into an rmcp route, an HTTP dispatch target, and a
//! validated call.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use jsonschema::{Draft, JSONSchema};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ArgumentIssue, ToolError};

/// Most issues reported for one call.
const MAX_REPORTED_ISSUES: usize = 10;

/// Canvas `per_page` for collection requests.
pub const PAGE_SIZE: u32 = 100;

/// Enrollment role, as Canvas names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentType {
    Teacher,
    Student,
    Ta,
    Observer,
    Designer,
}

/// Tool metadata with the input schema generated from `P`.
pub fn tool_model<P: JsonSchema + 'static>(name: &'static str, description: &'static str) -> Tool {
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Validate `arguments` against the tool's input schema, then deserialize.
pub fn parse_arguments<P: DeserializeOwned>(tool: &Tool, arguments: Value) -> Result<P, ToolError> {
    let mut schema = Value::Object(tool.input_schema.as_ref().clone());
    if let Some(object) = schema.as_object_mut() {
        // Validated as draft 7 whatever the generator declared.
        object.remove("$schema");
    }

    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| ToolError::internal(format!("Invalid input schema for {}: {e}", tool.name)))?;

    if let Err(errors) = validator.validate(&arguments) {
        let issues = errors
            .take(MAX_REPORTED_ISSUES)
            .map(|err| {
                let path = err.instance_path.to_string();
                ArgumentIssue {
                    path: if path.is_empty() { "(root)".to_string() } else { path },
                    message: err.to_string(),
                }
            })
            .collect();
        return Err(ToolError::InvalidArguments(issues));
    }

    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_argument("(root)", e.to_string()))
}

/// Parse, execute, and log any failure.
pub async fn run_tool<P, F, Fut>(
    tool: &Tool,
    arguments: Value,
    context: Arc<ToolContext>,
    execute: &F,
) -> Result<CallToolResult, ToolError>
where
    P: DeserializeOwned,
    F: Fn(P, Arc<ToolContext>) -> Fut,
    Fut: Future<Output = Result<CallToolResult, ToolError>>,
{
    let outcome = match parse_arguments::<P>(tool, arguments) {
        Ok(params) => execute(params, context).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &outcome {
        warn!(tool = %tool.name, error = %err, "Tool call failed");
    }
    outcome
}

/// Build the rmcp route for a tool (STDIO/TCP transports).
pub fn tool_route<S, P, F, Fut>(tool: Tool, context: Arc<ToolContext>, execute: F) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
    P: DeserializeOwned + Send + 'static,
    F: Fn(P, Arc<ToolContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
{
    let execute = Arc::new(execute);
    let schema_tool = Arc::new(tool.clone());

    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let arguments = Value::Object(ctx.arguments.clone().unwrap_or_default());
        let context = context.clone();
        let execute = execute.clone();
        let tool = schema_tool.clone();
        async move {
            run_tool::<P, F, Fut>(&tool, arguments, context, execute.as_ref())
                .await
                .map_err(McpError::from)
        }
        .boxed()
    })
}

/// Dispatch a tool call arriving over the HTTP transport.
#[cfg(feature = "http")]
pub async fn http_call<P, F, Fut>(
    tool: &Tool,
    arguments: Value,
    context: Arc<ToolContext>,
    execute: F,
) -> Result<Value, McpError>
where
    P: DeserializeOwned,
    F: Fn(P, Arc<ToolContext>) -> Fut,
    Fut: Future<Output = Result<CallToolResult, ToolError>>,
{
    let result = run_tool::<P, F, Fut>(tool, arguments, context, &execute).await?;
    Ok(serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    }))
}

/// Items of a JSON array; any other value is a single item.
pub fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// A successful result carrying already-formatted text.
pub fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// A tool-level failure the model should see (not a protocol error).
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    let message = message.into();
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message)])
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use rmcp::model::{CallToolResult, RawContent};
    use serde_json::Value;

    use crate::canvas::{CanvasClient, ClientConfig};
    use crate::core::cache::ResponseCache;
    use crate::domains::tools::context::ToolContext;

    /// A context whose client points at a port nothing listens on.
    pub fn offline_context() -> Arc<ToolContext> {
        let client = CanvasClient::new(&ClientConfig::new("http://127.0.0.1:9", "test-token"))
            .expect("client builds");
        Arc::new(ToolContext::new(client, ResponseCache::disabled()))
    }

    pub fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    pub fn result_json(result: &CallToolResult) -> Value {
        serde_json::from_str(result_text(result)).expect("tool output is JSON")
    }
}
