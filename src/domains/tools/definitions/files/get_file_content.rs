//! Get file content tool definition.
//!
//! Text files are downloaded and returned inline. PDF and DOCX are recognised
//! but not parsed; the caller gets the download URL instead.

use rmcp::{
    handler::server::tool::ToolRoute,
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{SUPPORTED_TYPES, content_type, fetch_file, is_plain_text, is_supported, metadata, pick};
#[cfg(feature = "http")]
use crate::domains::tools::definitions::common::http_call;
use crate::domains::tools::definitions::common::{text_result, tool_model, tool_route};
use crate::domains::tools::format::format_value;
use crate::domains::tools::{ToolContext, ToolError};

/// Largest file whose content is fetched.
pub const MAX_EXTRACT_BYTES: u64 = 10 * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn default_extract_text() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetFileContentParams {
    /// Canvas file ID.
    #[schemars(range(min = 1))]
    pub file_id: u64,

    /// Return the file's text. When false only metadata is returned.
    #[serde(default = "default_extract_text")]
    pub extract_text: bool,
}

pub struct GetFileContentTool;

impl GetFileContentTool {
    pub const NAME: &'static str = "get_file_content";

    pub const DESCRIPTION: &'static str = "Get the text content of a course file (up to 10MB). \
        Plain text, Markdown and CSV are returned inline.";

    #[instrument(skip_all, fields(tool = Self::NAME, file_id = params.file_id))]
    pub async fn execute(
        params: GetFileContentParams,
        context: Arc<ToolContext>,
    ) -> Result<CallToolResult, ToolError> {
        let file = fetch_file(&context, params.file_id).await?;

        let outcome = match precheck(&file, params.extract_text) {
            Precheck::Answer(early) => early,
            Precheck::Download(url) => {
                let bytes = context.client().download_binary(url).await?;
                info!(bytes = bytes.len(), "Downloaded file");
                json!({
                    "file": pick(&file, &["id", "filename", "display_name", "content_type", "size"]),
                    "content": String::from_utf8_lossy(&bytes),
                })
            }
        };

        Ok(text_result(format_value(&outcome)))
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        context: Arc<ToolContext>,
    ) -> Result<Value, rmcp::ErrorData> {
        http_call(&Self::to_tool(), arguments, context, Self::execute).await
    }

    pub fn to_tool() -> Tool {
        tool_model::<GetFileContentParams>(Self::NAME, Self::DESCRIPTION)
    }

    pub fn create_route<S>(context: Arc<ToolContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), context, Self::execute)
    }
}

/// Outcome of inspecting a file before fetching its content.
#[derive(Debug)]
enum Precheck<'a> {
    /// Fetch the content from this URL.
    Download(&'a str),
    /// Answer without downloading.
    Answer(Value),
}

fn precheck(file: &Value, extract_text: bool) -> Precheck<'_> {
    if !extract_text {
        let mut response = metadata(file);
        if let Some(fields) = response.as_object_mut() {
            fields.insert(
                "message".to_string(),
                json!("Text extraction skipped. Use the url to download the file."),
            );
        }
        return Precheck::Answer(response);
    }

    let size = file.get("size").and_then(Value::as_u64).unwrap_or(0);
    if size > MAX_EXTRACT_BYTES {
        warn!(size, "File exceeds extraction limit");
        return Precheck::Answer(json!({
            "error": "File too large",
            "message": format!(
                "File size ({:.2}MB) exceeds 10MB limit",
                size as f64 / BYTES_PER_MB
            ),
            "file": pick(file, &["id", "filename", "size", "content_type", "url"]),
        }));
    }

    let kind = content_type(file);
    if !is_supported(kind) {
        return Precheck::Answer(json!({
            "error": "Unsupported file type",
            "message": format!("File type '{kind}' is not supported for text extraction"),
            "supported_types": SUPPORTED_TYPES,
            "file": pick(file, &["id", "filename", "content_type", "url"]),
        }));
    }

    if !is_plain_text(kind) {
        return Precheck::Answer(json!({
            "status": "not_implemented",
            "message": "Text extraction for this document type is not implemented. \
                Download the file directly from Canvas.",
            "file": pick(
                file,
                &["id", "filename", "display_name", "size", "content_type", "url", "created_at"],
            ),
        }));
    }

    // Canvas omits or blanks the url on locked files.
    match file.get("url").and_then(Value::as_str).map(str::trim) {
        Some(url) if !url.is_empty() => Precheck::Download(url),
        _ => {
            warn!("File has no download URL");
            Precheck::Answer(json!({
                "error": "File not downloadable",
                "message": "Canvas did not provide a download URL for this file. \
                    It may be locked or restricted.",
                "file": pick(file, &["id", "filename", "content_type", "size"]),
            }))
        }
    }
}
