//! File tools: metadata and text content.

use serde_json::{Map, Value};

use crate::canvas::{CanvasError, Query};
use crate::domains::tools::ToolContext;

pub mod get_file_content;
pub mod get_file_metadata;

pub use get_file_content::{GetFileContentParams, GetFileContentTool};
pub use get_file_metadata::{GetFileMetadataParams, GetFileMetadataTool};

pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Content types text can be extracted from.
pub const SUPPORTED_TYPES: [&str; 5] = [PDF, DOCX, "text/plain", "text/markdown", "text/csv"];

/// Metadata fields reported for a file.
const METADATA_FIELDS: [&str; 10] = [
    "id",
    "filename",
    "display_name",
    "content_type",
    "size",
    "created_at",
    "updated_at",
    "url",
    "thumbnail_url",
    "preview_url",
];

/// Whether text can be extracted from `content_type`. Parameters such as
/// `; charset=utf-8` are ignored.
pub fn is_supported(content_type: &str) -> bool {
    SUPPORTED_TYPES.contains(&mime_essence(content_type).as_str())
}

/// Plain text types are returned as-is; the rest need a document parser.
pub fn is_plain_text(content_type: &str) -> bool {
    mime_essence(content_type).starts_with("text/")
}

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// `GET /files/{id}`.
pub async fn fetch_file(context: &ToolContext, file_id: u64) -> Result<Value, CanvasError> {
    let path = format!("/files/{file_id}");
    Ok(context.client().get::<Value>(&path, &Query::new()).await?.data)
}

/// Copy `fields` out of a Canvas file object, keeping explicit nulls.
pub fn pick(file: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            let value = file.get(*field).cloned().unwrap_or(Value::Null);
            ((*field).to_string(), value)
        })
        .collect()
}

/// The reported metadata plus `supported_for_extraction`.
pub fn metadata(file: &Value) -> Value {
    let mut fields = pick(file, &METADATA_FIELDS);
    fields.insert(
        "supported_for_extraction".to_string(),
        Value::Bool(is_supported(content_type(file))),
    );
    Value::Object(fields)
}

pub fn content_type(file: &Value) -> &str {
    file.get("content_type")
        .and_then(Value::as_str)
        .unwrap_or_default()
}
