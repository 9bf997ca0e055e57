//! Result helpers for MCP tool responses

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Wrap any serializable value as a successful JSON tool response
///
/// Scalars are emitted as-is (`true`, `42`), structures pretty-printed.
///
/// ```rust,ignore
/// fn delete_data(&self) -> Result<CallToolResult, McpError> {
///     json_success(&removed)
/// }
/// ```
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Pull the JSON payload back out of a response built by [`json_success`]
///
/// Returns `None` when the first content item is not text or not JSON.
pub fn json_payload(result: &CallToolResult) -> Option<serde_json::Value> {
    let text = result.content.first()?.as_text()?;
    serde_json::from_str(&text.text).ok()
}
