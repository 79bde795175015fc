use std::fmt::Display;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

/// Wraps a remote JSON response, or the failure that replaced it.
pub fn json_result<T, E>(operation: &str, result: Result<T, E>) -> CallToolResult
where
    T: Serialize,
    E: Display,
{
    match result.map(|value| serde_json::to_string(&value)) {
        Ok(Ok(text)) => CallToolResult::success(vec![Content::text(text)]),
        Ok(Err(err)) => failure(operation, &err),
        Err(err) => failure(operation, &err),
    }
}

/// Wraps markdown text verbatim, or the failure that replaced it.
pub fn text_result<E: Display>(operation: &str, result: Result<String, E>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => failure(operation, &err),
    }
}

fn failure(operation: &str, err: &dyn Display) -> CallToolResult {
    warn!(operation, error = %err, "tool call failed");
    CallToolResult::error(vec![Content::text(format!("Failed to {operation}: {err}"))])
}
