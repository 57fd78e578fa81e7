//! File read tool: read file contents with an optional line range.

use crate::read_tracker::ReadTracker;
use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::path::Path;

/// Files larger than this are refused outright.
const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

pub struct ReadFileTool {
    tracker: ReadTracker,
}

impl ReadFileTool {
    pub fn new(tracker: ReadTracker) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read file contents with optional line range. REQUIRED before edit_file."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to file."
                },
                "start_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Starting line number (1-indexed, optional)"
                },
                "end_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Ending line number (1-indexed, optional)"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError> {
        let path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'file_path' argument".into()))?;
        let start_line = arguments["start_line"].as_u64().map(|n| n as usize);
        let end_line = arguments["end_line"].as_u64().map(|n| n as usize);

        let path_ref = Path::new(path);
        let meta = match tokio::fs::metadata(path_ref).await {
            Ok(meta) => meta,
            Err(_) => return Ok(ToolResultEnvelope::failure("File not found")),
        };
        if !meta.is_file() {
            return Ok(ToolResultEnvelope::failure("Path is not a file"));
        }
        if meta.len() > MAX_FILE_BYTES {
            return Ok(ToolResultEnvelope::failure("File too large (max 50MB)"));
        }

        let content = match tokio::fs::read_to_string(path_ref).await {
            Ok(content) => content,
            Err(e) => {
                return Ok(ToolResultEnvelope::failure(format!(
                    "Failed to read file: {e}"
                )))
            }
        };

        self.tracker.mark_read(path_ref);

        if let Some(start) = start_line {
            let lines: Vec<&str> = content.lines().collect();
            let start_idx = start.saturating_sub(1);
            if start_idx >= lines.len() {
                return Ok(ToolResultEnvelope::failure(
                    "Start line exceeds file length",
                ));
            }
            let end_idx = end_line.map_or(lines.len(), |e| e.min(lines.len()));
            if end_idx < start_idx {
                return Ok(ToolResultEnvelope::failure(
                    "End line precedes start line",
                ));
            }
            let selected = lines[start_idx..end_idx].join("\n");
            return Ok(ToolResultEnvelope::ok(serde_json::json!(selected)));
        }

        Ok(ToolResultEnvelope::ok(serde_json::json!(content)))
    }
}
