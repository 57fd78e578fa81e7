//! File edit tool: exact text replacement, guarded by read-before-edit.

use crate::read_tracker::ReadTracker;
use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::path::Path;

pub struct EditFileTool {
    tracker: ReadTracker,
}

impl EditFileTool {
    pub fn new(tracker: ReadTracker) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Modify EXISTING files by exact text replacement. Always read_file first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to file to edit."
                },
                "old_text": {
                    "type": "string",
                    "description": "Exact text to replace."
                },
                "new_text": {
                    "type": "string",
                    "description": "Replacement text."
                },
                "replace_all": {
                    "type": "boolean",
                    "description": "Replace all occurrences."
                }
            },
            "required": ["file_path", "old_text", "new_text"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError> {
        let path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'file_path' argument".into()))?;
        let old_text = arguments["old_text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'old_text' argument".into()))?;
        let new_text = arguments["new_text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'new_text' argument".into()))?;
        let replace_all = arguments["replace_all"].as_bool().unwrap_or(false);

        let path_ref = Path::new(path);

        if !self.tracker.was_read(path_ref) {
            return Ok(ToolResultEnvelope::failure(format!(
                "File must be read before editing. Use read_file tool first: {path}"
            )));
        }

        let original = match tokio::fs::read_to_string(path_ref).await {
            Ok(content) => content,
            Err(e) => {
                return Ok(ToolResultEnvelope::failure(format!(
                    "Failed to read file: {e}"
                )))
            }
        };

        if !original.contains(old_text) {
            return Ok(ToolResultEnvelope::failure("old_text not found in file."));
        }

        let updated = if replace_all {
            original.replace(old_text, new_text)
        } else {
            original.replacen(old_text, new_text, 1)
        };

        match tokio::fs::write(path_ref, updated).await {
            Ok(()) => Ok(ToolResultEnvelope::ok(serde_json::json!(format!(
                "Successfully edited file: {path}"
            )))),
            Err(e) => Ok(ToolResultEnvelope::failure(format!(
                "Failed to edit file: {e}"
            ))),
        }
    }
}
