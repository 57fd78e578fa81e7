//! File creation tool: create new files or directories.

use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::path::Path;

pub struct CreateFileTool;

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        "create_file"
    }

    fn description(&self) -> &str {
        "Create NEW files or directories. Check if file exists first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path for new file/directory."
                },
                "content": {
                    "type": "string",
                    "description": "File content (use empty string \"\" for directories)"
                },
                "file_type": {
                    "type": "string",
                    "enum": ["file", "directory"],
                    "description": "Create file or directory"
                },
                "overwrite": {
                    "type": "boolean",
                    "description": "Overwrite existing file"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError> {
        let path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'file_path' argument".into()))?;
        let content = arguments["content"].as_str().unwrap_or("");
        let file_type = arguments["file_type"].as_str().unwrap_or("file");
        let overwrite = arguments["overwrite"].as_bool().unwrap_or(false);

        let path_ref = Path::new(path);

        if path_ref.exists() && !overwrite {
            return Ok(ToolResultEnvelope::failure(
                "File already exists. Use overwrite=true to replace.",
            ));
        }

        match file_type {
            "directory" => match tokio::fs::create_dir_all(path_ref).await {
                Ok(()) => Ok(ToolResultEnvelope::ok(serde_json::json!(format!(
                    "Directory created: {path}"
                )))),
                Err(e) => Ok(ToolResultEnvelope::failure(format!(
                    "Failed to create directory: {e}"
                ))),
            },
            "file" => {
                if let Some(parent) = path_ref.parent() {
                    if !parent.as_os_str().is_empty() {
                        if let Err(e) = tokio::fs::create_dir_all(parent).await {
                            return Ok(ToolResultEnvelope::failure(format!(
                                "Failed to create parent directory: {e}"
                            )));
                        }
                    }
                }
                match tokio::fs::write(path_ref, content).await {
                    Ok(()) => Ok(ToolResultEnvelope::ok(serde_json::json!(format!(
                        "File created: {path}"
                    )))),
                    Err(e) => Ok(ToolResultEnvelope::failure(format!(
                        "Failed to create file: {e}"
                    ))),
                }
            }
            other => Ok(ToolResultEnvelope::failure(format!(
                "Invalid file_type '{other}'. Must be 'file' or 'directory'."
            ))),
        }
    }
}
