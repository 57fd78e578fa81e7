//! File delete tool: remove files or directories.

use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::path::Path;

pub struct DeleteFileTool;

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Remove files or directories. Use with caution."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to file/directory to delete."
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Delete directories and their contents."
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
        let recursive = arguments["recursive"].as_bool().unwrap_or(false);

        let path_ref = Path::new(path);
        if !path_ref.exists() {
            return Ok(ToolResultEnvelope::failure("Path not found."));
        }

        let outcome = if path_ref.is_dir() {
            if recursive {
                tokio::fs::remove_dir_all(path_ref).await
            } else {
                tokio::fs::remove_dir(path_ref).await
            }
        } else {
            tokio::fs::remove_file(path_ref).await
        };

        match outcome {
            Ok(()) => Ok(ToolResultEnvelope::ok(serde_json::json!(format!(
                "Deleted: {path}"
            )))),
            Err(e) => Ok(ToolResultEnvelope::failure(format!(
                "Failed to delete: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("doomed.txt");
        std::fs::write(&file_path, "x").unwrap();

        let result = DeleteFileTool
            .execute(serde_json::json!({"file_path": file_path.to_str().unwrap()}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(!file_path.exists());
    }

    #[tokio::test]
    async fn nonempty_directory_needs_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("full");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("inner.txt"), "x").unwrap();

        let refused = DeleteFileTool
            .execute(serde_json::json!({"file_path": sub.to_str().unwrap()}))
            .await
            .unwrap();
        assert!(!refused.success);
        assert!(sub.exists());

        let removed = DeleteFileTool
            .execute(serde_json::json!({
                "file_path": sub.to_str().unwrap(),
                "recursive": true
            }))
            .await
            .unwrap();
        assert!(removed.success);
        assert!(!sub.exists());
    }

    #[tokio::test]
    async fn missing_path_reported() {
        let result = DeleteFileTool
            .execute(serde_json::json!({"file_path": "/tmp/helmsman_gone_98765"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Path not found."));
    }
}
