//! Directory listing tool.

use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::path::Path;

pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories at a path."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory to list (defaults to current directory)."
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Descend into subdirectories."
                },
                "show_hidden": {
                    "type": "boolean",
                    "description": "Include dotfiles."
                },
                "pattern": {
                    "type": "string",
                    "description": "Only list entries whose name contains this substring."
                }
            }
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError> {
        let directory = arguments["directory"].as_str().unwrap_or(".").to_string();
        let recursive = arguments["recursive"].as_bool().unwrap_or(false);
        let show_hidden = arguments["show_hidden"].as_bool().unwrap_or(false);
        let pattern = arguments["pattern"].as_str();

        let root = Path::new(&directory);
        if !root.exists() {
            return Ok(ToolResultEnvelope::failure("Directory not found."));
        }
        if !root.is_dir() {
            return Ok(ToolResultEnvelope::failure("Path is not a directory."));
        }

        let mut entries = Vec::new();
        if let Err(e) = collect(root, root, recursive, show_hidden, &mut entries).await {
            return Ok(ToolResultEnvelope::failure(format!(
                "Failed to list directory: {e}"
            )));
        }
        if let Some(pattern) = pattern {
            entries.retain(|e| e.contains(pattern));
        }
        entries.sort();

        Ok(ToolResultEnvelope::ok(serde_json::json!({
            "directory": directory,
            "count": entries.len(),
            "entries": entries,
        })))
    }
}

/// Breadth-first walk, relative paths, directories suffixed with '/'.
async fn collect(
    root: &Path,
    dir: &Path,
    recursive: bool,
    show_hidden: bool,
    out: &mut Vec<String>,
) -> std::io::Result<()> {
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut reader = tokio::fs::read_dir(&current).await?;
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !show_hidden && name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            let rel = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().into_owned();
            if path.is_dir() {
                out.push(format!("{rel}/"));
                if recursive {
                    pending.push(path);
                }
            } else {
                out.push(rel);
            }
        }
    }
    Ok(())
}
