//! Shell command tool: bounded execution with captured output.

use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_OUTPUT_BYTES: usize = 64 * 1024;

pub struct ExecuteCommandTool {
    default_timeout: Duration,
}

impl Default for ExecuteCommandTool {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ExecuteCommandTool {
    pub fn with_timeout(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

#[async_trait]
impl Tool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Run a shell command and capture its output. Use with caution."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Shell command to execute."
                },
                "working_dir": {
                    "type": "string",
                    "description": "Working directory (optional)."
                },
                "timeout_secs": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_TIMEOUT_SECS,
                    "description": "Timeout in seconds (default 30)."
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError> {
        let command = arguments["command"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'command' argument".into()))?;
        let timeout = arguments["timeout_secs"]
            .as_u64()
            .map(|s| Duration::from_secs(s.min(MAX_TIMEOUT_SECS)))
            .unwrap_or(self.default_timeout);

        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = arguments["working_dir"].as_str() {
            cmd.current_dir(dir);
        }
        cmd.kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Ok(ToolResultEnvelope::failure(format!(
                    "Failed to spawn command: {e}"
                )))
            }
            Err(_) => {
                return Ok(ToolResultEnvelope::failure(format!(
                    "Command timed out after {}s",
                    timeout.as_secs()
                )))
            }
        };

        let stdout = truncate(&String::from_utf8_lossy(&output.stdout));
        let stderr = truncate(&String::from_utf8_lossy(&output.stderr));
        let exit_code = output.status.code().unwrap_or(-1);

        let payload = serde_json::json!({
            "exit_code": exit_code,
            "stdout": stdout,
            "stderr": stderr,
        });

        if output.status.success() {
            Ok(ToolResultEnvelope::ok(payload))
        } else {
            Ok(ToolResultEnvelope::failure_with_content(
                payload,
                format!("Command exited with code {exit_code}"),
            ))
        }
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_OUTPUT_BYTES {
        return text.to_string();
    }
    let mut cut = MAX_OUTPUT_BYTES;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}\n... [output truncated]", &text[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "echo hello"}))
            .await
            .unwrap();

        assert!(result.success);
        let content = result.content.unwrap();
        assert_eq!(content["exit_code"], 0);
        assert_eq!(content["stdout"].as_str().unwrap().trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_is_failure_with_output() {
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({"command": "echo oops >&2; exit 3"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("code 3"));
        let content = result.content.unwrap();
        assert_eq!(content["exit_code"], 3);
        assert!(content["stderr"].as_str().unwrap().contains("oops"));
    }

    #[tokio::test]
    async fn command_times_out() {
        let tool = ExecuteCommandTool::with_timeout(Duration::from_millis(100));
        let result = tool
            .execute(serde_json::json!({"command": "sleep 5"}))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn respects_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExecuteCommandTool::default()
            .execute(serde_json::json!({
                "command": "pwd",
                "working_dir": dir.path().to_str().unwrap()
            }))
            .await
            .unwrap();

        assert!(result.success);
        let stdout = result.content.unwrap()["stdout"].as_str().unwrap().trim().to_string();
        let canonical = dir.path().canonicalize().unwrap();
        assert_eq!(std::path::Path::new(&stdout).canonicalize().unwrap(), canonical);
    }
}
