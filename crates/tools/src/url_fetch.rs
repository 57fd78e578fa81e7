//! URL fetch tool: retrieve a web resource over HTTP(S).

use async_trait::async_trait;
use helmsman_core::error::ToolError;
use helmsman_core::tool::{Tool, ToolResultEnvelope};
use std::time::Duration;

const MAX_BODY_BYTES: usize = 256 * 1024;

pub struct UrlFetchTool {
    client: reqwest::Client,
}

impl UrlFetchTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("helmsman/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for UrlFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for UrlFetchTool {
    fn name(&self) -> &str {
        "url_fetch"
    }

    fn description(&self) -> &str {
        "Fetch the contents of a URL over HTTP or HTTPS."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to fetch (http or https)."
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResultEnvelope, ToolError> {
        let url = arguments["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'url' argument".into()))?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Ok(ToolResultEnvelope::failure(
                "URL must start with http:// or https://",
            ));
        }

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return Ok(ToolResultEnvelope::failure(format!(
                    "Request failed: {e}"
                )))
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(ToolResultEnvelope::failure(format!(
                    "Failed to read response body: {e}"
                )))
            }
        };

        let truncated = body.len() > MAX_BODY_BYTES;
        let body = if truncated {
            let mut cut = MAX_BODY_BYTES;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body[..cut].to_string()
        } else {
            body
        };

        let payload = serde_json::json!({
            "status": status,
            "content_type": content_type,
            "truncated": truncated,
            "body": body,
        });

        if (200..300).contains(&status) {
            Ok(ToolResultEnvelope::ok(payload))
        } else {
            Ok(ToolResultEnvelope::failure_with_content(
                payload,
                format!("HTTP status {status}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition() {
        let tool = UrlFetchTool::new();
        assert_eq!(tool.name(), "url_fetch");
        assert_eq!(
            tool.parameters_schema()["required"],
            serde_json::json!(["url"])
        );
    }

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let result = UrlFetchTool::new()
            .execute(serde_json::json!({"url": "ftp://example.com/file"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("http"));
    }

    #[tokio::test]
    async fn missing_url_argument() {
        let result = UrlFetchTool::new().execute(serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
