//! Summary compactor: collapses a span of older messages into one line.

use helmsman_core::{Message, Role};

const INTENT_LIMIT: usize = 100;
const ERROR_LIMIT: usize = 80;

/// Produce the summary text for a span of messages.
///
/// Extracts, in priority order: user intents (up to 3), distinct tool names
/// invoked (up to 5), tool-result error strings (up to 2), and non-tool
/// assistant replies (up to 2). Pure function of its inputs apart from the
/// wall-clock stamp in the prefix.
pub fn summarize(seq_no: u32, messages: &[Message]) -> String {
    let mut user_requests = Vec::new();
    let mut tool_actions: Vec<&str> = Vec::new();
    let mut errors = Vec::new();
    let mut assistant_replies = Vec::new();

    for msg in messages {
        match msg.role {
            Role::User => {
                if !msg.content.is_empty() {
                    user_requests.push(truncate(&msg.content, INTENT_LIMIT));
                }
            }
            Role::Assistant => {
                if !msg.content.is_empty() && msg.tool_calls.is_empty() {
                    assistant_replies.push(truncate(&msg.content, INTENT_LIMIT));
                }
                for call in &msg.tool_calls {
                    if !tool_actions.contains(&call.name.as_str()) {
                        tool_actions.push(&call.name);
                    }
                }
            }
            Role::Tool => {
                let lowered = msg.content.to_lowercase();
                if lowered.contains("error") || lowered.contains("fail") {
                    errors.push(format!("Tool error: {}", truncate(&msg.content, ERROR_LIMIT)));
                }
            }
            Role::System => {}
        }
    }

    let mut parts = Vec::new();
    if !user_requests.is_empty() {
        user_requests.truncate(3);
        parts.push(format!("User asked about: {}", user_requests.join("; ")));
    }
    if !tool_actions.is_empty() {
        tool_actions.truncate(5);
        parts.push(format!("Tools used: {}", tool_actions.join(", ")));
    }
    if !errors.is_empty() {
        errors.truncate(2);
        parts.push(format!("Issues encountered: {}", errors.join("; ")));
    }
    if !assistant_replies.is_empty() {
        assistant_replies.truncate(2);
        parts.push(format!("Key responses: {}", assistant_replies.join("; ")));
    }

    if parts.is_empty() {
        return "[Previous conversation context]".to_string();
    }

    let stamp = chrono::Local::now().format("%H:%M:%S");
    format!("[Summary #{seq_no} at {stamp}] {}", parts.join(" | "))
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helmsman_core::ToolCallRequest;

    fn call(name: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: "c".into(),
            name: name.into(),
            arguments: "{}".into(),
        }
    }

    #[test]
    fn captures_all_groups() {
        let messages = vec![
            Message::user("list the files in /tmp"),
            Message::assistant_with_calls("", vec![call("list_files")]),
            Message::tool_result("c", "{\"success\":false,\"error\":\"permission denied failure\"}"),
            Message::assistant("I could not list that directory."),
        ];
        let summary = summarize(1, &messages);
        assert!(summary.starts_with("[Summary #1 at "));
        assert!(summary.contains("User asked about: list the files in /tmp"));
        assert!(summary.contains("Tools used: list_files"));
        assert!(summary.contains("Issues encountered: Tool error:"));
        assert!(summary.contains("Key responses: I could not list"));
    }

    #[test]
    fn empty_span_yields_placeholder() {
        assert_eq!(summarize(2, &[]), "[Previous conversation context]");
    }

    #[test]
    fn long_intents_truncated() {
        let long = "x".repeat(300);
        let summary = summarize(1, &[Message::user(long)]);
        assert!(summary.contains(&format!("{}...", "x".repeat(100))));
        assert!(!summary.contains(&"x".repeat(101)));
    }

    #[test]
    fn tool_names_deduplicated_and_capped() {
        let calls: Vec<_> = ["a", "b", "a", "c", "d", "e", "f"]
            .iter()
            .map(|n| call(n))
            .collect();
        let summary = summarize(1, &[Message::assistant_with_calls("", calls)]);
        assert!(summary.contains("Tools used: a, b, c, d, e"));
        assert!(!summary.contains('f'));
    }

    #[test]
    fn group_cap_on_user_intents() {
        let messages: Vec<_> = (0..5).map(|i| Message::user(format!("request {i}"))).collect();
        let summary = summarize(1, &messages);
        assert!(summary.contains("request 2"));
        assert!(!summary.contains("request 3"));
    }
}
