//! OpenAI-style wire types for the inbound API.
//!
//! The proxy accepts (a subset of) the `chat/completions` request shape
//! and answers with `chat.completion` / `chat.completion.chunk` objects.
//! Roles pass through as free-form strings; the upstream only ever sees
//! the flattened transcript.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One turn of the inbound conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
}

/// Flatten the transcript into the upstream's `role:content` text blob.
///
/// Turns are joined with newlines and nothing is escaped, exactly as the
/// upstream expects; content containing a literal newline is
/// indistinguishable from a turn boundary.
pub fn flatten_messages(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}:{}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Response body for aggregate (non-streaming) completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// One assistant reply carrying the full accumulated text.
    pub fn assistant_reply(model: String, content: String) -> Self {
        Self {
            id: completion_id(),
            object: "chat.completion".to_string(),
            created: unix_timestamp(),
            model,
            choices: vec![Choice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

/// Token usage. The upstream never reports counts, so this is always
/// zeroed.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Fresh `chatcmpl-` response identifier.
pub fn completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4())
}

/// Seconds since the unix epoch, for `created` fields.
pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_joins_role_and_content() {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: "be brief".to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            },
        ];
        assert_eq!(flatten_messages(&messages), "system:be brief\nuser:hi");
    }

    #[test]
    fn flatten_preserves_embedded_newlines() {
        // Unescaped format: an embedded newline reads like a turn boundary.
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: "line one\nline two".to_string(),
        }];
        assert_eq!(flatten_messages(&messages), "user:line one\nline two");
    }

    #[test]
    fn stream_flag_defaults_to_false() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{"model": "test", "messages": [{"role": "user", "content": "hi"}]}"#,
        )
        .unwrap();
        assert!(!req.stream);
        assert_eq!(req.model, "test");
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn aggregate_response_shape() {
        let resp =
            ChatCompletionResponse::assistant_reply("test".to_string(), "hello".to_string());
        let v = serde_json::to_value(&resp).unwrap();

        assert!(v["id"].as_str().unwrap().starts_with("chatcmpl-"));
        assert_eq!(v["object"], "chat.completion");
        assert_eq!(v["choices"][0]["message"]["role"], "assistant");
        assert_eq!(v["choices"][0]["message"]["content"], "hello");
        assert_eq!(v["choices"][0]["finish_reason"], "stop");
        assert_eq!(v["usage"]["total_tokens"], 0);
    }
}
