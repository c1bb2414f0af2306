//! OpenAI-compatible chat-completions wire format
//!
//! Groq, OpenAI and most hosted gateways accept this shape.

use std::collections::HashMap;

use jaervice_core::{
    Completion, Message, ModelError, ModelResponse, Role, ToolCall, ToolSchema,
    provider::{GenerationOptions, TokenUsage},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded arguments; some gateways send an object instead of a string
    #[serde(default)]
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunctionDef,
}

#[derive(Debug, Serialize)]
pub struct WireFunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Error envelope: `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

fn function_type() -> String {
    "function".into()
}

impl From<&Message> for WireMessage {
    fn from(m: &Message) -> Self {
        let content = if m.content.is_empty() && m.has_tool_calls() {
            None
        } else {
            Some(m.content.clone())
        };

        Self {
            role: m.role.to_string(),
            content,
            name: m.name.clone(),
            tool_call_id: m.tool_call_id.clone(),
            tool_calls: m
                .tool_calls
                .iter()
                .map(|c| WireToolCall {
                    id: Some(c.id.clone()),
                    kind: function_type(),
                    function: WireFunctionCall {
                        name: c.name.clone(),
                        arguments: serde_json::Value::String(c.arguments_json()),
                    },
                })
                .collect(),
        }
    }
}

impl From<&ToolSchema> for WireTool {
    fn from(schema: &ToolSchema) -> Self {
        Self {
            kind: "function",
            function: WireFunctionDef {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.input_schema(),
            },
        }
    }
}

impl From<WireUsage> for TokenUsage {
    fn from(u: WireUsage) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

impl ChatRequest {
    /// Build the request body; the system prompt goes first on the wire
    pub fn build(messages: &[Message], tools: &[ToolSchema], options: &GenerationOptions) -> Self {
        let mut wire: Vec<WireMessage> = Vec::with_capacity(messages.len() + 1);
        if let Some(prompt) = &options.system_prompt {
            wire.push(WireMessage::from(&Message::system(prompt.clone())));
        }
        wire.extend(
            messages
                .iter()
                .filter(|m| m.role != Role::System)
                .map(WireMessage::from),
        );

        Self {
            model: options.model.clone(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            messages: wire,
            tools: tools.iter().map(WireTool::from).collect(),
        }
    }
}

impl ChatResponse {
    /// Turn the first choice into final text or tool calls
    pub fn into_completion(self, requested_model: &str) -> Result<Completion, ModelError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("response has no choices".into()))?;

        tracing::debug!(finish_reason = ?choice.finish_reason, "Decoded completion");

        let message = choice.message;
        let text = message.content.unwrap_or_default();

        let response = if message.tool_calls.is_empty() {
            ModelResponse::Final { text }
        } else {
            ModelResponse::ToolCalls {
                calls: message.tool_calls.into_iter().map(decode_call).collect(),
                raw_text: Some(text).filter(|t| !t.trim().is_empty()),
            }
        };

        Ok(Completion {
            response,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
            usage: self.usage.map(TokenUsage::from),
        })
    }
}

fn decode_call(call: WireToolCall) -> ToolCall {
    let mut decoded = match call.id.filter(|id| !id.is_empty()) {
        Some(id) => ToolCall::new(id, call.function.name),
        None => ToolCall::with_generated_id(call.function.name),
    };
    decoded.arguments = decode_arguments(call.function.arguments);
    decoded
}

/// Object arguments pass through; a string is parsed as JSON. Anything
/// unparsable is kept under `input` so the tool can report it.
fn decode_arguments(raw: serde_json::Value) -> HashMap<String, serde_json::Value> {
    match raw {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        serde_json::Value::String(s) if s.trim().is_empty() => HashMap::new(),
        serde_json::Value::String(s) => match serde_json::from_str::<serde_json::Value>(&s) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::from([("input".to_string(), serde_json::Value::String(s))]),
        },
        serde_json::Value::Null => HashMap::new(),
        other => HashMap::from([("input".to_string(), other)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jaervice_core::ParameterSchema;

    fn search_schema() -> ToolSchema {
        ToolSchema {
            name: "web_search".into(),
            description: "Search the web".into(),
            parameters: vec![ParameterSchema::required_string("query", "Search query")],
        }
    }

    #[test]
    fn test_request_shape() {
        let call = ToolCall::new("call_1", "web_search").with_argument("query", "rust");
        let messages = vec![
            Message::user("find rust"),
            Message::assistant_with_calls("", vec![call]),
            Message::tool("hits", "web_search", "call_1"),
        ];
        let options = GenerationOptions {
            system_prompt: Some("be brief".into()),
            ..GenerationOptions::default()
        };

        let request = ChatRequest::build(&messages, &[search_schema()], &options);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][2]["content"].is_null());
        assert_eq!(json["messages"][2]["tool_calls"][0]["type"], "function");
        assert_eq!(json["messages"][2]["tool_calls"][0]["function"]["arguments"], "{\"query\":\"rust\"}");
        assert_eq!(json["messages"][3]["role"], "tool");
        assert_eq!(json["messages"][3]["tool_call_id"], "call_1");
        assert_eq!(json["tools"][0]["function"]["name"], "web_search");
        assert_eq!(json["tools"][0]["function"]["parameters"]["required"][0], "query");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let request = ChatRequest::build(&[Message::user("hi")], &[], &GenerationOptions::default());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_decode_final_answer() {
        let body = r#"{
            "model": "llama-3.3-70b-versatile",
            "choices": [{"message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let completion = response.into_completion("fallback").unwrap();

        assert_eq!(completion.response, ModelResponse::text("4"));
        assert_eq!(completion.model, "llama-3.3-70b-versatile");
        assert_eq!(completion.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn test_decode_tool_calls() {
        let body = r#"{
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    {"id": "call_a", "type": "function", "function": {"name": "news_search", "arguments": "{\"query\":\"X\"}"}},
                    {"type": "function", "function": {"name": "wikipedia", "arguments": {"query": "Y"}}},
                    {"id": "call_c", "type": "function", "function": {"name": "web_search", "arguments": "not json"}}
                ]
            }, "finish_reason": "tool_calls"}]
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let completion = response.into_completion("llama-3.3-70b-versatile").unwrap();
        assert_eq!(completion.model, "llama-3.3-70b-versatile");

        let ModelResponse::ToolCalls { calls, raw_text } = completion.response else {
            panic!("expected tool calls");
        };
        assert!(raw_text.is_none());
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[0].str_arg("query"), Some("X"));
        assert!(calls[1].id.starts_with("call_"));
        assert_eq!(calls[1].str_arg("query"), Some("Y"));
        assert_eq!(calls[2].str_arg("input"), Some("not json"));
    }

    #[test]
    fn test_decode_without_choices_fails() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            response.into_completion("m"),
            Err(ModelError::InvalidResponse(_))
        ));
    }
}
