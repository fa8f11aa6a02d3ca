//! Client for an OpenAI-compatible chat completions endpoint.

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, Result};
use crate::media::inline_remote_media;
use crate::types::MessageRole;

// Discord's message limit is 2000 characters (standard users)
// Roughly 1 token ≈ 4 characters, so 2000 chars ≈ 500 tokens
const MAX_TOKENS: u32 = 512;

/// The model must answer through one of the offered tools.
const TOOL_CHOICE_REQUIRED: &str = "required";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    tools: &'a [Tool],
    tool_choice: &'static str,
}

// Tool calling structures
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Result of a chat completion
#[derive(Debug)]
pub enum ChatResult {
    /// Model produced a text response
    TextResponse(String),
    /// Model called one or more tools
    ToolCalls(Vec<ToolCall>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    MultiPart(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    File { file: File },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub filename: String,
    pub file_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    #[must_use]
    pub fn new(role: MessageRole, content: MessageContent) -> Self {
        Self {
            role,
            content: Some(content),
            tool_calls: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// A chat model that answers a system prompt plus history, with tools forced.
pub trait ChatModel {
    fn complete(
        &self,
        system_prompt: &str,
        messages: Vec<Message>,
        tools: &[Tool],
    ) -> impl Future<Output = Result<ChatResult>> + Send;
}

pub struct ChatClient {
    api_key: String,
    api_url: Url,
    client: reqwest::Client,
    model: String,
}

impl ChatClient {
    #[must_use]
    pub fn new(api_key: String, api_url: Url, model: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
            model,
        }
    }
}

impl ChatModel for ChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        mut messages: Vec<Message>,
        tools: &[Tool],
    ) -> Result<ChatResult> {
        debug!(
            "Sending request to {} with {} messages",
            self.api_url,
            messages.len()
        );

        inline_remote_media(&self.client, &mut messages).await;

        messages.insert(
            0,
            Message::new(
                MessageRole::System,
                MessageContent::Text(system_prompt.to_string()),
            ),
        );

        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            tools,
            tool_choice: TOOL_CHOICE_REQUIRED,
        };

        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::ModelApi { status, message });
        }

        let api_response: ChatResponse = response.json().await?;

        let message = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::ModelResponse("No choices in response".to_string()))?
            .message;

        if let Some(tool_calls) = message.tool_calls
            && !tool_calls.is_empty()
        {
            debug!("Received {} tool calls from model", tool_calls.len());
            return Ok(ChatResult::ToolCalls(tool_calls));
        }

        let reply = match message.content {
            Some(MessageContent::Text(text)) => text,
            Some(MessageContent::MultiPart(parts)) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        };

        debug!("Received text response from model");
        Ok(ChatResult::TextResponse(reply))
    }
}
