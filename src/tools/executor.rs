//! Decoding and execution of the model's tool calls.

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{BotError, Result};
use crate::model::ToolCall;

use super::definitions::ToolName;

/// Reply text that asks the caller to send Snow's picture instead.
pub const SELF_PORTRAIT_PLACEHOLDER: &str = "{{MYSELF}}";

/// Arguments for the `sendMessage` tool
#[derive(Debug, Deserialize)]
struct SendMessageArgs {
    message: String,
}

/// A decoded tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    Myself,
    SendMessage { message: String },
}

/// Result handed back from a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub message: String,
}

impl ToolInvocation {
    /// Decode a raw tool call by name and JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown tool name or arguments that do not match its schema.
    pub fn from_call(call: &ToolCall) -> Result<Self> {
        debug!(
            "Decoding tool '{}' with args: {}",
            call.function.name, call.function.arguments
        );

        let name: ToolName = call.function.name.parse().map_err(|_| {
            warn!("Unknown tool requested: {}", call.function.name);
            BotError::ToolExecution(format!("Unknown tool: {}", call.function.name))
        })?;

        match name {
            ToolName::Myself => Ok(ToolInvocation::Myself),
            ToolName::SendMessage => {
                let args: SendMessageArgs = serde_json::from_str(&call.function.arguments)?;
                Ok(ToolInvocation::SendMessage {
                    message: args.message,
                })
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> ToolName {
        match self {
            ToolInvocation::Myself => ToolName::Myself,
            ToolInvocation::SendMessage { .. } => ToolName::SendMessage,
        }
    }

    /// Run the tool.
    #[must_use]
    pub fn execute(self) -> ToolOutput {
        let name: &'static str = self.name().into();
        debug!("Executing tool '{name}'");

        match self {
            ToolInvocation::Myself => ToolOutput {
                message: SELF_PORTRAIT_PLACEHOLDER.to_string(),
            },
            ToolInvocation::SendMessage { message } => ToolOutput { message },
        }
    }
}
