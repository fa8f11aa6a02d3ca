//! Tool definitions for the chat completions tool calling API.

use serde_json::json;
use strum::{Display, EnumString, IntoStaticStr};

use crate::model::{FunctionDefinition, Tool};

/// Names the model uses to call each tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum ToolName {
    #[strum(serialize = "myself")]
    Myself,
    #[strum(serialize = "sendMessage")]
    SendMessage,
}

/// Returns the tool definitions offered to the model.
///
/// `myself` sends a picture of Snow; `sendMessage` carries an ordinary reply.
#[must_use]
pub fn get_tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: ToolName::Myself.to_string(),
                description: "Used to send a picture of yourself to the chat. Only use this when \
                    the most recent output is asking for your appearance (e.g. \"what do you look \
                    like?\" or \"send me a picture of yourself\")."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
        },
        Tool {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: ToolName::SendMessage.to_string(),
                description: "Sends a message to the chat. Use this tool during conversations. \
                    Use this tool if you don't have any other tools available. ONLY include the \
                    message contents!"
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "message": {
                            "type": "string"
                        }
                    },
                    "required": ["message"]
                }),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_round_trip_through_strum() {
        assert_eq!("myself".parse::<ToolName>().ok(), Some(ToolName::Myself));
        assert_eq!(
            "sendMessage".parse::<ToolName>().ok(),
            Some(ToolName::SendMessage)
        );
        assert!("send_message".parse::<ToolName>().is_err());
    }

    #[test]
    fn send_message_requires_message_argument() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 2);

        let send = tools
            .iter()
            .find(|tool| tool.function.name == "sendMessage")
            .expect("sendMessage is defined");
        assert_eq!(send.function.parameters["required"], json!(["message"]));

        let myself = tools
            .iter()
            .find(|tool| tool.function.name == "myself")
            .expect("myself is defined");
        assert_eq!(myself.function.parameters["properties"], json!({}));
    }
}
