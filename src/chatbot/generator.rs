//! Single-pass reply generation: history in, one polished reply out.

use log::{debug, error};

use crate::error::Result;
use crate::model::{ChatModel, ChatResult, Message, Tool};
use crate::tools::{ToolInvocation, get_tool_definitions};
use crate::types::ChatMessage;

use super::formatter::build_history;
use super::persona::{CustomEmoji, EMOJIS, build_system_prompt};
use super::postprocess::polish_reply;

/// Produces Snow's replies through a chat model.
///
/// Holds only read-only state, so one generator can serve concurrent calls.
#[derive(Debug)]
pub struct Generator<M> {
    model: M,
    system_prompt: String,
    tools: Vec<Tool>,
    emojis: &'static [CustomEmoji],
}

impl<M: ChatModel> Generator<M> {
    #[must_use]
    pub fn new(model: M, bot_client_id: &str) -> Self {
        let system_prompt = build_system_prompt(bot_client_id, EMOJIS);
        debug!("System prompt:\n{system_prompt}");
        Self {
            model,
            system_prompt,
            tools: get_tool_definitions(),
            emojis: EMOJIS,
        }
    }

    /// Generate a reply to `newest_first` messages.
    ///
    /// Returns `None` when the model call fails; the failure is logged and not retried.
    pub async fn generate(&self, newest_first: &[ChatMessage]) -> Option<String> {
        match self.draft(newest_first).await {
            Ok(draft) => Some(polish_reply(&draft, self.emojis)),
            Err(e) => {
                error!("Failed to generate reply: {e}");
                error!("{e:?}");
                None
            }
        }
    }

    /// Ask the model and return the unpolished reply text.
    async fn draft(&self, newest_first: &[ChatMessage]) -> Result<String> {
        let messages: Vec<Message> = build_history(newest_first)?
            .into_iter()
            .map(Message::from)
            .collect();
        debug!("Generating reply from {} messages", messages.len());

        match self
            .model
            .complete(&self.system_prompt, messages, &self.tools)
            .await?
        {
            ChatResult::ToolCalls(tool_calls) => {
                let Some(call) = tool_calls.first() else {
                    return Ok(String::new());
                };
                let output = ToolInvocation::from_call(call)?.execute();
                Ok(output.message)
            }
            ChatResult::TextResponse(text) => {
                debug!("Model answered without a tool call");
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;

    use super::*;
    use crate::error::BotError;
    use crate::model::{FunctionCall, MessageContent, ToolCall};
    use crate::types::{Author, MessageRole};

    enum Script {
        Text(&'static str),
        Tool(&'static str, &'static str),
        Fail,
    }

    struct ScriptedModel {
        script: Script,
        seen: Mutex<Vec<Message>>,
    }

    impl ScriptedModel {
        fn new(script: Script) -> Self {
            Self {
                script,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            _system_prompt: &str,
            messages: Vec<Message>,
            tools: &[Tool],
        ) -> Result<ChatResult> {
            assert_eq!(tools.len(), 2);
            *self.seen.lock().expect("lock") = messages;

            match self.script {
                Script::Text(text) => Ok(ChatResult::TextResponse(text.to_string())),
                Script::Tool(name, arguments) => Ok(ChatResult::ToolCalls(vec![ToolCall {
                    id: "call_1".to_string(),
                    call_type: "function".to_string(),
                    function: FunctionCall {
                        name: name.to_string(),
                        arguments: arguments.to_string(),
                    },
                }])),
                Script::Fail => Err(BotError::ModelApi {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    fn chat_message(id: &str, bot: bool) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            author: Author {
                id: "7".to_string(),
                username: "someone".to_string(),
                global_name: None,
                bot,
            },
            content: format!("message {id}"),
            clean_content: format!("message {id}"),
            attachments: Vec::new(),
        }
    }

    fn generator(script: Script) -> Generator<ScriptedModel> {
        Generator::new(ScriptedModel::new(script), "900")
    }

    #[tokio::test]
    async fn send_message_tool_reply_is_polished() {
        let generator = generator(Script::Tool(
            "sendMessage",
            r#"{"message":"<:blep:123456> I'm a dog."}"#,
        ));

        let reply = generator.generate(&[chat_message("1", false)]).await;

        assert_eq!(reply.as_deref(), Some(":blep: I'm not a dog."));
    }

    #[tokio::test]
    async fn self_portrait_tool_drafts_placeholder() -> Result<()> {
        let generator = generator(Script::Tool("myself", "{}"));

        let draft = generator.draft(&[chat_message("1", false)]).await?;
        assert_eq!(draft, "{{MYSELF}}");

        let reply = generator.generate(&[chat_message("1", false)]).await;
        assert_eq!(reply.as_deref(), Some("{{MYSELF}}"));
        Ok(())
    }

    #[tokio::test]
    async fn text_fallback_is_used_without_tool_call() {
        let generator = generator(Script::Text("i am a d0gg0"));

        let reply = generator.generate(&[chat_message("1", false)]).await;

        assert_eq!(reply.as_deref(), Some("I'm not a dog"));
    }

    #[tokio::test]
    async fn provider_failure_yields_none() {
        let generator = generator(Script::Fail);

        assert!(generator.generate(&[chat_message("1", false)]).await.is_none());
    }

    #[tokio::test]
    async fn malformed_tool_output_yields_none() {
        let generator = generator(Script::Tool("sendMessage", r#"{"text":"hi"}"#));

        assert!(generator.generate(&[chat_message("1", false)]).await.is_none());
    }

    #[tokio::test]
    async fn history_reaches_model_oldest_first() {
        let generator = generator(Script::Text("mrrp"));
        let newest_first = [
            chat_message("3", false),
            chat_message("2", true),
            chat_message("1", false),
        ];

        generator.generate(&newest_first).await;

        let seen = generator.model.seen.lock().expect("lock");
        let roles: Vec<MessageRole> = seen.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        let Some(MessageContent::Text(assistant)) = &seen[1].content else {
            panic!("assistant content should be text");
        };
        assert!(assistant.contains("\"id\":\"2\""));
        let Some(MessageContent::MultiPart(first)) = &seen[0].content else {
            panic!("user content should be multipart");
        };
        assert!(matches!(
            &first[0],
            crate::model::ContentPart::Text { text } if text.contains("\"id\":\"1\"")
        ));
    }
}
