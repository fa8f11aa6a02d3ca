//! Common types used throughout the snowbot crate.

use std::sync::Arc;

use poise::serenity_prelude::{
    Attachment as SerenityAttachment, Cache, Message as SerenityMessage, User,
};
use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
///
/// Maps to chat completion message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from a human user
    User,
    /// Message previously sent by a bot
    Assistant,
    /// System prompt
    System,
}

/// How an attachment is presented to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    File,
}

impl MediaKind {
    /// Anything whose content type starts with `image` is an image; everything else,
    /// including a missing content type, is a plain file.
    #[must_use]
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.starts_with("image") => MediaKind::Image,
            _ => MediaKind::File,
        }
    }
}

/// Author of a chat message, serialized into the model payload as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub username: String,
    pub global_name: Option<String>,
    pub bot: bool,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.name.clone(),
            global_name: user.global_name.clone(),
            bot: user.bot,
        }
    }
}

/// A file attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAttachment {
    pub filename: String,
    pub size: u32,
    pub url: String,
    pub content_type: Option<String>,
}

impl From<&SerenityAttachment> for ChatAttachment {
    fn from(attachment: &SerenityAttachment) -> Self {
        Self {
            filename: attachment.filename.clone(),
            size: attachment.size,
            url: attachment.url.clone(),
            content_type: attachment.content_type.clone(),
        }
    }
}

/// Platform-independent snapshot of a Discord message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub author: Author,
    pub content: String,
    /// Content with mentions resolved to readable names.
    pub clean_content: String,
    pub attachments: Vec<ChatAttachment>,
}

impl ChatMessage {
    /// Snapshot a serenity message, resolving mentions through the cache.
    #[must_use]
    pub fn from_discord(message: &SerenityMessage, cache: &Arc<Cache>) -> Self {
        Self {
            id: message.id.to_string(),
            author: Author::from(&message.author),
            content: message.content.clone(),
            clean_content: message.content_safe(cache),
            attachments: message.attachments.iter().map(ChatAttachment::from).collect(),
        }
    }

    #[must_use]
    pub fn is_from_bot(&self) -> bool {
        self.author.bot
    }
}
