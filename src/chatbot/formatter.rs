//! Mapping of chat messages into model content items.

use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::model::{ContentPart, File, ImageUrl, Message, MessageContent};
use crate::types::{Author, ChatMessage, MediaKind, MessageRole};

/// One chat message as presented to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    /// A bot message, carried as a JSON snapshot string.
    Assistant { content: String },
    /// A human message: a JSON snapshot text part followed by one part per attachment.
    User { parts: Vec<UserPart> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPart {
    Text {
        text: String,
    },
    Image {
        image: String,
        mime_type: Option<String>,
    },
    File {
        data: String,
        filename: String,
        mime_type: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct AttachmentSummary {
    size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageSnapshot<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    author: &'a Author,
    clean_content: &'a str,
    attachments: Vec<AttachmentSummary>,
    id: &'a str,
}

impl<'a> MessageSnapshot<'a> {
    fn new(message: &'a ChatMessage, include_raw_content: bool) -> Self {
        Self {
            content: include_raw_content.then_some(message.content.as_str()),
            author: &message.author,
            clean_content: &message.clean_content,
            attachments: message
                .attachments
                .iter()
                .map(|attachment| AttachmentSummary {
                    size: attachment.size,
                })
                .collect(),
            id: &message.id,
        }
    }
}

/// Convert one chat message into exactly one content item.
///
/// Bot messages become assistant records without media; everything else becomes a
/// user record with a text snapshot plus an image or file part per attachment.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialized.
pub fn format_message(message: &ChatMessage) -> Result<ContentItem> {
    if message.is_from_bot() {
        let content = serde_json::to_string(&MessageSnapshot::new(message, true))?;
        return Ok(ContentItem::Assistant { content });
    }

    debug!("Formatting message {}: {}", message.id, message.clean_content);

    let mut parts = Vec::with_capacity(message.attachments.len() + 1);
    parts.push(UserPart::Text {
        text: serde_json::to_string(&MessageSnapshot::new(message, false))?,
    });
    parts.extend(message.attachments.iter().map(|attachment| {
        match MediaKind::from_content_type(attachment.content_type.as_deref()) {
            MediaKind::Image => UserPart::Image {
                image: attachment.url.clone(),
                mime_type: attachment.content_type.clone(),
            },
            MediaKind::File => UserPart::File {
                data: attachment.url.clone(),
                filename: attachment.filename.clone(),
                mime_type: attachment.content_type.clone(),
            },
        }
    }));

    Ok(ContentItem::User { parts })
}

/// Map a newest-first batch of messages into chronological content items.
///
/// # Errors
///
/// Returns an error if any message fails to format.
pub fn build_history(newest_first: &[ChatMessage]) -> Result<Vec<ContentItem>> {
    newest_first.iter().rev().map(format_message).collect()
}

impl From<UserPart> for ContentPart {
    fn from(part: UserPart) -> Self {
        match part {
            UserPart::Text { text } => ContentPart::Text { text },
            UserPart::Image { image, mime_type } => {
                debug!(
                    "Adding image attachment ({})",
                    mime_type.as_deref().unwrap_or("unknown")
                );
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: image },
                }
            }
            UserPart::File {
                data,
                filename,
                mime_type,
            } => {
                debug!(
                    "Adding file attachment {filename} ({})",
                    mime_type.as_deref().unwrap_or("unknown")
                );
                ContentPart::File {
                    file: File {
                        filename,
                        file_data: data,
                    },
                }
            }
        }
    }
}

impl From<ContentItem> for Message {
    fn from(item: ContentItem) -> Self {
        match item {
            ContentItem::Assistant { content } => {
                Message::new(MessageRole::Assistant, MessageContent::Text(content))
            }
            ContentItem::User { parts } => Message::new(
                MessageRole::User,
                MessageContent::MultiPart(parts.into_iter().map(ContentPart::from).collect()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::types::ChatAttachment;

    fn attachment(name: &str, content_type: Option<&str>) -> ChatAttachment {
        ChatAttachment {
            filename: name.to_string(),
            size: 1024,
            url: format!("https://cdn.discordapp.com/attachments/1/2/{name}"),
            content_type: content_type.map(str::to_string),
        }
    }

    fn message(id: &str, bot: bool, attachments: Vec<ChatAttachment>) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            author: Author {
                id: if bot { "900" } else { "100" }.to_string(),
                username: if bot { "snow" } else { "mic_87929" }.to_string(),
                global_name: None,
                bot,
            },
            content: format!("<@900> message {id}"),
            clean_content: format!("@snow message {id}"),
            attachments,
        }
    }

    #[test]
    fn bot_message_becomes_assistant_without_media() -> Result<()> {
        let msg = message("1", true, vec![attachment("cat.png", Some("image/png"))]);

        let ContentItem::Assistant { content } = format_message(&msg)? else {
            panic!("bot message should be an assistant item");
        };

        let snapshot: Value = serde_json::from_str(&content)?;
        assert_eq!(snapshot["content"], "<@900> message 1");
        assert_eq!(snapshot["cleanContent"], "@snow message 1");
        assert_eq!(snapshot["attachments"], serde_json::json!([{ "size": 1024 }]));
        assert_eq!(snapshot["id"], "1");
        assert_eq!(snapshot["author"]["bot"], true);
        Ok(())
    }

    #[test]
    fn user_message_has_text_part_plus_one_part_per_attachment() -> Result<()> {
        let msg = message(
            "2",
            false,
            vec![
                attachment("cat.png", Some("image/png")),
                attachment("notes.pdf", Some("application/pdf")),
                attachment("mystery.bin", None),
            ],
        );

        let ContentItem::User { parts } = format_message(&msg)? else {
            panic!("user message should be a user item");
        };

        assert_eq!(parts.len(), 4);
        let UserPart::Text { text } = &parts[0] else {
            panic!("first part should be text");
        };
        let snapshot: Value = serde_json::from_str(text)?;
        assert!(snapshot.get("content").is_none());
        assert_eq!(snapshot["cleanContent"], "@snow message 2");
        assert_eq!(snapshot["author"]["username"], "mic_87929");
        assert_eq!(snapshot["attachments"].as_array().map(Vec::len), Some(3));

        assert!(matches!(
            &parts[1],
            UserPart::Image { image, mime_type } if image.ends_with("cat.png")
                && mime_type.as_deref() == Some("image/png")
        ));
        assert!(matches!(
            &parts[2],
            UserPart::File { data, mime_type, .. } if data.ends_with("notes.pdf")
                && mime_type.as_deref() == Some("application/pdf")
        ));
        assert!(matches!(&parts[3], UserPart::File { mime_type: None, .. }));
        Ok(())
    }

    #[test]
    fn history_is_chronological() -> Result<()> {
        let oldest = message("1", false, vec![]);
        let middle = message("2", true, vec![]);
        let newest = message("3", false, vec![]);

        let from_newest_first = build_history(&[newest.clone(), middle.clone(), oldest.clone()])?;
        let direct = [oldest, middle, newest]
            .iter()
            .map(format_message)
            .collect::<Result<Vec<_>>>()?;

        assert_eq!(from_newest_first, direct);
        Ok(())
    }

    #[test]
    fn user_item_maps_to_multipart_wire_message() -> Result<()> {
        let msg = message("4", false, vec![attachment("cat.png", Some("image/png"))]);
        let wire = Message::from(format_message(&msg)?);

        assert_eq!(wire.role, MessageRole::User);
        let Some(MessageContent::MultiPart(parts)) = wire.content else {
            panic!("expected multipart content");
        };
        assert!(matches!(parts[0], ContentPart::Text { .. }));
        assert!(matches!(
            &parts[1],
            ContentPart::ImageUrl { image_url } if image_url.url.ends_with("cat.png")
        ));
        Ok(())
    }
}
