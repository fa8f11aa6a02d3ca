//! Response sending utilities for Discord.

use log::{info, warn};
use poise::serenity_prelude::{
    Context, CreateAttachment, CreateMessage, Message as SerenityMessage,
};

use crate::bot::Data;
use crate::error::Result;
use crate::images::fetch_image;
use crate::tools::SELF_PORTRAIT_PLACEHOLDER;

/// What to send back for a generated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Snow's picture, with any text the model wrote around the placeholder.
    SelfPortrait { caption: Option<String> },
}

impl Reply {
    /// Interpret a generated reply. Blank replies produce nothing.
    #[must_use]
    pub fn from_generated(reply: &str) -> Option<Self> {
        if reply.contains(SELF_PORTRAIT_PLACEHOLDER) {
            let caption = reply.replace(SELF_PORTRAIT_PLACEHOLDER, "");
            let caption = caption.trim();
            return Some(Reply::SelfPortrait {
                caption: (!caption.is_empty()).then(|| caption.to_string()),
            });
        }

        let text = reply.trim();
        (!text.is_empty()).then(|| Reply::Text(text.to_string()))
    }
}

/// Send the chatbot response to Discord.
pub async fn send_response(
    ctx: &Context,
    new_message: &SerenityMessage,
    reply: Option<String>,
    data: &Data,
) -> Result<()> {
    let Some(reply) = reply.as_deref().and_then(Reply::from_generated) else {
        warn!("No response content generated");
        return Ok(());
    };

    match reply {
        Reply::Text(text) => {
            new_message.reply(&ctx.http, &text).await?;
            info!(
                "Replied to {} in channel {}: {}",
                new_message.author.tag(),
                new_message.channel_id,
                text
            );
        }
        Reply::SelfPortrait { caption } => {
            let image = fetch_image(data.http(), data.snow_image_url(), "snow").await?;
            let mut message = CreateMessage::new()
                .reference_message(new_message)
                .add_file(CreateAttachment::bytes(image.data, image.filename));
            if let Some(ref caption) = caption {
                message = message.content(caption);
            }

            new_message
                .channel_id
                .send_message(&ctx.http, message)
                .await?;
            info!(
                "Replied to {} in channel {} with a self-portrait",
                new_message.author.tag(),
                new_message.channel_id
            );
        }
    }

    Ok(())
}
