//! Main handler for messages addressed to the bot.

use log::{debug, info, warn};
use poise::serenity_prelude::{Context, GetMessages, Message as SerenityMessage, UserId};

use crate::bot::Data;
use crate::error::Result;
use crate::types::ChatMessage;

use super::response::send_response;

/// A message is for the bot when it mentions the bot or replies to one of its messages.
fn is_addressed_to(message: &SerenityMessage, bot_user_id: UserId) -> bool {
    if message.author.id == bot_user_id {
        return false;
    }

    message.mentions_user_id(bot_user_id)
        || message
            .referenced_message
            .as_ref()
            .is_some_and(|referenced| referenced.author.id == bot_user_id)
}

/// Fetch the latest channel messages, newest first, making sure the trigger is included.
async fn fetch_recent_messages(
    ctx: &Context,
    new_message: &SerenityMessage,
    limit: u8,
) -> Vec<SerenityMessage> {
    let mut messages = match new_message
        .channel_id
        .messages(&ctx.http, GetMessages::new().limit(limit))
        .await
    {
        Ok(messages) => messages,
        Err(e) => {
            warn!("Failed to fetch channel history: {e}");
            Vec::new()
        }
    };

    if !messages.iter().any(|m| m.id == new_message.id) {
        messages.insert(0, new_message.clone());
    }
    messages
}

/// Reply as Snow to a message that mentions or replies to the bot.
///
/// # Errors
///
/// Returns an error if the reply cannot be delivered to Discord.
pub async fn handle_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
) -> Result<()> {
    let bot_user_id = ctx.cache.current_user().id;
    if !is_addressed_to(new_message, bot_user_id) {
        return Ok(());
    }

    info!(
        "Received message from {} in channel {}: {}",
        new_message.author.tag(),
        new_message.channel_id,
        new_message.content
    );

    if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    let history: Vec<ChatMessage> = fetch_recent_messages(ctx, new_message, data.history_limit())
        .await
        .iter()
        .map(|message| ChatMessage::from_discord(message, &ctx.cache))
        .collect();
    debug!("Conversation history has {} messages", history.len());

    let reply = data.generator().generate(&history).await;
    send_response(ctx, new_message, reply, data).await
}
