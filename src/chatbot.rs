//! AI chatbot module - Snow's replies to messages addressed to the bot.

mod formatter;
mod generator;
mod handler;
mod persona;
mod postprocess;
mod response;

pub use formatter::{ContentItem, UserPart, build_history, format_message};
pub use generator::Generator;
pub use handler::handle_message;
pub use persona::{CustomEmoji, EMOJIS, build_system_prompt};
pub use postprocess::{correct_persona, normalize_emojis, polish_reply};
pub use response::Reply;
