use std::env;

use log::{debug, error, info};
use url::Url;

use crate::error::{BotError, Result};

/// Default chat model served through the provider's OpenAI-compatible endpoint.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Google's OpenAI-compatible chat completions endpoint.
pub const DEFAULT_MODEL_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

/// Image service used for Snow's pictures.
pub const DEFAULT_IMAGE_URL: &str = "https://snowapi-vercel.vercel.app/cat";

const DEFAULT_HISTORY_LIMIT: u8 = 20;

/// Discord caps a single message fetch at 100.
const MAX_HISTORY_LIMIT: u8 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub model_api_key: String,
    pub bot_client_id: String,
    pub model: String,
    pub model_api_url: Url,
    pub history_limit: u8,
    pub snow_image_url: Url,
    pub morris_image_url: Url,
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|e| {
        error!("Failed to load {name} from environment: {e}");
        e.into()
    })
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn optional_url(name: &str, default: &str) -> Result<Url> {
    let raw = optional(name, default);
    Url::parse(&raw).map_err(|e| {
        error!("Invalid URL in {name}: {e}");
        BotError::Config(format!("{name} is not a valid URL: {e}"))
    })
}

fn parse_history_limit(raw: Option<String>) -> Result<u8> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_HISTORY_LIMIT);
    };

    match raw.trim().parse::<u8>() {
        Ok(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => Ok(limit),
        _ => {
            error!("Invalid HISTORY_LIMIT value: {raw}");
            Err(BotError::Config(format!(
                "HISTORY_LIMIT must be between 1 and {MAX_HISTORY_LIMIT}, got '{raw}'"
            )))
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a URL does not parse,
    /// or `HISTORY_LIMIT` is out of range.
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = required("DISCORD_TOKEN")?;
        let model_api_key = required("GOOGLE_GENERATIVE_AI_API_KEY")?;
        let bot_client_id = required("BOT_CLIENT_ID")?;
        let model = optional("MODEL", DEFAULT_MODEL);
        let model_api_url = optional_url("MODEL_API_URL", DEFAULT_MODEL_API_URL)?;
        let history_limit = parse_history_limit(env::var("HISTORY_LIMIT").ok())?;
        let snow_image_url = optional_url("SNOW_IMAGE_URL", DEFAULT_IMAGE_URL)?;
        let morris_image_url = optional_url("MORRIS_IMAGE_URL", DEFAULT_IMAGE_URL)?;

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Model API key length: {} characters", model_api_key.len());
        debug!("Bot client ID: {bot_client_id}");
        debug!("Model: {model} via {model_api_url}");
        debug!("History limit: {history_limit}");

        Ok(Self {
            discord_token,
            model_api_key,
            bot_client_id,
            model,
            model_api_url,
            history_limit,
            snow_image_url,
            morris_image_url,
        })
    }
}
