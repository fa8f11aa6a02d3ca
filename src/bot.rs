//! Discord bot core logic and event handling.

use log::{debug, error, info, warn};
use poise::{
    Framework, FrameworkError, FrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents},
};
use url::Url;

use crate::chatbot::{Generator, handle_message};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::images::image_commands;
use crate::model::ChatClient;

/// State shared by the event handler and slash commands.
pub struct Data {
    generator: Generator<ChatClient>,
    http: reqwest::Client,
    history_limit: u8,
    snow_image_url: Url,
    morris_image_url: Url,
}

impl Data {
    fn from_config(config: Config) -> Self {
        let client = ChatClient::new(config.model_api_key, config.model_api_url, config.model);
        Self {
            generator: Generator::new(client, &config.bot_client_id),
            http: reqwest::Client::new(),
            history_limit: config.history_limit,
            snow_image_url: config.snow_image_url,
            morris_image_url: config.morris_image_url,
        }
    }

    pub(crate) fn generator(&self) -> &Generator<ChatClient> {
        &self.generator
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn history_limit(&self) -> u8 {
        self.history_limit
    }

    pub(crate) fn snow_image_url(&self) -> &Url {
        &self.snow_image_url
    }

    pub(crate) fn morris_image_url(&self) -> &Url {
        &self.morris_image_url
    }
}

/// Run the Discord bot.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the Discord client fails.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;
    let discord_token = config.discord_token.clone();

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: image_commands(),
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(Data::from_config(config))
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> Result<()> {
    if let FullEvent::Message { new_message } = event {
        handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!("Command '{}' failed: {error}", ctx.command().name);
            if let Err(e) = ctx.say(error.user_message()).await {
                warn!("Failed to report command error: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}
