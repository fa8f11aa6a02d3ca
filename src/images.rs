//! Slash commands that repost a random picture from the image service.

use chrono::Utc;
use log::{debug, info};
use mime::Mime;
use poise::CreateReply;
use poise::serenity_prelude::CreateAttachment;
use reqwest::{Client, header::CONTENT_TYPE};
use url::Url;

use crate::bot::Data;
use crate::error::{BotError, Result};

/// Context type for image commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

/// Used when the service does not say what it sent.
const DEFAULT_EXTENSION: &str = "png";

/// An image buffered in memory, ready to upload.
#[derive(Debug)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    pub filename: String,
}

/// Pick a file extension for an image content type, e.g. `image/jpeg` -> `jpeg`.
fn extension_for(content_type: Option<&str>) -> &'static str {
    let Some(mime) = content_type.and_then(|ct| ct.parse::<Mime>().ok()) else {
        return DEFAULT_EXTENSION;
    };
    if mime.type_() != mime::IMAGE {
        return DEFAULT_EXTENSION;
    }

    mime_guess::get_mime_extensions_str(mime.essence_str())
        .and_then(|extensions| {
            extensions
                .iter()
                .find(|ext| **ext == mime.subtype().as_str())
                .or_else(|| extensions.first())
                .copied()
        })
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Download an image and name it `<stem>_<timestamp>.<ext>`.
///
/// # Errors
///
/// Returns `ImageFetch` for a non-success status, or the transport error.
pub async fn fetch_image(client: &Client, url: &Url, stem: &str) -> Result<FetchedImage> {
    debug!("Fetching image from {url}");
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(BotError::ImageFetch { status });
    }

    let extension = extension_for(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
    );
    let data = response.bytes().await?.to_vec();
    info!("Fetched {} bytes of image data from {url}", data.len());

    Ok(FetchedImage {
        data,
        filename: format!("{stem}_{}.{extension}", Utc::now().timestamp()),
    })
}

async fn send_image(ctx: Context<'_>, url: &Url, stem: &str) -> Result<()> {
    ctx.defer().await?;

    let image = fetch_image(ctx.data().http(), url, stem).await?;
    let attachment = CreateAttachment::bytes(image.data, image.filename);
    ctx.send(CreateReply::default().attachment(attachment)).await?;
    Ok(())
}

/// Sends a random image of Snow
#[poise::command(slash_command)]
pub async fn snow(ctx: Context<'_>) -> Result<()> {
    send_image(ctx, ctx.data().snow_image_url(), "snow").await
}

/// Sends a random image of Morris
#[poise::command(slash_command)]
pub async fn morris(ctx: Context<'_>) -> Result<()> {
    send_image(ctx, ctx.data().morris_image_url(), "morris").await
}

/// Get available image commands.
#[must_use]
pub fn image_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![snow(), morris()]
}
