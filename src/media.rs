//! Inlining of remote attachments into the model payload.
//!
//! Discord attachments arrive as CDN URLs. The chat completions endpoint expects
//! file data and images as base64 `data:` URLs, so remote parts are downloaded
//! and encoded before the request is sent.

use base64::{Engine, engine::general_purpose::STANDARD};
use log::{debug, warn};
use reqwest::{Client, header::CONTENT_TYPE};

use crate::error::{BotError, Result};
use crate::model::{ContentPart, File, ImageUrl, Message, MessageContent};

fn is_remote(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Download `url` and encode it as `data:<mime>;base64,<payload>`.
///
/// The MIME type comes from the response's content type, then from `name_hint`'s
/// extension, then falls back to `application/octet-stream`.
///
/// # Errors
///
/// Returns `AttachmentFetch` for a non-success status, or the transport error.
pub async fn fetch_as_data_url(client: &Client, url: &str, name_hint: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(BotError::AttachmentFetch { status });
    }

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or_else(
            || {
                mime_guess::from_path(name_hint)
                    .first_or_octet_stream()
                    .to_string()
            },
            str::to_string,
        );

    let bytes = response.bytes().await?;
    debug!("Inlined {} bytes of {mime_type} from {url}", bytes.len());
    Ok(format!("data:{mime_type};base64,{}", STANDARD.encode(&bytes)))
}

async fn inline_part(client: &Client, part: ContentPart) -> Option<ContentPart> {
    match part {
        ContentPart::ImageUrl { image_url } if is_remote(&image_url.url) => {
            match fetch_as_data_url(client, &image_url.url, &image_url.url).await {
                Ok(url) => Some(ContentPart::ImageUrl {
                    image_url: ImageUrl { url },
                }),
                Err(e) => {
                    warn!("Dropping image {}: {e}", image_url.url);
                    None
                }
            }
        }
        ContentPart::File { file } if is_remote(&file.file_data) => {
            match fetch_as_data_url(client, &file.file_data, &file.filename).await {
                Ok(file_data) => Some(ContentPart::File {
                    file: File {
                        filename: file.filename,
                        file_data,
                    },
                }),
                Err(e) => {
                    warn!("Dropping file {}: {e}", file.filename);
                    None
                }
            }
        }
        other => Some(other),
    }
}

/// Replace every remote image or file part with an inline `data:` URL.
///
/// A part whose download fails is dropped with a warning so the rest of the
/// conversation still reaches the model.
pub async fn inline_remote_media(client: &Client, messages: &mut [Message]) {
    for message in messages {
        let Some(MessageContent::MultiPart(parts)) = &mut message.content else {
            continue;
        };

        let mut inlined = Vec::with_capacity(parts.len());
        for part in std::mem::take(parts) {
            if let Some(part) = inline_part(client, part).await {
                inlined.push(part);
            }
        }
        *parts = inlined;
    }
}
