//! Resilient messaging utilities with automatic retry for Telegram API operations.
//!
//! Wrappers around Telegram sends that retry on transient network failures
//! using exponential backoff with jitter.
//!
//! # Usage
//!
//! ```ignore
//! use spotbot_transport_telegram::bot::resilient::{send_message_resilient, send_stored_photo_resilient};
//!
//! send_message_resilient(&bot, chat_id, "Uploading...").await?;
//! send_stored_photo_resilient(&bot, chat_id, &path).await?;
//! ```

use anyhow::Result;
use spotbot_core::utils::retry_transport_operation;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, ChatId, InputFile, Message, MessageId, ParseMode, ReplyParameters,
};
use tracing::warn;

/// Send a plain text message with automatic retry on network failures.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
) -> Result<Message> {
    let text = text.into();
    retry_transport_operation(|| async {
        bot.send_message(chat_id, text.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
    })
    .await
}

/// Reply to a message with HTML text, retrying on network failures.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn reply_html_resilient(
    bot: &Bot,
    chat_id: ChatId,
    reply_to: MessageId,
    html: impl Into<String>,
) -> Result<Message> {
    let html = html.into();
    retry_transport_operation(|| async {
        bot.send_message(chat_id, html.clone())
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(reply_to))
            .await
            .map_err(|e| anyhow::anyhow!("Telegram reply error: {e}"))
    })
    .await
}

static PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// How a stored file goes back to the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMethod {
    /// `sendPhoto`, falling back to a document if Telegram refuses it
    Photo,
    /// `sendDocument`, for image formats `sendPhoto` does not take
    Document,
}

impl SendMethod {
    /// Pick the method from the file extension, ignoring case
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let is_photo = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()));
        if is_photo {
            Self::Photo
        } else {
            Self::Document
        }
    }

    /// Chat action shown while the file is on its way
    #[must_use]
    pub const fn chat_action(self) -> ChatAction {
        match self {
            Self::Photo => ChatAction::UploadPhoto,
            Self::Document => ChatAction::UploadDocument,
        }
    }
}

/// Send a stored photo from disk, retrying on network failures.
///
/// JPEG and PNG files go out as photos. Other image formats (webp, gif,
/// heic, svg) and photos Telegram refuses (too large, odd aspect ratio)
/// are sent as documents.
///
/// # Errors
///
/// Returns an error after all retries are exhausted.
pub async fn send_stored_photo_resilient(
    bot: &Bot,
    chat_id: ChatId,
    path: &Path,
) -> Result<Message> {
    let method = SendMethod::for_path(path);
    if let Err(e) = bot.send_chat_action(chat_id, method.chat_action()).await {
        warn!("Failed to send chat action: {e}");
    }
    retry_transport_operation(|| async {
        send_file_smart(bot, chat_id, path, method)
            .await
            .map_err(|e| anyhow::anyhow!("Telegram photo send error: {e}"))
    })
    .await
}

async fn send_file_smart(
    bot: &Bot,
    chat_id: ChatId,
    path: &Path,
    method: SendMethod,
) -> Result<Message, teloxide::RequestError> {
    let make_file = || InputFile::file(path.to_path_buf());

    if method == SendMethod::Photo {
        match bot.send_photo(chat_id, make_file()).await {
            Ok(msg) => return Ok(msg),
            Err(e) => warn!(
                file = %path.display(),
                error = %e,
                "Failed to send as photo; falling back to document"
            ),
        }
    }
    bot.send_document(chat_id, make_file()).await
}
