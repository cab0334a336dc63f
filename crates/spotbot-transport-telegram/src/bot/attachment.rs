//! Locating and fetching the photo an upload command refers to.

use anyhow::Result;
use spotbot_core::upload::Attachment;
use spotbot_core::utils::retry_transport_operation;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;

/// Content type Telegram uses for compressed photos
pub const COMPRESSED_PHOTO_TYPE: &str = "image/jpeg";

/// A file attached to a message, not yet downloaded
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Telegram file id used for the download
    pub file_id: FileId,
    /// Declared name and content type
    pub attachment: Attachment,
}

/// Find the file an upload command refers to.
///
/// The command message itself wins (photo with a caption); otherwise the
/// message it replies to is checked.
#[must_use]
pub fn find_attachment(msg: &Message) -> Option<IncomingFile> {
    attachment_of(msg).or_else(|| msg.reply_to_message().and_then(attachment_of))
}

fn attachment_of(msg: &Message) -> Option<IncomingFile> {
    // Compressed photos come in several sizes; the last one is the largest
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(IncomingFile {
            file_id: photo.file.id.clone(),
            attachment: Attachment::new(
                format!("{}.jpg", photo.file.unique_id),
                Some(COMPRESSED_PHOTO_TYPE.to_string()),
            ),
        });
    }
    msg.document().map(|doc| IncomingFile {
        file_id: doc.file.id.clone(),
        attachment: Attachment::new(
            doc.file_name
                .clone()
                .unwrap_or_else(|| doc.file.unique_id.to_string()),
            doc.mime_type.as_ref().map(ToString::to_string),
        ),
    })
}

/// Download a file with retry logic.
///
/// # Errors
///
/// Returns an error if the file cannot be fetched after all retries.
pub async fn download(bot: &Bot, file_id: &FileId) -> Result<Vec<u8>> {
    retry_transport_operation(|| async {
        let file = bot.get_file(file_id.clone()).await?;
        let mut buf = Vec::new();
        bot.download_file(&file.path, &mut buf).await?;
        Ok(buf)
    })
    .await
}
