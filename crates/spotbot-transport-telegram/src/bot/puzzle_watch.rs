//! Telegram side of the puzzle-result watch.

use crate::bot::resilient::reply_html_resilient;
use crate::bot::views::user_mention_html;
use anyhow::Result;
use spotbot_core::puzzle::{InboundMessage, PuzzleWatch};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{Chat, Me};
use tracing::info;

/// Name the watch compares against the designated channel
#[must_use]
pub fn channel_name(chat: &Chat) -> Option<&str> {
    chat.title().or_else(|| chat.username())
}

/// Text the watch reads: the message text, or the caption of a photo
#[must_use]
pub fn message_body(msg: &Message) -> Option<&str> {
    msg.text().or_else(|| msg.caption())
}

/// Scan a text or captioned message and reply to misplaced puzzle results.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn watch_message(
    bot: Bot,
    msg: Message,
    me: Me,
    watch: Arc<PuzzleWatch>,
) -> Result<()> {
    let (Some(text), Some(author)) = (message_body(&msg), msg.from.as_ref()) else {
        return Ok(());
    };

    let inbound = InboundMessage {
        channel: channel_name(&msg.chat),
        text,
        from_self: author.id == me.id,
    };
    let reply = {
        let mut rng = rand::thread_rng();
        watch.scold(&inbound, &user_mention_html(author), &mut rng)
    };

    if let Some(reply) = reply {
        info!(
            "Puzzle result from user {} in {:?}, outside {}",
            author.id,
            inbound.channel,
            watch.designated_channel()
        );
        reply_html_resilient(&bot, msg.chat.id, msg.id, reply).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_prefers_title() -> Result<(), serde_json::Error> {
        let group: Chat =
            serde_json::from_str(r#"{"id":-1001,"type":"supergroup","title":"nyt-dailies"}"#)?;
        assert_eq!(channel_name(&group), Some("nyt-dailies"));

        let private: Chat = serde_json::from_str(
            r#"{"id":7,"type":"private","username":"amy","first_name":"Amy"}"#,
        )?;
        assert_eq!(channel_name(&private), Some("amy"));
        Ok(())
    }

    #[test]
    fn test_caption_counts_as_body() -> Result<(), serde_json::Error> {
        let captioned: Message = serde_json::from_str(
            r#"{"message_id":3,"date":1700000000,
                "chat":{"id":-1001,"type":"supergroup","title":"general"},
                "from":{"id":7,"is_bot":false,"first_name":"Amy"},
                "caption":"Connections\nPuzzle #512",
                "photo":[{"file_id":"p","file_unique_id":"p1","width":640,"height":480}]}"#,
        )?;
        assert_eq!(message_body(&captioned), Some("Connections\nPuzzle #512"));

        let text: Message = serde_json::from_str(
            r#"{"message_id":4,"date":1700000000,
                "chat":{"id":-1001,"type":"supergroup","title":"general"},
                "from":{"id":7,"is_bot":false,"first_name":"Amy"},
                "text":"Wordle 1,234 3/6"}"#,
        )?;
        assert_eq!(message_body(&text), Some("Wordle 1,234 3/6"));
        Ok(())
    }
}
