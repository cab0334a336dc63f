//! Puzzle-result watch.
//!
//! Shared puzzle results belong in one designated chat. Anywhere else the
//! author gets a reply with a random number of demerits.

use crate::config::TaxSettings;
use rand::Rng;
use std::ops::RangeInclusive;

/// Text prefixes of shared NYT puzzle results
pub const PUZZLE_PREFIXES: &[&str] = &["Wordle ", "Strands #", "Connections\nPuzzle #"];

/// What the watch needs to know about an inbound message
#[derive(Debug, Clone, Copy)]
pub struct InboundMessage<'a> {
    /// Name of the chat the message was posted in, if it has one
    pub channel: Option<&'a str>,
    /// Message text
    pub text: &'a str,
    /// Whether the bot itself sent the message
    pub from_self: bool,
}

/// Stateless filter deciding which messages earn demerits
#[derive(Debug, Clone)]
pub struct PuzzleWatch {
    designated_channel: String,
    demerits: RangeInclusive<u32>,
}

impl PuzzleWatch {
    /// Create a watch. `demerits` must not be empty.
    #[must_use]
    pub fn new(designated_channel: impl Into<String>, demerits: RangeInclusive<u32>) -> Self {
        Self {
            designated_channel: designated_channel.into(),
            demerits,
        }
    }

    /// Build a watch from settings
    #[must_use]
    pub fn from_settings(settings: &TaxSettings) -> Self {
        Self::new(settings.puzzle_channel.clone(), settings.demerits())
    }

    /// Chat where puzzle results are allowed
    #[must_use]
    pub fn designated_channel(&self) -> &str {
        &self.designated_channel
    }

    /// Whether the message is a puzzle result posted in the wrong place
    #[must_use]
    pub fn is_misplaced(&self, msg: &InboundMessage<'_>) -> bool {
        if msg.from_self {
            return false;
        }
        if msg.channel == Some(self.designated_channel.as_str()) {
            return false;
        }
        PUZZLE_PREFIXES.iter().any(|p| msg.text.starts_with(p))
    }

    /// Scolding reply for a misplaced result, or `None` if the message is fine.
    ///
    /// `mention` is inserted verbatim, so it must already be escaped for the
    /// outbound parse mode.
    pub fn scold<R: Rng>(
        &self,
        msg: &InboundMessage<'_>,
        mention: &str,
        rng: &mut R,
    ) -> Option<String> {
        if !self.is_misplaced(msg) {
            return None;
        }
        let demerits = rng.gen_range(self.demerits.clone());
        Some(scold_text(mention, demerits))
    }
}

/// Reply text for a misplaced puzzle result
#[must_use]
pub fn scold_text(mention: &str, demerits: u32) -> String {
    format!(
        "Hello {mention}, this is not the proper channel for NYT Puzzle results. \
         You have been assigned {demerits} arbitrary demerits"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn watch() -> PuzzleWatch {
        PuzzleWatch::new("nyt-dailies", 5..=48)
    }

    fn msg<'a>(channel: &'a str, text: &'a str) -> InboundMessage<'a> {
        InboundMessage {
            channel: Some(channel),
            text,
            from_self: false,
        }
    }

    #[test]
    fn test_each_prefix_is_caught() {
        let watch = watch();
        assert!(watch.is_misplaced(&msg("general", "Wordle 1,234 4/6")));
        assert!(watch.is_misplaced(&msg("general", "Strands #301\n“Lift off”")));
        assert!(watch.is_misplaced(&msg("general", "Connections\nPuzzle #512\nyellow yellow")));
    }

    #[test]
    fn test_near_misses_are_ignored() {
        let watch = watch();
        assert!(!watch.is_misplaced(&msg("general", "I love Wordle 123")));
        assert!(!watch.is_misplaced(&msg("general", "wordle 123 4/6")));
        assert!(!watch.is_misplaced(&msg("general", "Wordle")));
        assert!(!watch.is_misplaced(&msg("general", "Connections Puzzle #512")));
    }

    #[test]
    fn test_designated_channel_is_exempt() {
        let mut rng = StdRng::seed_from_u64(7);
        let reply = watch().scold(&msg("nyt-dailies", "Wordle 123 4/6"), "@amy", &mut rng);
        assert_eq!(reply, None);
    }

    #[test]
    fn test_unnamed_chat_is_not_exempt() {
        let message = InboundMessage {
            channel: None,
            text: "Wordle 123 4/6",
            from_self: false,
        };
        assert!(watch().is_misplaced(&message));
    }

    #[test]
    fn test_own_messages_never_scolded() {
        let message = InboundMessage {
            channel: Some("general"),
            text: "Wordle 123 4/6",
            from_self: true,
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(watch().scold(&message, "@spotbot", &mut rng), None);
    }

    #[test]
    fn test_scold_mentions_author() {
        let mut rng = StdRng::seed_from_u64(42);
        let reply = watch().scold(&msg("general", "Wordle 123 4/6"), "@amy", &mut rng);
        let reply = reply.unwrap_or_default();
        assert!(reply.starts_with("Hello @amy, this is not the proper channel"));
        assert!(reply.ends_with("arbitrary demerits"));
    }

    #[test]
    fn test_fixed_range() {
        let watch = PuzzleWatch::new("nyt-dailies", 9..=9);
        let mut rng = StdRng::seed_from_u64(1);
        let reply = watch.scold(&msg("general", "Wordle 1 X/6"), "@bo", &mut rng);
        assert_eq!(reply, Some(scold_text("@bo", 9)));
    }
}
