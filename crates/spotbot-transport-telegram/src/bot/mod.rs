/// Attachment discovery on inbound messages
pub mod attachment;
/// Command definitions and handlers
pub mod handlers;
/// Puzzle-result watch over every text message
pub mod puzzle_watch;
/// Resilient messaging with automatic retry for Telegram API operations
pub mod resilient;
/// User-facing message texts
pub mod views;
