//! Telegram transport settings.

use config::ConfigError;
use serde::{Deserialize, Serialize};
use spotbot_core::config::TaxSettings;
use std::fmt;
use std::sync::Arc;

/// Telegram transport settings loaded from environment variables.
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct TelegramSettings {
    /// Telegram Bot API token.
    pub telegram_token: String,
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("telegram_token", &"[TELEGRAM_TOKEN]")
            .finish()
    }
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the token is empty.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = spotbot_core::config::build_config()?.try_deserialize()?;
        if settings.telegram_token.trim().is_empty() {
            return Err(ConfigError::Message("TELEGRAM_TOKEN is empty".into()));
        }
        Ok(settings)
    }
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone, Debug)]
pub struct BotSettings {
    /// Pet tax and puzzle watch settings.
    pub tax: Arc<TaxSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(tax: TaxSettings, telegram: TelegramSettings) -> Self {
        Self {
            tax: Arc::new(tax),
            telegram: Arc::new(telegram),
        }
    }
}
