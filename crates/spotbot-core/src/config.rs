//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! tunable constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Build the layered configuration shared by every settings struct.
///
/// Sources, later ones winning: `config/default`, `config/<RUN_MODE>`,
/// `config/local`, `APP_`-prefixed environment variables, then bare
/// environment variables.
///
/// # Errors
///
/// Returns a `ConfigError` if a present source cannot be read.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg. `APP_PUZZLE_CHANNEL=general ./spotbot`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE maps to snake_case; empty values count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Pet tax and puzzle watch settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaxSettings {
    /// Root directory holding one folder per category
    pub pic_db_loc: PathBuf,

    /// Chat where puzzle results are welcome
    #[serde(default = "default_puzzle_channel")]
    pub puzzle_channel: String,

    /// Smallest demerit count handed out
    #[serde(default = "default_demerit_min")]
    pub demerit_min: u32,
    /// Largest demerit count handed out
    #[serde(default = "default_demerit_max")]
    pub demerit_max: u32,
}

fn default_puzzle_channel() -> String {
    DEFAULT_PUZZLE_CHANNEL.to_string()
}

const fn default_demerit_min() -> u32 {
    DEMERIT_MIN
}

const fn default_demerit_max() -> u32 {
    DEMERIT_MAX
}

impl TaxSettings {
    /// Load settings from config files and the environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use spotbot_core::config::TaxSettings;
    ///
    /// let settings = TaxSettings::new().expect("Failed to load configuration");
    /// println!("photos live in {}", settings.pic_db_loc.display());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails, `PIC_DB_LOC` is missing, or
    /// the demerit bounds are inverted.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = build_config()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if `demerit_min > demerit_max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.demerit_min > self.demerit_max {
            return Err(ConfigError::Message(format!(
                "demerit_min ({}) is greater than demerit_max ({})",
                self.demerit_min, self.demerit_max
            )));
        }
        Ok(())
    }

    /// Inclusive demerit range
    #[must_use]
    pub const fn demerits(&self) -> RangeInclusive<u32> {
        self.demerit_min..=self.demerit_max
    }
}

/// Default chat for puzzle results
pub const DEFAULT_PUZZLE_CHANNEL: &str = "nyt-dailies";
/// Default lower demerit bound
pub const DEMERIT_MIN: u32 = 5;
/// Default upper demerit bound
pub const DEMERIT_MAX: u32 = 48;

// Transport retry configuration
/// Initial backoff for transport retries
pub const TRANSPORT_INITIAL_BACKOFF_MS: u64 = 500;
/// Backoff ceiling for transport retries
pub const TRANSPORT_MAX_BACKOFF_MS: u64 = 8_000;
/// Attempts after the first failure
pub const TRANSPORT_MAX_RETRIES: usize = 4;
