//! Spot Bot entry point.

mod logging;

use dotenvy::dotenv;
use spotbot_core::config::TaxSettings;
use spotbot_transport_telegram::config::{BotSettings, TelegramSettings};
use spotbot_transport_telegram::runner::run_bot;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Scrubbing must be ready before the first log line
    let scrubber = logging::TokenScrubber::new().map_err(|e| {
        eprintln!("Failed to compile token patterns: {e}");
        e
    })?;
    logging::init(scrubber);

    info!("Starting Spot Bot...");
    run_bot(init_settings()).await;
    Ok(())
}

fn init_settings() -> Arc<BotSettings> {
    let tax_settings = TaxSettings::new().unwrap_or_else(|e| {
        error!("Failed to load pet tax configuration: {e}");
        std::process::exit(1);
    });
    let telegram_settings = TelegramSettings::new().unwrap_or_else(|e| {
        error!("Failed to load telegram configuration: {e}");
        std::process::exit(1);
    });

    info!(
        "Configuration loaded: photos under {}, puzzle chat {}",
        tax_settings.pic_db_loc.display(),
        tax_settings.puzzle_channel
    );
    Arc::new(BotSettings::new(tax_settings, telegram_settings))
}
