use crate::bot;
use crate::bot::handlers::Command;
use crate::config::BotSettings;
use spotbot_core::puzzle::PuzzleWatch;
use spotbot_core::store::FsPhotoStore;
use spotbot_core::tax::TaxService;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::utils::command::BotCommands;
use tracing::{error, info};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<BotSettings>) {
    let tax = init_tax_service(&settings).await;
    let watch = Arc::new(PuzzleWatch::from_settings(&settings.tax));
    info!(
        "Puzzle watch active (designated chat: {})",
        watch.designated_channel()
    );

    let bot = Bot::new(settings.telegram.telegram_token.clone());
    sync_commands(&bot).await;
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![tax, watch])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn init_tax_service(settings: &BotSettings) -> Arc<TaxService> {
    let store = FsPhotoStore::new(settings.tax.pic_db_loc.clone());
    match store.provision().await {
        Ok(()) => {
            info!("Photo store ready at {}", store.root().display());
            Arc::new(TaxService::new(Arc::new(store)))
        }
        Err(e) => {
            error!(
                "Failed to prepare photo store at {}: {}",
                store.root().display(),
                e
            );
            std::process::exit(1);
        }
    }
}

/// Log the bot identity and register the command list with Telegram.
/// Failures are logged and the bot keeps running.
async fn sync_commands(bot: &Bot) {
    match bot.get_me().await {
        Ok(me) => info!("We have logged in as @{}", me.username()),
        Err(e) => error!("Failed to fetch bot identity: {}", e),
    }

    let commands = Command::bot_commands();
    let count = commands.len();
    match bot.set_my_commands(commands).await {
        Ok(_) => info!("Synced {} command(s).", count),
        Err(e) => error!("Error syncing commands: {}", e),
    }
}

fn command_from_caption(msg: Message, me: Me) -> Option<Command> {
    bot::handlers::caption_command(&msg, me.username())
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        // Photos and documents carry the command in their caption
        .branch(dptree::filter_map(command_from_caption).endpoint(handle_command))
        .branch(
            dptree::filter(|msg: Message| bot::puzzle_watch::message_body(&msg).is_some())
                .endpoint(handle_text),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    tax: Arc<TaxService>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::dispatch(bot, msg, cmd, tax).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    me: Me,
    watch: Arc<PuzzleWatch>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::puzzle_watch::watch_message(bot, msg, me, watch).await {
        error!("Puzzle watch error: {}", e);
    }
    respond(())
}
