use crate::bot::attachment::{download, find_attachment, IncomingFile};
use crate::bot::resilient::{send_message_resilient, send_stored_photo_resilient};
use crate::bot::views;
use anyhow::Result;
use spotbot_core::tax::{TaxError, TaxService};
use spotbot_core::taxonomy::{Category, Species, TaxGroup};
use spotbot_core::upload::UploadPlan;
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands};
use tracing::{error, info};

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Spot Bot commands:")]
pub enum Command {
    /// Show the command list
    #[command(description = "show this text.")]
    Help,
    /// Greeting, same as help
    #[command(description = "start the bot.")]
    Start,
    /// Upload a dog photo
    #[command(description = "upload a dog photo: caption a photo with /updog <name> ('dog' for a non-pack dog).")]
    Updog(String),
    /// Upload a cat photo
    #[command(description = "upload a cat photo: caption a photo with /upcat <name> ('cat' for a non-pack cat).")]
    Upcat(String),
    /// Get a random photo
    #[command(description = "get random pet tax: /givetax [tax|dog|cat|<name>].")]
    Givetax(String),
}

/// Help handler
///
/// # Errors
///
/// Returns an error if the command list cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    send_message_resilient(&bot, msg.chat.id, Command::descriptions().to_string()).await?;
    Ok(())
}

/// What an upload command leads to, decided before anything is fetched
#[derive(Debug)]
pub enum UploadDecision {
    /// Send this text and stop
    Reply(String),
    /// Send the acknowledgement, then fetch and store the file
    Fetch {
        /// File to download
        incoming: IncomingFile,
        /// Where the bytes go
        plan: UploadPlan,
        /// Acknowledgement text
        ack: String,
    },
}

/// Decide how to answer an upload command.
///
/// The pet name is checked first, then the attachment. Nothing here touches
/// the network or the store.
#[must_use]
pub fn plan_upload(
    species: Species,
    name: &str,
    incoming: Option<IncomingFile>,
    tax: &TaxService,
) -> UploadDecision {
    let Some(category) = Category::parse_for(species, name) else {
        return UploadDecision::Reply(views::unknown_category(species, name));
    };
    let Some(incoming) = incoming else {
        return UploadDecision::Reply(views::missing_attachment(species));
    };
    match tax.prepare_upload(category, &incoming.attachment) {
        Ok(plan) => UploadDecision::Fetch {
            ack: views::uploading(&incoming.attachment.filename, category.name()),
            incoming,
            plan,
        },
        Err(e) => UploadDecision::Reply(e.to_string()),
    }
}

async fn fetch_and_store(
    bot: &Bot,
    incoming: &IncomingFile,
    plan: &UploadPlan,
    tax: &TaxService,
) -> Result<PathBuf> {
    let bytes = download(bot, &incoming.file_id).await?;
    Ok(tax.store_upload(plan, &bytes).await?)
}

/// Upload handler shared by `/updog` and `/upcat`.
///
/// Validates the pet name and the attachment before anything is downloaded,
/// then stores the photo and echoes it back to the chat. Every failure after
/// the acknowledgement is reported to the user.
///
/// # Errors
///
/// Returns an error if the download, the write or a reply fails.
pub async fn upload(
    bot: Bot,
    msg: Message,
    species: Species,
    name: String,
    tax: Arc<TaxService>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    let (incoming, plan, ack) = match plan_upload(species, &name, find_attachment(&msg), &tax) {
        UploadDecision::Reply(text) => {
            send_message_resilient(&bot, chat_id, text).await?;
            return Ok(());
        }
        UploadDecision::Fetch {
            incoming,
            plan,
            ack,
        } => (incoming, plan, ack),
    };

    info!(
        "User {} uploading {} for {}",
        get_user_name(&msg),
        incoming.attachment.filename,
        plan.category
    );
    send_message_resilient(&bot, chat_id, ack).await?;

    let path = match fetch_and_store(&bot, &incoming, &plan, &tax).await {
        Ok(path) => path,
        Err(e) => {
            send_message_resilient(&bot, chat_id, views::UPLOAD_FAILED).await?;
            return Err(e);
        }
    };

    if let Err(e) = send_stored_photo_resilient(&bot, chat_id, &path).await {
        send_message_resilient(
            &bot,
            chat_id,
            views::echo_failed(&plan.filename, plan.category.name()),
        )
        .await?;
        return Err(e);
    }
    Ok(())
}

/// `/givetax` handler
///
/// # Errors
///
/// Returns an error if the store cannot be read or a reply fails.
pub async fn give_tax(bot: Bot, msg: Message, selector: String, tax: Arc<TaxService>) -> Result<()> {
    let chat_id = msg.chat.id;

    let Some(group) = TaxGroup::parse(&selector) else {
        send_message_resilient(&bot, chat_id, views::unknown_selector(&selector)).await?;
        return Ok(());
    };

    let path = match tax.give_tax(group).await {
        Ok(path) => path,
        Err(e @ TaxError::NoPhotos(_)) => {
            send_message_resilient(&bot, chat_id, views::no_photos(&e.to_string())).await?;
            return Ok(());
        }
        Err(e) => {
            error!("Failed to pick {} tax: {}", group, e);
            send_message_resilient(&bot, chat_id, views::TAX_FAILED).await?;
            return Err(e.into());
        }
    };

    info!("User {} requested {} tax", get_user_name(&msg), group);
    if let Err(e) = send_stored_photo_resilient(&bot, chat_id, &path).await {
        error!("Failed to send {}: {}", path.display(), e);
        send_message_resilient(&bot, chat_id, views::TAX_FAILED).await?;
        return Err(e);
    }
    Ok(())
}

/// Parse a command carried in the caption of a photo or document
#[must_use]
pub fn caption_command(msg: &Message, bot_name: &str) -> Option<Command> {
    msg.caption()
        .and_then(|caption| Command::parse(caption, bot_name).ok())
}

/// Route a parsed command to its handler.
///
/// # Errors
///
/// Returns whatever the handler returns.
pub async fn dispatch(bot: Bot, msg: Message, cmd: Command, tax: Arc<TaxService>) -> Result<()> {
    match cmd {
        Command::Help | Command::Start => help(bot, msg).await,
        Command::Updog(name) => upload(bot, msg, Species::Dog, name, tax).await,
        Command::Upcat(name) => upload(bot, msg, Species::Cat, name, tax).await,
        Command::Givetax(selector) => give_tax(bot, msg, selector, tax).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload_commands() {
        assert_eq!(
            Command::parse("/updog lulu", "spotbot").ok(),
            Some(Command::Updog("lulu".to_string()))
        );
        assert_eq!(
            Command::parse("/upcat@spotbot olive", "spotbot").ok(),
            Some(Command::Upcat("olive".to_string()))
        );
    }

    #[test]
    fn test_parse_givetax() {
        assert_eq!(
            Command::parse("/givetax cat", "spotbot").ok(),
            Some(Command::Givetax("cat".to_string()))
        );
        assert!(Command::parse("/givetax@otherbot cat", "spotbot").is_err());
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert!(Command::parse("Wordle 1,234 3/6", "spotbot").is_err());
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let text = Command::descriptions().to_string();
        for cmd in ["/help", "/start", "/updog", "/upcat", "/givetax"] {
            assert!(text.contains(cmd), "{cmd} missing from help");
        }
    }

    const CHAT: &str = r#""chat":{"id":-1001,"type":"supergroup","title":"general"},"from":{"id":7,"is_bot":false,"first_name":"Amy"}"#;

    fn message(body: &str) -> Result<Message, serde_json::Error> {
        serde_json::from_str(&format!(
            r#"{{"message_id":9,"date":1700000000,{CHAT},{body}}}"#
        ))
    }

    fn photo(caption: &str) -> Result<Message, serde_json::Error> {
        message(&format!(
            r#""caption":{caption:?},"photo":[{{"file_id":"p","file_unique_id":"p1","width":640,"height":480}}]"#
        ))
    }

    fn document(name: &str, mime: &str) -> Result<Message, serde_json::Error> {
        message(&format!(
            r#""caption":"/upcat olive","document":{{"file_id":"d","file_unique_id":"d1","file_name":{name:?},"mime_type":{mime:?}}}"#
        ))
    }

    fn service(root: &std::path::Path) -> TaxService {
        TaxService::new(Arc::new(spotbot_core::store::FsPhotoStore::new(root)))
    }

    #[test]
    fn test_unknown_name_only_gets_usage() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::TempDir::new()?;
        let msg = photo("/updog rex")?;

        let decision = plan_upload(Species::Dog, "rex", find_attachment(&msg), &service(tmp.path()));
        match decision {
            UploadDecision::Reply(text) => {
                assert_eq!(text, views::unknown_category(Species::Dog, "rex"));
            }
            UploadDecision::Fetch { .. } => panic!("unknown pet must not be fetched"),
        }
        // A cat name is unknown for /updog too
        let decision = plan_upload(Species::Dog, "olive", find_attachment(&msg), &service(tmp.path()));
        assert!(matches!(decision, UploadDecision::Reply(_)));
        Ok(())
    }

    #[test]
    fn test_non_image_gets_one_rejection_and_no_fetch() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::TempDir::new()?;
        let msg = document("notes.pdf", "application/pdf")?;

        let decision = plan_upload(Species::Cat, "olive", find_attachment(&msg), &service(tmp.path()));
        match decision {
            UploadDecision::Reply(text) => assert_eq!(
                text,
                "`notes.pdf` has invalid file type (not a photo), nothing processed"
            ),
            UploadDecision::Fetch { .. } => panic!("non-image must not be fetched"),
        }
        assert!(!tmp.path().join("olive").exists());
        Ok(())
    }

    #[test]
    fn test_missing_attachment_gets_usage() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::TempDir::new()?;
        let msg = message(r#""text":"/updog lulu""#)?;

        let decision = plan_upload(Species::Dog, "lulu", find_attachment(&msg), &service(tmp.path()));
        match decision {
            UploadDecision::Reply(text) => assert_eq!(text, views::missing_attachment(Species::Dog)),
            UploadDecision::Fetch { .. } => panic!("nothing to fetch"),
        }
        Ok(())
    }

    #[test]
    fn test_valid_upload_acknowledges_then_fetches() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::TempDir::new()?;
        let msg = document("olive.jfif", "image/jpeg")?;

        let decision = plan_upload(Species::Cat, " Olive ", find_attachment(&msg), &service(tmp.path()));
        let UploadDecision::Fetch { incoming, plan, ack } = decision else {
            panic!("valid upload must be fetched");
        };
        assert_eq!(ack, "Uploading `olive.jfif` for `olive`");
        assert_eq!(incoming.file_id.to_string(), "d");
        assert_eq!(plan.filename, "olive.jpg");
        assert_eq!(plan.category.name(), "olive");
        // Planning writes nothing
        assert!(!tmp.path().join("olive").exists());
        Ok(())
    }

    #[test]
    fn test_caption_command_is_recognized() -> Result<(), serde_json::Error> {
        assert_eq!(
            caption_command(&photo("/updog@spotbot lulu")?, "spotbot"),
            Some(Command::Updog("lulu".to_string()))
        );
        assert_eq!(
            caption_command(&photo("/givetax dog")?, "spotbot"),
            Some(Command::Givetax("dog".to_string()))
        );
        assert_eq!(caption_command(&photo("look at this good boy")?, "spotbot"), None);
        assert_eq!(caption_command(&photo("/updog@otherbot lulu")?, "spotbot"), None);
        assert_eq!(caption_command(&message(r#""text":"/updog lulu""#)?, "spotbot"), None);
        Ok(())
    }
}
