//! User-facing message texts.
//!
//! Everything except [`user_mention_html`] is sent as plain text.

use spotbot_core::taxonomy::{names_for, selectors, Species};
use teloxide::types::User;

/// Upload command name for a species
#[must_use]
pub const fn upload_command(species: Species) -> &'static str {
    match species {
        Species::Dog => "/updog",
        Species::Cat => "/upcat",
    }
}

/// Acknowledgement sent before the photo is fetched
#[must_use]
pub fn uploading(filename: &str, category: &str) -> String {
    format!("Uploading `{filename}` for `{category}`")
}

/// Reply for an upload naming a pet outside the species
#[must_use]
pub fn unknown_category(species: Species, given: &str) -> String {
    let given = given.trim();
    let kind = species.keyword();
    if given.is_empty() {
        format!(
            "Which {kind}? Usage: {} <name>\nKnown {kind}s: {}",
            upload_command(species),
            names_for(species)
        )
    } else {
        format!(
            "`{given}` is not a known {kind}. Known {kind}s: {} (use '{kind}' for a non-pack {kind})",
            names_for(species)
        )
    }
}

/// Reply for an upload command without any photo
#[must_use]
pub fn missing_attachment(species: Species) -> String {
    let cmd = upload_command(species);
    format!(
        "No photo found. Send a photo with the caption `{cmd} <name>`, \
         or reply to a photo with `{cmd} <name>`."
    )
}

/// Reply for an unknown `/givetax` selector
#[must_use]
pub fn unknown_selector(given: &str) -> String {
    format!(
        "`{}` is not a tax option. Choose one of: {}",
        given.trim(),
        selectors().join(", ")
    )
}

/// Reply when the selected categories are empty
#[must_use]
pub fn no_photos(reason: &str) -> String {
    format!("{reason}. Upload one with /updog or /upcat.")
}

/// Reply when storing or fetching failed after validation
pub const UPLOAD_FAILED: &str = "Something went wrong while saving that photo, please try again.";

/// Reply when the photo was stored but could not be sent back
#[must_use]
pub fn echo_failed(filename: &str, category: &str) -> String {
    format!("Saved `{filename}` for `{category}`, but could not send it back.")
}

/// Reply when reading the store or sending the pick failed
pub const TAX_FAILED: &str = "Something went wrong while fetching pet tax, please try again.";

/// HTML mention for a Telegram user.
///
/// Uses `@username` when available, otherwise a `tg://user` link on the first
/// name so users without a username are still notified.
#[must_use]
pub fn user_mention_html(user: &User) -> String {
    match user.username.as_deref() {
        Some(username) => format!("@{}", html_escape::encode_text(username)),
        None => format!(
            "<a href=\"tg://user?id={}\">{}</a>",
            user.id.0,
            html_escape::encode_text(&user.first_name)
        ),
    }
}
