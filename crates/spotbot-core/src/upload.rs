//! Upload validation and filename normalization.

use crate::taxonomy::Category;
use std::path::Path;

/// Prefix every accepted content type starts with
pub const IMAGE_CONTENT_PREFIX: &str = "image/";

const JFIF_SUFFIX: &str = ".jfif";
const JPG_SUFFIX: &str = ".jpg";

/// An inbound file, described before its bytes are fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Filename as declared by the sender
    pub filename: String,
    /// Declared MIME type, if the platform reported one
    pub content_type: Option<String>,
}

impl Attachment {
    /// Create an attachment description
    pub fn new(filename: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
        }
    }

    /// Whether the declared content type is an image. A missing type is not.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|t| t.starts_with(IMAGE_CONTENT_PREFIX))
    }
}

/// A validated upload ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    /// Target category
    pub category: Category,
    /// Normalized filename inside the category folder
    pub filename: String,
}

/// Rewrite a trailing `.jfif` into `.jpg`. The match is case-sensitive.
///
/// # Examples
///
/// ```
/// use spotbot_core::upload::normalize_filename;
///
/// assert_eq!(normalize_filename("pup.jfif"), "pup.jpg");
/// assert_eq!(normalize_filename("pup.JFIF"), "pup.JFIF");
/// assert_eq!(normalize_filename("pup.jfif.png"), "pup.jfif.png");
/// ```
#[must_use]
pub fn normalize_filename(filename: &str) -> String {
    match filename.strip_suffix(JFIF_SUFFIX) {
        Some(stem) => format!("{stem}{JPG_SUFFIX}"),
        None => filename.to_string(),
    }
}

/// Final path component of a sender-supplied filename.
///
/// Returns `None` when nothing usable is left, e.g. for `""`, `".."` or `"dir/"`.
#[must_use]
pub fn safe_filename(filename: &str) -> Option<String> {
    // Senders on any OS may use either separator
    let last = filename.rsplit(['/', '\\']).next()?;
    Path::new(last)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.trim().is_empty())
        .map(ToString::to_string)
}
