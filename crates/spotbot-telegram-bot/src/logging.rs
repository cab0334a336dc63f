//! Log setup: crate-level filter and a writer that scrubs bot tokens.

use regex::Regex;
use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Crates logged at `info` unless `RUST_LOG` says otherwise
const OWN_CRATES: &[&str] = &["spotbot", "spotbot_core", "spotbot_transport_telegram"];
/// Chatty dependencies kept at `warn`
const QUIET_CRATES: &[&str] = &["teloxide", "hyper", "reqwest", "tokio"];

const TOKEN_MASK: &str = "[TELEGRAM_TOKEN]";

struct ScrubRule {
    pattern: Regex,
    replacement: String,
}

/// Replaces Telegram bot tokens in log output
pub struct TokenScrubber {
    rules: Vec<ScrubRule>,
}

impl TokenScrubber {
    /// Compile the token patterns.
    ///
    /// Tokens show up inside API URLs (`/bot<token>/method`), after a `bot`
    /// prefix in error texts, and bare.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let rules = [
            (
                r"(https?://[^/]+/bot)[0-9]+:[A-Za-z0-9_-]+",
                format!("${{1}}{TOKEN_MASK}"),
            ),
            (r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+", format!("${{1}}{TOKEN_MASK}")),
            (r"[0-9]{8,10}:[A-Za-z0-9_-]{35}", TOKEN_MASK.to_string()),
        ];
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern).map(|pattern| ScrubRule {
                    pattern,
                    replacement,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// Scrub one chunk of log output. Borrows when nothing matched.
    #[must_use]
    pub fn scrub<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut output = Cow::Borrowed(input);
        for rule in &self.rules {
            let replaced = match rule.pattern.replace_all(&output, rule.replacement.as_str()) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                output = Cow::Owned(replaced);
            }
        }
        output
    }
}

struct ScrubbingWriter<W> {
    inner: W,
    scrubber: Arc<TokenScrubber>,
}

impl<W: Write> Write for ScrubbingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(self.scrubber.scrub(&text).as_bytes())?;
        // Callers track progress against their own buffer
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct ScrubbingMakeWriter<F> {
    make_inner: F,
    scrubber: Arc<TokenScrubber>,
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for ScrubbingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = ScrubbingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: (self.make_inner)(),
            scrubber: Arc::clone(&self.scrubber),
        }
    }
}

/// Filter directives used when `RUST_LOG` is unset
#[must_use]
pub fn default_directives(debug_mode: bool) -> String {
    if debug_mode {
        return "debug".to_string();
    }
    OWN_CRATES
        .iter()
        .map(|krate| format!("{krate}=info"))
        .chain(QUIET_CRATES.iter().map(|krate| format!("{krate}=warn")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether `DEBUG_MODE` asks for debug logging
fn debug_mode() -> bool {
    std::env::var("DEBUG_MODE").is_ok_and(|v| v == "true" || v == "1")
}

/// Install the global subscriber writing scrubbed lines to stderr.
pub fn init(scrubber: TokenScrubber) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug_mode())));
    let make_writer = ScrubbingMakeWriter {
        make_inner: io::stderr,
        scrubber: Arc::new(scrubber),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}
