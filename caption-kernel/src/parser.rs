//! Extraction of caption and hashtags from a raw completion.

use std::sync::LazyLock;

use caption_primitives::MAX_HASHTAGS;
use caption_prompts::{CAPTION_MARKER, HASHTAGS_MARKER};
use regex::Regex;
use thiserror::Error;

static CAPTION_LINE: LazyLock<Regex> = LazyLock::new(|| marker_line(CAPTION_MARKER));
static HASHTAGS_LINE: LazyLock<Regex> = LazyLock::new(|| marker_line(HASHTAGS_MARKER));
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("bracket pattern is valid"));

/// Matches `marker` case-insensitively and captures the rest of its line.
fn marker_line(marker: &str) -> Regex {
    Regex::new(&format!(r"(?i){}[ \t]*([^\n]*)", regex::escape(marker)))
        .expect("marker pattern is valid")
}

/// Why a completion could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `CAPTION:` line was found.
    #[error("completion has no caption line")]
    MissingCaption,
    /// The `CAPTION:` line was present but blank.
    #[error("completion caption is empty")]
    EmptyCaption,
    /// No `HASHTAGS:` line was found.
    #[error("completion has no hashtags line")]
    MissingHashtags,
}

/// Caption and hashtags read from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCompletion {
    /// Caption text, trimmed.
    pub caption: String,
    /// Hashtags in order of appearance, brackets stripped, at most
    /// [`MAX_HASHTAGS`].
    pub hashtags: Vec<String>,
}

/// Parses a completion of the form
///
/// ```text
/// CAPTION: caption text
/// HASHTAGS: [tag1] [tag2] ... [tagN]
/// ```
///
/// Both lines are required. A hashtags line without bracket groups yields an
/// empty list.
///
/// # Errors
///
/// Returns a [`ParseError`] when either line is missing or the caption is
/// blank; no partial result is produced.
pub fn parse_completion(raw: &str) -> Result<ParsedCompletion, ParseError> {
    let caption = capture_line(&CAPTION_LINE, raw).ok_or(ParseError::MissingCaption)?;
    let hashtags_text = capture_line(&HASHTAGS_LINE, raw).ok_or(ParseError::MissingHashtags)?;

    let caption = caption.trim();
    if caption.is_empty() {
        return Err(ParseError::EmptyCaption);
    }

    let hashtags = BRACKETED
        .captures_iter(hashtags_text)
        .filter_map(|captures| captures.get(1))
        .map(|tag| tag.as_str().to_owned())
        .take(MAX_HASHTAGS)
        .collect();

    Ok(ParsedCompletion {
        caption: caption.to_owned(),
        hashtags,
    })
}

fn capture_line<'a>(pattern: &Regex, raw: &'a str) -> Option<&'a str> {
    pattern
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|line| line.as_str().trim())
}
