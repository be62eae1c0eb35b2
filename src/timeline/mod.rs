//! Song timeline extraction from free-text video descriptions.
//!
//! A description is reduced to the lines that carry a `M:SS` / `H:MM:SS`
//! timestamp, the timestamps are stripped and every remaining line is split
//! into title and artist by an ordered table of [`SongRule`]s.

mod rules;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use rules::{DEFAULT_RULES, HANGUL_AWARE_RULES, SongRule, parse_song_info, parse_with_rules};

static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,2}:[0-9]{2}").expect("timestamp pattern is valid"));

static TIMESTAMP_DECORATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?\)?\s*~?\s*")
        .expect("timestamp decoration pattern is valid")
});

/// A song found in a description. `isrc` is only ever filled in by track resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongEntry {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,
}

impl SongEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            isrc: None,
        }
    }
}

/// Lines of the description that contain a timestamp, with every timestamp
/// removed. Lines left empty by the stripping are skipped.
pub fn timeline_lines(description: &str) -> impl Iterator<Item = String> + '_ {
    description
        .lines()
        .filter(|line| TIMESTAMP.is_match(line))
        .map(strip_timestamps)
        .filter(|line| !line.is_empty())
}

/// Remove every timestamp token, its optional parentheses and a trailing `~`.
///
/// Surrounding whitespace and byte order marks are trimmed from the result.
pub fn strip_timestamps(line: &str) -> String {
    TIMESTAMP_DECORATION
        .replace_all(line, "")
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_string()
}

/// The stripped timeline as plain text, one song per line.
pub fn timeline_text(description: Option<&str>) -> Option<String> {
    let text = timeline_lines(description?).collect::<Vec<_>>().join("\n");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract songs with the default rule order.
pub fn extract_timeline(description: Option<&str>) -> Vec<SongEntry> {
    let Some(description) = description else {
        return Vec::new();
    };

    timeline_lines(description)
        .map(|line| parse_song_info(&line))
        .collect()
}

#[derive(Debug, Clone)]
pub struct TimelineExtractor {
    rules: Vec<SongRule>,
}

impl Default for TimelineExtractor {
    fn default() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }
}

impl TimelineExtractor {
    pub fn with_rules(rules: Vec<SongRule>) -> Self {
        Self { rules }
    }

    /// Extractor that reads `Title - Artist` when the right side is Hangul.
    pub fn hangul_aware() -> Self {
        Self::with_rules(HANGUL_AWARE_RULES.to_vec())
    }

    pub fn from_flag(hangul_aware_dash: bool) -> Self {
        if hangul_aware_dash {
            Self::hangul_aware()
        } else {
            Self::default()
        }
    }

    pub fn rules(&self) -> &[SongRule] {
        &self.rules
    }

    /// Songs in the order their lines appear in the description.
    pub fn extract(&self, description: Option<&str>) -> Vec<SongEntry> {
        let Some(description) = description else {
            return Vec::new();
        };

        timeline_lines(description)
            .map(|line| parse_with_rules(&line, &self.rules))
            .collect()
    }
}
