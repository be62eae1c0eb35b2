use std::sync::LazyLock;

use regex::Regex;

use crate::timeline::SongEntry;

static PIPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\|\s*(.+)$").expect("pipe pattern is valid"));

static DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*[-–—]\s*(.+)$").expect("dash pattern is valid"));

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*\(\s*([^)]+)\s*\)$").expect("parenthetical pattern is valid")
});

static BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+by\s+(.+)$").expect("by pattern is valid"));

/// A single structural rule used to split a song line into title and artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongRule {
    /// `Title | Artist`
    Pipe,
    /// `Artist - Title`, also with en/em dashes
    ArtistDashTitle,
    /// `Title (Artist)`
    TrailingParenthetical,
    /// `Title by Artist`, case-insensitive
    By,
    /// `Title - Artist`, only when the right side contains Hangul
    HangulTitleDashArtist,
}

/// Rule order of the description parser as it has always shipped.
///
/// [`SongRule::HangulTitleDashArtist`] sits behind [`SongRule::ArtistDashTitle`],
/// which matches the same lines first, so it never fires in this order.
pub const DEFAULT_RULES: [SongRule; 5] = [
    SongRule::Pipe,
    SongRule::ArtistDashTitle,
    SongRule::TrailingParenthetical,
    SongRule::By,
    SongRule::HangulTitleDashArtist,
];

/// Opt-in order where a dash line with Hangul on the right is read as `Title - Artist`.
pub const HANGUL_AWARE_RULES: [SongRule; 5] = [
    SongRule::Pipe,
    SongRule::HangulTitleDashArtist,
    SongRule::ArtistDashTitle,
    SongRule::TrailingParenthetical,
    SongRule::By,
];

impl SongRule {
    fn pattern(&self) -> &'static Regex {
        match self {
            SongRule::Pipe => &*PIPE,
            SongRule::ArtistDashTitle | SongRule::HangulTitleDashArtist => &*DASH,
            SongRule::TrailingParenthetical => &*PARENTHETICAL,
            SongRule::By => &*BY,
        }
    }

    /// Try this rule against a stripped song line.
    pub fn apply(&self, text: &str) -> Option<SongEntry> {
        let captures = self.pattern().captures(text)?;
        let left = captures.get(1)?.as_str().trim();
        let right = captures.get(2)?.as_str().trim();

        match self {
            SongRule::ArtistDashTitle => Some(SongEntry::new(right, left)),
            SongRule::HangulTitleDashArtist => {
                contains_hangul(right).then(|| SongEntry::new(left, right))
            }
            SongRule::Pipe | SongRule::TrailingParenthetical | SongRule::By => {
                Some(SongEntry::new(left, right))
            }
        }
    }
}

/// Whether the text contains any Hangul syllable or jamo.
pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{AC00}'..='\u{D7A3}' // syllables
            | '\u{3131}'..='\u{318E}' // compatibility jamo
            | '\u{1100}'..='\u{11FF}') // jamo
    })
}

/// Parse a stripped song line with the default rule order.
pub fn parse_song_info(text: &str) -> SongEntry {
    parse_with_rules(text, &DEFAULT_RULES)
}

/// Parse a stripped song line, returning the first rule that matches.
///
/// Falls back to the whole trimmed line as the title with an empty artist.
pub fn parse_with_rules(text: &str, rules: &[SongRule]) -> SongEntry {
    let text = text.trim();
    if text.is_empty() {
        return SongEntry::new("", "");
    }

    rules
        .iter()
        .find_map(|rule| rule.apply(text))
        .unwrap_or_else(|| SongEntry::new(text, ""))
}
