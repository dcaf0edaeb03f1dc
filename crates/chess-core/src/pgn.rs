//! PGN splitting and tag extraction: a lightweight regex-based parser.

use std::sync::LazyLock;

use regex::Regex;

use crate::game_data::GameRecord;

/// Every game's tag block starts with this.
pub const EVENT_MARKER: &str = "[Event \"";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"(.*?)"\]"#).expect("tag pattern is valid"));

/// Split a raw multi-game blob into game records.
///
/// A new record starts at every occurrence of `[Event "`. Anything before the
/// first marker is kept as its own record if it holds more than whitespace.
/// Whitespace-only pieces are dropped.
pub fn split_games(pgn: &str) -> Vec<GameRecord<'_>> {
    let mut starts: Vec<usize> = pgn.match_indices(EVENT_MARKER).map(|(i, _)| i).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }

    let mut records = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(pgn.len());
        let piece = &pgn[start..end];
        if !piece.trim().is_empty() {
            records.push(GameRecord::new(piece));
        }
    }
    records
}

/// Value of the first `[name "..."]` tag in `pgn`.
pub fn first_tag<'a>(pgn: &'a str, name: &str) -> Option<&'a str> {
    TAG_RE
        .captures_iter(pgn)
        .find(|cap| &cap[1] == name)
        .and_then(|cap| cap.get(2))
        .map(|m| m.as_str())
}

/// Value of the first `Date` or `UTCDate` tag, whichever appears first.
pub fn first_date_tag(pgn: &str) -> Option<&str> {
    TAG_RE
        .captures_iter(pgn)
        .find(|cap| matches!(&cap[1], "Date" | "UTCDate"))
        .and_then(|cap| cap.get(2))
        .map(|m| m.as_str())
}

/// Extract a header as an owned string, treating empty values as missing.
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    first_tag(pgn, header_name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
