use serde::{Deserialize, Serialize};

use crate::pgn;

/// One game's worth of PGN text, borrowed from the uploaded blob.
///
/// Records are cut by [`crate::split_games`] and never outlive the parse
/// call that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord<'a> {
    raw: &'a str,
}

impl<'a> GameRecord<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Untrimmed text exactly as it appeared in the input.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Record text without surrounding whitespace.
    pub fn text(&self) -> &'a str {
        self.raw.trim()
    }

    pub fn tag(&self, name: &str) -> Option<&'a str> {
        pgn::first_tag(self.raw, name)
    }

    pub fn white(&self) -> Option<&'a str> {
        self.tag("White")
    }

    pub fn black(&self) -> Option<&'a str> {
        self.tag("Black")
    }

    pub fn outcome(&self) -> Outcome {
        self.tag("Result").map(Outcome::from_tag).unwrap_or(Outcome::Other)
    }

    /// `Date` or `UTCDate`, whichever comes first, with `.` separators
    /// rewritten to `-`. Empty values count as missing.
    pub fn date(&self) -> Option<String> {
        pgn::first_date_tag(self.raw)
            .filter(|d| !d.is_empty())
            .map(|d| d.replace('.', "-"))
    }

    /// Which side `player` had in this game, compared case-insensitively.
    pub fn side_of(&self, player: &str) -> Option<Side> {
        let player_lower = player.to_lowercase();
        if self.white().is_some_and(|w| w.to_lowercase() == player_lower) {
            Some(Side::White)
        } else if self.black().is_some_and(|b| b.to_lowercase() == player_lower) {
            Some(Side::Black)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

/// Game result as far as loss filtering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    WhiteWin,
    BlackWin,
    /// Draws, unfinished games (`*`) and anything unrecognised.
    Other,
}

impl Outcome {
    pub fn from_tag(result: &str) -> Self {
        match result {
            "1-0" => Outcome::WhiteWin,
            "0-1" => Outcome::BlackWin,
            _ => Outcome::Other,
        }
    }

    pub fn is_loss_for(self, side: Side) -> bool {
        matches!(
            (self, side),
            (Outcome::BlackWin, Side::White) | (Outcome::WhiteWin, Side::Black)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/abcd1234"]
[Date "2024.03.09"]
[White "Alice"]
[Black "bob"]
[Result "0-1"]
[WhiteElo "1500"]

1. e4 e5 2. Qh5 Nc6 3. Bc4 g6 0-1
"#;

    #[test]
    fn test_tags_are_read_from_record() {
        let record = GameRecord::new(GAME);
        assert_eq!(record.white(), Some("Alice"));
        assert_eq!(record.black(), Some("bob"));
        assert_eq!(record.outcome(), Outcome::BlackWin);
        assert_eq!(record.date().as_deref(), Some("2024-03-09"));
    }

    #[test]
    fn test_side_matching_ignores_case() {
        let record = GameRecord::new(GAME);
        assert_eq!(record.side_of("alice"), Some(Side::White));
        assert_eq!(record.side_of("BOB"), Some(Side::Black));
        assert_eq!(record.side_of("carol"), None);
    }

    #[test]
    fn test_outcome_loss_mapping() {
        assert!(Outcome::BlackWin.is_loss_for(Side::White));
        assert!(Outcome::WhiteWin.is_loss_for(Side::Black));
        assert!(!Outcome::WhiteWin.is_loss_for(Side::White));
        assert!(!Outcome::from_tag("1/2-1/2").is_loss_for(Side::White));
        assert_eq!(Outcome::from_tag("*"), Outcome::Other);
    }

    #[test]
    fn test_missing_result_is_other() {
        let record = GameRecord::new("[Event \"x\"]\n[White \"a\"]\n");
        assert_eq!(record.outcome(), Outcome::Other);
        assert_eq!(record.date(), None);
    }
}
