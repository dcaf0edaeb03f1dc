//! PGN game-history parsing: record splitting, player detection, lost-game
//! extraction, and the report data model shared by the other crates.

pub mod dates;
pub mod detect;
pub mod filter;
pub mod game_data;
pub mod pgn;
pub mod report;

use serde::{Deserialize, Serialize};

pub use dates::format_date_range;
pub use detect::detect_user;
pub use filter::{find_user_games, DateScope, UserGames};
pub use game_data::{GameRecord, Outcome, Side};
pub use pgn::split_games;
pub use report::{AnalysisReport, Report};

/// Upper bound on lost games forwarded for analysis.
pub const MAX_ANALYZED_GAMES: usize = 50;

/// Where a parse ended up. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseStatus {
    /// No input, or no game records after splitting.
    Empty,
    /// Games exist but none names a usable player.
    IdentityUnresolved,
    /// Player known but they lost no games.
    NoLossesFound,
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PgnParseResult {
    pub lost_games_pgn: Vec<String>,
    pub game_dates: Vec<String>,
    pub detected_user: Option<String>,
    /// Number of game records found in the input.
    #[serde(default)]
    pub game_count: usize,
}

impl PgnParseResult {
    pub fn status(&self) -> ParseStatus {
        if self.game_count == 0 {
            ParseStatus::Empty
        } else if self.detected_user.is_none() {
            ParseStatus::IdentityUnresolved
        } else if self.lost_games_pgn.is_empty() {
            ParseStatus::NoLossesFound
        } else {
            ParseStatus::Ready
        }
    }

    pub fn date_range(&self) -> String {
        format_date_range(&self.game_dates)
    }
}

/// Parse an uploaded game history, detecting whose history it is.
pub fn parse_pgn(pgn: &str) -> PgnParseResult {
    parse_pgn_with(pgn, None, DateScope::default())
}

/// Parse a game history for a player the caller already knows.
pub fn parse_pgn_for(pgn: &str, player: &str) -> PgnParseResult {
    parse_pgn_with(pgn, Some(player), DateScope::default())
}

pub fn parse_pgn_with(pgn: &str, player: Option<&str>, scope: DateScope) -> PgnParseResult {
    let games = split_games(pgn);
    if games.is_empty() {
        return PgnParseResult::default();
    }

    let player = match player.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Some(p.to_string()),
        None => detect_user(&games),
    };
    let Some(player) = player else {
        return PgnParseResult {
            game_count: games.len(),
            ..PgnParseResult::default()
        };
    };

    let found = find_user_games(&games, &player, scope);
    PgnParseResult {
        lost_games_pgn: found.lost_games,
        game_dates: found.game_dates,
        detected_user: Some(player),
        game_count: games.len(),
    }
}

/// The most recent lost games, joined by a blank line, ready for the model.
pub fn analysis_batch(lost_games: &[String]) -> String {
    let start = lost_games.len().saturating_sub(MAX_ANALYZED_GAMES);
    lost_games[start..].join("\n\n")
}
