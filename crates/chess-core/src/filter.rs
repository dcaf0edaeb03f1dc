//! Lost-game extraction for a known player.

use serde::{Deserialize, Serialize};

use crate::game_data::GameRecord;

/// Which games contribute to the reported date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateScope {
    /// Every record in the upload, including games the player did not play.
    #[default]
    AllGames,
    /// Only records where the player appears as White or Black.
    PlayerGames,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGames {
    /// Trimmed text of each game the player lost, in input order.
    pub lost_games: Vec<String>,
    /// Normalised (`YYYY-MM-DD`-style) dates, in input order.
    pub game_dates: Vec<String>,
}

pub fn find_user_games(games: &[GameRecord<'_>], player: &str, scope: DateScope) -> UserGames {
    let mut out = UserGames::default();

    for game in games {
        let side = game.side_of(player);

        if scope == DateScope::AllGames || side.is_some() {
            if let Some(date) = game.date() {
                out.game_dates.push(date);
            }
        }

        let Some(side) = side else {
            continue;
        };

        if game.outcome().is_loss_for(side) {
            out.lost_games.push(game.text().to_string());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::split_games;

    fn game(white: &str, black: &str, result: &str, date: Option<&str>) -> String {
        let date_tag = date
            .map(|d| format!("[Date \"{d}\"]\n"))
            .unwrap_or_default();
        format!(
            "[Event \"Rated\"]\n{date_tag}[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"{result}\"]\n\n1. e4 {result}\n\n"
        )
    }

    #[test]
    fn test_losses_on_both_colors() {
        let pgn = [
            game("Alice", "Bob", "0-1", Some("2024.01.01")),
            game("Bob", "Alice", "1-0", Some("2024.01.02")),
            game("Alice", "Bob", "1-0", Some("2024.01.03")),
            game("Bob", "Alice", "1/2-1/2", Some("2024.01.04")),
            game("Alice", "Bob", "*", None),
        ]
        .concat();
        let games = split_games(&pgn);
        let found = find_user_games(&games, "alice", DateScope::AllGames);

        assert_eq!(found.lost_games.len(), 2);
        assert!(found.lost_games[0].contains("[Date \"2024.01.01\"]"));
        assert!(found.lost_games[1].contains("[Date \"2024.01.02\"]"));
        assert_eq!(
            found.game_dates,
            vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]
        );
    }

    #[test]
    fn test_lost_games_are_trimmed() {
        let pgn = format!("\n\n{}", game("Alice", "Bob", "0-1", None));
        let games = split_games(&pgn);
        let found = find_user_games(&games, "Alice", DateScope::AllGames);
        assert_eq!(found.lost_games.len(), 1);
        assert!(found.lost_games[0].starts_with("[Event"));
        assert!(found.lost_games[0].ends_with("0-1"));
    }

    #[test]
    fn test_date_scope_controls_foreign_games() {
        let pgn = [
            game("Alice", "Bob", "0-1", Some("2024.02.01")),
            game("Carol", "Dave", "1-0", Some("2019.05.05")),
        ]
        .concat();
        let games = split_games(&pgn);

        let all = find_user_games(&games, "Alice", DateScope::AllGames);
        assert_eq!(all.game_dates, vec!["2024-02-01", "2019-05-05"]);

        let own = find_user_games(&games, "Alice", DateScope::PlayerGames);
        assert_eq!(own.game_dates, vec!["2024-02-01"]);
        assert_eq!(all.lost_games, own.lost_games);
    }

    #[test]
    fn test_utc_date_is_used_when_date_missing() {
        let pgn = "[Event \"x\"]\n[UTCDate \"2023.07.14\"]\n[White \"A\"]\n[Black \"B\"]\n[Result \"0-1\"]\n";
        let games = split_games(pgn);
        let found = find_user_games(&games, "A", DateScope::AllGames);
        assert_eq!(found.game_dates, vec!["2023-07-14"]);
        assert_eq!(found.lost_games.len(), 1);
    }
}
