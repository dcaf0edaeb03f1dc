//! Integration tests: PGN parsing from raw text to the analysis batch.

mod common;

use chess_core::{
    analysis_batch, find_user_games, format_date_range, parse_pgn, parse_pgn_for, split_games,
    DateScope, ParseStatus, MAX_ANALYZED_GAMES,
};
use common::game;

#[test]
fn test_scenario_single_player_loss() {
    let pgn = [game("Alice", "Bob", "0-1", "2024.01.01"), game("Alice", "Carol", "1-0", "2024.01.02")].concat();
    let result = parse_pgn(&pgn);
    assert_eq!(result.detected_user.as_deref(), Some("Alice"));
    assert_eq!(result.lost_games_pgn.len(), 1);
    assert!(result.lost_games_pgn[0].contains("[Result \"0-1\"]"));
}

#[test]
fn test_scenario_empty_input() {
    let result = parse_pgn("");
    assert!(result.lost_games_pgn.is_empty());
    assert!(result.game_dates.is_empty());
    assert_eq!(result.detected_user, None);
    assert_eq!(result.status(), ParseStatus::Empty);
}

#[test]
fn test_scenario_majority_handle_wins() {
    let pgn = [
        game("Bob", "Carol", "0-1", "2024.01.01"),
        game("Dave", "Bob", "0-1", "2024.01.02"),
        game("Bob", "Erin", "1/2-1/2", "2024.01.03"),
    ]
    .concat();
    assert_eq!(parse_pgn(&pgn).detected_user.as_deref(), Some("Bob"));
    // Detection does not depend on outcomes.
    assert_eq!(parse_pgn(&pgn).detected_user, parse_pgn(&pgn).detected_user);
}

#[test]
fn test_losses_are_exactly_the_players_defeats() {
    let pgn = common::history("zoe", 30);
    let games = split_games(&pgn);
    let found = find_user_games(&games, "ZOE", DateScope::AllGames);

    let expected: Vec<String> = games
        .iter()
        .filter(|g| {
            (g.white() == Some("zoe") && g.tag("Result") == Some("0-1"))
                || (g.black() == Some("zoe") && g.tag("Result") == Some("1-0"))
        })
        .map(|g| g.text().to_string())
        .collect();
    assert_eq!(found.lost_games, expected);
    assert_eq!(found.lost_games.len(), 10);
    assert_eq!(found.game_dates.len(), 30);
}

#[test]
fn test_dates_from_other_players_follow_scope() {
    let pgn = [
        game("alice", "bob", "0-1", "2024.01.05"),
        game("carol", "dave", "1-0", "2023.12.24"),
    ]
    .concat();
    let games = split_games(&pgn);

    let all = find_user_games(&games, "alice", DateScope::AllGames);
    assert_eq!(format_date_range(&all.game_dates), "2023-12-24 to 2024-01-05");

    let own = find_user_games(&games, "alice", DateScope::PlayerGames);
    assert_eq!(format_date_range(&own.game_dates), "2024-01-05");
}

#[test]
fn test_batch_keeps_most_recent_fifty() {
    let pgn = common::history("max", 200);
    let result = parse_pgn_for(&pgn, "max");
    assert!(result.lost_games_pgn.len() > MAX_ANALYZED_GAMES);

    let batch = analysis_batch(&result.lost_games_pgn);
    let records = split_games(&batch);
    assert_eq!(records.len(), MAX_ANALYZED_GAMES);
    let last = result.lost_games_pgn.last().unwrap();
    assert_eq!(records.last().unwrap().text(), last.as_str());
}
