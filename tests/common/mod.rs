#![allow(dead_code)]

use std::sync::Arc;

use analysis_client::{AnalysisConfig, AnalysisPipeline, LichessClient, ProviderRegistry};
use chess_core::report::{
    AnalysisReport, EndgamePractice, OpeningAnalysis, StrategicWeakness, TacticalMotif,
};
use chess_core::Report;
use chrono::NaiveDate;
use reqwest::Client;
use server::config::Config;
use server::usage_log::UsageLog;
use server::Services;

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// One PGN record with the given players, result and `YYYY.MM.DD` date.
pub fn game(white: &str, black: &str, result: &str, date: &str) -> String {
    format!(
        "[Event \"Rated Rapid game\"]\n[Site \"https://lichess.org/abcdefgh\"]\n[Date \"{date}\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"{result}\"]\n\n1. e4 c5 2. Nf3 d6 {result}\n\n"
    )
}

/// `n` games for `player`, alternating colours, losing every third one.
pub fn history(player: &str, n: usize) -> String {
    (0..n)
        .map(|i| {
            let day = format!("2024.02.{:02}", i % 28 + 1);
            let lost = i % 3 == 0;
            if i % 2 == 0 {
                game(player, &format!("opp{i}"), if lost { "0-1" } else { "1-0" }, &day)
            } else {
                game(&format!("opp{i}"), player, if lost { "1-0" } else { "0-1" }, &day)
            }
        })
        .collect()
}

pub fn sample_report(player: &str, motifs: usize) -> Report {
    Report {
        data: AnalysisReport {
            opening_analysis: OpeningAnalysis {
                as_white: "You leave the centre to Black after 1.d4 d5 2.Bf4.".into(),
                as_black: "Against the Ruy Lopez your Berlin move orders drift.".into(),
            },
            tactical_motifs: (0..motifs)
                .map(|i| TacticalMotif {
                    motif: format!("Motif {i}"),
                    explanation: "Loose pieces on the back rank get forked. ".repeat(6),
                })
                .collect(),
            strategic_weaknesses: vec![StrategicWeakness {
                weakness: "Bad bishop".into(),
                explanation: "Pawns fixed on the bishop's colour.".into(),
            }],
            endgame_practice: vec![EndgamePractice {
                endgame_type: "Rook and pawn".into(),
                explanation: "Philidor defence.".into(),
            }],
            summary: "Slow down when the position opens.".into(),
        },
        player: player.into(),
        game_date_range: "2024-02-01 to 2024-02-28".into(),
        analysis_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    }
}

/// Serve `registry` on an ephemeral port and return the base URL.
pub async fn spawn_app(registry: ProviderRegistry, analysis: AnalysisConfig, log_dir: &str) -> String {
    let mut config = Config::from_env();
    config.analysis = analysis.clone();
    config.usage_log_dir = std::env::temp_dir().join(log_dir);

    let services = Services {
        pipeline: Arc::new(AnalysisPipeline::new(Arc::new(registry), analysis)),
        lichess: Arc::new(LichessClient::new().unwrap()),
        usage: UsageLog::new(&config.usage_log_dir),
        config,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(services)).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serve an arbitrary router on an ephemeral port.
pub async fn spawn_router(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
