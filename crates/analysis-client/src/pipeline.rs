//! Parse, select, analyze: the end-to-end coaching flow.

use std::sync::Arc;

use chess_core::{analysis_batch, parse_pgn_with, DateScope, ParseStatus, PgnParseResult, Report};
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::prompt::Language;
use crate::providers::{AnalysisRequest, ProviderId};
use crate::registry::ProviderRegistry;
use crate::retry::with_retry;

/// How a run ended. Only `Completed` carries a report; the others are
/// conditions to show the user, not failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AnalysisOutcome {
    NoGames,
    UserNotDetected { game_count: usize },
    NoLostGames { player: String },
    Completed { report: Box<Report> },
}

/// Per-run overrides of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub provider: Option<ProviderId>,
    pub api_key: Option<String>,
    pub language: Option<Language>,
    pub date_scope: DateScope,
}

/// Parsed input, ready to send (or to explain why not).
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub parse: PgnParseResult,
    /// Most recent lost games joined for the model.
    pub batch: String,
    pub game_date_range: String,
}

impl PreparedAnalysis {
    pub fn status(&self) -> ParseStatus {
        self.parse.status()
    }

    fn stopped(&self) -> Option<AnalysisOutcome> {
        match self.status() {
            ParseStatus::Empty => Some(AnalysisOutcome::NoGames),
            ParseStatus::IdentityUnresolved => Some(AnalysisOutcome::UserNotDetected {
                game_count: self.parse.game_count,
            }),
            ParseStatus::NoLossesFound => Some(AnalysisOutcome::NoLostGames {
                player: self.parse.detected_user.clone().unwrap_or_default(),
            }),
            ParseStatus::Ready => None,
        }
    }
}

pub struct AnalysisPipeline {
    registry: Arc<ProviderRegistry>,
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    pub fn new(registry: Arc<ProviderRegistry>, config: AnalysisConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Split, resolve the player, and select the games to analyze.
    pub fn prepare(&self, pgn: &str, player: Option<&str>, scope: DateScope) -> PreparedAnalysis {
        let parse = parse_pgn_with(pgn, player, scope);
        PreparedAnalysis {
            batch: analysis_batch(&parse.lost_games_pgn),
            game_date_range: parse.date_range(),
            parse,
        }
    }

    pub async fn run(&self, pgn: &str, player: Option<&str>) -> Result<AnalysisOutcome, AnalysisError> {
        self.run_with(pgn, player, &RunOptions::default()).await
    }

    pub async fn run_with(
        &self,
        pgn: &str,
        player: Option<&str>,
        options: &RunOptions,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let prepared = self.prepare(pgn, player, options.date_scope);
        if let Some(outcome) = prepared.stopped() {
            info!(status = ?prepared.status(), games = prepared.parse.game_count, "Nothing to analyze");
            return Ok(outcome);
        }
        let player = prepared.parse.detected_user.clone().unwrap_or_default();

        let provider_id = options.provider.unwrap_or(self.config.provider);
        let api_key = options
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| self.config.api_key(provider_id))
            .ok_or(AnalysisError::MissingApiKey(provider_id))?;
        let provider = self.registry.get(provider_id)?;

        let request = AnalysisRequest {
            pgn: &prepared.batch,
            api_key,
            player: &player,
            language: options.language.unwrap_or(self.config.language),
        };

        info!(
            player = %player,
            provider = %provider_id,
            lost_games = prepared.parse.lost_games_pgn.len(),
            "Requesting analysis"
        );
        let data = with_retry(&self.config.retry, || provider.analyze(&request)).await?;

        Ok(AnalysisOutcome::Completed {
            report: Box::new(Report {
                data,
                player,
                game_date_range: prepared.game_date_range,
                analysis_date: Local::now().date_naive(),
            }),
        })
    }
}
