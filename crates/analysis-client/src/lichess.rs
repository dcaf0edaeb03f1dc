use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{debug, info};

use crate::error::AnalysisError;

pub const LICHESS_BASE_URL: &str = "https://lichess.org";
pub const MAX_GAMES: usize = 2000;
pub const PERF_TYPES: &str = "blitz,rapid,classical,correspondence,standard";

const EVENT_MARKER: &[u8] = b"[Event ";

pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_base_url(LICHESS_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .user_agent(concat!("ChessTrax/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| AnalysisError::Fetch(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a user's full game history as concatenated PGN.
    pub async fn fetch_pgn(&self, username: &str) -> Result<String, AnalysisError> {
        let resp = self.request(username).await?;
        let pgn = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Fetch(format!("Body read error: {e}")))?;
        info!(username, bytes = pgn.len(), "Fetched Lichess games");
        Ok(pgn)
    }

    /// Like [`fetch_pgn`](Self::fetch_pgn), calling `on_progress` with the
    /// running number of games received as the body streams in.
    pub async fn fetch_pgn_with_progress<F>(
        &self,
        username: &str,
        mut on_progress: F,
    ) -> Result<String, AnalysisError>
    where
        F: FnMut(usize),
    {
        let resp = self.request(username).await?;
        let mut body: Vec<u8> = Vec::new();
        let mut games = 0;
        let mut stream = resp.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AnalysisError::Fetch(format!("Body read error: {e}")))?;
            // Rescan the tail of the previous chunk so split markers count once.
            let start = body.len().saturating_sub(EVENT_MARKER.len() - 1);
            body.extend_from_slice(&chunk);
            let found = count_markers(&body[start..]);
            if found > 0 {
                games += found;
                on_progress(games);
            }
        }

        let pgn = String::from_utf8(body)
            .map_err(|e| AnalysisError::Fetch(format!("Response is not UTF-8: {e}")))?;
        info!(username, games, "Fetched Lichess games");
        Ok(pgn)
    }

    async fn request(&self, username: &str) -> Result<Response, AnalysisError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AnalysisError::Fetch("Username is required".to_string()));
        }

        let url = self.games_url(username)?;
        let max = MAX_GAMES.to_string();
        let params = [
            ("tags", "true"),
            ("clocks", "true"),
            ("evals", "true"),
            ("opening", "true"),
            ("literate", "true"),
            ("max", max.as_str()),
            ("perfType", PERF_TYPES),
        ];
        debug!(username, "Requesting Lichess game export");

        let resp = self
            .client
            .get(url)
            .query(&params)
            .header("Accept", "application/x-chess-pgn")
            .send()
            .await
            .map_err(|e| AnalysisError::Fetch(format!("Request error: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(AnalysisError::UserNotFound(username.to_string()));
        }
        if !resp.status().is_success() {
            return Err(AnalysisError::Fetch(format!(
                "Lichess returned status {}",
                resp.status()
            )));
        }
        Ok(resp)
    }

    /// `{base}/api/games/user/{username}`, with the username as one encoded
    /// path segment.
    fn games_url(&self, username: &str) -> Result<Url, AnalysisError> {
        let invalid = || AnalysisError::Fetch(format!("Invalid Lichess base URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["api", "games", "user", username]);
        Ok(url)
    }
}

fn count_markers(bytes: &[u8]) -> usize {
    bytes
        .windows(EVENT_MARKER.len())
        .filter(|w| *w == EVENT_MARKER)
        .count()
}
