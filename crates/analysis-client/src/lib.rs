//! Clients for the services a coaching run talks to: the Lichess game
//! export and the LLM analysis backends.

pub mod config;
pub mod error;
pub mod lichess;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod retry;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use lichess::LichessClient;
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, PreparedAnalysis, RunOptions};
pub use prompt::Language;
pub use providers::{AnalysisProvider, AnalysisRequest, ProviderId, ProviderInfo};
pub use registry::ProviderRegistry;
pub use retry::{with_retry, RetryPolicy};
