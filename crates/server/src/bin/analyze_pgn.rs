//! Run a full coaching analysis from the command line.
//!
//! Usage: cargo run --bin analyze-pgn -- <games.pgn | --lichess USER> [options]
//!
//! Options:
//!   --player NAME      analyze this player instead of detecting one
//!   --provider ID      gemini | openai | grok | anthropic | openrouter
//!   --language CODE    en | de | hy
//!   --out DIR          where the PDF and text report go (default: reports)
//!   --dry-run          only show what would be analyzed
//!
//! The provider's API key is read from the environment (e.g. GEMINI_API_KEY).

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use analysis_client::{
    AnalysisConfig, AnalysisOutcome, AnalysisPipeline, Language, LichessClient, ProviderId,
    ProviderRegistry, RunOptions,
};
use anyhow::{bail, Context};
use chess_core::{DateScope, ParseStatus};
use report_export::{plain_text_report, PdfConfig, PdfExporter, ReportLayout};
use tracing_subscriber::EnvFilter;

struct Args {
    source: Source,
    player: Option<String>,
    provider: Option<ProviderId>,
    language: Option<Language>,
    out_dir: PathBuf,
    dry_run: bool,
}

enum Source {
    File(PathBuf),
    Lichess(String),
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!(
            "Usage: {} <games.pgn | --lichess USER> [--player NAME] [--provider ID] [--language CODE] [--out DIR] [--dry-run]",
            args[0]
        );
    }

    let mut source = None;
    let mut player = None;
    let mut provider = None;
    let mut language = None;
    let mut out_dir = PathBuf::from("reports");
    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        let value = || args.get(i + 1).cloned().with_context(|| format!("{} needs a value", args[i]));
        match args[i].as_str() {
            "--lichess" => {
                source = Some(Source::Lichess(value()?));
                i += 1;
            }
            "--player" => {
                player = Some(value()?);
                i += 1;
            }
            "--provider" => {
                provider = Some(value()?.parse::<ProviderId>()?);
                i += 1;
            }
            "--language" => {
                language = Some(value()?.parse::<Language>().map_err(anyhow::Error::msg)?);
                i += 1;
            }
            "--out" => {
                out_dir = PathBuf::from(value()?);
                i += 1;
            }
            "--dry-run" => dry_run = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}"),
            path => source = Some(Source::File(PathBuf::from(path))),
        }
        i += 1;
    }

    let source = source.context("No PGN file or Lichess user given")?;
    Ok(Args {
        source,
        player,
        provider,
        language,
        out_dir,
        dry_run,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = parse_args()?;

    let (pgn, known_player) = match &args.source {
        Source::File(path) => {
            let pgn = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (pgn, args.player.clone())
        }
        Source::Lichess(user) => {
            println!("Fetching games for {user} from Lichess...");
            let client = LichessClient::new()?;
            let pgn = client
                .fetch_pgn_with_progress(user, |n| eprint!("\r  {n} games received"))
                .await?;
            eprintln!();
            (pgn, args.player.clone().or_else(|| Some(user.clone())))
        }
    };

    let pipeline = AnalysisPipeline::new(
        Arc::new(ProviderRegistry::with_defaults()),
        AnalysisConfig::from_env(),
    );

    let prepared = pipeline.prepare(&pgn, known_player.as_deref(), DateScope::default());
    println!("Games found:   {}", prepared.parse.game_count);
    println!(
        "Player:        {}",
        prepared.parse.detected_user.as_deref().unwrap_or("(not detected)")
    );
    println!("Lost games:    {}", prepared.parse.lost_games_pgn.len());
    println!("Game period:   {}", prepared.game_date_range);

    match prepared.status() {
        ParseStatus::Ready => {}
        ParseStatus::Empty => bail!("No games found in the input"),
        ParseStatus::IdentityUnresolved => bail!("Could not detect the player; pass --player"),
        ParseStatus::NoLossesFound => {
            println!("No lost games to analyze.");
            return Ok(());
        }
    }
    if args.dry_run {
        return Ok(());
    }

    let options = RunOptions {
        provider: args.provider,
        language: args.language,
        ..RunOptions::default()
    };
    let report = match pipeline.run_with(&pgn, known_player.as_deref(), &options).await? {
        AnalysisOutcome::Completed { report } => report,
        other => bail!("Nothing to analyze: {other:?}"),
    };

    let layout = ReportLayout::new(&report);
    let artifact = PdfExporter::new(PdfConfig::default())
        .export_with_fallback(&layout, &report.player)
        .await?;
    let pdf_path = artifact.write_to(&args.out_dir)?;

    let text_path = args
        .out_dir
        .join(format!("ChessTrax_Analysis_{}.txt", report.player.replace(['/', '\\'], "_")));
    std::fs::write(&text_path, plain_text_report(&report))?;

    println!();
    println!("Analysis complete!");
    println!("  PDF:   {} ({} pages)", pdf_path.display(), artifact.page_count);
    println!("  Text:  {}", text_path.display());

    Ok(())
}
