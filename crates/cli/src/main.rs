use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tokio::sync::mpsc;

use recital_core::alignment::domain::diff::{DiffTag, DiffToken};
use recital_core::scoring::domain::scorer::{ScoreMode, ScoreReport, Scorer};
use recital_core::scoring::domain::similarity::SimilarityProvider;
use recital_core::scoring::infrastructure::http_embedder::HttpEmbedder;
use recital_core::session::controller::{
    NoticeLevel, SessionConfig, SessionController, SessionUpdate,
};
use recital_core::session::infrastructure::replay_provider::ReplayProvider;
use recital_core::text::domain::normalizer::NormalizeOptions;

/// Transcript capture and scoring for recitation practice.
#[derive(Parser)]
#[command(name = "recital")]
struct Cli {
    /// Reference text file the speaker was reciting.
    reference: PathBuf,

    /// Transcript file to grade (omit when using --replay).
    transcript: Option<PathBuf>,

    /// Recognition event script (JSON) to play through a live capture
    /// session; the frozen transcript is graded.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Scoring mode: exact or content.
    #[arg(long, default_value = "exact")]
    mode: String,

    /// Keep punctuation, symbols and letter case when comparing.
    #[arg(long)]
    keep_punctuation: bool,

    /// Keep the space between a numeral and a following 년 unit.
    #[arg(long)]
    keep_numeral_spacing: bool,

    /// Embedding service endpoint for the semantic part of content mode.
    #[arg(long)]
    embedder: Option<String>,

    /// Recognition language tag for replayed sessions.
    #[arg(long, default_value = "ko-KR")]
    language: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mode = parse_mode(&cli.mode);
    let options = NormalizeOptions {
        normalize_punctuation: !cli.keep_punctuation,
        normalize_numerals: !cli.keep_numeral_spacing,
    };
    let embedder = cli
        .embedder
        .as_deref()
        .map(|endpoint| Box::new(HttpEmbedder::new(endpoint)) as Box<dyn SimilarityProvider>);
    let scorer = Scorer::new(embedder);
    let reference = fs::read_to_string(&cli.reference)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let hypothesis = if let Some(script) = &cli.replay {
        runtime.block_on(capture_replay(script, &cli.language))?
    } else {
        fs::read_to_string(cli.transcript.as_ref().unwrap())?
    };

    let report = runtime.block_on(scorer.score(&reference, &hypothesis, mode, options))?;
    print_report(&report);
    Ok(())
}

/// Feeds a prerecorded event script through a capture session and returns
/// the frozen transcript, mirroring what a live microphone run produces.
async fn capture_replay(
    script_path: &Path,
    language: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let script = fs::read_to_string(script_path)?;
    let provider = ReplayProvider::from_json(&script)?;
    let finished = provider.finished_signal();

    let config = SessionConfig {
        language: language.to_string(),
        ..SessionConfig::default()
    };
    let (updates_tx, mut updates_rx) = mpsc::channel(64);
    let handle = SessionController::spawn(Box::new(provider), config, updates_tx);

    handle.start().await?;

    let observer = tokio::spawn(async move {
        let mut frozen = None;
        while let Some(update) = updates_rx.recv().await {
            match update {
                SessionUpdate::Transcript { live } => {
                    if !live.is_empty() {
                        eprint!("\r{live}");
                    }
                }
                SessionUpdate::Notice { level, message } => match level {
                    NoticeLevel::Info => log::info!("{message}"),
                    NoticeLevel::Warn => log::warn!("{message}"),
                },
                SessionUpdate::Stopped { transcript } => {
                    frozen = Some(transcript);
                    break;
                }
                SessionUpdate::State(_) => {}
            }
        }
        frozen
    });

    finished.notified().await;
    handle.stop().await?;

    let transcript = observer
        .await?
        .ok_or("capture ended without a transcript")?;
    eprintln!();
    Ok(transcript)
}

fn print_report(report: &ScoreReport) {
    println!("Score: {}/100", report.score);
    println!("{}", report.notes);
    println!(
        "Reference tokens: {}, transcript tokens: {}",
        report.reference_tokens, report.hypothesis_tokens
    );
    println!();
    println!("Reference:  {}", render_diff_line(&report.diff.reference));
    println!("Transcript: {}", render_diff_line(&report.diff.hypothesis));
    println!("            (*substituted*  -missing-  +added+)");
}

fn render_diff_line(tokens: &[DiffToken]) -> String {
    tokens
        .iter()
        .map(decorate_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn decorate_token(token: &DiffToken) -> String {
    match token.tag {
        DiffTag::Match => token.text.clone(),
        DiffTag::Substitute => format!("*{}*", token.text),
        DiffTag::Delete => format!("-{}-", token.text),
        DiffTag::Insert => format!("+{}+", token.text),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.reference.exists() {
        return Err(format!("Reference file not found: {}", cli.reference.display()).into());
    }
    if cli.transcript.is_some() && cli.replay.is_some() {
        return Err("A transcript file and --replay are mutually exclusive".into());
    }
    if cli.transcript.is_none() && cli.replay.is_none() {
        return Err("A transcript file is required unless --replay is used".into());
    }
    if let Some(path) = &cli.transcript {
        if !path.exists() {
            return Err(format!("Transcript file not found: {}", path.display()).into());
        }
    }
    if let Some(path) = &cli.replay {
        if !path.exists() {
            return Err(format!("Replay script not found: {}", path.display()).into());
        }
    }
    let valid_modes = ["exact", "content"];
    if !valid_modes.contains(&cli.mode.as_str()) {
        return Err(format!("Mode must be one of: exact, content, got '{}'", cli.mode).into());
    }
    if cli.embedder.is_some() && cli.mode != "content" {
        return Err("--embedder only applies to content mode".into());
    }
    Ok(())
}

fn parse_mode(mode: &str) -> ScoreMode {
    if mode == "content" {
        ScoreMode::Content
    } else {
        ScoreMode::Exact
    }
}
