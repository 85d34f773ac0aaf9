//! Command-line front end for doc-to-podcast.
//!
//! # Startup sequence
//!
//! 1. Parse arguments.
//! 2. Initialise logging (`RUST_LOG`, default `info`).
//! 3. Load [`AppConfig`] from `--config` or the platform path (defaults on
//!    first run).
//! 4. Build the [`Orchestrator`] and run the requested command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_to_podcast::backend::HttpProcessingClient;
use doc_to_podcast::config::{AppConfig, AppPaths};
use doc_to_podcast::file::SelectedFile;
use doc_to_podcast::records::GenerationRecord;
use doc_to_podcast::{GenerateOutcome, Orchestrator, WorkflowView};

/// Characters of summary shown per history entry.
const PREVIEW_CHARS: usize = 150;

/// Command-line options.
#[derive(Parser)]
#[command(name = "doc-to-podcast", version, about = "Generate a podcast from a PDF or text document")]
struct Cli {
    /// Path to a settings.toml (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload, process and save one document
    Generate {
        /// PDF or TXT file
        file: PathBuf,
    },
    /// List previously generated podcasts, newest first
    History,
    /// Check that the processing backend is up
    Health,
    /// Write a default settings.toml
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings_file = cli
        .config
        .clone()
        .unwrap_or_else(|| AppPaths::new().settings_file);

    if let Command::InitConfig { force } = cli.command {
        return init_config(&settings_file, force);
    }

    let config = AppConfig::load_from(&settings_file)
        .with_context(|| format!("failed to load {}", settings_file.display()))?;

    match cli.command {
        Command::Generate { file } => generate(&config, &file).await,
        Command::History => history(&config).await,
        Command::Health => health(&config).await,
        Command::InitConfig { .. } => Ok(ExitCode::SUCCESS),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn generate(config: &AppConfig, path: &std::path::Path) -> Result<ExitCode> {
    let orchestrator = Orchestrator::from_config(config);
    if let Err(e) = orchestrator.load_history().await {
        log::warn!("could not load history: {e}");
    }

    // An unreadable path is reported like "nothing selected".
    let file = match SelectedFile::from_path(path).await {
        Ok(file) => {
            log::info!("selected {} ({} MB)", file.name(), file.size_mb());
            Some(file)
        }
        Err(e) => {
            log::error!("cannot read {}: {e}", path.display());
            None
        }
    };

    let outcome = orchestrator.generate(file).await;
    let view = orchestrator.view();
    render(&view);

    Ok(match outcome {
        GenerateOutcome::Completed { .. } => ExitCode::SUCCESS,
        GenerateOutcome::Failed(_) | GenerateOutcome::Rejected => ExitCode::FAILURE,
    })
}

async fn history(config: &AppConfig) -> Result<ExitCode> {
    let orchestrator = Orchestrator::from_config(config);
    let entries = orchestrator
        .load_history()
        .await
        .context("Error loading previous podcasts")?;

    if entries.is_empty() {
        println!("No podcasts generated yet.");
    }
    for record in entries.iter() {
        print_history_entry(record);
    }
    Ok(ExitCode::SUCCESS)
}

async fn health(config: &AppConfig) -> Result<ExitCode> {
    let client = HttpProcessingClient::from_config(&config.backend);
    match client.health_check().await {
        Ok(message) => {
            println!("backend at {} is healthy: {message}", config.backend.base_url);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("backend at {} is not healthy: {e}", config.backend.base_url);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_config(path: &std::path::Path, force: bool) -> Result<ExitCode> {
    if path.exists() && !force {
        println!("{} already exists (use --force to overwrite)", path.display());
        return Ok(ExitCode::FAILURE);
    }
    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(view: &WorkflowView) {
    println!("Status: {}", view.state.label());

    if let Some(message) = &view.error_message {
        println!("Error: {message}");
    }
    if let Some(notice) = &view.notice {
        println!("Notice: {notice}");
    }

    if let Some(record) = &view.current {
        println!();
        println!("File:     {}", record.file_name);
        println!("Created:  {}", record.created_at);
        println!("Audio:    {}", record.audio_path);
        if !record.file_url.is_empty() {
            println!("Original: {}", record.file_url);
        }
        println!();
        println!("Summary:\n{}\n", record.summary);
        println!("Podcast script:\n{}", record.podcast_script);
    }

    println!();
    println!("{} podcast(s) in history", view.history.len());
}

fn print_history_entry(record: &GenerationRecord) {
    println!("[{}] {}  ({})", record.created_at, record.file_name, record.id);
    println!("    {}", record.summary_preview(PREVIEW_CHARS));
    println!("    audio: {}", record.audio_path);
}
