//! `pdf-tts` command-line driver.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG` overrides the `info` default).
//! 2. Load [`AppConfig`] from `--config` or the platform settings file.
//! 3. Build the extractor, the synthesis client and the document registry.
//! 4. Run the requested subcommand against one document directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pdf_tts::{
    config::{AppConfig, AudioEncoding},
    extract::PdfExtractor,
    pipeline::{DocumentRegistry, PipelineOptions},
    tts::{wav, GoogleTtsClient, RetryingSynthesizer},
};

/// Read PDF documents aloud, one cached sentence at a time.
#[derive(Parser)]
#[command(name = "pdf-tts", version, about)]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Password for encrypted PDFs.
    #[arg(long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract, filter and segment the PDF in DIR.
    Process { dir: PathBuf },

    /// Write the audio of one segment.
    Stream {
        dir: PathBuf,
        index: usize,
        /// Output file (defaults to `segment_<index>.wav`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete every derived artifact of the document in DIR.
    Clean { dir: PathBuf },

    /// Print the document snapshot as JSON.
    Info { dir: PathBuf },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => AppConfig::load().context("loading config"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 2. Configuration
    let config = load_config(cli.config.as_deref())?;

    // 3. Collaborators
    let extractor = match cli.password {
        Some(password) => PdfExtractor::with_password(password),
        None => PdfExtractor::new(),
    };
    let client = GoogleTtsClient::from_config(&config.tts, &config.synthesis);
    let registry = DocumentRegistry::new(
        Arc::new(extractor),
        Arc::new(RetryingSynthesizer::from_config(client, &config.tts)),
        PipelineOptions::from_config(&config),
    );

    // 4. Subcommand
    match cli.command {
        Command::Process { dir } => {
            let pipeline = registry.open(&dir)?;
            let report = pipeline.process().await?;
            println!(
                "{} segments ({} with cached audio{})",
                report.total,
                report.reused,
                if report.prior_discarded {
                    ", previous cache discarded"
                } else {
                    ""
                }
            );
        }
        Command::Stream { dir, index, output } => {
            let pipeline = registry.open(&dir)?;
            let audio = pipeline.stream(index).await?;
            let audio = if config.synthesis.encoding() == AudioEncoding::Linear16 {
                wav::ensure_header(&audio, config.synthesis.sample_rate_hertz())
            } else {
                audio
            };
            let output = output.unwrap_or_else(|| PathBuf::from(format!("segment_{index}.wav")));
            std::fs::write(&output, &audio)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {} bytes to {}", audio.len(), output.display());
        }
        Command::Clean { dir } => {
            let pipeline = registry.open(&dir)?;
            let removed = pipeline.clean().await?;
            println!("removed {removed} files");
        }
        Command::Info { dir } => {
            let pipeline = registry.open(&dir)?;
            let snapshot = pipeline.get_data().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    Ok(())
}
