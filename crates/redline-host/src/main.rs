// SPDX-License-Identifier: AGPL-3.0-or-later
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use redline_core::TreeFormat;
use redline_host::{apply_rules, load_config, load_document, render_document};
use redline_pipeline::RuleEngine;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for TreeFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => TreeFormat::PlainText,
            OutputFormat::Json => TreeFormat::Json,
        }
    }
}

/// Run edit rules over a document until it settles
#[derive(Debug, Parser)]
#[command(name = "redline", version, about)]
struct Cli {
    /// Document to process (`.json` for a serialized tree, plain text otherwise)
    input: PathBuf,

    /// Engine configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format, defaults to the input's
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Override the configured iteration cap
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Print a JSON run summary to stderr
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", cli.config))?;
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }
    let engine = RuleEngine::from_config(&config).context("building rule engine")?;
    tracing::debug!(?engine, "engine ready");

    let document = load_document(&cli.input)?;
    let format = cli.format.map(TreeFormat::from).unwrap_or(document.meta.format);

    let (document, summary) = apply_rules(document, &engine)?;
    if cli.summary {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }

    println!("{}", render_document(&document.tree, format)?);
    Ok(())
}
