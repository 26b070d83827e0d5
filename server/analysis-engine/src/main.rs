//! Binary entrypoint: read one CatalogPayload JSON object (stdin or file),
//! write one AnalysisSummary JSON object to stdout. Logs go to stderr.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use analysis_engine::types::StampedSummary;
use analysis_engine::{Config, Engine, EngineError};
use clap::Parser;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "analysis-engine", version, about = "Analyze a playlist catalog payload")]
struct Args {
  /// Read the payload from this file instead of stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// TOML file overriding caps and fact thresholds.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Indent the JSON output.
  #[arg(long)]
  pretty: bool,

  /// Add a `generatedAt` RFC 3339 timestamp to the output.
  #[arg(long)]
  stamp: bool,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();
  if let Err(e) = run_binary(&args) {
    error!("analysis-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary(args: &Args) -> Result<(), EngineError> {
  let config = match &args.config {
    Some(path) => Config::from_toml_str(&fs::read_to_string(path)?)?,
    None => Config::default(),
  };

  // Read the payload from a file or stdin.
  let raw = match &args.input {
    Some(path) => fs::read_to_string(path)?,
    None => {
      let mut raw = String::new();
      io::stdin().lock().read_to_string(&mut raw)?;
      raw
    }
  };

  let summary = Engine::new(config).analyze_json(&raw)?;

  // Write one JSON object.
  let mut out = io::stdout().lock();
  if args.stamp {
    let stamped = StampedSummary {
      summary: &summary,
      generated_at: chrono::Utc::now().to_rfc3339(),
    };
    write_json(&mut out, &stamped, args.pretty)?;
  } else {
    write_json(&mut out, &summary, args.pretty)?;
  }
  Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<(), EngineError> {
  if pretty {
    serde_json::to_writer_pretty(&mut *out, value)?;
  } else {
    serde_json::to_writer(&mut *out, value)?;
  }
  writeln!(out)?;
  Ok(())
}
