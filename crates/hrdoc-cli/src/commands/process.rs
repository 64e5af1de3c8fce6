//! Process command - extract the record of a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use hrdoc_core::{DocumentInput, RecordAssembler};

use super::config::load_config;
use super::output::{render_one, OutputFormat, Processed};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Extracted document text file
    #[arg(required = true)]
    input: PathBuf,

    /// File holding the upstream model response
    #[arg(short, long, conflicts_with = "response_text")]
    response: Option<PathBuf>,

    /// Upstream model response given inline
    #[arg(long)]
    response_text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include field sources and warnings in JSON output
    #[arg(long)]
    report: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let mut input = DocumentInput::from_files(&args.input, args.response.as_deref())?;
    if let Some(response) = args.response_text {
        input.response = response;
    }

    let assembler = RecordAssembler::from_config(&config.extraction);
    let processed = Processed {
        id: input.id.clone(),
        report: assembler.process(&input),
    };

    if processed.report.needs_review() {
        eprintln!("{}", style("Record needs review:").yellow());
        for warning in &processed.report.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = render_one(&processed, args.format, &config.output, args.report)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
