//! Batch processing command for many documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use hrdoc_core::{DocumentInput, RecordAssembler};

use super::config::load_config;
use super::output::{render_many, OutputFormat, Processed};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for document text files (*.txt)
    #[arg(required = true)]
    input: String,

    /// Directory holding `<stem>.json` model responses (default: next to each text file)
    #[arg(short, long)]
    responses: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Include field sources and warnings in JSON output
    #[arg(long)]
    report: bool,

    /// Also write a per-document status CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of loading and processing one file.
struct FileResult {
    index: usize,
    path: PathBuf,
    outcome: Result<Processed, String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let assembler = Arc::new(RecordAssembler::from_config(&config.extraction));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let response_path = response_path_for(&path, args.responses.as_deref());
        let assembler = Arc::clone(&assembler);
        let pb = pb.clone();
        let permit = Arc::clone(&semaphore).acquire_owned().await?;

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let outcome = DocumentInput::from_files(&path, response_path.as_deref())
                .map(|input| Processed {
                    report: assembler.process(&input),
                    id: input.id,
                })
                .map_err(|e| e.to_string());
            pb.inc(1);
            FileResult {
                index,
                path,
                outcome,
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|r| r.index);

    pb.finish_and_clear();

    let mut processed = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for result in results {
        match result.outcome {
            Ok(p) => processed.push(p),
            Err(e) => {
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", result.path.display(), e);
                    failed.push((result.path, e));
                } else {
                    error!("Failed to process {}: {}", result.path.display(), e);
                    anyhow::bail!("Processing failed: {}", e);
                }
            }
        }
    }

    let output = render_many(&processed, args.format, &config.output, args.report)?;

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

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &processed, &failed)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let review = processed.iter().filter(|p| p.report.needs_review()).count();
    eprintln!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        processed.len(),
        start.elapsed()
    );
    if review > 0 {
        eprintln!("  {} need review", style(review).yellow());
    }
    if !failed.is_empty() {
        eprintln!("  {} failed", style(failed.len()).red());
        for (path, e) in &failed {
            eprintln!("    {}: {}", path.display(), e);
        }
    }

    Ok(())
}

/// The response file paired with a text file, when one exists.
fn response_path_for(text_path: &Path, responses_dir: Option<&Path>) -> Option<PathBuf> {
    let stem = text_path.file_stem()?;
    let dir = responses_dir.or_else(|| text_path.parent())?;
    let mut name = stem.to_os_string();
    name.push(".json");
    let candidate = dir.join(name);

    if candidate.is_file() {
        Some(candidate)
    } else {
        debug!("No response file for {}", text_path.display());
        None
    }
}

fn write_summary(
    path: &Path,
    processed: &[Processed],
    failed: &[(PathBuf, String)],
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id_documento",
        "status",
        "needs_review",
        "processing_time_ms",
        "detail",
    ])?;

    for p in processed {
        wtr.write_record([
            p.id.as_str(),
            "success",
            if p.report.needs_review() { "true" } else { "false" },
            &p.report.processing_time_ms.to_string(),
            &p.report.warnings.join(" | "),
        ])?;
    }

    for (path, e) in failed {
        let id = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        wtr.write_record([id, "error", "", "", e.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
