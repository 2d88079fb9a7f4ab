//! Batch command - process a set of document text files and pair them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use docex_core::models::{DocexConfig, MatchPair, Record, UnmatchedRecord};
use docex_core::{map_to_schema, match_batch};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern of text files
    #[arg(required = true)]
    input: String,

    /// Output CSV file
    #[arg(short, long, default_value = "risultati.csv")]
    output: PathBuf,

    /// Also write a report of unmatched documents
    #[arg(long)]
    unmatched_report: Option<PathBuf>,

    /// Disable pairing leftover records by position
    #[arg(long)]
    no_positional: bool,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = if let Some(path) = config_path {
        DocexConfig::from_file(Path::new(path))?
    } else {
        DocexConfig::default()
    };
    if args.no_positional {
        config.matcher.positional_fallback = false;
    }

    let files = collect_files(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching text files found for: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut records: Vec<Record> = Vec::with_capacity(files.len());
    let mut read_failures: Vec<(PathBuf, String)> = Vec::new();

    for path in &files {
        let source_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("documento");

        match fs::read_to_string(path) {
            Ok(text) => {
                let record = docex_core::process_document(source_name, &text, &config);
                debug!(
                    source = source_name,
                    document_type = ?record.document_type,
                    fields = record.fields.len(),
                    "file processed"
                );
                records.push(record);
            }
            Err(e) => {
                if args.continue_on_error {
                    warn!("Failed to read {}: {}", path.display(), e);
                    read_failures.push((path.clone(), e.to_string()));
                } else {
                    anyhow::bail!("Failed to read {}: {}", path.display(), e);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let total = records.len();
    let (pairs, unmatched) = match_batch(records, &config.matcher);

    let schema = config.effective_schema();
    write_rows(&args.output, &schema, &pairs)?;
    println!(
        "{} Results written to {}",
        style("✓").green(),
        args.output.display()
    );

    if let Some(report_path) = &args.unmatched_report {
        write_unmatched_report(report_path, &unmatched, &read_failures)?;
        println!(
            "{} Unmatched report written to {}",
            style("✓").green(),
            report_path.display()
        );
    }

    // Print summary
    let complete = pairs.iter().filter(|p| p.is_complete()).count();
    let singletons = pairs.len() - complete;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        total,
        start.elapsed()
    );
    println!(
        "   {} paired, {} unpaired, {} unrecognized",
        style(complete).green(),
        style(singletons).yellow(),
        style(unmatched.len()).red()
    );

    if !read_failures.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for (path, error) in &read_failures {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Expand the input argument into a sorted list of text files. A directory
/// means every .txt file directly inside it; anything else is a glob.
fn collect_files(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let input_path = Path::new(input);
    let pattern = if input_path.is_dir() {
        format!("{}/*.txt", input.trim_end_matches('/'))
    } else {
        input.to_string()
    };

    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn write_rows(path: &Path, schema: &[String], pairs: &[MatchPair]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;

    wtr.write_record(schema)?;
    for pair in pairs {
        let row = map_to_schema(pair.company.as_ref(), pair.person.as_ref(), schema);
        wtr.write_record(row.values())?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_unmatched_report(
    path: &Path,
    unmatched: &[UnmatchedRecord],
    read_failures: &[(PathBuf, String)],
) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;

    wtr.write_record(["file", "motivo"])?;
    for entry in unmatched {
        wtr.write_record([entry.record.source_name.as_str(), entry.reason.as_str()])?;
    }
    for (file, error) in read_failures {
        let name = file.file_name().and_then(|s| s.to_str()).unwrap_or("");
        wtr.write_record([name, error.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
