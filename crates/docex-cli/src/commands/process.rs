//! Process command - extract data from a single document text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docex_core::models::DocexConfig;
use docex_core::{process_document, Record};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Semicolon-delimited CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        DocexConfig::from_file(std::path::Path::new(path))?
    } else {
        DocexConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = fs::read_to_string(&args.input)?;
    let source_name = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("documento");

    let record = process_document(source_name, &text, &config);

    if record.fields.is_empty() {
        eprintln!(
            "{} No fields extracted ({})",
            style("!").yellow(),
            record.document_type.label()
        );
    }

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &Record, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &Record) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(vec![]);

    wtr.write_record(["campo", "valore"])?;
    wtr.write_record(["file", &record.source_name])?;
    wtr.write_record(["tipo_documento", record.document_type.label()])?;
    for (field, value) in &record.fields {
        wtr.write_record([field.as_str(), value.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &Record) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", record.source_name));
    output.push_str(&format!("Tipo: {}\n", record.document_type.label()));
    output.push_str(&format!(
        "Estratto: {}\n",
        record.extracted_at.format("%Y-%m-%d %H:%M:%S")
    ));
    output.push('\n');

    if record.fields.is_empty() {
        output.push_str("(nessun campo estratto)\n");
    } else {
        for (field, value) in &record.fields {
            output.push_str(&format!("  {}: {}\n", field, value));
        }
    }

    output
}
