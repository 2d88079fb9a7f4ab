//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use docex_core::models::DocexConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Configuration file to show (default: docex.json in the current
        /// directory, falling back to built-in defaults)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Initialize a new configuration file
    Init(InitArgs),
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long, default_value = "docex.json")]
    output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { path } => show_config(path),
        ConfigCommand::Init(init_args) => init_config(init_args),
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from("docex.json")
}

fn show_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = path.unwrap_or_else(default_config_path);

    let config = if config_path.exists() {
        DocexConfig::from_file(&config_path)?
    } else {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        DocexConfig::with_default_schema()
    };

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let config = DocexConfig::with_default_schema();
    config.save(&args.output)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        args.output.display()
    );

    Ok(())
}
