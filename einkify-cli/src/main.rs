//! einkify CLI - Command-line interface for comic to e-book conversion

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "einkify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a comic archive (.cbz, .cbr) to an e-book
    Convert {
        /// Input archive path
        input: PathBuf,

        /// Output file path (defaults to <title>.kepub.epub)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML image-processing profile
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Right-to-left page progression
        #[arg(long)]
        manga: bool,

        /// Output flavor (epub, kepub)
        #[arg(short, long, default_value = "kepub")]
        format: String,
    },

    /// Display information about a packaged e-book
    Info {
        /// Package file path
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the structure of a packaged e-book
    Validate {
        /// Package file path
        input: PathBuf,
    },

    /// Batch convert every comic archive in a directory
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// YAML image-processing profile
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Right-to-left page progression
        #[arg(long)]
        manga: bool,

        /// Output flavor (epub, kepub)
        #[arg(short, long, default_value = "kepub")]
        format: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "einkify_cli=debug,einkify_core=debug"
    } else {
        "einkify_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            profile,
            manga,
            format,
        } => commands::convert(&input, output, profile.as_deref(), manga, &format),

        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Validate { input } => commands::validate(&input),

        Commands::Batch {
            input_dir,
            output_dir,
            profile,
            manga,
            format,
            jobs,
        } => commands::batch(&input_dir, &output_dir, profile.as_deref(), manga, &format, jobs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jobs() {
        assert_eq!(parse_jobs("3"), Ok(3));
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("many").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
