//! CLI interface for the token loader

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "token-loader")]
#[command(about = "Load, normalize and sync token metadata files")]
#[command(long_about = "Read token data from pickle, JSON or CSV files as a normalized list of records, and move results files to and from Supabase Storage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read and print token data
    Read {
        /// Path to token data file (pkl/json/csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Output format: pretty, compact, jsonl, table
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Upload a file to the storage bucket, replacing any existing copy
    Upload {
        /// Local file to upload (defaults to the configured results file)
        file: Option<PathBuf>,

        /// Bucket name (defaults to the configured bucket)
        #[arg(short, long)]
        bucket: Option<String>,
    },

    /// Download a file from the storage bucket
    Download {
        /// Object name (defaults to the configured results file)
        name: Option<String>,

        /// Local path to save to
        #[arg(short, long)]
        save: PathBuf,

        /// Bucket name (defaults to the configured bucket)
        #[arg(short, long)]
        bucket: Option<String>,
    },

    /// Summarize an overlap results file, newest checks first
    Overlap {
        /// Path to overlap results file (pkl/json)
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum number of tokens to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format: pretty, compact, jsonl, table
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "pretty" | "json" => Ok(OutputFormat::Pretty),
        "compact" => Ok(OutputFormat::Compact),
        "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
        "table" | "console" => Ok(OutputFormat::Table),
        _ => Err(format!(
            "Invalid output format: {}. Supported: pretty, compact, jsonl, table",
            format
        )),
    }
}

/// Pick the `--output` format when given, the configured one otherwise
pub fn resolve_output_format(requested: Option<&str>, configured: OutputFormat) -> Result<OutputFormat, String> {
    match requested {
        Some(format) => parse_output_format(format),
        None => Ok(configured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Pretty));
        assert_eq!(parse_output_format("ndjson"), Ok(OutputFormat::Jsonl));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Table));
        assert!(parse_output_format("xml").is_err());
    }

    #[test]
    fn test_resolve_output_format_falls_back_to_config() {
        assert_eq!(resolve_output_format(None, OutputFormat::Jsonl), Ok(OutputFormat::Jsonl));
        assert_eq!(resolve_output_format(Some("table"), OutputFormat::Jsonl), Ok(OutputFormat::Table));
        assert!(resolve_output_format(Some("xml"), OutputFormat::Pretty).is_err());
    }

    #[test]
    fn test_overlap_output_is_optional() {
        let cli = Cli::try_parse_from(["token-loader", "overlap", "--file", "overlap.json"]).unwrap();
        match cli.command {
            Commands::Overlap { output, limit, .. } => {
                assert_eq!(output, None);
                assert_eq!(limit, None);
            }
            _ => panic!("expected overlap command"),
        }
    }

    #[test]
    fn test_read_requires_file() {
        assert!(Cli::try_parse_from(["token-loader", "read"]).is_err());

        let cli = Cli::try_parse_from(["token-loader", "read", "--file", "tokens.pkl", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Read { file, output } => {
                assert_eq!(file, PathBuf::from("tokens.pkl"));
                assert_eq!(output, None);
            }
            _ => panic!("expected read command"),
        }
    }

    #[test]
    fn test_download_defaults() {
        let cli = Cli::try_parse_from(["token-loader", "download", "--save", "out.pkl"]).unwrap();
        match cli.command {
            Commands::Download { name, save, bucket } => {
                assert_eq!(name, None);
                assert_eq!(save, PathBuf::from("out.pkl"));
                assert_eq!(bucket, None);
            }
            _ => panic!("expected download command"),
        }
    }
}
