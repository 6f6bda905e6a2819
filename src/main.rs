//! Token loader: read, normalize and sync token metadata files

use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use token_loader::cli::{self, Cli, Commands, ConfigAction};
use token_loader::config::{Config, OutputFormat};
use token_loader::error::{Result, TokenLoaderError};
use token_loader::input::InputManager;
use token_loader::output::formatter_for;
use token_loader::processing::overlap;
use token_loader::storage::{self, StorageClient};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed ({}): {}", e.kind(), e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Read { file, output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let tokens = InputManager::new().load_tokens(&file)?;
            info!("Loaded {} tokens from {}", tokens.len(), file.display());

            let formatter = formatter_for(format, config.output.color_output);
            println!("{}", formatter.format_records(&tokens)?);
        }

        Commands::Overlap { file, limit, output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let document = InputManager::new().decode(&file)?;
            let limit = limit.unwrap_or(config.output.summary_limit);
            let tokens = overlap::summarize(&document, limit)?;

            let formatter = formatter_for(format, config.output.color_output);
            println!("{}", formatter.format_summary(&tokens)?);
        }

        Commands::Upload { file, bucket } => {
            let bucket = bucket.unwrap_or_else(|| config.storage.bucket.clone());
            let client = storage_client(&config);

            let name = match file {
                Some(file) => {
                    ensure_file(&file)?;
                    storage::upload_file(&client, &file, &bucket).await?
                }
                None => {
                    let file = PathBuf::from(&config.storage.results_file_name);
                    ensure_file(&file)?;
                    storage::upload_overlap_results(&client, &file, &bucket).await?
                }
            };
            println!("✅ Uploaded {} to bucket '{}'", name, bucket);
        }

        Commands::Download { name, save, bucket } => {
            let mut storage_config = config.storage.clone();
            if let Some(bucket) = bucket {
                storage_config.bucket = bucket;
            }
            let client = storage_client(&config);

            let downloaded = match name {
                Some(name) => storage::download_file(&client, &save, &name, &storage_config.bucket).await,
                None => storage::download_overlap_results(&client, &save, &storage_config).await,
            };

            if downloaded {
                println!("✅ Downloaded to '{}'", save.display());
            } else {
                println!("⚠️  Download skipped, see warnings above");
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config File: {}", config_path.display());
                println!("\nStorage:");
                println!("  Bucket: {}", config.storage.bucket);
                println!("  Results File: {}", config.storage.results_file_name);
                println!("  Timeout: {}s", config.storage.timeout_secs);
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Summary Limit: {}", config.output.summary_limit);
                println!("  Colors: {}", config.output.color_output);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    cli::resolve_output_format(requested, config.output.format).map_err(TokenLoaderError::InvalidInput)
}

fn storage_client(config: &Config) -> StorageClient {
    StorageClient::new(Duration::from_secs(config.storage.timeout_secs))
}

fn ensure_file(file: &Path) -> Result<()> {
    if file.is_file() {
        Ok(())
    } else {
        Err(TokenLoaderError::NotFound(file.to_path_buf()))
    }
}
