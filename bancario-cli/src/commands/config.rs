//! Config command - show and change settings.json

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use bancario_core::config::{Config, API_URL_ENV};

use super::{get_data_dir, print_json};
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting (api.baseUrl, api.timeoutSecs, api.pageSize)
    Set {
        key: String,
        value: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir)?;
            if json {
                return print_json(&serde_json::json!({
                    "data_dir": data_dir.to_string_lossy(),
                    "base_url": config.base_url,
                    "timeout_secs": config.timeout_secs,
                    "page_size": config.page_size,
                }));
            }

            println!("{}", "Configuration".bold());
            println!("  Data directory: {}", data_dir.display());
            println!("  API base URL: {}", config.base_url);
            match config.timeout_secs {
                Some(secs) => println!("  Timeout: {}s", secs),
                None => println!("  Timeout: none"),
            }
            println!("  Page size: {}", config.page_size);
            if config.is_base_url_overridden() {
                println!("{}", format!("  (base URL overridden by {})", API_URL_ENV).dimmed());
            }
        }
        ConfigCommands::Set { key, value } => {
            // file values only; the environment override is not persisted
            let mut config = Config::from_file(&data_dir)?;
            config.set(&key, &value)?;
            config.save(&data_dir)?;
            output::success(&format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}
