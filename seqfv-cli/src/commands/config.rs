//! Config command - print or write seqfv.toml

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{CliError, CliResult};

pub fn execute(config: &Config, example: bool, output: Option<PathBuf>) -> CliResult<()> {
    let effective = if example { Config::default() } else { config.clone() };

    match output {
        Some(path) => {
            effective
                .save_to_file(&path)
                .map_err(|e| CliError::config(format!("{:#}", e)))?;
            log::info!("Configuration written to {}", path.display());
        }
        None => {
            let content = if example {
                Config::example_toml().map_err(|e| CliError::config(format!("{:#}", e)))?
            } else {
                toml::to_string_pretty(&effective)?
            };
            println!("{}", content);
        }
    }
    Ok(())
}
