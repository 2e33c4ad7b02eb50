//! Config command

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::load_config;
use crate::cli::ConfigCommands;

pub async fn run(cmd: ConfigCommands, path: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(path),
        ConfigCommands::Validate => validate(path),
    }
}

fn show(path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(path)?;
    let yaml = serde_yaml_ng::to_string(&config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}

fn validate(path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(path)?;
    config.validate()?;
    println!("Configuration is valid");
    Ok(())
}
