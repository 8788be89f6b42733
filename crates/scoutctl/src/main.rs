//! scoutctl - TalentScout hiring assistant CLI

use anyhow::{Context, Result};
use clap::Parser;
use scout_common::ScoutConfig;
use scoutctl::cli::{Cli, Commands};
use scoutctl::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ScoutConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init(&config.log.level);

    match cli.command {
        None => commands::chat(&config, None),
        Some(Commands::Chat { language }) => commands::chat(&config, language),
        Some(Commands::Resume { file }) => commands::resume(&config, &file),
        Some(Commands::Config) => commands::show_config(&config),
    }
}
