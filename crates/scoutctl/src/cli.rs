//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TalentScout hiring assistant
#[derive(Parser, Debug)]
#[command(name = "scoutctl")]
#[command(about = "TalentScout - conversational candidate intake", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/talentscout/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand (if not provided, starts the intake chat)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the candidate intake conversation
    Chat {
        /// Display language code (en, hi, es, fr, de, zh-CN, ja, ko, ar, ru)
        #[arg(long, short)]
        language: Option<String>,
    },

    /// Parse a resume (PDF or DOCX) and chat about it
    Resume {
        /// Resume file
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}
