//! Command-line interface for coursemanager.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

pub use commands::{check, init};

/// Course management web application
#[derive(Debug, Parser)]
#[command(name = "coursemanager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config.toml, overriding the search paths
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration and check the database is reachable
    Check,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => {
                dotenvy::dotenv().ok();
                Config::load_from_path(path)
            }
            None => Config::load(),
        }
    }

    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
