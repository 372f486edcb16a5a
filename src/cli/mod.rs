//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{BuildCommand, PlanCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Build a WebAssembly package and stage its assets
#[derive(Debug, Parser, Clone)]
#[command(name = "wasm-pipeline")]
#[command(author = "wasm-pipeline Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Build a WebAssembly package, stage its assets and print how to serve it", long_about = None)]
pub struct Cli {
    /// Defaults to `build` with no overrides
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to build configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compile, stage assets and print serving instructions
    Build(BuildCommand),

    /// Show the steps a build would run, without running them
    Plan(PlanCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// The command to run, `build` when none was given
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Build(BuildCommand::default()))
    }
}
