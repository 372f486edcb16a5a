//! CLI command definitions

use crate::core::config::{BuildConfig, BuildProfile, WasmTarget};
use clap::Args;
use std::path::PathBuf;

/// Compile, stage assets and print serving instructions
#[derive(Debug, Args, Clone, Default)]
pub struct BuildCommand {
    #[command(flatten)]
    pub overrides: BuildOverrides,

    /// Extra arguments passed to the compiler tool (after `--`)
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

/// Show the planned steps
#[derive(Debug, Args, Clone, Default)]
pub struct PlanCommand {
    #[command(flatten)]
    pub overrides: BuildOverrides,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Flags that override the configuration file
#[derive(Debug, Args, Clone, Default)]
pub struct BuildOverrides {
    /// Directory containing the crate to compile
    #[arg(long)]
    pub crate_dir: Option<PathBuf>,

    /// Output directory, relative to the crate directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Compiler target
    #[arg(long, value_enum)]
    pub target: Option<TargetArg>,

    /// Build profile
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Compiler executable
    #[arg(long)]
    pub tool: Option<String>,

    /// Static assets directory, relative to the crate directory
    #[arg(long, conflicts_with = "no_assets")]
    pub assets_dir: Option<PathBuf>,

    /// Skip asset staging
    #[arg(long)]
    pub no_assets: bool,

    /// Port for the suggested HTTP server
    #[arg(long)]
    pub port: Option<u16>,
}

impl BuildOverrides {
    /// Apply the overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut BuildConfig) {
        if let Some(dir) = &self.crate_dir {
            config.crate_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if let Some(target) = self.target {
            config.target = target.into();
        }
        if let Some(profile) = self.profile {
            config.profile = profile.into();
        }
        if let Some(tool) = &self.tool {
            config.tool = tool.clone();
        }
        if self.no_assets {
            config.assets_dir = None;
        } else if let Some(dir) = &self.assets_dir {
            config.assets_dir = Some(dir.clone());
        }
        if let Some(port) = self.port {
            config.serve.port = port;
        }
    }
}

/// Compiler target argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetArg {
    Bundler,
    Nodejs,
    Web,
    #[clap(name = "no-modules")]
    NoModules,
    Deno,
}

impl From<TargetArg> for WasmTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Bundler => WasmTarget::Bundler,
            TargetArg::Nodejs => WasmTarget::Nodejs,
            TargetArg::Web => WasmTarget::Web,
            TargetArg::NoModules => WasmTarget::NoModules,
            TargetArg::Deno => WasmTarget::Deno,
        }
    }
}

/// Build profile argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileArg {
    Release,
    Dev,
    Profiling,
}

impl From<ProfileArg> for BuildProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Release => BuildProfile::Release,
            ProfileArg::Dev => BuildProfile::Dev,
            ProfileArg::Profiling => BuildProfile::Profiling,
        }
    }
}
