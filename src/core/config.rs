//! Build configuration from YAML

use crate::core::Pipeline;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Output flavour requested from the compiler tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WasmTarget {
    Bundler,
    Nodejs,
    #[default]
    Web,
    NoModules,
    Deno,
}

impl WasmTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            WasmTarget::Bundler => "bundler",
            WasmTarget::Nodejs => "nodejs",
            WasmTarget::Web => "web",
            WasmTarget::NoModules => "no-modules",
            WasmTarget::Deno => "deno",
        }
    }
}

impl fmt::Display for WasmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build profile passed to the compiler tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    #[default]
    Release,
    Dev,
    Profiling,
}

impl BuildProfile {
    /// The compiler flag selecting this profile
    pub fn flag(&self) -> &'static str {
        match self {
            BuildProfile::Release => "--release",
            BuildProfile::Dev => "--dev",
            BuildProfile::Profiling => "--profiling",
        }
    }
}

/// How to tell the user to serve the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Command to suggest, run inside the output directory
    #[serde(default = "default_serve_command")]
    pub command: String,

    /// Port the suggested server listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            command: default_serve_command(),
            port: default_port(),
        }
    }
}

fn default_serve_command() -> String {
    "python3 -m http.server".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Top-level build configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Package name used in output (defaults to the crate directory name)
    #[serde(default)]
    pub name: Option<String>,

    /// Directory containing the crate to compile
    #[serde(default = "default_crate_dir")]
    pub crate_dir: PathBuf,

    /// Output directory, relative to `crate_dir` unless absolute
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Compiler target
    #[serde(default)]
    pub target: WasmTarget,

    /// Build profile
    #[serde(default)]
    pub profile: BuildProfile,

    /// Compiler executable
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Extra arguments appended to the compiler invocation
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Static assets directory, relative to `crate_dir` unless absolute.
    /// `null` disables staging.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: Option<PathBuf>,

    /// Serve hint settings
    #[serde(default)]
    pub serve: ServeConfig,
}

fn default_crate_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("pkg")
}

fn default_tool() -> String {
    "wasm-pack".to_string()
}

fn default_assets_dir() -> Option<PathBuf> {
    Some(PathBuf::from("assets"))
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            name: None,
            crate_dir: default_crate_dir(),
            out_dir: default_out_dir(),
            target: WasmTarget::default(),
            profile: BuildProfile::default(),
            tool: default_tool(),
            extra_args: Vec::new(),
            assets_dir: default_assets_dir(),
            serve: ServeConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Load build configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse build configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BuildConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the build configuration
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            anyhow::bail!("Compiler tool must not be empty");
        }

        if self.out_dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }

        if let Some(assets) = self.assets_path() {
            let assets_clean = normalize(&assets);
            let out_clean = normalize(&self.out_path());
            if assets_clean == out_clean {
                anyhow::bail!(
                    "Assets directory '{}' is the same as the output directory",
                    assets.display()
                );
            }
            if assets_clean.starts_with(&out_clean) || out_clean.starts_with(&assets_clean) {
                anyhow::bail!(
                    "Assets directory '{}' overlaps the output directory '{}'",
                    assets.display(),
                    self.out_path().display()
                );
            }
            if assets.file_name().is_none() {
                anyhow::bail!("Assets directory '{}' has no name", assets.display());
            }
        }

        if self.serve.port == 0 {
            anyhow::bail!("Serve port must be non-zero");
        }

        if self.serve.command.trim().is_empty() {
            anyhow::bail!("Serve command must not be empty");
        }

        Ok(())
    }

    /// Package name, falling back to the crate directory name
    pub fn package_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        let dir = if self.crate_dir == Path::new(".") {
            std::env::current_dir().ok()
        } else {
            Some(self.crate_dir.clone())
        };

        dir.as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wasm-package".to_string())
    }

    /// Output directory resolved against the crate directory
    pub fn out_path(&self) -> PathBuf {
        self.crate_dir.join(&self.out_dir)
    }

    /// Assets directory resolved against the crate directory
    pub fn assets_path(&self) -> Option<PathBuf> {
        self.assets_dir.as_ref().map(|dir| self.crate_dir.join(dir))
    }

    /// Where staged assets land inside the output directory
    pub fn staged_assets_path(&self) -> Option<PathBuf> {
        let assets = self.assets_path()?;
        let name = assets.file_name()?;
        Some(self.out_path().join(name))
    }

    /// Arguments for the compiler invocation
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--target".to_string(),
            self.target.to_string(),
            "--out-dir".to_string(),
            self.out_dir.to_string_lossy().into_owned(),
            self.profile.flag().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// URL the suggested server will listen on
    pub fn serve_url(&self) -> String {
        format!("http://localhost:{}", self.serve.port)
    }

    /// Convert to a runnable pipeline
    pub fn to_pipeline(&self) -> Pipeline {
        Pipeline::from_config(self)
    }
}

/// Lexically clean a path: drop `.` and fold `..` into its parent
fn normalize(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(cleaned.components().next_back(), Some(Component::Normal(_))) {
                    cleaned.pop();
                } else {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
