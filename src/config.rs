//! Configuration parsing (`cpg.toml`).
//!
//! Every setting is optional. The file is looked up in the current directory
//! first, then in `~/.cpg/config.toml`; without either the built-in defaults
//! reproduce the classic generator output.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "cpg.toml";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CpgConfig {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub edit: EditConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BuildConfig {
    /// `CC` of generated Makefiles
    pub compiler: String,
    pub cflags: Vec<String>,
    /// `TARGET` of generated Makefiles, also the binary `buildrun` executes
    pub target: String,
    /// Build tool invoked inside the project directory
    pub tool: String,
    pub args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: "gcc".to_string(),
            cflags: vec!["-Wall".to_string(), "-Wextra".to_string()],
            target: "main".to_string(),
            tool: "make".to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct EditConfig {
    pub match_mode: MatchMode,
    pub on_duplicate: DuplicatePolicy,
}

/// How a function or library name is matched against existing lines.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Any line containing the name, anywhere, matches (`run` matches `run2`).
    #[default]
    Substring,
    /// The name must appear as a whole C identifier.
    Word,
}

/// What to do when an artifact being added already exists.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Overwrite generated files and append duplicate Makefile/main.c lines.
    #[default]
    Overwrite,
    /// Refuse the operation before touching anything.
    Reject,
}

impl CpgConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {} - check for syntax errors", path.display()))
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cpg").join("config.toml"))
}

/// Loads `./cpg.toml`, falling back to the global config and then defaults.
pub fn load_config() -> Result<CpgConfig> {
    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        return CpgConfig::load_from(local);
    }
    if let Some(global) = global_config_path()
        && global.exists()
    {
        return CpgConfig::load_from(&global);
    }
    Ok(CpgConfig::default())
}
