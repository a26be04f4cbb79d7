//! ---
//! engage_section: "06-operator-tooling"
//! engage_subsection: "binary"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "engagectl configuration file discovery and parsing."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engage_logging::LoggingConfig;
use engage_model::schema::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ENV_CONFIG_PATH: &str = "ENGAGECTL_CONFIG";

const CANDIDATES: [&str; 2] = ["engagectl.toml", "/etc/engage/engagectl.toml"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtlConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub schema: SchemaSettings,
}

/// Defaults for the documentation and check commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSettings {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            indent: DEFAULT_INDENT,
        }
    }
}

impl CtlConfig {
    /// Load from `explicit`, else `ENGAGECTL_CONFIG`, else the first existing
    /// default location. No file at all yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                return Self::from_path(Path::new(&env_path));
            }
        }
        Self::load_from(&CANDIDATES)
    }

    pub fn load_from<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        match candidates.iter().map(AsRef::as_ref).find(|path| path.exists()) {
            Some(path) => Self::from_path(path),
            None => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
