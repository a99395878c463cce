use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kwatch_core::WatchConfig;
use serde::Deserialize;

use crate::printers::OutputFormat;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/kwatch/kwatch.toml";

/// Optional defaults read from a TOML file. Every field may be overridden on
/// the command line.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub poll_period: Option<String>,
    pub poll_until: Option<String>,
    pub output: Option<String>,
    pub timeout: Option<String>,
    pub use_cache: Option<bool>,
}

/// Values given explicitly on the command line.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub poll_period: Option<String>,
    pub poll_until: Option<String>,
    pub output: Option<String>,
    pub timeout: Option<String>,
}

/// Fully validated settings for one `status` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub watch: WatchConfig,
    pub output: OutputFormat,
}

impl FileConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: FileConfig = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Loads the user's config file if it exists.
    pub fn load_default() -> Result<Self> {
        let path = default_config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Merges command-line overrides over the file and validates the result.
    pub fn resolve(self, flags: Overrides) -> Result<Settings> {
        let poll_period = flags.poll_period.or(self.poll_period).unwrap_or_else(|| "2s".into());
        let poll_until = flags.poll_until.or(self.poll_until).unwrap_or_else(|| "known".into());
        let timeout = flags.timeout.or(self.timeout).unwrap_or_else(|| "0".into());
        let output = flags.output.or(self.output).unwrap_or_else(|| "events".into());

        let mut watch = WatchConfig::from_flags(&poll_period, &poll_until, &timeout)?;
        if let Some(use_cache) = self.use_cache {
            watch.use_cache = use_cache;
        }
        Ok(Settings {
            watch,
            output: output.parse()?,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned())
}
