//! Configuration defaults for pip invocations
//!
//! Loaded from TOML:
//!
//! ```toml
//! bin_env = "/srv/venv"
//! runas = "deploy"
//! timeout = "30"
//!
//! [cache]
//! file_root = "/srv/salt"
//! cache_dir = "/var/cache/pipctl"
//! ```
//!
//! Values on a request always win over values from configuration.

use std::path::{Path, PathBuf};

use pipctl_fs::LocalFileCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::request::{InstallRequest, UninstallRequest};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PIPCTL_CONFIG";

/// Default directory served as `salt://`.
pub const DEFAULT_FILE_ROOT: &str = "/srv/salt";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipConfig {
    pub bin_env: Option<PathBuf>,
    pub runas: Option<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<String>,
    pub index_url: Option<String>,
    pub proxy: Option<String>,
    pub cache: CacheConfig,
}

/// Roots for the `salt://` requirements cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Directory `salt://` URIs resolve against.
    pub file_root: Option<PathBuf>,
    /// Where cached copies are kept.
    pub cache_dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn file_root(&self) -> PathBuf {
        self.file_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_ROOT))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("pipctl")
        })
    }

    pub fn build(&self) -> LocalFileCache {
        LocalFileCache::new(self.file_root(), self.cache_dir())
    }
}

impl PipConfig {
    /// Load configuration from an explicit TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `$PIPCTL_CONFIG` or the user config directory.
    ///
    /// A file named by the environment variable must exist; the default
    /// location is optional and falls back to defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/pipctl/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pipctl").join("config.toml"))
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, default: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(default);
    }
}

impl InstallRequest {
    /// Fill unset options from `config`.
    pub fn with_defaults(mut self, config: &PipConfig) -> Self {
        if self.env.is_none() {
            fill(&mut self.bin_env, &config.bin_env);
        }
        fill(&mut self.runas, &config.runas);
        fill(&mut self.cwd, &config.cwd);
        fill(&mut self.timeout, &config.timeout);
        fill(&mut self.proxy, &config.proxy);
        if !self.no_index {
            fill(&mut self.index_url, &config.index_url);
        }
        self
    }
}

impl UninstallRequest {
    /// Fill unset options from `config`.
    pub fn with_defaults(mut self, config: &PipConfig) -> Self {
        fill(&mut self.bin_env, &config.bin_env);
        fill(&mut self.runas, &config.runas);
        fill(&mut self.cwd, &config.cwd);
        fill(&mut self.timeout, &config.timeout);
        fill(&mut self.proxy, &config.proxy);
        self
    }
}
