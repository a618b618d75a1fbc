//! Locating the pip executable and the virtualenv activation script

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Binary names searched on `PATH`, in priority order.
pub const PIP_BINARY_NAMES: &[&str] = &["pip2", "pip", "pip-python"];

/// Filesystem layout of a virtual environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `Scripts/<name>.exe`
    Windows,
    /// `bin/<name>`
    Posix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }

    /// Path of the pip executable inside a virtualenv root.
    pub fn pip_path(self, env_root: &Path) -> PathBuf {
        match self {
            Self::Windows => env_root.join("Scripts").join("pip.exe"),
            Self::Posix => env_root.join("bin").join("pip"),
        }
    }

    /// Path of the activation script inside a virtualenv root.
    pub fn activate_path(self, env_root: &Path) -> PathBuf {
        match self {
            Self::Windows => env_root.join("Scripts").join("activate.bat"),
            Self::Posix => env_root.join("bin").join("activate"),
        }
    }
}

/// Resolve the pip executable for `bin_env`.
///
/// - `None` or empty: search `PATH` for [`PIP_BINARY_NAMES`].
/// - A directory: treat it as a virtualenv root. A missing pip inside it is
///   an error; `PATH` is not consulted.
/// - Anything else: used verbatim as the executable path.
pub fn resolve_pip_binary(bin_env: Option<&Path>, platform: Platform) -> Result<PathBuf> {
    resolve_pip_binary_in(bin_env, platform, std::env::var_os("PATH").as_deref())
}

/// Like [`resolve_pip_binary`], searching `search_path` instead of `PATH`.
pub fn resolve_pip_binary_in(
    bin_env: Option<&Path>,
    platform: Platform,
    search_path: Option<&OsStr>,
) -> Result<PathBuf> {
    let bin_env = bin_env.filter(|p| !p.as_os_str().is_empty());

    let Some(bin_env) = bin_env else {
        return find_on_path(search_path);
    };

    if bin_env.is_dir() {
        let pip_bin = platform.pip_path(bin_env);
        if pip_bin.is_file() {
            debug!(path = %pip_bin.display(), "using pip from virtualenv");
            return Ok(pip_bin);
        }
        return Err(Error::BinaryNotFound {
            binary: "pip".to_string(),
            searched: pip_bin.display().to_string(),
        });
    }

    Ok(bin_env.to_path_buf())
}

fn find_on_path(search_path: Option<&OsStr>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for name in PIP_BINARY_NAMES {
        if let Ok(found) = which::which_in(name, search_path, &cwd) {
            debug!(path = %found.display(), "found pip on PATH");
            return Ok(found);
        }
    }
    Err(Error::BinaryNotFound {
        binary: "pip".to_string(),
        searched: format!("PATH for {}", PIP_BINARY_NAMES.join(", ")),
    })
}

/// Resolve the activation script of the virtualenv at `bin_env`.
///
/// Fails when no environment was given, when it is not a directory, or when
/// the script does not exist.
pub fn resolve_activate_script(bin_env: Option<&Path>, platform: Platform) -> Result<PathBuf> {
    let not_found = |searched: String| Error::BinaryNotFound {
        binary: "activate".to_string(),
        searched,
    };

    let Some(bin_env) = bin_env.filter(|p| !p.as_os_str().is_empty()) else {
        return Err(not_found("no virtualenv given".to_string()));
    };
    if !bin_env.is_dir() {
        return Err(not_found(bin_env.display().to_string()));
    }

    let script = platform.activate_path(bin_env);
    if script.is_file() {
        Ok(script)
    } else {
        Err(not_found(script.display().to_string()))
    }
}
