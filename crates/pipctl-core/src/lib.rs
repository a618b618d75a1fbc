//! pip invocation layer.
//!
//! Drives an external pip binary to install, uninstall, freeze and list
//! Python packages, against the system interpreter or a virtual environment.
//!
//! # Flow
//!
//! 1. [`binary`] locates the pip executable (and the activation script).
//! 2. [`request`] validates an [`InstallRequest`]/[`UninstallRequest`] into
//!    an argument plan before anything touches the filesystem.
//! 3. [`requirements`] resolves local or `salt://` requirements files.
//! 4. [`command`] assembles the ordered token list.
//! 5. [`exec`] runs it through a [`CommandRunner`].
//! 6. [`freeze`] parses freeze output into name/version records.
//!
//! [`Pip`] ties the steps together.

pub mod binary;
pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod freeze;
pub mod pip;
pub mod request;
pub mod requirements;

pub use binary::{Platform, resolve_activate_script, resolve_pip_binary};
pub use command::{Activation, PipCommand};
pub use config::PipConfig;
pub use error::{Error, Result};
pub use exec::{CommandResult, CommandRunner, Invocation, SystemRunner};
pub use freeze::{PackageRecord, parse_freeze};
pub use pip::{InstallOutcome, Pip, RunContext};
pub use request::{ExistsAction, InstallRequest, StringList, UninstallRequest};
pub use requirements::{RequirementsAcquirer, RequirementsSource};
