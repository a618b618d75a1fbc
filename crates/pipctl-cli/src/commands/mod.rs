//! Command implementations for pipctl-cli

pub mod freeze;
pub mod install;
pub mod uninstall;

pub use freeze::{run_freeze, run_list};
pub use install::run_install;
pub use uninstall::run_uninstall;

use std::io::Write;

use pipctl_core::{CommandResult, PipConfig, RunContext};

use crate::cli::Target;
use crate::error::{CliError, Result};

/// Resolved run target, flags first then config.
pub(crate) fn run_context(target: Target, config: &PipConfig) -> RunContext {
    RunContext {
        bin_env: target.bin_env.or_else(|| config.bin_env.clone()),
        runas: target.runas.or_else(|| config.runas.clone()),
        cwd: target.cwd.or_else(|| config.cwd.clone()),
    }
}

/// Relay pip's output and turn a failing exit code into an error.
pub(crate) fn relay(result: &CommandResult) -> Result<()> {
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);
    std::io::stdout().flush()?;
    if result.success() {
        Ok(())
    } else {
        Err(CliError::PipFailed { code: result.code })
    }
}
