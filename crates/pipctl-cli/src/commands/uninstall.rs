//! `pipctl uninstall`

use pipctl_core::{Pip, PipConfig, RequirementsSource, UninstallRequest};

use super::install::non_empty;
use super::relay;
use crate::cli::UninstallArgs;
use crate::error::Result;

pub fn run_uninstall(pip: &Pip, args: UninstallArgs, config: &PipConfig) -> Result<()> {
    let request = UninstallRequest {
        pkgs: non_empty(args.pkgs),
        requirements: args.requirements.as_deref().map(RequirementsSource::parse),
        bin_env: args.target.bin_env,
        log: args.log,
        proxy: args.proxy,
        timeout: args.timeout,
        runas: args.target.runas,
        no_chown: args.no_chown,
        cwd: args.target.cwd,
    }
    .with_defaults(config);

    let result = pip.uninstall(&request)?;
    relay(&result)
}
