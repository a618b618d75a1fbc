//! `pipctl install`

use pipctl_core::{InstallOutcome, InstallRequest, Pip, PipConfig, RequirementsSource, StringList};

use super::relay;
use crate::cli::InstallArgs;
use crate::error::{CliError, Result};

pub fn run_install(pip: &Pip, args: InstallArgs, config: &PipConfig) -> Result<()> {
    let request = build_request(args).with_defaults(config);

    match pip.install(&request)? {
        InstallOutcome::Completed(result) => relay(&result),
        InstallOutcome::RequirementsNotFound { comment } => Err(CliError::user(comment)),
    }
}

fn build_request(args: InstallArgs) -> InstallRequest {
    InstallRequest {
        pkgs: non_empty(args.pkgs),
        requirements: args.requirements.as_deref().map(RequirementsSource::parse),
        env: args.env,
        bin_env: args.target.bin_env,
        log: args.log,
        proxy: args.proxy,
        timeout: args.timeout,
        editable: non_empty(args.editable),
        find_links: args.find_links,
        index_url: args.index_url,
        extra_index_url: args.extra_index_url,
        no_index: args.no_index,
        mirrors: non_empty(args.mirrors),
        build: args.build,
        target: args.target_dir,
        download: args.download,
        download_cache: args.download_cache,
        source: args.source,
        upgrade: args.upgrade,
        force_reinstall: args.force_reinstall,
        ignore_installed: args.ignore_installed,
        exists_action: args.exists_action,
        no_deps: args.no_deps,
        no_install: args.no_install,
        no_download: args.no_download,
        install_options: args.install_option,
        runas: args.target.runas,
        no_chown: args.no_chown,
        cwd: args.target.cwd,
        activate: args.activate,
    }
}

/// Positional and repeated flags arrive pre-split, each entry verbatim.
pub(crate) fn non_empty(items: Vec<String>) -> Option<StringList> {
    (!items.is_empty()).then_some(StringList::Many(items))
}
