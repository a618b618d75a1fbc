//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pipctl_core::ExistsAction;

/// pipctl - Drive pip to install, remove and inspect Python packages
#[derive(Parser, Debug)]
#[command(name = "pipctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $PIPCTL_CONFIG or the user config directory)
    #[arg(long, global = true, env = "PIPCTL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where pip runs and as whom.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    /// Path to pip, or to a virtualenv root
    #[arg(long)]
    pub bin_env: Option<PathBuf>,

    /// Run pip as this user
    #[arg(long)]
    pub runas: Option<String>,

    /// Working directory for pip
    #[arg(long)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install packages
    ///
    /// Examples:
    ///   pipctl install django markdown --upgrade
    ///   pipctl install -r salt://base/requirements.txt --runas deploy
    ///   pipctl install -e 'git+https://github.com/x/y.git#egg=y'
    Install(InstallArgs),

    /// Uninstall packages without prompting
    Uninstall(UninstallArgs),

    /// Print `pip freeze` output
    Freeze {
        #[command(flatten)]
        target: Target,
    },

    /// List installed packages and versions
    List {
        /// Only packages whose name starts with this (case-insensitive)
        prefix: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallArgs {
    /// Packages to install; `;` inside a specifier stands for `,`
    pub pkgs: Vec<String>,

    /// Requirements file, local path or salt:// URI
    #[arg(short, long)]
    pub requirements: Option<String>,

    /// Editable VCS URL or local path (repeatable)
    #[arg(short, long)]
    pub editable: Vec<String>,

    #[command(flatten)]
    pub target: Target,

    /// Deprecated alias for --bin-env
    #[arg(long, hide = true)]
    pub env: Option<PathBuf>,

    /// Source the virtualenv's activate script first
    #[arg(long)]
    pub activate: bool,

    /// Leave a requirements file alone when running as another user
    #[arg(long)]
    pub no_chown: bool,

    /// Log file for pip
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Proxy, `[user:passwd@]proxy.server:port`
    #[arg(long)]
    pub proxy: Option<String>,

    /// Socket timeout in seconds
    #[arg(long)]
    pub timeout: Option<String>,

    #[arg(long)]
    pub find_links: Option<String>,

    #[arg(long)]
    pub index_url: Option<String>,

    #[arg(long)]
    pub extra_index_url: Option<String>,

    /// Ignore the package index
    #[arg(long)]
    pub no_index: bool,

    /// Mirror URL, http:// only (repeatable)
    #[arg(long)]
    pub mirrors: Vec<String>,

    #[arg(long)]
    pub build: Option<PathBuf>,

    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    #[arg(long)]
    pub download: Option<PathBuf>,

    #[arg(long)]
    pub download_cache: Option<PathBuf>,

    #[arg(long)]
    pub source: Option<PathBuf>,

    #[arg(short = 'U', long)]
    pub upgrade: bool,

    #[arg(long)]
    pub force_reinstall: bool,

    #[arg(short = 'I', long)]
    pub ignore_installed: bool,

    /// s(witch), i(gnore), w(ipe) or b(ackup)
    #[arg(long)]
    pub exists_action: Option<ExistsAction>,

    #[arg(long)]
    pub no_deps: bool,

    #[arg(long)]
    pub no_install: bool,

    #[arg(long)]
    pub no_download: bool,

    /// Passed to setup.py install (repeatable)
    #[arg(long)]
    pub install_option: Vec<String>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallArgs {
    pub pkgs: Vec<String>,

    /// Requirements file, local path or salt:// URI
    #[arg(short, long)]
    pub requirements: Option<String>,

    #[command(flatten)]
    pub target: Target,

    #[arg(long)]
    pub no_chown: bool,

    #[arg(long)]
    pub log: Option<PathBuf>,

    #[arg(long)]
    pub proxy: Option<String>,

    #[arg(long)]
    pub timeout: Option<String>,
}
