//! Install and uninstall requests, and their validation
//!
//! Validation is a pure step from a request to an [`ArgPlan`]: every option
//! is checked before any requirements file is fetched or copied, so a
//! rejected request leaves nothing behind on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::requirements::RequirementsSource;

/// URL schemes accepted for index and find-links options.
pub const VALID_SCHEMES: &[&str] = &["http", "https", "ftp"];

static EGG_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:#|#.*?&)egg=([^&]*)").unwrap());

/// A list given either pre-split or as one comma-joined string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringList {
    Many(Vec<String>),
    Joined(String),
}

impl StringList {
    /// Split into entries. Joined strings are split on commas and trimmed.
    /// Blank entries are dropped in both forms.
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::Many(items) => items
                .iter()
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .collect(),
            Self::Joined(joined) if joined.contains(',') => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Self::Joined(joined) if joined.trim().is_empty() => Vec::new(),
            Self::Joined(joined) => vec![joined.clone()],
        }
    }

    /// True when no entry would reach the command line.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl From<&str> for StringList {
    fn from(joined: &str) -> Self {
        Self::Joined(joined.to_string())
    }
}

impl From<String> for StringList {
    fn from(joined: String) -> Self {
        Self::Joined(joined)
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self::Many(items)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(items: Vec<&str>) -> Self {
        Self::Many(items.into_iter().map(String::from).collect())
    }
}

/// Package specifiers ready for the command line.
///
/// Version ranges may arrive with `;` standing in for `,` so they survive
/// the comma split; the commas are put back here.
pub fn split_packages(pkgs: &StringList) -> Vec<String> {
    pkgs.items().iter().map(|p| p.replace(';', ",")).collect()
}

/// What pip does when a path it wants to create already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistsAction {
    Switch,
    Ignore,
    Wipe,
    Backup,
}

impl ExistsAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "s",
            Self::Ignore => "i",
            Self::Wipe => "w",
            Self::Backup => "b",
        }
    }
}

impl FromStr for ExistsAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "switch" => Ok(Self::Switch),
            "i" | "ignore" => Ok(Self::Ignore),
            "w" | "wipe" => Ok(Self::Wipe),
            "b" | "backup" => Ok(Self::Backup),
            _ => Err(Error::validation(
                "exists_action",
                s,
                "expected one of (s)witch, (i)gnore, (w)ipe, (b)ackup",
            )),
        }
    }
}

impl fmt::Display for ExistsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to install packages.
///
/// Every option defaults to off/absent. At least one of `pkgs`,
/// `requirements` or `editable` must be given.
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    /// Packages to install.
    pub pkgs: Option<StringList>,
    /// Requirements file, local or `salt://`.
    pub requirements: Option<RequirementsSource>,
    /// Deprecated alias for `bin_env`, used only when `bin_env` is unset.
    pub env: Option<PathBuf>,
    /// pip binary or virtualenv root. Searched on `PATH` when unset.
    pub bin_env: Option<PathBuf>,
    /// File receiving pip's verbose log.
    pub log: Option<PathBuf>,
    /// Proxy in the form `user:passwd@proxy.server:port`.
    pub proxy: Option<String>,
    /// Socket timeout in seconds, as a base-10 integer string.
    pub timeout: Option<String>,
    /// Editable specs, each a local path or a URL with an `egg=` fragment.
    pub editable: Option<StringList>,
    pub find_links: Option<String>,
    pub index_url: Option<String>,
    pub extra_index_url: Option<String>,
    /// Ignore the package index. Conflicts with `index_url`/`extra_index_url`.
    pub no_index: bool,
    /// Mirror URLs; each must use `http://`.
    pub mirrors: Option<StringList>,
    pub build: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub download: Option<PathBuf>,
    pub download_cache: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub upgrade: bool,
    pub force_reinstall: bool,
    pub ignore_installed: bool,
    pub exists_action: Option<ExistsAction>,
    pub no_deps: bool,
    pub no_install: bool,
    pub no_download: bool,
    /// Each entry becomes its own `--install-option=` token.
    pub install_options: Vec<String>,
    /// User to run pip as.
    pub runas: Option<String>,
    /// Skip copying and re-owning the requirements file for `runas`.
    pub no_chown: bool,
    pub cwd: Option<PathBuf>,
    /// Source the virtualenv's activation script before running pip.
    pub activate: bool,
}

impl InstallRequest {
    /// Install the given packages.
    pub fn packages(pkgs: impl Into<StringList>) -> Self {
        Self {
            pkgs: Some(pkgs.into()),
            ..Self::default()
        }
    }

    /// Install from a requirements file.
    pub fn requirements(source: impl Into<RequirementsSource>) -> Self {
        Self {
            requirements: Some(source.into()),
            ..Self::default()
        }
    }

    /// Install editable packages.
    pub fn editable(editable: impl Into<StringList>) -> Self {
        Self {
            editable: Some(editable.into()),
            ..Self::default()
        }
    }

    /// `bin_env`, falling back to the deprecated `env`.
    pub fn effective_bin_env(&self) -> Option<&Path> {
        non_empty_path(self.bin_env.as_deref()).or_else(|| non_empty_path(self.env.as_deref()))
    }

    /// Check every option and produce the argument plan.
    pub fn validate(&self) -> Result<ArgPlan> {
        let pkgs = self.pkgs.as_ref().filter(|p| !p.is_empty());
        let editable = self.editable.as_ref().filter(|e| !e.is_empty());
        if pkgs.is_none() && self.requirements.is_none() && editable.is_none() {
            return Err(Error::validation(
                "pkgs",
                "",
                "at least one of pkgs, requirements or editable is required",
            ));
        }

        let mut plan = ArgPlan::new(["install"]);

        if let Some(pkgs) = pkgs {
            plan.leading.extend(split_packages(pkgs));
        }

        if let Some(editable) = editable {
            for entry in editable.items() {
                validate_editable(&entry)?;
                plan.leading.push(format!("--editable={}", entry));
            }
        }

        plan.requirements = self.requirements.clone();

        if let Some(log) = self.log.as_deref() {
            check_log_path(log)?;
            plan.trailing.push(format!("--log={}", log.display()));
        }

        if let Some(proxy) = non_empty(&self.proxy) {
            plan.trailing.push(format!("--proxy={}", proxy));
        }

        if let Some(timeout) = non_empty(&self.timeout) {
            plan.trailing.push(format!("--timeout={}", validate_timeout(timeout)?));
        }

        if let Some(find_links) = non_empty(&self.find_links) {
            validate_url("find_links", find_links)?;
            plan.trailing.push(format!("--find-links={}", find_links));
        }

        let index_url = non_empty(&self.index_url);
        let extra_index_url = non_empty(&self.extra_index_url);
        if self.no_index && (index_url.is_some() || extra_index_url.is_some()) {
            return Err(Error::validation(
                "no_index",
                index_url.or(extra_index_url).unwrap_or_default(),
                "'no_index' and ('index_url' or 'extra_index_url') are mutually exclusive",
            ));
        }

        if let Some(index_url) = index_url {
            validate_url("index_url", index_url)?;
            plan.trailing.push(format!("--index-url={}", index_url));
        }

        if let Some(extra_index_url) = extra_index_url {
            validate_url("extra_index_url", extra_index_url)?;
            plan.trailing
                .push(format!("--extra-index-url={}", extra_index_url));
        }

        if self.no_index {
            plan.trailing.push("--no-index".to_string());
        }

        if let Some(mirrors) = self.mirrors.as_ref().filter(|m| !m.is_empty()) {
            plan.trailing.push("--use-mirrors".to_string());
            for mirror in mirrors.items() {
                if !mirror.starts_with("http://") {
                    return Err(Error::validation(
                        "mirrors",
                        mirror,
                        "mirror URLs must use http://",
                    ));
                }
                plan.trailing.push(format!("--mirrors={}", mirror));
            }
        }

        let directories = [
            ("--build", &self.build),
            ("--target", &self.target),
            ("--download", &self.download),
            ("--download-cache", &self.download_cache),
            ("--source", &self.source),
        ];
        for (flag, dir) in directories {
            if let Some(dir) = non_empty_path(dir.as_deref()) {
                plan.trailing.push(format!("{}={}", flag, dir.display()));
            }
        }

        let switches = [
            ("--upgrade", self.upgrade),
            ("--force-reinstall", self.force_reinstall),
            ("--ignore-installed", self.ignore_installed),
        ];
        plan.push_switches(switches);

        if let Some(action) = self.exists_action {
            plan.trailing.push(format!("--exists-action={}", action));
        }

        let switches = [
            ("--no-deps", self.no_deps),
            ("--no-install", self.no_install),
            ("--no-download", self.no_download),
        ];
        plan.push_switches(switches);

        for option in &self.install_options {
            plan.trailing.push(format!("--install-option={}", option));
        }

        Ok(plan)
    }
}

/// A request to uninstall packages.
#[derive(Debug, Clone, Default)]
pub struct UninstallRequest {
    pub pkgs: Option<StringList>,
    pub requirements: Option<RequirementsSource>,
    pub bin_env: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub proxy: Option<String>,
    pub timeout: Option<String>,
    pub runas: Option<String>,
    /// Skip re-owning the requirements copy for `runas`.
    pub no_chown: bool,
    pub cwd: Option<PathBuf>,
}

impl UninstallRequest {
    pub fn packages(pkgs: impl Into<StringList>) -> Self {
        Self {
            pkgs: Some(pkgs.into()),
            ..Self::default()
        }
    }

    pub fn requirements(source: impl Into<RequirementsSource>) -> Self {
        Self {
            requirements: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ArgPlan> {
        let pkgs = self.pkgs.as_ref().filter(|p| !p.is_empty());
        if pkgs.is_none() && self.requirements.is_none() {
            return Err(Error::validation(
                "pkgs",
                "",
                "at least one of pkgs or requirements is required",
            ));
        }

        let mut plan = ArgPlan::new(["uninstall", "-y"]);
        if let Some(pkgs) = pkgs {
            plan.leading.extend(split_packages(pkgs));
        }
        plan.requirements = self.requirements.clone();

        if let Some(log) = self.log.as_deref() {
            check_log_path(log)?;
            plan.trailing.push(format!("--log={}", log.display()));
        }
        if let Some(proxy) = non_empty(&self.proxy) {
            plan.trailing.push(format!("--proxy={}", proxy));
        }
        if let Some(timeout) = non_empty(&self.timeout) {
            plan.trailing.push(format!("--timeout={}", validate_timeout(timeout)?));
        }

        Ok(plan)
    }
}

/// Validated arguments, split around the requirements file.
///
/// The requirements token is only known once the file has been acquired
/// (and possibly copied), so it is spliced in by [`ArgPlan::into_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPlan {
    leading: Vec<String>,
    requirements: Option<RequirementsSource>,
    trailing: Vec<String>,
}

impl ArgPlan {
    fn new<const N: usize>(subcommand: [&str; N]) -> Self {
        Self {
            leading: subcommand.iter().map(|s| s.to_string()).collect(),
            requirements: None,
            trailing: Vec::new(),
        }
    }

    fn push_switches<const N: usize>(&mut self, switches: [(&str, bool); N]) {
        for (flag, enabled) in switches {
            if enabled {
                self.trailing.push(flag.to_string());
            }
        }
    }

    /// The requirements file this plan still needs resolved.
    pub fn requirements(&self) -> Option<&RequirementsSource> {
        self.requirements.as_ref()
    }

    /// Final argument list, with `requirement` as the requirements file.
    pub fn into_args(self, requirement: Option<&Path>) -> Vec<String> {
        let mut args = self.leading;
        if let Some(path) = requirement {
            args.push(format!("--requirement={}", path.display()));
        }
        args.extend(self.trailing);
        args
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_empty_path(value: Option<&Path>) -> Option<&Path> {
    value.filter(|p| !p.as_os_str().is_empty())
}

fn validate_editable(entry: &str) -> Result<()> {
    if entry.starts_with("file://") || entry.starts_with('/') {
        return Ok(());
    }
    let has_egg = EGG_FRAGMENT
        .captures(entry)
        .and_then(|c| c.get(1))
        .is_some_and(|m| !m.as_str().is_empty());
    if has_egg {
        Ok(())
    } else {
        Err(Error::validation(
            "editable",
            entry,
            "editable entry missing an egg name (#egg=<name>)",
        ))
    }
}

fn validate_timeout(timeout: &str) -> Result<&str> {
    let trimmed = timeout.trim();
    trimmed
        .parse::<i64>()
        .map(|_| trimmed)
        .map_err(|_| Error::validation("timeout", timeout, "not a valid integer base 10"))
}

fn validate_url(field: &'static str, value: &str) -> Result<()> {
    match url::Url::parse(value) {
        Ok(parsed) if VALID_SCHEMES.contains(&parsed.scheme()) => Ok(()),
        _ => Err(Error::validation(
            field,
            value,
            format!("must be a valid URL ({})", VALID_SCHEMES.join(", ")),
        )),
    }
}

/// Confirm pip will be able to write its log at `path`.
fn check_log_path(path: &Path) -> Result<()> {
    let access = |message: &str| Error::IoAccess {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    if path.as_os_str().is_empty() {
        return Err(access("empty log path"));
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(access("is a directory")),
        Ok(_) => fs::OpenOptions::new()
            .append(true)
            .open(path)
            .map(|_| ())
            .map_err(|e| access(&e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            if parent.is_dir() {
                Ok(())
            } else {
                Err(access("parent directory does not exist"))
            }
        }
        Err(e) => Err(access(&e.to_string())),
    }
}
