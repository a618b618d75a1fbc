//! The pip facade: install, uninstall, freeze and list

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pipctl_fs::{FileCache, Ownership, ScopedCopy, SystemOwnership};
use tracing::debug;

use crate::binary::{Platform, resolve_pip_binary};
use crate::command::{Activation, PipCommand};
use crate::error::{Error, Result};
use crate::exec::{CommandResult, CommandRunner, Invocation, SystemRunner};
use crate::freeze::parse_freeze;
use crate::request::{ArgPlan, InstallRequest, UninstallRequest};
use crate::requirements::RequirementsAcquirer;

/// Result of an install.
///
/// A remote requirements file that cannot be obtained is reported as a
/// value so callers can branch on it; pip itself is never run in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// pip ran. A non-zero exit code is data, not an error.
    Completed(CommandResult),
    RequirementsNotFound { comment: String },
}

impl InstallOutcome {
    pub fn result(&self) -> Option<&CommandResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::RequirementsNotFound { .. } => None,
        }
    }
}

/// Where and as whom freeze/list run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub bin_env: Option<PathBuf>,
    pub runas: Option<String>,
    pub cwd: Option<PathBuf>,
}

/// Drives pip through injected collaborators.
pub struct Pip {
    runner: Box<dyn CommandRunner>,
    cache: Box<dyn FileCache>,
    ownership: Box<dyn Ownership>,
    platform: Platform,
}

impl Pip {
    pub fn new(
        runner: Box<dyn CommandRunner>,
        cache: Box<dyn FileCache>,
        ownership: Box<dyn Ownership>,
    ) -> Self {
        Self {
            runner,
            cache,
            ownership,
            platform: Platform::current(),
        }
    }

    /// Real processes and `chown`, with the given requirements cache.
    pub fn system(cache: Box<dyn FileCache>) -> Self {
        Self::new(Box::new(SystemRunner), cache, Box::new(SystemOwnership))
    }

    /// Override the virtualenv layout (defaults to the host platform).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Install packages.
    ///
    /// Every option is validated before the requirements file is fetched or
    /// copied. Any temporary copy made for `runas` is removed before this
    /// returns, whether pip succeeded, failed, or never ran.
    pub fn install(&self, request: &InstallRequest) -> Result<InstallOutcome> {
        let bin_env = request.effective_bin_env();
        let program = resolve_pip_binary(bin_env, self.platform)?;

        let activation = match bin_env {
            Some(_) if request.activate => Activation::for_env(bin_env, self.platform)?,
            _ => None,
        };

        let plan = request.validate()?;

        let requirements = match self.prepare_requirements(
            &plan,
            request.runas.as_deref(),
            request.no_chown,
        )? {
            Prepared::Ready(requirements) => requirements,
            Prepared::NotFound(spec) => {
                return Ok(InstallOutcome::RequirementsNotFound {
                    comment: format!("pip requirements file '{}' not found", spec),
                });
            }
        };

        let command =
            PipCommand::new(program, plan.into_args(requirements.path())).with_activation(activation);
        let result = self.run(&command, request.cwd.as_deref(), request.runas.as_deref())?;
        Ok(InstallOutcome::Completed(result))
    }

    /// Uninstall packages. pip is run with `-y` so it never prompts.
    pub fn uninstall(&self, request: &UninstallRequest) -> Result<CommandResult> {
        let program = resolve_pip_binary(request.bin_env.as_deref(), self.platform)?;
        let plan = request.validate()?;

        let requirements = match self.prepare_requirements(
            &plan,
            request.runas.as_deref(),
            request.no_chown,
        )? {
            Prepared::Ready(requirements) => requirements,
            Prepared::NotFound(source_spec) => {
                return Err(Error::RequirementsNotFound { source_spec });
            }
        };

        let command = PipCommand::new(program, plan.into_args(requirements.path()));
        self.run(&command, request.cwd.as_deref(), request.runas.as_deref())
    }

    /// Raw `pip freeze` lines.
    pub fn freeze(&self, context: &RunContext) -> Result<Vec<String>> {
        let stdout = self.freeze_stdout(context)?;
        Ok(stdout.lines().map(String::from).collect())
    }

    /// Installed packages as name to version, limited to names starting
    /// with `prefix` (case-insensitive) when given.
    pub fn list(&self, prefix: Option<&str>, context: &RunContext) -> Result<BTreeMap<String, String>> {
        let stdout = self.freeze_stdout(context)?;
        Ok(parse_freeze(&stdout, prefix))
    }

    fn freeze_stdout(&self, context: &RunContext) -> Result<String> {
        let program = resolve_pip_binary(context.bin_env.as_deref(), self.platform)?;
        let command = PipCommand::new(program, vec!["freeze".to_string()]);
        let result = self.run(&command, context.cwd.as_deref(), context.runas.as_deref())?;

        if !result.success() {
            return Err(Error::Execution {
                command: command.to_string(),
                code: result.code,
                stderr: result.stderr,
            });
        }
        Ok(result.stdout)
    }

    fn run(&self, command: &PipCommand, cwd: Option<&Path>, runas: Option<&str>) -> Result<CommandResult> {
        debug!(%command, "invoking pip");
        self.runner.run(&Invocation {
            command,
            cwd,
            runas,
        })
    }

    /// Acquire the plan's requirements file and, for `runas`, copy it to a
    /// temporary file owned by that user.
    fn prepare_requirements(
        &self,
        plan: &ArgPlan,
        runas: Option<&str>,
        no_chown: bool,
    ) -> Result<Prepared> {
        let Some(source) = plan.requirements() else {
            return Ok(Prepared::Ready(Requirements::None));
        };

        let Some(local) = RequirementsAcquirer::new(self.cache.as_ref()).acquire(source)? else {
            return Ok(Prepared::NotFound(source.to_string()));
        };

        match runas {
            Some(user) if !no_chown => {
                let copy = ScopedCopy::create(&local, user, self.ownership.as_ref())?;
                Ok(Prepared::Ready(Requirements::Copied(copy)))
            }
            _ => Ok(Prepared::Ready(Requirements::Direct(local))),
        }
    }
}

enum Prepared {
    Ready(Requirements),
    NotFound(String),
}

/// The requirements file handed to pip. A copy lives until this is dropped.
enum Requirements {
    None,
    Direct(PathBuf),
    Copied(ScopedCopy),
}

impl Requirements {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::None => None,
            Self::Direct(path) => Some(path),
            Self::Copied(copy) => Some(copy.path()),
        }
    }
}
