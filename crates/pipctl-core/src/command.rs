//! Assembled pip commands
//!
//! A [`PipCommand`] is an ordered token list. Only the virtualenv activation
//! prefix needs shell chaining (`. activate && pip ...`); that prefix lives
//! in [`Activation`] so that everything else can be spawned without a shell.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::binary::{Platform, resolve_activate_script};
use crate::error::Result;

/// Sourcing of a virtualenv activation script ahead of pip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    script: PathBuf,
}

impl Activation {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Activation for the virtualenv at `bin_env`.
    ///
    /// Windows has no shell form to source the script into, so activation is
    /// skipped there and `None` is returned.
    pub fn for_env(bin_env: Option<&Path>, platform: Platform) -> Result<Option<Self>> {
        if platform.is_windows() {
            return Ok(None);
        }
        resolve_activate_script(bin_env, platform).map(|script| Some(Self::new(script)))
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// `[".", <script>, "&&"]`
    pub fn prefix_tokens(&self) -> Vec<String> {
        vec![
            ".".to_string(),
            self.script.display().to_string(),
            "&&".to_string(),
        ]
    }

    /// Wrap an already quoted command line.
    pub fn wrap(&self, command_line: &str) -> String {
        format!(". {} && {}", shell_quote(&self.script.display().to_string()), command_line)
    }
}

/// A pip invocation: program, arguments and optional activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipCommand {
    activation: Option<Activation>,
    program: PathBuf,
    args: Vec<String>,
}

impl PipCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            activation: None,
            program: program.into(),
            args,
        }
    }

    pub fn with_activation(mut self, activation: Option<Activation>) -> Self {
        self.activation = activation;
        self
    }

    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Every token in order, activation prefix included.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = self
            .activation
            .as_ref()
            .map(Activation::prefix_tokens)
            .unwrap_or_default();
        tokens.push(self.program.display().to_string());
        tokens.extend(self.args.iter().cloned());
        tokens
    }

    /// The command as one POSIX shell line, each token quoted.
    pub fn shell_line(&self) -> String {
        let line = std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .map(|t| shell_quote(&t))
            .collect::<Vec<_>>()
            .join(" ");
        match &self.activation {
            Some(activation) => activation.wrap(&line),
            None => line,
        }
    }
}

/// Space-joined tokens with proxy credentials masked, for logs and errors.
impl fmt::Display for PipCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: Vec<String> = self
            .tokens()
            .into_iter()
            .map(|t| {
                if t.starts_with("--proxy=") {
                    "--proxy=***".to_string()
                } else {
                    t
                }
            })
            .collect();
        f.write_str(&redacted.join(" "))
    }
}

/// Quote a token for a POSIX shell.
pub fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}
