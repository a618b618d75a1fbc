//! Recording fakes for the pip collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pipctl_core::{CommandResult, CommandRunner, Invocation, Pip, Platform};
use pipctl_fs::checksum::compute_checksum;
use pipctl_fs::{FileCache, Ownership};
use tempfile::TempDir;

/// Explicit pip path; used verbatim, never checked for existence.
pub const PIP: &str = "/opt/pipctl-test/bin/pip";

/// What the runner saw for one invocation.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub tokens: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub runas: Option<String>,
    /// `--requirement=` path and whether it existed while pip ran.
    pub requirement: Option<(PathBuf, bool)>,
}

/// Runner that records invocations and replies with a canned result.
#[derive(Clone)]
pub struct RecordingRunner {
    pub calls: Arc<Mutex<Vec<Recorded>>>,
    reply: Arc<Mutex<Option<CommandResult>>>,
}

impl RecordingRunner {
    pub fn new(reply: CommandResult) -> Self {
        Self {
            calls: Arc::default(),
            reply: Arc::new(Mutex::new(Some(reply))),
        }
    }

    /// A runner whose invocations fail to spawn.
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            reply: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation<'_>) -> pipctl_core::Result<CommandResult> {
        let tokens = invocation.command.tokens();
        let requirement = tokens
            .iter()
            .find_map(|t| t.strip_prefix("--requirement="))
            .map(|p| (PathBuf::from(p), Path::new(p).exists()));

        self.calls.lock().unwrap().push(Recorded {
            tokens,
            cwd: invocation.cwd.map(Path::to_path_buf),
            runas: invocation.runas.map(String::from),
            requirement,
        });

        match self.reply.lock().unwrap().clone() {
            Some(reply) => Ok(reply),
            None => Err(pipctl_core::Error::Spawn {
                program: invocation.command.program().display().to_string(),
                source: std::io::Error::other("spawn refused"),
            }),
        }
    }
}

/// In-memory upstream with an on-disk cache directory.
#[derive(Clone)]
pub struct FakeCache {
    upstream: Arc<Mutex<HashMap<String, String>>>,
    dir: Arc<TempDir>,
    pub fetches: Arc<Mutex<usize>>,
}

impl FakeCache {
    pub fn new() -> Self {
        Self {
            upstream: Arc::default(),
            dir: Arc::new(TempDir::new().unwrap()),
            fetches: Arc::default(),
        }
    }

    pub fn publish(&self, uri: &str, content: &str) {
        self.upstream
            .lock()
            .unwrap()
            .insert(uri.to_string(), content.to_string());
    }

    /// Place a (possibly stale) copy directly into the cache.
    pub fn seed(&self, uri: &str, content: &str) -> PathBuf {
        let path = self.path_for(uri);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    fn path_for(&self, uri: &str) -> PathBuf {
        self.dir.path().join(uri.replace("://", "_").replace('/', "_"))
    }
}

impl FileCache for FakeCache {
    fn is_cached(&self, uri: &str) -> pipctl_fs::Result<Option<PathBuf>> {
        let path = self.path_for(uri);
        Ok(path.exists().then_some(path))
    }

    fn cache_file(&self, uri: &str) -> pipctl_fs::Result<Option<PathBuf>> {
        let content = self.upstream.lock().unwrap().get(uri).cloned();
        let Some(content) = content else {
            return Ok(None);
        };
        *self.fetches.lock().unwrap() += 1;
        Ok(Some(self.seed(uri, &content)))
    }

    fn hash_remote(&self, uri: &str) -> pipctl_fs::Result<Option<String>> {
        Ok(self
            .upstream
            .lock()
            .unwrap()
            .get(uri)
            .map(|c| compute_checksum(c.as_bytes())))
    }
}

/// Ownership fake that records calls.
#[derive(Clone, Default)]
pub struct RecordingOwnership {
    pub calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl Ownership for RecordingOwnership {
    fn chown(&self, path: &Path, user: &str) -> pipctl_fs::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), user.to_string()));
        Ok(())
    }
}

pub fn ok(stdout: &str) -> CommandResult {
    CommandResult {
        code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub struct Harness {
    pub pip: Pip,
    pub runner: RecordingRunner,
    pub cache: FakeCache,
    pub ownership: RecordingOwnership,
}

pub fn harness(runner: RecordingRunner) -> Harness {
    let cache = FakeCache::new();
    let ownership = RecordingOwnership::default();
    let pip = Pip::new(
        Box::new(runner.clone()),
        Box::new(cache.clone()),
        Box::new(ownership.clone()),
    )
    .with_platform(Platform::Posix);
    Harness {
        pip,
        runner,
        cache,
        ownership,
    }
}
