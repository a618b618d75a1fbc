//! End-to-end install and uninstall through recording collaborators.

mod common;

use std::fs;

use common::{PIP, RecordingRunner, harness, ok};
use pipctl_core::{
    CommandResult, Error, InstallOutcome, InstallRequest, RequirementsSource, UninstallRequest,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_install_packages_token_order() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        upgrade: true,
        ..InstallRequest::packages("django,markdown")
    };

    let outcome = h.pip.install(&request).unwrap();

    assert_eq!(outcome, InstallOutcome::Completed(ok("")));
    let calls = h.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].tokens,
        strings(&[PIP, "install", "django", "markdown", "--upgrade"])
    );
    assert_eq!(calls[0].runas, None);
}

#[test]
fn test_install_editable_token() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        ..InstallRequest::editable("git+https://github.com/x/y.git#egg=y")
    };

    h.pip.install(&request).unwrap();

    assert_eq!(
        h.runner.calls()[0].tokens,
        strings(&[PIP, "install", "--editable=git+https://github.com/x/y.git#egg=y"])
    );
}

#[test]
fn test_install_env_alias_used_when_bin_env_missing() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        env: Some(PIP.into()),
        ..InstallRequest::packages("requests")
    };

    h.pip.install(&request).unwrap();

    assert_eq!(h.runner.calls()[0].tokens[0], PIP);
}

#[test]
fn test_install_nonzero_exit_is_returned_not_raised() {
    let failed = CommandResult {
        code: 1,
        stdout: String::new(),
        stderr: "No matching distribution".to_string(),
    };
    let h = harness(RecordingRunner::new(failed.clone()));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        ..InstallRequest::packages("nope")
    };

    let outcome = h.pip.install(&request).unwrap();

    assert_eq!(outcome.result(), Some(&failed));
}

#[test]
fn test_install_validation_failure_runs_nothing() {
    let h = harness(RecordingRunner::new(ok("")));
    h.cache.publish("salt://reqs.txt", "django\n");
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        timeout: Some("abc".to_string()),
        runas: Some("deploy".to_string()),
        ..InstallRequest::requirements("salt://reqs.txt")
    };

    let err = h.pip.install(&request).unwrap_err();

    assert!(matches!(err, Error::Validation { field: "timeout", .. }));
    assert!(h.runner.calls().is_empty());
    assert_eq!(h.cache.fetches(), 0);
    assert!(h.ownership.calls.lock().unwrap().is_empty());
}

#[test]
fn test_install_editable_without_egg_runs_nothing() {
    let h = harness(RecordingRunner::new(ok("")));
    h.cache.publish("salt://reqs.txt", "django\n");
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        runas: Some("deploy".to_string()),
        editable: Some("git+https://x/y.git".into()),
        requirements: Some(RequirementsSource::parse("salt://reqs.txt")),
        ..InstallRequest::default()
    };

    let err = h.pip.install(&request).unwrap_err();

    assert!(matches!(err, Error::Validation { field: "editable", .. }));
    assert!(h.runner.calls().is_empty());
    assert_eq!(h.cache.fetches(), 0);
    assert!(h.ownership.calls.lock().unwrap().is_empty());
}

#[test]
fn test_install_blank_package_list_runs_nothing() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        ..InstallRequest::packages(" , ")
    };

    assert!(matches!(
        h.pip.install(&request),
        Err(Error::Validation { field: "pkgs", .. })
    ));
    assert!(h.runner.calls().is_empty());
}

#[test]
fn test_install_requires_something_to_install() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        ..InstallRequest::default()
    };

    assert!(matches!(
        h.pip.install(&request),
        Err(Error::Validation { field: "pkgs", .. })
    ));
    assert!(h.runner.calls().is_empty());
}

#[test]
fn test_install_missing_remote_requirements_is_outcome() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        ..InstallRequest::requirements("salt://missing.txt")
    };

    let outcome = h.pip.install(&request).unwrap();

    assert_eq!(
        outcome,
        InstallOutcome::RequirementsNotFound {
            comment: "pip requirements file 'salt://missing.txt' not found".to_string()
        }
    );
    assert!(h.runner.calls().is_empty());
}

#[test]
fn test_install_remote_requirements_uses_cached_path() {
    let h = harness(RecordingRunner::new(ok("")));
    h.cache.publish("salt://reqs.txt", "django\n");
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        ..InstallRequest::requirements("salt://reqs.txt")
    };

    h.pip.install(&request).unwrap();

    let calls = h.runner.calls();
    let (path, existed) = calls[0].requirement.clone().unwrap();
    assert!(existed);
    assert_eq!(fs::read_to_string(path).unwrap(), "django\n");
    assert_eq!(h.cache.fetches(), 1);
}

#[test]
fn test_install_runas_copy_owned_by_user_and_removed() {
    let h = harness(RecordingRunner::new(ok("")));
    h.cache.publish("salt://reqs.txt", "django\n");
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        runas: Some("deploy".to_string()),
        cwd: Some("/srv/app".into()),
        ..InstallRequest::requirements("salt://reqs.txt")
    };

    h.pip.install(&request).unwrap();

    let calls = h.runner.calls();
    let (copy, existed) = calls[0].requirement.clone().unwrap();
    assert!(existed, "copy must exist while pip runs");
    assert!(!copy.exists(), "copy must be removed afterwards");
    assert_eq!(calls[0].runas.as_deref(), Some("deploy"));
    assert_eq!(calls[0].cwd.as_deref(), Some(std::path::Path::new("/srv/app")));

    let chowned = h.ownership.calls.lock().unwrap().clone();
    assert_eq!(chowned, vec![(copy, "deploy".to_string())]);
}

#[test]
fn test_install_runas_copy_removed_when_runner_fails() {
    let h = harness(RecordingRunner::failing());
    h.cache.publish("salt://reqs.txt", "django\n");
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        runas: Some("deploy".to_string()),
        ..InstallRequest::requirements("salt://reqs.txt")
    };

    let err = h.pip.install(&request).unwrap_err();

    assert!(matches!(err, Error::Spawn { .. }));
    let (copy, existed) = h.runner.calls()[0].requirement.clone().unwrap();
    assert!(existed);
    assert!(!copy.exists());
}

#[test]
fn test_install_runas_no_chown_uses_original_file() {
    let dir = TempDir::new().unwrap();
    let reqs = dir.path().join("requirements.txt");
    fs::write(&reqs, "django\n").unwrap();

    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(PIP.into()),
        runas: Some("deploy".to_string()),
        no_chown: true,
        ..InstallRequest::requirements(RequirementsSource::Local(reqs.clone()))
    };

    h.pip.install(&request).unwrap();

    let (path, _) = h.runner.calls()[0].requirement.clone().unwrap();
    assert_eq!(path, reqs);
    assert!(reqs.exists());
    assert!(h.ownership.calls.lock().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn test_install_activates_virtualenv() {
    let venv = TempDir::new().unwrap();
    let bin = venv.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    fs::write(bin.join("pip"), "").unwrap();
    fs::write(bin.join("activate"), "").unwrap();

    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(venv.path().to_path_buf()),
        activate: true,
        ..InstallRequest::packages("requests")
    };

    h.pip.install(&request).unwrap();

    let activate = bin.join("activate").display().to_string();
    let pip = bin.join("pip").display().to_string();
    assert_eq!(
        h.runner.calls()[0].tokens,
        vec![
            ".".to_string(),
            activate,
            "&&".to_string(),
            pip,
            "install".to_string(),
            "requests".to_string(),
        ]
    );
}

#[test]
fn test_install_virtualenv_without_pip_fails() {
    let venv = TempDir::new().unwrap();
    let h = harness(RecordingRunner::new(ok("")));
    let request = InstallRequest {
        bin_env: Some(venv.path().to_path_buf()),
        ..InstallRequest::packages("requests")
    };

    assert!(matches!(
        h.pip.install(&request),
        Err(Error::BinaryNotFound { .. })
    ));
    assert!(h.runner.calls().is_empty());
}

#[test]
fn test_uninstall_is_non_interactive() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = UninstallRequest {
        bin_env: Some(PIP.into()),
        ..UninstallRequest::packages("django,markdown")
    };

    h.pip.uninstall(&request).unwrap();

    assert_eq!(
        h.runner.calls()[0].tokens,
        strings(&[PIP, "uninstall", "-y", "django", "markdown"])
    );
}

#[test]
fn test_uninstall_missing_requirements_is_error() {
    let h = harness(RecordingRunner::new(ok("")));
    let request = UninstallRequest {
        bin_env: Some(PIP.into()),
        ..UninstallRequest::requirements("salt://gone.txt")
    };

    let err = h.pip.uninstall(&request).unwrap_err();

    assert!(matches!(err, Error::RequirementsNotFound { .. }));
    assert!(h.runner.calls().is_empty());
}

#[test]
fn test_uninstall_runas_copy_removed() {
    let h = harness(RecordingRunner::new(ok("")));
    h.cache.publish("salt://reqs.txt", "django\n");
    let request = UninstallRequest {
        bin_env: Some(PIP.into()),
        runas: Some("deploy".to_string()),
        ..UninstallRequest::requirements("salt://reqs.txt")
    };

    h.pip.uninstall(&request).unwrap();

    let (copy, existed) = h.runner.calls()[0].requirement.clone().unwrap();
    assert!(existed);
    assert!(!copy.exists());
}
