//! Shared fixtures for integration tests
//!
//! - `install_tree` lays out an installed root in a temp dir
//! - `RecordingHost` records host calls instead of touching the machine
//! - `ScriptedPrompter` replays canned menu answers

#![allow(dead_code)]

use anyhow::Result;
use pibackbone::config::Settings;
use pibackbone::host::{CommandOutput, Host};
use pibackbone::menu::Prompter;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

/// The working directory is process-wide; tests that change it take this lock
static CWD_LOCK: Mutex<()> = Mutex::new(());

pub fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub const ROBOT_DEFINITIONS: &str = r#"{
    "services": {
        "ssh": {"config": ["dtparam=i2c=1"], "install": ["apt-get install -y i2c-tools"]},
        "camera": {"config": ["start_x=1"]}
    },
    "projects": {
        "robot": {"services": ["ssh", "camera"], "notes": "done"}
    }
}"#;

/// An installed layout under a temp dir:
///
/// ```text
/// <root>/opt/pibackbone/definitions.json
/// <root>/opt/pibackbone/scripts/
/// <root>/boot/config.txt   (boot_config, not created)
/// <root>/cron.d/           (cron_dir)
/// ```
pub struct InstallTree {
    pub root: TempDir,
    pub settings: Settings,
}

impl InstallTree {
    pub fn catalog_dir(&self) -> PathBuf {
        self.root.path().join("opt").join("pibackbone")
    }

    pub fn add_script(&self, service: &str, body: &str) -> PathBuf {
        let path = self.catalog_dir().join("scripts").join(service);
        fs::write(&path, body).expect("write script");
        path
    }
}

pub fn install_tree(definitions: &str) -> InstallTree {
    let root = tempfile::tempdir().expect("create temp dir");
    let catalog_dir = root.path().join("opt").join("pibackbone");
    fs::create_dir_all(catalog_dir.join("scripts")).expect("create catalog dir");
    fs::write(catalog_dir.join("definitions.json"), definitions).expect("write definitions");
    fs::create_dir_all(root.path().join("boot")).expect("create boot dir");
    fs::create_dir_all(root.path().join("cron.d")).expect("create cron dir");

    let canonical_root = root.path().canonicalize().expect("canonicalize temp dir");
    let settings = Settings {
        install_root: root.path().to_path_buf(),
        allowed_roots: vec![canonical_root],
        boot_config: root.path().join("boot").join("config.txt"),
        cron_dir: root.path().join("cron.d"),
        ..Settings::default()
    };

    InstallTree { root, settings }
}

/// One side effect requested from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Copy { source: PathBuf, dest: PathBuf },
    Append { line: String, file: PathBuf },
    Shell(String),
    Reboot,
}

/// Records calls; commands listed in `failing` exit with code 100
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub failing: HashSet<String>,
    pub fail_appends: bool,
}

impl RecordingHost {
    pub fn failing_on(commands: &[&str]) -> Self {
        Self {
            failing: commands.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn shell_calls(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Shell(command) => Some(command.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn appended_lines(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Append { line, .. } => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn copy_privileged(&mut self, source: &Path, dest: &Path) -> Result<()> {
        self.calls.push(HostCall::Copy {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
        });
        Ok(())
    }

    fn append_privileged(&mut self, line: &str, file: &Path) -> Result<()> {
        self.calls.push(HostCall::Append {
            line: line.to_string(),
            file: file.to_path_buf(),
        });
        if self.fail_appends {
            anyhow::bail!("sudo tee -a {} failed (exit code 1): denied", file.display());
        }
        Ok(())
    }

    fn run_shell(&mut self, command: &str) -> Result<CommandOutput> {
        self.calls.push(HostCall::Shell(command.to_string()));
        let success = !self.failing.contains(command);
        Ok(CommandOutput {
            stderr: String::new(),
            exit_code: Some(if success { 0 } else { 100 }),
            success,
        })
    }

    fn reboot(&mut self) -> Result<()> {
        self.calls.push(HostCall::Reboot);
        Ok(())
    }
}

/// Menu answers by choice name rather than index
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub existing_project: Option<bool>,
    pub project: Option<String>,
    pub services: Option<Vec<String>>,
    pub reboot: Option<bool>,
    confirms_asked: usize,
}

impl ScriptedPrompter {
    pub fn project(name: &str, reboot: bool) -> Self {
        Self {
            existing_project: Some(true),
            project: Some(name.to_string()),
            reboot: Some(reboot),
            ..Self::default()
        }
    }

    pub fn services(names: &[&str], reboot: bool) -> Self {
        Self {
            existing_project: Some(false),
            services: Some(names.iter().map(|s| s.to_string()).collect()),
            reboot: Some(reboot),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _message: &str, _default: bool) -> Result<Option<bool>> {
        self.confirms_asked += 1;
        Ok(if self.confirms_asked == 1 {
            self.existing_project
        } else {
            self.reboot
        })
    }

    fn select(&mut self, _message: &str, choices: &[&str]) -> Result<Option<usize>> {
        Ok(self
            .project
            .as_deref()
            .and_then(|wanted| choices.iter().position(|c| *c == wanted)))
    }

    fn multi_select(&mut self, _message: &str, choices: &[&str]) -> Result<Option<Vec<usize>>> {
        // A checkbox reports ticked items in menu order
        Ok(self.services.as_ref().map(|wanted| {
            let mut ticked: Vec<usize> = wanted
                .iter()
                .filter_map(|w| choices.iter().position(|c| c == w))
                .collect();
            ticked.sort_unstable();
            ticked
        }))
    }
}
