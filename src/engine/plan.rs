//! Install Plan builder
//!
//! Merges the config lines, install directives and script deployments of the
//! selected services into one `InstallPlan`.
//!
//! # Design
//!
//! - **First occurrence wins**: a line or directive shared by several services
//!   appears once, at the position of the first service contributing it
//! - **Exact matching**: dedup compares whole strings, byte for byte
//! - **No side effects**: the only I/O is checking whether a service script
//!   exists, so the same catalog and service order always give the same plan
//! - **Absolute paths**: deployments record `scripts_dir/<service>`, so the
//!   executor never depends on the working directory

use crate::catalog::Catalog;
use crate::error::{PiBackboneError, Result};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

// ============================================================================
// Plan Types
// ============================================================================

/// A per-service script to install into the scheduled-task directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDeployment {
    /// Service the script belongs to; also its installed file name
    pub service: String,
    /// Script location inside the catalog directory
    pub source: PathBuf,
}

impl fmt::Display for ScriptDeployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.service, self.source.display())
    }
}

/// The merged, deduplicated work for one run.
///
/// Built once per selection and consumed once by the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    /// Boot configuration lines, unique, first-occurrence order
    pub config_lines: Vec<String>,
    /// Shell directives, unique, first-occurrence order
    pub install_commands: Vec<String>,
    /// Scripts to deploy, in service order
    pub deployments: Vec<ScriptDeployment>,
}

impl InstallPlan {
    /// Returns true if applying this plan would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.config_lines.is_empty()
            && self.install_commands.is_empty()
            && self.deployments.is_empty()
    }

    /// Returns a summary of the plan for logging/display.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Install Plan: {} script(s), {} config line(s), {} install command(s)",
            self.deployments.len(),
            self.config_lines.len(),
            self.install_commands.len()
        )];
        for deployment in &self.deployments {
            lines.push(format!("  script:  {}", deployment));
        }
        for line in &self.config_lines {
            lines.push(format!("  config:  {}", line));
        }
        for command in &self.install_commands {
            lines.push(format!("  install: {}", command));
        }
        lines.join("\n")
    }
}

// ============================================================================
// Plan Construction
// ============================================================================

/// Build the install plan for an ordered list of services.
///
/// `scripts_dir` is where per-service scripts live (`<catalog>/scripts`).
///
/// # Errors
///
/// `UnknownService` if a name is not in the catalog.
pub fn build_plan(services: &[String], catalog: &Catalog, scripts_dir: &Path) -> Result<InstallPlan> {
    let mut plan = InstallPlan::default();
    let mut seen_config = HashSet::new();
    let mut seen_install = HashSet::new();

    for name in services {
        let service = catalog
            .service(name)
            .ok_or_else(|| PiBackboneError::unknown_service(name))?;

        for line in &service.config {
            if seen_config.insert(line.as_str()) {
                plan.config_lines.push(line.clone());
            }
        }

        for command in &service.install {
            if seen_install.insert(command.as_str()) {
                plan.install_commands.push(command.clone());
            }
        }

        let script = scripts_dir.join(name);
        if script.is_file() {
            debug!("Service {} has script {:?}", name, script);
            plan.deployments.push(ScriptDeployment {
                service: name.clone(),
                source: script,
            });
        }
    }

    debug!("{}", plan.summary());
    Ok(plan)
}

// ============================================================================
// Tests
// ============================================================================
