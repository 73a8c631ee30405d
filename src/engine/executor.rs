//! Plan Executor
//!
//! Applies an `InstallPlan` to the host in three passes:
//!
//! | Pass | Step                | Host operation |
//! |------|---------------------|----------------|
//! | 1    | `deploy-script`     | privileged copy to `<cron_dir>/<service>` |
//! | 2    | `append-config`     | privileged append to the boot config |
//! | 3    | `run-install`       | `sh -c <directive>` |
//!
//! Every step is attempted. A failed step is recorded in the
//! `ExecutionReport` and the executor moves on; nothing is rolled back.
//!
//! Config lines are appended, not merged. Dedup only holds within one plan:
//! a second run appends the same lines again, and a line removed by hand is
//! brought back.

use crate::engine::plan::InstallPlan;
use crate::host::Host;
use std::path::PathBuf;
use strum::Display;
use tracing::{error, info, warn};

/// Kind of host step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StepKind {
    DeployScript,
    AppendConfig,
    RunInstall,
}

/// Outcome of one host step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failed {
        /// Exit code of the command, when the step ran one
        exit_code: Option<i32>,
        message: String,
    },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One attempted step and how it went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub kind: StepKind,
    /// Script, config line or directive the step acted on
    pub target: String,
    pub outcome: StepOutcome,
}

/// Aggregated outcome of applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub steps: Vec<StepReport>,
}

impl ExecutionReport {
    /// True when every attempted step succeeded
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|step| step.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| !step.outcome.is_success())
    }

    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|step| step.kind == kind).count()
    }

    fn record(&mut self, kind: StepKind, target: impl Into<String>, outcome: StepOutcome) {
        let target = target.into();
        match &outcome {
            StepOutcome::Success => info!("{} ok: {}", kind, target),
            StepOutcome::Failed { message, .. } => {
                error!("{} failed: {}: {}", kind, target, message)
            }
        }
        self.steps.push(StepReport {
            kind,
            target,
            outcome,
        });
    }
}

/// Applies install plans through a `Host`
pub struct PlanExecutor<H: Host> {
    host: H,
    boot_config: PathBuf,
    cron_dir: PathBuf,
}

impl<H: Host> PlanExecutor<H> {
    pub fn new(host: H, boot_config: impl Into<PathBuf>, cron_dir: impl Into<PathBuf>) -> Self {
        Self {
            host,
            boot_config: boot_config.into(),
            cron_dir: cron_dir.into(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Apply the plan. Never aborts early; see the module docs.
    pub fn apply(&mut self, plan: InstallPlan) -> ExecutionReport {
        let mut report = ExecutionReport::default();
        if plan.is_empty() {
            warn!("Install plan is empty, nothing to apply");
            return report;
        }

        for deployment in &plan.deployments {
            let dest = self.cron_dir.join(&deployment.service);
            let outcome = match self.host.copy_privileged(&deployment.source, &dest) {
                Ok(()) => StepOutcome::Success,
                Err(e) => StepOutcome::Failed {
                    exit_code: None,
                    message: format!("{:#}", e),
                },
            };
            report.record(
                StepKind::DeployScript,
                format!("{} -> {}", deployment.source.display(), dest.display()),
                outcome,
            );
        }

        for line in &plan.config_lines {
            let outcome = match self.host.append_privileged(line, &self.boot_config) {
                Ok(()) => StepOutcome::Success,
                Err(e) => StepOutcome::Failed {
                    exit_code: None,
                    message: format!("{:#}", e),
                },
            };
            report.record(StepKind::AppendConfig, line.as_str(), outcome);
        }

        for command in &plan.install_commands {
            let outcome = match self.host.run_shell(command) {
                Ok(output) if output.success => StepOutcome::Success,
                Ok(output) => StepOutcome::Failed {
                    exit_code: output.exit_code,
                    message: match output.exit_code {
                        Some(code) => format!("exited with code {}", code),
                        None => "terminated by signal".to_string(),
                    },
                },
                Err(e) => StepOutcome::Failed {
                    exit_code: None,
                    message: format!("{:#}", e),
                },
            };
            report.record(StepKind::RunInstall, command.as_str(), outcome);
        }

        report
    }
}
