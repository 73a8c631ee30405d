//! Application module
//!
//! Drives one installer run from catalog lookup to the reboot prompt.
//!
//! # Module Structure
//! - `state` - Run outcome types
//! - `notice` - Styled status lines on stderr
//! - Main module - App struct and the run sequence
//!
//! # Run Sequence
//! 1. Path guard resolves the catalog directory
//! 2. Working directory enters it (scoped) for load, menu, resolve and build
//! 3. Working directory is restored, then the plan is applied
//! 4. Report, project notes and the reboot question follow

mod notice;
mod state;

pub use notice::{
    QUIT_MESSAGE, REBOOT_MESSAGE, Tone, announce, fatal_message, paint, report_lines, show_report,
};
pub use state::RunOutcome;

use crate::catalog::Catalog;
use crate::config::{SCRIPTS_DIR, Settings};
use crate::dir_guard::WorkingDirGuard;
use crate::engine::executor::PlanExecutor;
use crate::engine::plan::{InstallPlan, build_plan};
use crate::host::Host;
use crate::menu::{self, Prompter};
use crate::path_guard::PathGuard;
use crate::selection::{self, Selection};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Plan and notes computed while inside the catalog directory
struct Prepared {
    plan: InstallPlan,
    project: Option<String>,
    notes: Option<String>,
}

/// Main application struct
pub struct App<'p, H: Host> {
    settings: Settings,
    prompter: &'p mut dyn Prompter,
    executor: PlanExecutor<H>,
}

impl<'p, H: Host> App<'p, H> {
    pub fn new(settings: Settings, prompter: &'p mut dyn Prompter, host: H) -> Self {
        let executor = PlanExecutor::new(
            host,
            settings.boot_config.clone(),
            settings.cron_dir.clone(),
        );
        Self {
            settings,
            prompter,
            executor,
        }
    }

    /// Host used for side effects (exposed for inspection after a run)
    pub fn host(&self) -> &H {
        self.executor.host()
    }

    /// Run the installer once.
    ///
    /// # Errors
    ///
    /// Fatal errors (unsafe path, catalog problems, invalid answer, unknown
    /// service) are returned before any host change is made. Failed host
    /// steps are not errors; they are in the returned report.
    pub fn run(&mut self) -> Result<RunOutcome> {
        let guard = PathGuard::from_settings(&self.settings);
        let catalog_dir = guard.resolve(&self.settings.catalog_candidate())?;
        info!("Using definitions in {:?}", catalog_dir);

        let prepared = {
            let cwd = WorkingDirGuard::enter(&catalog_dir)
                .with_context(|| format!("Failed to enter {:?}", catalog_dir))?;
            self.prepare(cwd.entered())?
        };

        let Some(prepared) = prepared else {
            announce(Tone::Info, QUIT_MESSAGE);
            return Ok(RunOutcome::Quit);
        };

        info!("{}", prepared.plan.summary());
        let report = self.executor.apply(prepared.plan);
        show_report(&report);

        if let Some(notes) = &prepared.notes {
            announce(Tone::Notes, notes);
        }

        let reboot_requested = menu::ask_reboot(&mut *self.prompter)?;
        if reboot_requested {
            announce(Tone::Warning, REBOOT_MESSAGE);
            if let Err(e) = self.executor.host_mut().reboot() {
                announce(Tone::Failure, &format!("Reboot failed: {:#}", e));
            }
        }

        Ok(RunOutcome::Completed {
            report,
            project: prepared.project,
            reboot_requested,
        })
    }

    /// Load, ask, resolve and build. `None` means nothing was chosen.
    fn prepare(&mut self, catalog_dir: &Path) -> Result<Option<Prepared>> {
        let catalog = Catalog::load(catalog_dir)?;
        let answer = menu::ask_for_selection(&mut *self.prompter, &catalog)?;

        let (services, project) = match selection::resolve(&answer, &catalog)? {
            Selection::Quit => return Ok(None),
            Selection::Install { services, project } => (services, project),
        };
        debug!("Selected services: {:?}", services);

        let plan = build_plan(&services, &catalog, &catalog_dir.join(SCRIPTS_DIR))?;
        let notes = project
            .as_deref()
            .and_then(|name| catalog.project(name))
            .map(|p| p.notes.clone())
            .filter(|notes| !notes.is_empty());

        Ok(Some(Prepared {
            plan,
            project,
            notes,
        }))
    }
}
