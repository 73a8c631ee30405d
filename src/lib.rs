//! PiBackbone Library
//!
//! Turns a catalog of services and projects into an ordered install plan and
//! applies it to a Pi-based host.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dir_guard;
pub mod engine;
pub mod error;
pub mod host;
pub mod menu;
pub mod path_guard;
pub mod selection;

// Re-export main types for convenience
pub use app::{App, RunOutcome};
pub use catalog::{Catalog, NONE_PROJECT, Project, Service};
pub use config::Settings;
pub use dir_guard::WorkingDirGuard;
pub use engine::executor::{ExecutionReport, PlanExecutor, StepKind, StepOutcome, StepReport};
pub use engine::plan::{InstallPlan, ScriptDeployment, build_plan};
pub use error::PiBackboneError;
pub use host::{CommandOutput, Elevation, Host, SystemHost};
pub use menu::{DialoguerPrompter, Prompter};
pub use path_guard::PathGuard;
pub use selection::{MenuAnswer, RawAnswer, Selection, resolve};
