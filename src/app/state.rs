//! Run outcome types

use crate::engine::executor::ExecutionReport;

/// How a run ended, when it did not end in a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing was selected; no host change was made
    Quit,
    /// A plan was applied
    Completed {
        /// Per-step outcomes of the plan
        report: ExecutionReport,
        /// Project chosen in project mode
        project: Option<String>,
        /// Whether the user asked for a reboot
        reboot_requested: bool,
    },
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Quit => 1,
            Self::Completed { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_exits_with_one() {
        assert_eq!(RunOutcome::Quit.exit_code(), 1);
        let completed = RunOutcome::Completed {
            report: ExecutionReport::default(),
            project: None,
            reboot_requested: false,
        };
        assert_eq!(completed.exit_code(), 0);
    }
}
