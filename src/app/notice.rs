//! Operator-facing status lines
//!
//! Styled text goes straight to stderr. The tracing subscriber escapes
//! control sequences, so colored output never passes through it; the log
//! carries plain diagnostics only.

use crate::engine::executor::{ExecutionReport, StepOutcome};
use crate::error::PiBackboneError;
use console::style;

pub const QUIT_MESSAGE: &str = "Nothing chosen, quitting.";
pub const REBOOT_MESSAGE: &str = "Rebooting now!";

/// Color of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Notes,
    Warning,
    Success,
    Failure,
    Heading,
}

/// Style `text` for stderr. Plain when stderr is not a color terminal.
pub fn paint(tone: Tone, text: &str) -> String {
    let styled = style(text).for_stderr();
    match tone {
        Tone::Info => styled.cyan(),
        Tone::Notes => styled.magenta(),
        Tone::Warning => styled.yellow(),
        Tone::Success => styled.green(),
        Tone::Failure => styled.red(),
        Tone::Heading => styled.red().bold(),
    }
    .to_string()
}

/// Print one styled status line to stderr
pub fn announce(tone: Tone, text: &str) {
    eprintln!("{}", paint(tone, text));
}

/// One line describing a fatal error
pub fn fatal_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PiBackboneError>() {
        Some(PiBackboneError::UnsafePath { .. } | PiBackboneError::CatalogMissing { .. }) => {
            format!("Unable to find config files, exiting because: {}", err)
        }
        _ => format!("{:#}", err),
    }
}

/// Plain report lines with their tone. Failed steps are always listed.
pub fn report_lines(report: &ExecutionReport) -> Vec<(Tone, String)> {
    if report.is_success() {
        return vec![(
            Tone::Success,
            format!(
                "Installation finished: {} step(s) succeeded",
                report.steps.len()
            ),
        )];
    }

    let failures: Vec<_> = report.failures().collect();
    let mut lines = vec![(
        Tone::Heading,
        format!(
            "Installation finished with {} failed step(s) out of {}:",
            failures.len(),
            report.steps.len()
        ),
    )];
    for step in failures {
        if let StepOutcome::Failed { message, .. } = &step.outcome {
            lines.push((
                Tone::Failure,
                format!("  [{}] {}: {}", step.kind, step.target, message),
            ));
        }
    }
    lines
}

/// Print the execution report
pub fn show_report(report: &ExecutionReport) {
    for (tone, line) in report_lines(report) {
        announce(tone, &line);
    }
}
