//! Selection resolver
//!
//! Turns the raw menu answer into the ordered, deduplicated list of services
//! to install, or a quit signal.
//!
//! # Resolution Rules
//!
//! | Answer                 | Result |
//! |------------------------|--------|
//! | `{project: "None"}`    | Quit |
//! | `{project: name}`      | The project's services, declared order |
//! | `{services: []}`       | Quit |
//! | `{services: [..]}`     | The listed services, answer order |
//! | anything else          | `InvalidAnswer` |
//!
//! Duplicates keep their first occurrence. Every name is checked against the
//! catalog even though the menu was built from it.

use crate::catalog::{Catalog, NONE_PROJECT};
use crate::error::{PiBackboneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Answer as collected by the menu, before its shape is checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
}

impl RawAnswer {
    pub fn project(name: impl Into<String>) -> Self {
        Self {
            project: Some(name.into()),
            services: None,
        }
    }

    pub fn services<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            project: None,
            services: Some(names.into_iter().map(Into::into).collect()),
        }
    }
}

impl fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// A raw answer whose shape has been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAnswer {
    Project(String),
    Services(Vec<String>),
}

impl TryFrom<&RawAnswer> for MenuAnswer {
    type Error = PiBackboneError;

    fn try_from(raw: &RawAnswer) -> Result<Self> {
        match (&raw.project, &raw.services) {
            (Some(project), None) => Ok(Self::Project(project.clone())),
            (None, Some(services)) => Ok(Self::Services(services.clone())),
            _ => Err(PiBackboneError::invalid_answer(raw.to_string())),
        }
    }
}

/// Resolved outcome of the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Install these services. `project` is set in project mode.
    Install {
        services: Vec<String>,
        project: Option<String>,
    },
    /// Nothing chosen
    Quit,
}

impl Selection {
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }
}

/// Resolve a raw menu answer against the catalog.
///
/// Pure: the same answer and catalog always give the same selection.
///
/// # Errors
///
/// - `InvalidAnswer` if the answer is neither a project nor a services answer
/// - `UnknownService` naming the first project or service absent from the catalog
pub fn resolve(raw: &RawAnswer, catalog: &Catalog) -> Result<Selection> {
    let selection = match MenuAnswer::try_from(raw)? {
        MenuAnswer::Project(name) if name == NONE_PROJECT => Selection::Quit,
        MenuAnswer::Project(name) => {
            let project = catalog
                .project(&name)
                .ok_or_else(|| PiBackboneError::unknown_service(&name))?;
            Selection::Install {
                services: checked_unique(&project.services, catalog)?,
                project: Some(name),
            }
        }
        MenuAnswer::Services(names) if names.is_empty() => Selection::Quit,
        MenuAnswer::Services(names) => Selection::Install {
            services: checked_unique(&names, catalog)?,
            project: None,
        },
    };
    debug!("Resolved answer {} to {:?}", raw, selection);
    Ok(selection)
}

/// Deduplicate keeping first occurrence, failing on names the catalog lacks
fn checked_unique(names: &[String], catalog: &Catalog) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(names.len());
    for name in names {
        if catalog.service(name).is_none() {
            return Err(PiBackboneError::unknown_service(name));
        }
        if seen.insert(name.as_str()) {
            unique.push(name.clone());
        }
    }
    Ok(unique)
}
