//! Service and project catalog
//!
//! The catalog is loaded once per run from `definitions.json`:
//!
//! ```json
//! {
//!   "services": {
//!     "ssh":    { "config": ["dtparam=i2c=1"], "install": ["apt-get install -y i2c-tools"] },
//!     "camera": { "config": ["start_x=1"] }
//!   },
//!   "projects": {
//!     "robot": { "services": ["ssh", "camera"], "notes": "done" }
//!   }
//! }
//! ```
//!
//! Records are validated at load time. Unknown fields, dangling project
//! references, a project named `None` and a service name that is not a
//! single path segment all reject the whole document.
//!
//! Services and projects keep document order. The menus list them that way
//! and a checkbox answer installs them that way.

use crate::config::DEFINITIONS_FILE;
use crate::error::{PiBackboneError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, info};

/// Reserved project choice meaning "nothing selected"
pub const NONE_PROJECT: &str = "None";

/// A named unit of config lines and install directives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    /// Lines appended to the boot configuration
    #[serde(default)]
    pub config: Vec<String>,
    /// Shell directives run in order
    #[serde(default)]
    pub install: Vec<String>,
}

/// A named, ordered bundle of services plus post-install notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub services: Vec<String>,
    pub notes: String,
}

/// Raw document shape before referential checks
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Definitions {
    services: IndexMap<String, Service>,
    projects: IndexMap<String, Project>,
}

/// The loaded set of services and projects for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    services: IndexMap<String, Service>,
    projects: IndexMap<String, Project>,
}

impl Catalog {
    /// Load `definitions.json` from the given directory.
    ///
    /// # Errors
    ///
    /// - `CatalogMissing` if the document is absent or unreadable
    /// - `CatalogMalformed` if it does not parse or fails validation
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DEFINITIONS_FILE);
        let content = fs::read_to_string(&path)
            .map_err(|e| PiBackboneError::catalog_missing(&path, e.to_string()))?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded {} service(s) and {} project(s) from {:?}",
            catalog.services.len(),
            catalog.projects.len(),
            path
        );
        Ok(catalog)
    }

    /// Parse and validate a definition document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let definitions: Definitions = serde_json::from_str(content)
            .map_err(|e| PiBackboneError::catalog_malformed(e.to_string()))?;
        Self::new(definitions.services, definitions.projects)
    }

    /// Build a catalog from typed records, enforcing the load-time invariants
    pub fn new(
        services: IndexMap<String, Service>,
        projects: IndexMap<String, Project>,
    ) -> Result<Self> {
        if let Some(name) = services.keys().find(|name| !is_plain_name(name)) {
            return Err(PiBackboneError::catalog_malformed(format!(
                "service name '{}' must be a single path segment",
                name
            )));
        }

        if projects.contains_key(NONE_PROJECT) {
            return Err(PiBackboneError::catalog_malformed(format!(
                "project name '{}' is reserved",
                NONE_PROJECT
            )));
        }

        for (project_name, project) in &projects {
            if let Some(missing) = project
                .services
                .iter()
                .find(|name| !services.contains_key(name.as_str()))
            {
                return Err(PiBackboneError::catalog_malformed(format!(
                    "project '{}' references unknown service '{}'",
                    project_name, missing
                )));
            }
        }

        debug!("Catalog validated");
        Ok(Self { services, projects })
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    /// Service names, in the order the checkbox menu shows them
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Project names followed by the synthetic `None` choice
    pub fn project_choices(&self) -> Vec<&str> {
        self.projects
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(NONE_PROJECT))
            .collect()
    }
}

/// Service names become file names under the scripts and cron directories
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(first)) if first == name)
        && components.next().is_none()
}
