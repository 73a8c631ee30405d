//! Runtime settings for pibackbone
//!
//! Every host location the installer touches lives here, so tests can point
//! the engine at temporary directories instead of `/boot` and `/etc`.

use std::env;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};

/// Name of the directory that must hold the catalog
pub const INSTALLER_DIR_NAME: &str = "pibackbone";

/// Catalog location relative to the installed root
pub const CONF_SUFFIX: &str = "opt/pibackbone";

/// Definition document read from the catalog directory
pub const DEFINITIONS_FILE: &str = "definitions.json";

/// Per-service scripts live under this catalog subdirectory
pub const SCRIPTS_DIR: &str = "scripts";

/// Boot configuration receiving config lines
pub const BOOT_CONFIG: &str = "/boot/config.txt";

/// Scheduled-task directory receiving per-service scripts
pub const CRON_DIR: &str = "/etc/cron.d";

/// Roots the catalog directory may live under
pub const ALLOWED_ROOTS: &[&str] = &["/usr/local", "/opt", "/home", "/Users"];

/// Environment variable overriding the installed root
pub const ROOT_ENV: &str = "PIBACKBONE_ROOT";

/// Environment variable selecting the log level
pub const LOGLEVEL_ENV: &str = "LOGLEVEL";

/// Log level names accepted in `LOGLEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a `LOGLEVEL` value. Unrecognised names log everything.
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or(Self::Debug)
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Critical | Self::Error => "error",
            Self::Warning => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Installer settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Prefix the tool is installed under (e.g. `/usr/local`)
    pub install_root: PathBuf,
    /// Required final segment of the catalog directory
    pub installer_dir_name: String,
    /// Canonical roots the catalog directory may start with
    pub allowed_roots: Vec<PathBuf>,
    /// Boot configuration file (append target)
    pub boot_config: PathBuf,
    /// Scheduled-task directory (script copy target)
    pub cron_dir: PathBuf,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            install_root: PathBuf::from("/"),
            installer_dir_name: INSTALLER_DIR_NAME.to_string(),
            allowed_roots: ALLOWED_ROOTS.iter().map(PathBuf::from).collect(),
            boot_config: PathBuf::from(BOOT_CONFIG),
            cron_dir: PathBuf::from(CRON_DIR),
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// The installed root comes from `PIBACKBONE_ROOT` when set, otherwise
    /// from the location of the running executable.
    pub fn from_env() -> Self {
        let install_root = env::var_os(ROOT_ENV)
            .map(PathBuf::from)
            .or_else(|| env::current_exe().ok().map(|exe| installed_root(&exe)))
            .unwrap_or_else(|| PathBuf::from("/"));

        let log_level = env::var(LOGLEVEL_ENV)
            .map(|v| LogLevel::from_name(&v))
            .unwrap_or_default();

        Self {
            install_root,
            log_level,
            ..Self::default()
        }
    }

    /// Candidate catalog directory, before the path guard has seen it
    pub fn catalog_candidate(&self) -> PathBuf {
        self.install_root.join(CONF_SUFFIX)
    }
}

/// Derive the installed prefix from an executable path.
///
/// `/usr/local/bin/pibackbone` gives `/usr/local`. An executable outside a
/// `bin/` directory gives its own parent directory.
pub fn installed_root(exe: &Path) -> PathBuf {
    let parent = exe.parent().unwrap_or(Path::new("/"));
    match parent.file_name() {
        Some(name) if name == "bin" => parent.parent().unwrap_or(Path::new("/")).to_path_buf(),
        _ => parent.to_path_buf(),
    }
}
