//! Configuration types for media triage

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Scan mode deciding which classification rules run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Full triage: screenshots, small media and other files are set aside,
    /// the remaining media is filed into the dated archive
    #[default]
    Full,
    /// Only flag media that already exists in its archive folder (same name and size)
    Duplicates,
    /// Only set aside screenshots, small media and non-media files
    Trash,
}

impl ScanMode {
    /// Stable lowercase name, matching the CLI and config file spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Full => "full",
            ScanMode::Duplicates => "duplicates",
            ScanMode::Trash => "trash",
        }
    }

    /// All modes in display order
    pub fn all() -> [ScanMode; 3] {
        [ScanMode::Full, ScanMode::Duplicates, ScanMode::Trash]
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a triage session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Staging folder that is scanned recursively
    pub staging_dir: PathBuf,

    /// Archive folder receiving `YYYY/MM` subfolders
    pub archive_dir: PathBuf,

    /// Scan mode
    #[serde(default)]
    pub mode: ScanMode,

    /// Directories to skip while scanning (absolute paths or folder names)
    #[serde(default)]
    pub exclude_dirs: Vec<PathBuf>,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Create a configuration for the given roots and mode
    pub fn new(staging_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>, mode: ScanMode) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            archive_dir: archive_dir.into(),
            mode,
            ..Self::default()
        }
    }

    /// Check the configuration before a scan is launched
    ///
    /// Both roots must be given, and the archive must not live inside the
    /// staging folder (it would be scanned as staging content).
    pub fn validate(&self) -> Result<()> {
        if self.staging_dir.as_os_str().is_empty() {
            return Err(Error::Validation(
                rust_i18n::t!("validation_staging_empty").to_string(),
            ));
        }
        if self.archive_dir.as_os_str().is_empty() {
            return Err(Error::Validation(
                rust_i18n::t!("validation_archive_empty").to_string(),
            ));
        }
        if resolve_root(&self.archive_dir).starts_with(resolve_root(&self.staging_dir)) {
            return Err(Error::Validation(
                rust_i18n::t!(
                    "validation_archive_inside_staging",
                    archive = self.archive_dir.display(),
                    staging = self.staging_dir.display()
                )
                .to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Media Triage Configuration File
# This file uses TOML format (https://toml.io)

# Staging folder with freshly imported photos and videos.
# Triage buckets are created inside it under other/:
#   other/screenshots, other/compressed, other/duplicates, other/other_files
staging_dir = "D:/Temp"

# Archive folder; media is filed into YYYY/MM subfolders
archive_dir = "D:/Media"

# Scan mode: "full", "duplicates" or "trash"
# - full: set aside screenshots, small media and other files, then archive the rest
# - duplicates: only move media that already exists in its archive folder
# - trash: only set aside screenshots, small media and other files
mode = "full"

# Directories to skip while scanning
# Can be absolute paths or folder names (will match any folder with that name)
exclude_dirs = [
    ".thumbnails",
    "@eaDir",
]

# Verbose output - show detailed processing information
verbose = false
"#
        .to_string()
    }
}

/// Real location of a root folder, for containment checks
///
/// The longest existing ancestor is canonicalized (resolving symlinks) and
/// the missing tail is appended; `.` and `..` are folded lexically first.
fn resolve_root(path: &Path) -> PathBuf {
    if let Ok(real) = fs::canonicalize(path) {
        return real;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let lexical = normalize_lexically(&absolute);

    let mut existing = lexical.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(existing) {
            return tail.iter().rev().fold(real, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return lexical,
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError {
        source: toml::ser::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
        }
    }
}
