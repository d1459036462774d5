//! CLI argument parsing with clap

use crate::config::{Config, ScanMode};
use clap::Parser;
use std::path::PathBuf;

/// Media Triage - sort a photo staging folder
///
/// Sets aside screenshots, small (compressed) media, duplicates and
/// non-media files, and files the remaining photos and videos into a
/// dated YYYY/MM archive.
#[derive(Parser, Debug)]
#[command(name = "media-triage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Staging folder to scan
    #[arg(short, long)]
    pub staging: Option<PathBuf>,

    /// Archive folder receiving YYYY/MM subfolders
    #[arg(short, long)]
    pub archive: Option<PathBuf>,

    /// Scan mode:
    /// - full: set aside screenshots, small media and other files, archive the rest (default)
    /// - duplicates: only move media already present in its archive folder
    /// - trash: only set aside screenshots, small media and other files
    #[arg(short = 'M', long, value_enum)]
    pub mode: Option<ScanMode>,

    /// Directories to skip while scanning (folder names or absolute paths)
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<PathBuf>>,

    /// Write the final tally as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write a sample configuration file and exit
    #[arg(long, value_name = "FILE")]
    pub init_config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref staging) = self.staging {
            config.staging_dir = staging.clone();
        }
        if let Some(ref archive) = self.archive {
            config.archive_dir = archive.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(ref exclude) = self.exclude {
            config.exclude_dirs = exclude.clone();
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "media-triage",
            "-s",
            "/photos/temp",
            "-a",
            "/photos/archive",
            "-M",
            "duplicates",
            "--exclude",
            "@eaDir",
            ".thumbnails",
            "--report",
            "out.json",
        ])
        .unwrap();

        let config = cli.to_config();
        assert_eq!(config.staging_dir, PathBuf::from("/photos/temp"));
        assert_eq!(config.archive_dir, PathBuf::from("/photos/archive"));
        assert_eq!(config.mode, ScanMode::Duplicates);
        assert_eq!(config.exclude_dirs.len(), 2);
        assert_eq!(cli.report, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let cli = Cli::try_parse_from(["media-triage", "-C", "home.toml", "-M", "trash"]).unwrap();
        let file_config = Config::new("/a", "/b", ScanMode::Full);

        let merged = cli.merge_with_config(file_config);
        assert_eq!(merged.staging_dir, PathBuf::from("/a"));
        assert_eq!(merged.mode, ScanMode::Trash);
        assert_eq!(cli.config_name().as_deref(), Some("home"));
    }

    #[test]
    fn test_mode_defaults_to_full() {
        let cli = Cli::try_parse_from(["media-triage", "-s", "/a", "-a", "/b"]).unwrap();
        assert_eq!(cli.to_config().mode, ScanMode::Full);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["media-triage", "-M", "everything"]).is_err());
    }
}
