//! Media Triage - sort a photo staging folder
//!
//! This library classifies the files of a staging folder and relocates them:
//! - Screenshots, small (compressed) media and non-media files go to
//!   buckets under `<staging>/other/`
//! - Media already present in its archive folder goes to a duplicates bucket
//! - Everything else is filed into `<archive>/YYYY/MM`
//! - Moves never overwrite; name clashes become `name(1).ext`, `name(2).ext`, ...
//! - Scans run on a background worker and report through an event channel

// Initialize i18n with locale files
rust_i18n::i18n!("locales", fallback = "en");

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod i18n;
pub mod layout;
pub mod mover;
pub mod record;
pub mod scan;
pub mod session;
pub mod tui;

pub use classify::{DateBucket, MediaKind};
pub use cli::Cli;
pub use config::{Config, ConfigError, ScanMode};
pub use error::{Error, Result};
pub use event::{EVENTS_TARGET, EventSink, ScanEvent};
pub use i18n::init_locale;
pub use layout::TriageLayout;
pub use mover::move_safely;
pub use record::FileRecord;
pub use scan::{Category, MoveRecord, ScanRequest, ScanResult, run_scan};
pub use session::{ScanHandle, Session};
pub use tui::{TuiApp, should_run_interactive};
