//! Scan engine
//!
//! Handles the core logic of:
//! - Enumerating the staging folder
//! - Classifying every file for the active [`ScanMode`]
//! - Moving files into triage buckets or the dated archive
//! - Reporting progress and status lines through an [`EventSink`]
//!
//! Files are processed one at a time in enumeration order, so a move made
//! early in the scan is visible to every later duplicate check.

use crate::classify::{self, DateBucket};
use crate::config::{Config, ScanMode};
use crate::error::{Error, Result};
use crate::event::EventSink;
use crate::layout::TriageLayout;
use crate::mover::move_safely;
use crate::record::FileRecord;
use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{Level, debug, info, span, warn};
use walkdir::WalkDir;

/// Progress slices of the three passes of a full scan
const FULL_SCREENSHOTS: (u8, u8) = (0, 15);
const FULL_LEFTOVERS: (u8, u8) = (15, 35);
const FULL_ARCHIVE: (u8, u8) = (35, 100);

/// Bucket a file was routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Screenshot,
    Compressed,
    Other,
    Duplicate,
    Sorted,
}

impl Category {
    /// Plain-text status tag used in messages
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Screenshot => "[screenshot]",
            Category::Compressed => "[compressed]",
            Category::Other => "[other]",
            Category::Duplicate => "[duplicate]",
            Category::Sorted => "[sorted]",
        }
    }
}

/// One completed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
}

/// Tally of a finished scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub screenshots: usize,
    pub compressed: usize,
    pub other: usize,
    pub duplicates: usize,
    pub sorted: usize,
    /// Entries skipped because they could not be read or moved
    pub failed: usize,
    /// Moves in the order they happened
    pub moves: Vec<MoveRecord>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful move
    pub fn record(&mut self, category: Category, source: PathBuf, destination: PathBuf) {
        match category {
            Category::Screenshot => self.screenshots += 1,
            Category::Compressed => self.compressed += 1,
            Category::Other => self.other += 1,
            Category::Duplicate => self.duplicates += 1,
            Category::Sorted => self.sorted += 1,
        }
        self.moves.push(MoveRecord {
            source,
            destination,
            category,
        });
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Screenshot => self.screenshots,
            Category::Compressed => self.compressed,
            Category::Other => self.other,
            Category::Duplicate => self.duplicates,
            Category::Sorted => self.sorted,
        }
    }

    pub fn total_moved(&self) -> usize {
        self.moves.len()
    }

    /// One-line tally in the active UI language
    pub fn summary(&self) -> String {
        [
            (t!("stat_screenshots"), self.screenshots),
            (t!("stat_compressed"), self.compressed),
            (t!("stat_other"), self.other),
            (t!("stat_duplicates"), self.duplicates),
            (t!("stat_sorted"), self.sorted),
            (t!("stat_failed"), self.failed),
        ]
        .iter()
        .map(|(label, count)| format!("{}: {}", label, count))
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Write the tally as pretty JSON
    pub fn save_report(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Everything one scan needs, fixed for its whole duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub layout: TriageLayout,
    pub mode: ScanMode,
    pub exclude_dirs: Vec<PathBuf>,
}

impl ScanRequest {
    pub fn new(staging_root: impl Into<PathBuf>, archive_root: impl Into<PathBuf>, mode: ScanMode) -> Self {
        Self {
            layout: TriageLayout::new(staging_root, archive_root),
            mode,
            exclude_dirs: Vec::new(),
        }
    }
}

impl From<&Config> for ScanRequest {
    fn from(config: &Config) -> Self {
        Self {
            layout: TriageLayout::new(&config.staging_dir, &config.archive_dir),
            mode: config.mode,
            exclude_dirs: config.exclude_dirs.clone(),
        }
    }
}

/// Run one scan to completion
///
/// Only an unreadable staging root is fatal; per-file problems are reported
/// as messages and counted in [`ScanResult::failed`].
pub fn run_scan(request: &ScanRequest, sink: &mut EventSink) -> Result<ScanResult> {
    let _span = span!(Level::INFO, "scan", mode = %request.mode).entered();
    Scanner::new(request, sink).run()
}

struct Scanner<'a> {
    request: &'a ScanRequest,
    sink: &'a mut EventSink,
    result: ScanResult,
}

impl<'a> Scanner<'a> {
    fn new(request: &'a ScanRequest, sink: &'a mut EventSink) -> Self {
        Self {
            request,
            sink,
            result: ScanResult::new(),
        }
    }

    fn run(mut self) -> Result<ScanResult> {
        let staging = self.request.layout.staging_root();
        self.sink
            .message(t!("scan_started", path = staging.display()).to_string());

        let files = self.collect_files()?;
        info!(count = files.len(), mode = %self.request.mode, "Found files");
        self.sink.message(
            t!("scan_found", count = files.len(), mode = self.request.mode).to_string(),
        );

        match self.request.mode {
            ScanMode::Duplicates => self.process_duplicates(&files),
            ScanMode::Trash => self.process_trash(&files),
            ScanMode::Full => self.process_full(&files),
        }

        self.sink.complete();
        info!(
            screenshots = self.result.screenshots,
            compressed = self.result.compressed,
            other = self.result.other,
            duplicates = self.result.duplicates,
            sorted = self.result.sorted,
            failed = self.result.failed,
            "Scan complete"
        );
        self.sink
            .message(t!("scan_done", summary = self.result.summary()).to_string());

        Ok(self.result)
    }

    /// List every regular file under the staging root, bucket folders excluded
    fn collect_files(&mut self) -> Result<Vec<FileRecord>> {
        let request = self.request;
        let layout = &request.layout;
        let staging = layout.staging_root();

        // An unreadable root is the one fatal case
        fs::read_dir(staging).map_err(|e| Error::StagingRoot {
            path: staging.to_path_buf(),
            source: e,
        })?;

        let mut files = Vec::new();
        let walker = WalkDir::new(staging)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() > 0
                    && e.file_type().is_dir()
                    && (layout.is_bucket_dir(e.path())
                        || is_excluded_dir(staging, e.path(), &request.exclude_dirs)))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| staging.display().to_string());
                    warn!(%path, error = %e, "Skipping unreadable entry");
                    self.sink
                        .message(t!("skipped_entry", path = path, error = e).to_string());
                    self.result.failed += 1;
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_dir() || !path.is_file() {
                continue;
            }

            match FileRecord::capture(path) {
                Ok(record) => files.push(record),
                Err(e) => {
                    warn!(?path, error = %e, "Skipping file that cannot be read");
                    self.sink.message(
                        t!("skipped_entry", path = path.display(), error = e).to_string(),
                    );
                    self.result.failed += 1;
                }
            }
        }

        Ok(files)
    }

    /// Flag media that already sits in its archive folder; nothing is archived
    fn process_duplicates(&mut self, files: &[FileRecord]) {
        let media: Vec<&FileRecord> = files.iter().filter(|f| classify::is_media_file(f)).collect();
        let total = media.len();

        for (i, file) in media.into_iter().enumerate() {
            let bucket = DateBucket::for_file(file);
            let archive_folder = self.request.layout.archive_folder(bucket);
            if classify::is_duplicate_in_folder(file, &archive_folder) {
                let duplicates = self.request.layout.duplicates();
                self.route(file, Category::Duplicate, &duplicates, Some(bucket));
            } else {
                debug!(path = ?file.path, %bucket, "Not a duplicate, leaving in place");
            }
            self.update_progress((0, 100), i + 1, total);
        }
    }

    /// Set aside screenshots, small media and non-media files
    fn process_trash(&mut self, files: &[FileRecord]) {
        let total = files.len();
        for (i, file) in files.iter().enumerate() {
            if classify::is_screenshot(file) {
                let folder = self.request.layout.screenshots();
                self.route(file, Category::Screenshot, &folder, None);
            } else if let Some(category) = leftover_category(file) {
                self.route_leftover(file, category);
            } else {
                debug!(path = ?file.path, "Large media, leaving in place");
            }
            self.update_progress((0, 100), i + 1, total);
        }
    }

    /// Three passes, each over what the earlier passes did not claim
    fn process_full(&mut self, files: &[FileRecord]) {
        // Pass 1: screenshots
        let screenshots: Vec<&FileRecord> = files.iter().filter(|f| classify::is_screenshot(f)).collect();
        let mut claimed: HashSet<&Path> = screenshots.iter().map(|f| f.path.as_path()).collect();

        let folder = self.request.layout.screenshots();
        let total = screenshots.len();
        for (i, file) in screenshots.into_iter().enumerate() {
            self.route(file, Category::Screenshot, &folder, None);
            self.update_progress(FULL_SCREENSHOTS, i + 1, total);
        }

        // Pass 2: small media and non-media among the rest
        let rest = unclaimed(files, &claimed);
        let total = rest.len();
        for (i, file) in rest.iter().enumerate() {
            if let Some(category) = leftover_category(file) {
                claimed.insert(file.path.as_path());
                self.route_leftover(file, category);
            }
            self.update_progress(FULL_LEFTOVERS, i + 1, total);
        }

        // Pass 3: what is left is large, non-screenshot media
        let media = unclaimed(files, &claimed);
        let total = media.len();
        for (i, file) in media.into_iter().enumerate() {
            let bucket = DateBucket::for_file(file);
            let archive_folder = self.request.layout.archive_folder(bucket);
            if classify::is_duplicate_in_folder(file, &archive_folder) {
                let duplicates = self.request.layout.duplicates();
                self.route(file, Category::Duplicate, &duplicates, Some(bucket));
            } else {
                self.route(file, Category::Sorted, &archive_folder, Some(bucket));
            }
            self.update_progress(FULL_ARCHIVE, i + 1, total);
        }
    }

    fn route_leftover(&mut self, file: &FileRecord, category: Category) {
        let folder = match category {
            Category::Compressed => self.request.layout.compressed(),
            _ => self.request.layout.other_files(),
        };
        self.route(file, category, &folder, None);
    }

    /// Move a file and account for the outcome; failures never stop the scan
    fn route(&mut self, file: &FileRecord, category: Category, folder: &Path, bucket: Option<DateBucket>) {
        match move_safely(&file.path, folder) {
            Ok(destination) => {
                info!(
                    source = ?file.path,
                    destination = ?destination,
                    category = category.tag(),
                    kind = classify::media_kind(&file.extension).map(|k| k.label()),
                    "Moved file"
                );
                let line = match bucket {
                    Some(bucket) => format!("{} {} → {}", category.tag(), file.name, bucket),
                    None => format!("{} {}", category.tag(), file.name),
                };
                self.sink.message(line);
                self.result.record(category, file.path.clone(), destination);
            }
            Err(e) => {
                warn!(source = ?file.path, ?folder, error = %e, "Failed to move file");
                self.sink
                    .message(t!("move_failed", name = file.name, error = e).to_string());
                self.result.failed += 1;
            }
        }
    }

    fn update_progress(&mut self, (start, end): (u8, u8), current: usize, total: usize) {
        if total == 0 {
            return;
        }
        let span = f64::from(end - start);
        let pct = f64::from(start) + span * (current as f64 / total as f64);
        self.sink.progress(pct as u8);
    }
}

/// Compressed for small media, Other for non-media, None for large media
fn leftover_category(file: &FileRecord) -> Option<Category> {
    let is_media = classify::is_media_file(file);
    if is_media && classify::is_small_file(file) {
        Some(Category::Compressed)
    } else if !is_media {
        Some(Category::Other)
    } else {
        None
    }
}

/// Files whose path is not in `claimed`, in enumeration order
fn unclaimed<'f>(files: &'f [FileRecord], claimed: &HashSet<&Path>) -> Vec<&'f FileRecord> {
    files
        .iter()
        .filter(|f| !claimed.contains(f.path.as_path()))
        .collect()
}

/// Check if a directory below the staging root matches an exclude entry
///
/// Absolute entries match by prefix; bare names match any folder of that
/// name below the root.
fn is_excluded_dir(staging: &Path, path: &Path, exclude_dirs: &[PathBuf]) -> bool {
    if exclude_dirs.is_empty() {
        return false;
    }

    let relative = path.strip_prefix(staging).unwrap_or(path);
    for exclude in exclude_dirs {
        if exclude.is_absolute() {
            if path.starts_with(exclude) {
                debug!(?path, ?exclude, "Excluding directory (absolute path match)");
                return true;
            }
        } else if let Some(exclude_name) = exclude.file_name() {
            for component in relative.components() {
                if let Component::Normal(name) = component
                    && name == exclude_name
                {
                    debug!(?path, ?exclude, "Excluding directory (folder name match)");
                    return true;
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScanEvent;
    use tempfile::tempdir;

    fn write(path: &Path, size: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![1u8; size]).unwrap();
    }

    #[test]
    fn test_scan_result_record_and_summary() {
        let mut result = ScanResult::new();
        result.record(Category::Screenshot, "a".into(), "b".into());
        result.record(Category::Sorted, "c".into(), "d".into());
        result.record(Category::Sorted, "e".into(), "f".into());
        result.failed = 1;

        assert_eq!(result.count(Category::Screenshot), 1);
        assert_eq!(result.count(Category::Sorted), 2);
        assert_eq!(result.total_moved(), 3);
        assert_eq!(result.moves[1].source, PathBuf::from("c"));

        let summary = result.summary();
        assert!(summary.contains(&format!("{}: 1", t!("stat_screenshots"))));
        assert!(summary.contains(&format!("{}: 2", t!("stat_sorted"))));
        assert!(summary.contains(&format!("{}: 1", t!("stat_failed"))));
    }

    #[test]
    fn test_report_round_trip() {
        let dir = tempdir().unwrap();
        let mut result = ScanResult::new();
        result.record(Category::Duplicate, "/t/a.jpg".into(), "/t/other/duplicates/a.jpg".into());

        let path = dir.path().join("reports").join("scan.json");
        result.save_report(&path).unwrap();
        let loaded: ScanResult = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, result);
        assert!(fs::read_to_string(&path).unwrap().contains("\"duplicate\""));
    }

    #[test]
    fn test_leftover_category() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("small.jpg"), 10);
        write(&dir.path().join("big.jpg"), 200 * 1024);
        write(&dir.path().join("doc.pdf"), 200 * 1024);

        let small = FileRecord::capture(&dir.path().join("small.jpg")).unwrap();
        let big = FileRecord::capture(&dir.path().join("big.jpg")).unwrap();
        let doc = FileRecord::capture(&dir.path().join("doc.pdf")).unwrap();
        assert_eq!(leftover_category(&small), Some(Category::Compressed));
        assert_eq!(leftover_category(&big), None);
        assert_eq!(leftover_category(&doc), Some(Category::Other));
    }

    #[test]
    fn test_is_excluded_dir() {
        let staging = Path::new("/data/.sync/temp");
        let excludes = vec![PathBuf::from(".thumbnails"), PathBuf::from("/data/.sync/temp/private")];

        assert!(is_excluded_dir(staging, &staging.join("a").join(".thumbnails"), &excludes));
        assert!(is_excluded_dir(staging, &staging.join("private"), &excludes));
        assert!(!is_excluded_dir(staging, &staging.join("holiday"), &excludes));
        // Components above the staging root do not count
        assert!(!is_excluded_dir(staging, &staging.join("x"), &[PathBuf::from(".sync")]));
    }

    #[test]
    fn test_missing_staging_root_is_fatal() {
        let dir = tempdir().unwrap();
        let request = ScanRequest::new(dir.path().join("missing"), dir.path().join("archive"), ScanMode::Full);
        let result = run_scan(&request, &mut EventSink::silent());
        assert!(matches!(result, Err(Error::StagingRoot { .. })));
    }

    #[test]
    fn test_bucket_folders_are_not_rescanned() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        let request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Trash);
        write(&request.layout.screenshots().join("screen1.png"), 10);
        write(&request.layout.other_files().join("doc.pdf"), 10);
        write(&staging.join("notes.txt"), 10);

        let result = run_scan(&request, &mut EventSink::silent()).unwrap();
        assert_eq!(result.other, 1);
        assert_eq!(result.screenshots, 0);
        assert!(request.layout.screenshots().join("screen1.png").exists());
        assert!(request.layout.other_files().join("notes.txt").exists());
        assert!(request.layout.other_files().join("doc.pdf").exists());
    }

    #[test]
    fn test_trash_mode_priorities() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        let request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Trash);
        write(&staging.join("big_screenshot.png"), 300 * 1024);
        write(&staging.join("tiny.jpg"), 1024);
        write(&staging.join("nested").join("report.docx"), 1024);
        write(&staging.join("holiday.jpg"), 300 * 1024);

        let (mut sink, rx) = EventSink::channel();
        let result = run_scan(&request, &mut sink).unwrap();
        drop(sink);

        assert_eq!(result.screenshots, 1);
        assert_eq!(result.compressed, 1);
        assert_eq!(result.other, 1);
        assert_eq!(result.sorted, 0);
        assert!(request.layout.screenshots().join("big_screenshot.png").exists());
        assert!(request.layout.compressed().join("tiny.jpg").exists());
        assert!(request.layout.other_files().join("report.docx").exists());
        assert!(staging.join("holiday.jpg").exists());

        let messages: Vec<String> = rx
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect();
        assert!(messages.iter().any(|m| m == "[screenshot] big_screenshot.png"));
        assert!(messages.iter().any(|m| m == "[compressed] tiny.jpg"));
        assert!(messages.iter().any(|m| m == "[other] report.docx"));
    }

    #[test]
    fn test_failed_move_does_not_stop_the_scan() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        let mut request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Trash);
        // A plain file occupies the compressed bucket folder
        write(&request.layout.compressed(), 10);
        request.exclude_dirs.push(PathBuf::from("other"));
        write(&staging.join("a_tiny.jpg"), 1024);
        write(&staging.join("b_notes.txt"), 1024);
        write(&staging.join("c_tiny.gif"), 1024);

        let (mut sink, rx) = EventSink::channel();
        let result = run_scan(&request, &mut sink).unwrap();
        drop(sink);

        assert_eq!(result.failed, 2);
        assert_eq!(result.compressed, 0);
        assert_eq!(result.other, 1);
        assert!(staging.join("a_tiny.jpg").exists());
        assert!(staging.join("c_tiny.gif").exists());
        assert!(request.layout.other_files().join("b_notes.txt").exists());

        let events: Vec<ScanEvent> = rx.iter().collect();
        let messages: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Message(m) => Some(m.as_str()),
                _ => None,
            })
            .collect();
        assert!(messages.iter().any(|m| m.starts_with("[failed] a_tiny.jpg: ")));
        assert!(messages.iter().any(|m| m.starts_with("[failed] c_tiny.gif: ")));
        assert!(messages.contains(&"[other] b_notes.txt"));
        let last_progress = events.iter().rev().find(|e| matches!(e, ScanEvent::Progress(_)));
        assert_eq!(last_progress, Some(&ScanEvent::Progress(100)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_triaged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        let request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Trash);
        let raw = OsStr::from_bytes(b"r\xe9sum\xe9.txt");
        write(&staging.join(raw), 10);

        let result = run_scan(&request, &mut EventSink::silent()).unwrap();
        assert_eq!(result.failed, 0);
        assert_eq!(result.other, 1);
        assert!(request.layout.other_files().join(raw).exists());
    }

    #[test]
    fn test_excluded_dirs_are_left_alone() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        let mut request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Trash);
        request.exclude_dirs.push(PathBuf::from("@eaDir"));
        write(&staging.join("@eaDir").join("thumb.txt"), 10);
        write(&staging.join("keep").join("notes.txt"), 10);

        let result = run_scan(&request, &mut EventSink::silent()).unwrap();
        assert_eq!(result.other, 1);
        assert!(staging.join("@eaDir").join("thumb.txt").exists());
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        for i in 0..7 {
            write(&staging.join(format!("doc{i}.txt")), 10);
            write(&staging.join(format!("shot{i}_screen.png")), 10);
            write(&staging.join(format!("photo{i}.jpg")), 150 * 1024);
        }
        let request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Full);

        let (mut sink, rx) = EventSink::channel();
        run_scan(&request, &mut sink).unwrap();
        drop(sink);

        let progress: Vec<u8> = rx
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
        assert_eq!(progress.last(), Some(&100));
        assert!(progress.contains(&15));
        assert!(progress.contains(&35));
    }

    #[test]
    fn test_empty_staging_still_completes() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        fs::create_dir_all(&staging).unwrap();
        let request = ScanRequest::new(&staging, dir.path().join("media"), ScanMode::Duplicates);

        let (mut sink, rx) = EventSink::channel();
        let result = run_scan(&request, &mut sink).unwrap();
        drop(sink);

        assert_eq!(result, ScanResult::new());
        let events: Vec<ScanEvent> = rx.iter().collect();
        assert!(events.contains(&ScanEvent::Progress(100)));
        assert!(matches!(events.last(), Some(ScanEvent::Message(_))));
    }
}
