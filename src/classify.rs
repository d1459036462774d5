//! File classification rules
//!
//! Pure predicates over a [`FileRecord`] deciding which triage bucket a file
//! belongs to:
//! - media type by extension allow-list
//! - screenshot by filename keywords
//! - small ("compressed") media by size
//! - duplicate by name and size against an archive folder
//! - archive date folder from file timestamps

use crate::record::FileRecord;
use chrono::{DateTime, Datelike, Local};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;
use tracing::trace;

/// Files strictly below this size (100 KiB) count as compressed media
pub const SMALL_FILE_THRESHOLD: u64 = 100 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "heic"];
const RAW_EXTENSIONS: &[&str] = &["cr2", "nef", "arw", "dng"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "ts"];

/// Substrings marking a screen capture, matched against the lower-cased stem
const SCREENSHOT_KEYWORDS: &[&str] = &[
    "screenshot",
    "screen",
    "скрин",
    "printscreen",
    "prnt",
    "ss",
    "capture",
    "screencap",
    "screen_cap",
    "screengrab",
    "screen_grab",
    "snapshot",
    "screencapture",
    "prntscrn",
    "запись экрана",
    "снимок экрана",
];

static SCREENSHOT_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Initialize SCREENSHOT_PATTERN on first use
fn screenshot_pattern() -> &'static Regex {
    SCREENSHOT_PATTERN.get_or_init(|| {
        let alternation = SCREENSHOT_KEYWORDS
            .iter()
            .map(|kw| regex::escape(kw))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).expect("escaped keyword alternation is a valid regex")
    })
}

/// Media family of a supported extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Photo files (jpg, png, etc.)
    Image,
    /// Camera RAW files (cr2, nef, etc.)
    Raw,
    /// Video files (mp4, mov, etc.)
    Video,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Raw => "raw",
            MediaKind::Video => "video",
        }
    }
}

/// Media family for an extension (any case, without the dot)
pub fn media_kind(extension: &str) -> Option<MediaKind> {
    let ext = extension.to_lowercase();
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Image)
    } else if RAW_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Raw)
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Check if a file is a supported photo, RAW or video file
pub fn is_media_file(file: &FileRecord) -> bool {
    media_kind(&file.extension).is_some()
}

/// Check if a size is below the compressed-media threshold
pub fn is_small_size(size: u64) -> bool {
    size < SMALL_FILE_THRESHOLD
}

/// Check if a file is below the compressed-media threshold
pub fn is_small_file(file: &FileRecord) -> bool {
    is_small_size(file.size)
}

/// Check if a file stem contains a screenshot keyword
pub fn is_screenshot_stem(stem: &str) -> bool {
    screenshot_pattern().is_match(&stem.to_lowercase())
}

/// Check if a file is a screenshot; only the name matters, never the size
pub fn is_screenshot(file: &FileRecord) -> bool {
    is_screenshot_stem(&file.stem())
}

/// Check if `target_folder` already holds a file with the same name and size
///
/// The target is stat'ed at call time. Content is not compared.
pub fn is_duplicate_in_folder(file: &FileRecord, target_folder: &Path) -> bool {
    let target = target_folder.join(file.file_name());
    match fs::metadata(&target) {
        Ok(metadata) if metadata.is_file() => {
            trace!(?target, existing = metadata.len(), incoming = file.size, "Comparing sizes");
            metadata.len() == file.size
        }
        _ => false,
    }
}

/// Year and month an archived file is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateBucket {
    pub year: i32,
    pub month: u32,
}

impl DateBucket {
    /// Bucket for a point in time, in local time
    pub fn from_time(time: SystemTime) -> Self {
        let local: DateTime<Local> = time.into();
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    /// Bucket for a file, from the earlier of its change and modification times
    pub fn for_file(file: &FileRecord) -> Self {
        Self::from_time(file.earliest_time())
    }

    /// Archive folder `<archive_root>/YYYY/MM`
    pub fn folder(&self, archive_root: &Path) -> PathBuf {
        archive_root
            .join(format!("{}", self.year))
            .join(format!("{:02}", self.month))
    }
}

impl std::fmt::Display for DateBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record_named(dir: &Path, name: &str, size: usize) -> FileRecord {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; size]).unwrap();
        FileRecord::capture(&path).unwrap()
    }

    #[test]
    fn test_media_extensions_any_case() {
        for ext in IMAGE_EXTENSIONS
            .iter()
            .chain(RAW_EXTENSIONS)
            .chain(VIDEO_EXTENSIONS)
        {
            assert!(media_kind(ext).is_some(), "{ext}");
            assert!(media_kind(&ext.to_uppercase()).is_some(), "{ext}");
        }
        assert_eq!(media_kind("JpEg"), Some(MediaKind::Image));
        assert_eq!(media_kind("NEF"), Some(MediaKind::Raw));
        assert_eq!(media_kind("Mov"), Some(MediaKind::Video));
    }

    #[test]
    fn test_non_media_extensions() {
        assert_eq!(media_kind("txt"), None);
        assert_eq!(media_kind("docx"), None);
        assert_eq!(media_kind("webp"), None);
        assert_eq!(media_kind(""), None);
    }

    #[test]
    fn test_is_media_file_uses_record_extension() {
        let dir = tempdir().unwrap();
        assert!(is_media_file(&record_named(dir.path(), "IMG_0001.JPG", 10)));
        assert!(is_media_file(&record_named(dir.path(), "clip.Mp4", 10)));
        assert!(!is_media_file(&record_named(dir.path(), "notes.txt", 10)));
        assert!(!is_media_file(&record_named(dir.path(), "jpg", 10)));
    }

    #[test]
    fn test_small_file_boundary() {
        assert!(is_small_size(0));
        assert!(is_small_size(102_399));
        assert!(!is_small_size(102_400));
        assert!(!is_small_size(5 * 1024 * 1024));
    }

    #[test]
    fn test_screenshot_keywords() {
        assert!(is_screenshot_stem("My_Screenshot_2024"));
        assert!(is_screenshot_stem("скрин1"));
        assert!(is_screenshot_stem("СКРИН_экрана"));
        assert!(is_screenshot_stem("Запись экрана 2024-01-02"));
        assert!(is_screenshot_stem("Снимок экрана от 2024"));
        assert!(is_screenshot_stem("prntscrn_001"));
        assert!(is_screenshot_stem("WindowCapture"));
        // "ss" is a plain substring, so it also hits ordinary words
        assert!(is_screenshot_stem("glass"));

        assert!(!is_screenshot_stem("IMG_20240301_120000"));
        assert!(!is_screenshot_stem("holiday"));
    }

    #[test]
    fn test_screenshot_ignores_size_and_extension() {
        let dir = tempdir().unwrap();
        let large = record_named(dir.path(), "Screen_recording.mp4", 200 * 1024);
        assert!(is_screenshot(&large));

        let small = record_named(dir.path(), "photo.jpg", 10);
        assert!(!is_screenshot(&small));

        // The extension is not part of the stem
        let ext_only = record_named(dir.path(), "photo.screen", 10);
        assert!(!is_screenshot(&ext_only));
    }

    #[test]
    fn test_duplicate_needs_same_name_and_size() {
        let source_dir = tempdir().unwrap();
        let target_dir = tempdir().unwrap();
        fs::write(target_dir.path().join("photo.jpg"), vec![0u8; 1000]).unwrap();

        let same = record_named(source_dir.path(), "photo.jpg", 1000);
        assert!(is_duplicate_in_folder(&same, target_dir.path()));

        fs::write(source_dir.path().join("photo.jpg"), vec![0u8; 999]).unwrap();
        let smaller = FileRecord::capture(&source_dir.path().join("photo.jpg")).unwrap();
        assert!(!is_duplicate_in_folder(&smaller, target_dir.path()));

        let other_name = record_named(source_dir.path(), "other.jpg", 1000);
        assert!(!is_duplicate_in_folder(&other_name, target_dir.path()));
    }

    #[test]
    fn test_duplicate_missing_folder() {
        let dir = tempdir().unwrap();
        let file = record_named(dir.path(), "photo.jpg", 10);
        assert!(!is_duplicate_in_folder(&file, &dir.path().join("2024").join("03")));
    }

    #[test]
    fn test_date_bucket_folder() {
        let time: SystemTime = Local
            .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
            .single()
            .unwrap()
            .into();
        let bucket = DateBucket::from_time(time);
        assert_eq!(bucket, DateBucket { year: 2024, month: 3 });
        assert_eq!(bucket.to_string(), "2024/03");
        assert_eq!(
            bucket.folder(Path::new("/media")),
            Path::new("/media").join("2024").join("03")
        );
    }
}
