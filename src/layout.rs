//! Triage folder layout
//!
//! Buckets live inside the staging folder under `other/`; sorted media goes
//! to `<archive>/YYYY/MM`. All paths are derived from the two roots.

use crate::classify::DateBucket;
use std::path::{Path, PathBuf};

/// Name of the triage area inside the staging folder
pub const TRIAGE_DIR: &str = "other";
pub const SCREENSHOTS_DIR: &str = "screenshots";
pub const COMPRESSED_DIR: &str = "compressed";
pub const DUPLICATES_DIR: &str = "duplicates";
pub const OTHER_FILES_DIR: &str = "other_files";

/// Computed bucket paths for one pair of roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageLayout {
    staging_root: PathBuf,
    archive_root: PathBuf,
}

impl TriageLayout {
    pub fn new(staging_root: impl Into<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            archive_root: archive_root.into(),
        }
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    /// `<staging>/other`
    pub fn triage_root(&self) -> PathBuf {
        self.staging_root.join(TRIAGE_DIR)
    }

    pub fn screenshots(&self) -> PathBuf {
        self.triage_root().join(SCREENSHOTS_DIR)
    }

    pub fn compressed(&self) -> PathBuf {
        self.triage_root().join(COMPRESSED_DIR)
    }

    pub fn duplicates(&self) -> PathBuf {
        self.triage_root().join(DUPLICATES_DIR)
    }

    pub fn other_files(&self) -> PathBuf {
        self.triage_root().join(OTHER_FILES_DIR)
    }

    /// The four bucket folders inside the staging tree
    pub fn bucket_dirs(&self) -> [PathBuf; 4] {
        [
            self.screenshots(),
            self.compressed(),
            self.duplicates(),
            self.other_files(),
        ]
    }

    /// Check if `path` is one of the bucket folders (never scanned as input)
    pub fn is_bucket_dir(&self, path: &Path) -> bool {
        self.bucket_dirs().iter().any(|dir| dir == path)
    }

    /// Dated archive folder for a bucket
    pub fn archive_folder(&self, bucket: DateBucket) -> PathBuf {
        bucket.folder(&self.archive_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_paths() {
        let layout = TriageLayout::new("/temp", "/media");
        let other = Path::new("/temp").join("other");
        assert_eq!(layout.screenshots(), other.join("screenshots"));
        assert_eq!(layout.compressed(), other.join("compressed"));
        assert_eq!(layout.duplicates(), other.join("duplicates"));
        assert_eq!(layout.other_files(), other.join("other_files"));
    }

    #[test]
    fn test_is_bucket_dir() {
        let layout = TriageLayout::new("/temp", "/media");
        assert!(layout.is_bucket_dir(&layout.duplicates()));
        assert!(!layout.is_bucket_dir(&layout.triage_root()));
        assert!(!layout.is_bucket_dir(Path::new("/temp/other/holiday")));
    }

    #[test]
    fn test_archive_folder() {
        let layout = TriageLayout::new("/temp", "/media");
        let folder = layout.archive_folder(DateBucket { year: 2023, month: 11 });
        assert_eq!(folder, Path::new("/media").join("2023").join("11"));
    }
}
