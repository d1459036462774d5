//! Snapshot of a discovered file

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Read-only snapshot of a file taken when the staging tree is enumerated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Full path of the file
    pub path: PathBuf,
    /// File name including extension, lossily decoded for display
    pub name: String,
    /// Lower-cased extension without the dot (empty when absent)
    pub extension: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Last status change time (creation time where the platform has no ctime)
    pub changed: SystemTime,
}

impl FileRecord {
    /// Stat `path` and capture a record
    pub fn capture(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        Self::from_metadata(path, &metadata)
    }

    /// Build a record from already-read metadata
    pub fn from_metadata(path: &Path, metadata: &fs::Metadata) -> Result<Self> {
        let name = path
            .file_name()
            .ok_or_else(|| Error::InvalidFileName {
                path: path.to_path_buf(),
            })?
            .to_string_lossy()
            .into_owned();

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let modified = metadata.modified()?;
        let changed = status_change_time(metadata).unwrap_or(modified);

        Ok(Self {
            path: path.to_path_buf(),
            name,
            extension,
            size: metadata.len(),
            modified,
            changed,
        })
    }

    /// Raw file name as stored on disk
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }

    /// File name without the extension
    pub fn stem(&self) -> Cow<'_, str> {
        match self.path.file_stem() {
            Some(stem) => stem.to_string_lossy(),
            None => Cow::Borrowed(&self.name),
        }
    }

    /// The earlier of the change and modification times; decides the archive folder
    pub fn earliest_time(&self) -> SystemTime {
        self.changed.min(self.modified)
    }
}

#[cfg(unix)]
fn status_change_time(metadata: &fs::Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn status_change_time(metadata: &fs::Metadata) -> Option<SystemTime> {
    metadata.created().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_capture_reads_name_extension_and_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Holiday.JPG");
        fs::write(&path, vec![0u8; 1234]).unwrap();

        let record = FileRecord::capture(&path).unwrap();
        assert_eq!(record.name, "Holiday.JPG");
        assert_eq!(record.extension, "jpg");
        assert_eq!(record.stem(), "Holiday");
        assert_eq!(record.size, 1234);
    }

    #[test]
    fn test_capture_without_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("README");
        fs::write(&path, b"text").unwrap();

        let record = FileRecord::capture(&path).unwrap();
        assert_eq!(record.extension, "");
        assert_eq!(record.stem(), "README");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_capture_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9_screenshot.PNG");
        let path = dir.path().join(raw);
        fs::write(&path, b"x").unwrap();

        let record = FileRecord::capture(&path).unwrap();
        assert_eq!(record.file_name(), raw);
        assert_eq!(record.extension, "png");
        assert!(record.stem().ends_with("_screenshot"));
        assert!(record.name.starts_with("caf"));
    }

    #[test]
    fn test_capture_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(FileRecord::capture(&dir.path().join("gone.jpg")).is_err());
    }

    #[test]
    fn test_earliest_time_takes_minimum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        fs::write(&path, b"x").unwrap();

        let mut record = FileRecord::capture(&path).unwrap();
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        record.modified = old;
        record.changed = old + Duration::from_secs(3600);
        assert_eq!(record.earliest_time(), old);

        record.changed = old - Duration::from_secs(60);
        assert_eq!(record.earliest_time(), old - Duration::from_secs(60));
    }
}
