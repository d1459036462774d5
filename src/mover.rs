//! Conflict-safe file relocation
//!
//! Moves never overwrite: a taken name is disambiguated as `name(1).ext`,
//! `name(2).ext`, ... Same-volume moves are a no-replace rename; a name that
//! gets taken in the meantime moves on to the next candidate. Cross-device moves copy
//! into a hidden temporary file next to the destination and persist it under
//! the final name without clobbering, so a half-written file never appears
//! under that name.

use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Move `source` into `target_folder`, keeping its name when free
///
/// Returns the final destination path.
pub fn move_safely(source: &Path, target_folder: &Path) -> Result<PathBuf> {
    fs::create_dir_all(target_folder).map_err(|e| Error::CreateDir {
        path: target_folder.to_path_buf(),
        source: e,
    })?;

    let file_name = source.file_name().ok_or_else(|| Error::InvalidFileName {
        path: source.to_path_buf(),
    })?;

    let mut candidates = CandidateNames::new(file_name);
    loop {
        let dest = free_destination(target_folder, &mut candidates)?;
        match rename_no_clobber(source, &dest) {
            Ok(Rename::Done) => {
                debug!(?source, ?dest, "Renamed file");
                return Ok(dest);
            }
            Ok(Rename::Taken) => {
                trace!(?dest, "Name claimed before rename");
            }
            Ok(Rename::NeedsCopy) => {
                debug!(?source, ?dest, "Cross-device move, copying instead");
                return copy_then_remove(source, target_folder, dest, &mut candidates);
            }
            Err(e) => {
                return Err(Error::Move {
                    source_path: source.to_path_buf(),
                    destination: dest,
                    source: e,
                });
            }
        }
    }
}

/// Copy into the first free name, then delete the source
fn copy_then_remove(
    source: &Path,
    target_folder: &Path,
    mut dest: PathBuf,
    candidates: &mut CandidateNames,
) -> Result<PathBuf> {
    loop {
        match copy_no_clobber(source, &dest) {
            Ok(()) => break,
            Err(CopyError::Taken) => {
                // Someone else claimed the name while we copied
                dest = free_destination(target_folder, candidates)?;
            }
            Err(CopyError::Io(e)) => {
                return Err(Error::Move {
                    source_path: source.to_path_buf(),
                    destination: dest,
                    source: e,
                });
            }
        }
    }
    fs::remove_file(source).map_err(|e| Error::Move {
        source_path: source.to_path_buf(),
        destination: dest.clone(),
        source: e,
    })?;
    Ok(dest)
}

/// Candidate file names: the original, then `stem(1).ext`, `stem(2).ext`, ...
struct CandidateNames {
    stem: OsString,
    extension: OsString,
    original: Option<OsString>,
    next_index: u32,
}

impl CandidateNames {
    fn new(file_name: &OsStr) -> Self {
        let path = Path::new(file_name);
        let stem = path.file_stem().unwrap_or(file_name).to_os_string();
        let extension = match path.extension() {
            Some(ext) => {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            }
            None => OsString::new(),
        };

        Self {
            stem,
            extension,
            original: Some(file_name.to_os_string()),
            next_index: 1,
        }
    }

    fn display_name(&self) -> String {
        let mut name = self.stem.clone();
        name.push(&self.extension);
        name.to_string_lossy().into_owned()
    }
}

impl Iterator for CandidateNames {
    type Item = OsString;

    fn next(&mut self) -> Option<OsString> {
        if let Some(original) = self.original.take() {
            return Some(original);
        }
        let index = self.next_index;
        self.next_index = self.next_index.checked_add(1)?;
        let mut name = self.stem.clone();
        name.push(format!("({})", index));
        name.push(&self.extension);
        Some(name)
    }
}

/// First candidate that does not exist in `folder` right now
fn free_destination(folder: &Path, candidates: &mut CandidateNames) -> Result<PathBuf> {
    for name in candidates.by_ref() {
        let path = folder.join(&name);
        if fs::symlink_metadata(&path).is_err() {
            return Ok(path);
        }
        trace!(?path, "Name taken");
    }
    Err(Error::CollisionExhausted {
        name: candidates.display_name(),
        folder: folder.to_path_buf(),
    })
}

/// Outcome of a rename that refuses to replace its destination
#[derive(Debug, PartialEq, Eq)]
enum Rename {
    Done,
    /// Destination exists
    Taken,
    /// Different volume, or no atomic no-replace rename here
    NeedsCopy,
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn rename_no_clobber(source: &Path, dest: &Path) -> io::Result<Rename> {
    use nix::errno::Errno;
    use nix::fcntl::{AT_FDCWD, RenameFlags, renameat2};

    match renameat2(AT_FDCWD, source, AT_FDCWD, dest, RenameFlags::RENAME_NOREPLACE) {
        Ok(()) => Ok(Rename::Done),
        Err(Errno::EEXIST) => Ok(Rename::Taken),
        // EINVAL: the file system does not support RENAME_NOREPLACE
        Err(Errno::EXDEV | Errno::EINVAL | Errno::ENOSYS) => Ok(Rename::NeedsCopy),
        Err(e) => Err(io::Error::from(e)),
    }
}

/// Hard link under the new name, then unlink the old one
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn rename_no_clobber(source: &Path, dest: &Path) -> io::Result<Rename> {
    match fs::hard_link(source, dest) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(dest);
                return Err(e);
            }
            Ok(Rename::Done)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Rename::Taken),
        Err(e) if is_cross_device(&e) || e.kind() == io::ErrorKind::Unsupported => {
            Ok(Rename::NeedsCopy)
        }
        Err(e) => Err(e),
    }
}

#[cfg(all(unix, not(all(target_os = "linux", target_env = "gnu"))))]
fn is_cross_device(error: &io::Error) -> bool {
    error.raw_os_error() == Some(nix::errno::Errno::EXDEV as i32)
}

#[cfg(not(unix))]
fn is_cross_device(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::CrossesDevices
}

enum CopyError {
    /// Destination name appeared while copying
    Taken,
    Io(io::Error),
}

impl From<io::Error> for CopyError {
    fn from(e: io::Error) -> Self {
        CopyError::Io(e)
    }
}

/// Copy `source` to `dest` through a temporary file in the same folder
fn copy_no_clobber(source: &Path, dest: &Path) -> std::result::Result<(), CopyError> {
    let folder = dest.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(".triage-")
        .suffix(".part")
        .tempfile_in(folder)?;

    {
        let mut reader = BufReader::with_capacity(256 * 1024, File::open(source)?);
        let mut writer = BufWriter::with_capacity(256 * 1024, temp.as_file());
        io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    // Preserve modification time
    if let Ok(metadata) = fs::metadata(source)
        && let Ok(mtime) = metadata.modified()
    {
        let _ = filetime::set_file_mtime(temp.path(), filetime::FileTime::from_system_time(mtime));
    }

    match temp.persist_noclobber(dest) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Err(CopyError::Taken),
        Err(e) => Err(CopyError::Io(e.error)),
    }
}
