//! Scan sessions
//!
//! A [`Session`] launches scans on a background worker and guarantees that
//! at most one of them is running at a time. The caller reads progress,
//! messages and the final outcome from the returned [`ScanHandle`].

use crate::config::Config;
use crate::error::{Error, Result};
use crate::event::{EventSink, ScanEvent};
use crate::scan::{ScanRequest, ScanResult, run_scan};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info};

/// Launches scans, one at a time
#[derive(Debug, Clone, Default)]
pub struct Session {
    active: Arc<AtomicBool>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a scan is currently running
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Validate `config` and start a scan on a worker thread
    ///
    /// Fails with [`Error::ScanInProgress`] while another scan of this
    /// session has not finished.
    pub fn start(&self, config: &Config) -> Result<ScanHandle> {
        config.validate()?;

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::ScanInProgress);
        }
        let guard = ActiveGuard(Arc::clone(&self.active));

        let request = ScanRequest::from(config);
        let (mut sink, rx) = EventSink::channel();

        info!(
            staging = %config.staging_dir.display(),
            archive = %config.archive_dir.display(),
            mode = %config.mode,
            "Starting scan"
        );

        let handle = thread::Builder::new()
            .name("media-triage-scan".to_string())
            .spawn(move || {
                let _guard = guard;
                let outcome = run_scan(&request, &mut sink);
                match &outcome {
                    Ok(result) => sink.finish(result.clone()),
                    Err(e) => {
                        error!(error = %e, "Scan failed");
                        sink.fail(e.to_string());
                    }
                }
                outcome
            })?;

        Ok(ScanHandle { rx, handle })
    }
}

/// Clears the running flag when the worker ends, panics included
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Read side of one running scan
#[derive(Debug)]
pub struct ScanHandle {
    rx: Receiver<ScanEvent>,
    handle: JoinHandle<Result<ScanResult>>,
}

impl ScanHandle {
    /// Next event if one is queued
    pub fn try_recv(&self) -> Option<ScanEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next event
    ///
    /// `None` on timeout and once the worker has gone; use
    /// [`ScanHandle::is_finished`] to tell them apart.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScanEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Blocking iterator over the remaining events
    pub fn events(&self) -> impl Iterator<Item = ScanEvent> + '_ {
        self.rx.iter()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and return its outcome
    pub fn join(self) -> Result<ScanResult> {
        self.handle.join().map_err(|_| Error::WorkerPanicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanMode;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_invalid_config_is_rejected_before_start() {
        let session = Session::new();
        let config = Config::new("/temp", "/temp/archive", ScanMode::Full);
        assert!(matches!(session.start(&config), Err(Error::Validation(_))));
        assert!(!session.is_running());
    }

    #[test]
    fn test_second_start_is_refused_while_running() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        fs::create_dir_all(&staging).unwrap();
        let config = Config::new(&staging, dir.path().join("media"), ScanMode::Trash);

        let session = Session::new();
        // Hold the flag as a running scan would
        session.active.store(true, Ordering::Release);
        assert!(matches!(session.start(&config), Err(Error::ScanInProgress)));

        session.active.store(false, Ordering::Release);
        let handle = session.start(&config).unwrap();
        handle.join().unwrap();
        assert!(!session.is_running());
    }

    #[test]
    fn test_finished_event_carries_result() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("temp");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("notes.txt"), b"hello").unwrap();
        let config = Config::new(&staging, dir.path().join("media"), ScanMode::Full);

        let session = Session::new();
        let handle = session.start(&config).unwrap();
        let events: Vec<ScanEvent> = handle.events().collect();
        let result = handle.join().unwrap();

        assert_eq!(result.other, 1);
        assert_eq!(events.last(), Some(&ScanEvent::Finished(result)));
        assert!(events.contains(&ScanEvent::Progress(100)));
    }

    #[test]
    fn test_fatal_error_is_reported_and_flag_cleared() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().join("missing"), dir.path().join("media"), ScanMode::Full);

        let session = Session::new();
        let handle = session.start(&config).unwrap();
        let events: Vec<ScanEvent> = handle.events().collect();
        assert!(matches!(events.last(), Some(ScanEvent::Failed(_))));
        assert!(matches!(handle.join(), Err(Error::StagingRoot { .. })));
        assert!(!session.is_running());
    }
}
