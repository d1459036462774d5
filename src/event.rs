//! Scan events
//!
//! A scan reports to its caller through a channel of [`ScanEvent`]s. The
//! engine writes through an [`EventSink`], which keeps progress
//! non-decreasing and mirrors every message into the log.

use crate::scan::ScanResult;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::info;

/// Log target of mirrored scan messages
pub const EVENTS_TARGET: &str = "media_triage::events";

/// Notification emitted while a scan runs
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// Overall progress in percent (0-100)
    Progress(u8),
    /// Human-readable status line
    Message(String),
    /// Scan completed; carries the final tally
    Finished(ScanResult),
    /// Scan aborted before any file was processed
    Failed(String),
}

/// Write side of the event channel
#[derive(Debug)]
pub struct EventSink {
    tx: Option<Sender<ScanEvent>>,
    progress: u8,
}

impl EventSink {
    /// Create a sink and the receiver reading from it
    pub fn channel() -> (Self, Receiver<ScanEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    pub fn new(tx: Sender<ScanEvent>) -> Self {
        Self {
            tx: Some(tx),
            progress: 0,
        }
    }

    /// Sink that only logs
    pub fn silent() -> Self {
        Self { tx: None, progress: 0 }
    }

    /// Last percentage sent
    pub fn last_progress(&self) -> u8 {
        self.progress
    }

    /// Report progress; values below or equal to the last one are dropped
    pub fn progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent <= self.progress {
            return;
        }
        self.progress = percent;
        self.send(ScanEvent::Progress(percent));
    }

    /// Final 100% tick, sent even when 100 was already reached
    pub fn complete(&mut self) {
        self.progress = 100;
        self.send(ScanEvent::Progress(100));
    }

    pub fn message(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(target: EVENTS_TARGET, "{}", text);
        self.send(ScanEvent::Message(text));
    }

    pub fn finish(&mut self, result: ScanResult) {
        self.send(ScanEvent::Finished(result));
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.send(ScanEvent::Failed(error.into()));
    }

    fn send(&self, event: ScanEvent) {
        if let Some(tx) = &self.tx {
            // A caller that stopped listening does not stop the scan
            let _ = tx.send(event);
        }
    }
}
