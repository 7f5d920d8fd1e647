//! Progress reporting for document uploads and ingestion jobs.
//!
//! Long-running operations emit events through an optional callback so the
//! CLI can print them while the library stays output-agnostic.

use crate::types::IngestionStatus;
use std::sync::Arc;
use std::time::Instant;

/// Progress event emitted during uploads and ingestion.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the operation: "upload" or "ingest"
    pub phase: String,

    /// Files uploaded or polls made so far
    pub current: u64,

    /// Total expected work (if known)
    pub total: Option<u64>,

    /// Percentage complete (0.0 - 100.0)
    pub percentage: Option<f64>,

    /// Human-readable message
    pub message: String,

    /// Elapsed time since the reporter was created
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    pub fn new(
        phase: impl Into<String>,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage = total.map(|t| {
            if t > 0 {
                (current as f64 / t as f64) * 100.0
            } else {
                0.0
            }
        });

        Self {
            phase: phase.into(),
            current,
            total,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = match self.total {
            Some(total) => format!("{}/{}", self.current, total),
            None => self.current.to_string(),
        };

        let pct = self
            .percentage
            .map(|p| format!(" ({:.0}%)", p))
            .unwrap_or_default();

        let elapsed = self
            .elapsed_secs
            .map(|s| format!(" [{:.0}s]", s))
            .unwrap_or_default();

        format!(
            "[{}] {}{} - {}{}",
            self.phase, progress, pct, self.message, elapsed
        )
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress reporter that emits events through a callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            start_time: Instant::now(),
        }
    }

    /// Create a reporter that emits nothing.
    pub fn noop() -> Self {
        Self {
            callback: None,
            start_time: Instant::now(),
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let event = event.with_elapsed(elapsed);

        tracing::debug!(
            phase = %event.phase,
            current = event.current,
            total = ?event.total,
            message = %event.message,
            elapsed_secs = elapsed,
            "Progress event"
        );

        if let Some(callback) = &self.callback {
            callback(event);
        }
    }

    /// One document stored.
    pub fn upload(&self, current: u64, total: Option<u64>, file: &str) {
        self.emit(ProgressEvent::new(
            "upload",
            current,
            total,
            format!("uploaded {}", file),
        ));
    }

    /// One status poll completed.
    pub fn ingest(&self, poll: u64, job_id: &str, status: IngestionStatus) {
        self.emit(ProgressEvent::new(
            "ingest",
            poll,
            None,
            format!("job {} is {}", job_id, status),
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::noop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_event_format() {
        let event = ProgressEvent::new("upload", 2, Some(4), "uploaded auto.pdf");
        let formatted = event.format_simple();
        assert!(formatted.starts_with("[upload] 2/4 (50%)"));
        assert!(formatted.contains("auto.pdf"));
    }

    #[test]
    fn test_reporter_emits_ingest_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let reporter = ProgressReporter::new(Arc::new(move |event: ProgressEvent| {
            sink.lock().unwrap().push(event);
        }));

        reporter.ingest(3, "job-1", IngestionStatus::Running);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].phase, "ingest");
        assert_eq!(captured[0].current, 3);
        assert!(captured[0].message.contains("running"));
        assert!(captured[0].elapsed_secs.is_some());
    }

    #[test]
    fn test_noop_reporter() {
        let reporter = ProgressReporter::noop();
        reporter.upload(1, None, "test.pdf");
    }
}
