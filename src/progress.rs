//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for observing an extraction run
//! and [`ProgressInfo`], the snapshot delivered for every attempted frame.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use thumbpick::{
//!     ExtractOptions, FrameOutcome, ProgressCallback, ProgressInfo, ThumbnailExtractor,
//!     ThumbpickError,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let FrameOutcome::Written(path) = &info.outcome {
//!             println!("[{}/{}] {}", info.current, info.total, path.display());
//!         }
//!     }
//! }
//!
//! let options = ExtractOptions::new().with_progress(Arc::new(PrintProgress));
//! let report = ThumbnailExtractor::new(options).extract("input.mp4")?;
//! # Ok::<(), ThumbpickError>(())
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::naming::FrameTimestamp;

/// What happened to the frame a [`ProgressInfo`] refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The frame was decoded and written to this path.
    Written(PathBuf),
    /// The frame could not be read and was skipped.
    Skipped(String),
    /// Sent once after the last frame.
    Finished,
}

/// A snapshot of extraction progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// How many frames have been attempted so far (1-based position).
    pub current: u64,
    /// Total frames selected for this run.
    pub total: u64,
    /// Completion percentage (0.0 to 100.0).
    pub percentage: f32,
    /// Wall-clock time elapsed since the run started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Source frame index of the attempted frame.
    pub frame_number: Option<u64>,
    /// Timestamp of the attempted frame.
    pub timestamp: Option<FrameTimestamp>,
    /// Result of the attempt.
    pub outcome: FrameOutcome,
}

/// Trait for receiving progress updates during extraction.
///
/// Progress callbacks are **infallible**: they observe but cannot halt the
/// run.
pub trait ProgressCallback: Send + Sync {
    /// Called after each frame attempt and once at the end of the run.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. Default when no callback is set.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one attempted frame and report it.
    pub(crate) fn advance(
        &mut self,
        frame_number: u64,
        timestamp: FrameTimestamp,
        outcome: FrameOutcome,
    ) {
        self.current += 1;
        self.report(Some(frame_number), Some(timestamp), outcome);
    }

    /// Unconditionally emit the final report.
    pub(crate) fn finish(&mut self) {
        self.report(None, None, FrameOutcome::Finished);
    }

    fn report(
        &self,
        frame_number: Option<u64>,
        timestamp: Option<FrameTimestamp>,
        outcome: FrameOutcome,
    ) {
        let elapsed = self.start_time.elapsed();

        let percentage = if self.total > 0 {
            (self.current as f32 / self.total as f32) * 100.0
        } else {
            100.0
        };

        let estimated_remaining = if self.current > 0 {
            let remaining = self.total.saturating_sub(self.current);
            let per_item = elapsed.div_f64(self.current as f64);
            Some(per_item.mul_f64(remaining as f64))
        } else {
            None
        };

        let info = ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            frame_number,
            timestamp,
            outcome,
        };

        self.callback.on_progress(&info);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        infos: Mutex<Vec<ProgressInfo>>,
    }

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.infos.lock().unwrap().push(info.clone());
        }
    }

    #[test]
    fn tracker_counts_attempts_and_finishes_at_full() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(recorder.clone(), 2);

        let timestamp = FrameTimestamp::of_frame(30, 30.0);
        tracker.advance(30, timestamp, FrameOutcome::Skipped("bad".to_string()));
        tracker.advance(60, timestamp, FrameOutcome::Written(PathBuf::from("a.png")));
        tracker.finish();

        let infos = recorder.infos.lock().unwrap();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].current, 1);
        assert_eq!(infos[0].frame_number, Some(30));
        assert!((infos[0].percentage - 50.0).abs() < f32::EPSILON);
        assert_eq!(infos[1].current, 2);
        assert_eq!(infos[2].outcome, FrameOutcome::Finished);
        assert_eq!(infos[2].frame_number, None);
        assert_eq!(infos[2].estimated_remaining, Some(Duration::ZERO));
    }

    #[test]
    fn empty_run_reports_complete() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(recorder.clone(), 0);
        tracker.finish();

        let infos = recorder.infos.lock().unwrap();
        assert_eq!(infos.len(), 1);
        assert!((infos[0].percentage - 100.0).abs() < f32::EPSILON);
        assert_eq!(infos[0].estimated_remaining, None);
    }
}
