//! Frame timestamps and thumbnail file names.
//!
//! A thumbnail's name records where it came from:
//! `thumbnail_{position:02}_frame_{frame:06}_{minutes:02}m{seconds:02}s.png`.
//! The position is the 1-based extraction order, so a directory listing sorts
//! in the same order as the source video.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Whole minutes and seconds into the video.
///
/// When the frame rate is unknown the raw frame index stands in for the
/// number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTimestamp {
    /// Whole minutes.
    pub minutes: u64,
    /// Whole seconds past the minute, `0..60`.
    pub seconds: u64,
}

impl FrameTimestamp {
    /// Timestamp of `frame_number` at `frames_per_second`.
    ///
    /// # Example
    ///
    /// ```
    /// use thumbpick::FrameTimestamp;
    ///
    /// let ts = FrameTimestamp::of_frame(4500, 30.0);
    /// assert_eq!((ts.minutes, ts.seconds), (2, 30));
    ///
    /// // No usable frame rate: the index is used as seconds.
    /// let ts = FrameTimestamp::of_frame(75, 0.0);
    /// assert_eq!((ts.minutes, ts.seconds), (1, 15));
    /// ```
    pub fn of_frame(frame_number: u64, frames_per_second: f64) -> Self {
        Self::from_seconds(frame_seconds(frame_number, frames_per_second))
    }

    /// Split a non-negative second count into whole minutes and seconds.
    pub fn from_seconds(total_seconds: f64) -> Self {
        let total_seconds = total_seconds.max(0.0);
        Self {
            minutes: (total_seconds / 60.0).floor() as u64,
            seconds: (total_seconds % 60.0).floor() as u64,
        }
    }
}

impl Display for FrameTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Seconds into the video for `frame_number`.
///
/// Falls back to the frame index itself when `frames_per_second` is zero,
/// negative or NaN.
pub fn frame_seconds(frame_number: u64, frames_per_second: f64) -> f64 {
    if frames_per_second > 0.0 {
        frame_number as f64 / frames_per_second
    } else {
        frame_number as f64
    }
}

/// File name for the thumbnail at 1-based `position` taken from `frame_number`.
///
/// # Example
///
/// ```
/// use thumbpick::{FrameTimestamp, thumbnail_file_name};
///
/// let name = thumbnail_file_name(3, 4500, FrameTimestamp::of_frame(4500, 30.0));
/// assert_eq!(name, "thumbnail_03_frame_004500_02m30s.png");
/// ```
pub fn thumbnail_file_name(
    position: usize,
    frame_number: u64,
    timestamp: FrameTimestamp,
) -> String {
    format!(
        "thumbnail_{position:02}_frame_{frame_number:06}_{:02}m{:02}s.png",
        timestamp.minutes, timestamp.seconds,
    )
}
