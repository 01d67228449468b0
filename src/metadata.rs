//! What a video reports about itself when it is opened.
//!
//! [`MediaFile::metadata`](crate::MediaFile::metadata) returns a
//! [`MediaMetadata`] read once at open time. The extractor only needs the
//! video part: frame count and frame rate drive sampling and naming.

use std::time::Duration;

/// Container-level facts plus the selected video stream.
///
/// # Example
///
/// ```no_run
/// use thumbpick::MediaFile;
///
/// let media = MediaFile::open("input.mp4")?;
/// if let Some(video) = &media.metadata().video {
///     println!("{} frames at {:.2} fps", video.frame_count, video.frames_per_second);
/// }
/// # Ok::<(), thumbpick::ThumbpickError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct MediaMetadata {
    /// Metadata of the best video stream, if one is present.
    pub video: Option<VideoMetadata>,
    /// Container-level duration. Zero when the container does not report one.
    pub duration: Duration,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`, `"matroska,webm"`).
    pub format: String,
}

/// Dimensions, rate and length of one video stream.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frames per second. Zero when the stream does not declare a rate.
    pub frames_per_second: f64,
    /// Total number of frames.
    ///
    /// Taken from the stream header when the container records it, otherwise
    /// estimated from duration and frame rate.
    pub frame_count: u64,
    /// Decoder name, `"unknown"` if FFmpeg has none for the stream.
    pub codec: String,
    /// Index of the stream inside the container.
    pub stream_index: usize,
}

impl VideoMetadata {
    /// Returns `true` when the stream declares a usable frame rate.
    pub fn has_frame_rate(&self) -> bool {
        self.frames_per_second > 0.0
    }

    /// Playback length derived from frame count and frame rate.
    ///
    /// Zero when the frame rate is unknown.
    pub fn estimated_duration(&self) -> Duration {
        if self.has_frame_rate() {
            Duration::from_secs_f64(self.frame_count as f64 / self.frames_per_second)
        } else {
            Duration::ZERO
        }
    }
}
