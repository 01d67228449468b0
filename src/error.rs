//! Error types for the `thumbpick` crate.
//!
//! This module defines [`ThumbpickError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry file paths, frame
//! numbers, and upstream messages so callers can report them as-is.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `thumbpick` operations.
///
/// Errors fall into two groups. [`SourceNotFound`](ThumbpickError::SourceNotFound),
/// [`FileOpen`](ThumbpickError::FileOpen),
/// [`NoVideoStream`](ThumbpickError::NoVideoStream) and
/// [`InvalidSampleCount`](ThumbpickError::InvalidSampleCount) abort a run.
/// Decode-side errors raised while reading a single frame are recorded by the
/// extractor as skipped frames and the run continues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThumbpickError {
    /// The input path does not exist.
    #[error("Video file not found: {}", path.display())]
    SourceNotFound {
        /// Path that was passed in.
        path: PathBuf,
    },

    /// The media file exists but could not be opened.
    #[error("Could not open video file {}: {reason}", path.display())]
    FileOpen {
        /// Path that was passed to [`crate::MediaFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A zero sample size was requested.
    #[error("Requested thumbnail count must be greater than zero")]
    InvalidSampleCount,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The requested frame number exceeds the total frame count.
    #[error("Frame {frame_number} is out of range (video has {total_frames} frames)")]
    FrameOutOfRange {
        /// The frame number that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while creating the output directory or a file.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a thumbnail.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl ThumbpickError {
    /// Returns `true` for errors that only affect the frame being read.
    ///
    /// The extractor skips a frame that fails with one of these and carries
    /// on with the next index.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            ThumbpickError::VideoDecodeError(_)
                | ThumbpickError::FrameOutOfRange { .. }
                | ThumbpickError::FfmpegError(_)
        )
    }
}

impl From<FfmpegError> for ThumbpickError {
    fn from(error: FfmpegError) -> Self {
        ThumbpickError::FfmpegError(error.to_string())
    }
}
