//! # thumbpick
//!
//! Sample random frames from a video and save them as lossless PNG
//! thumbnails.
//!
//! `thumbpick` opens a video through FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate), draws a
//! uniform random sample of frame indices without replacement, seeks to and
//! decodes each one, and writes it to disk with a name that records where it
//! came from:
//!
//! ```text
//! thumbnail_03_frame_004500_02m30s.png
//!           ^^       ^^^^^^ ^^^^^^
//!           order    index  timestamp
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! let written = thumbpick::extract_thumbnails("input.mp4", 20, "thumbnails")?;
//! println!("{written} thumbnails written");
//! # Ok::<(), thumbpick::ThumbpickError>(())
//! ```
//!
//! ### Reproducible selection
//!
//! ```no_run
//! use thumbpick::{ExtractOptions, PngCompression, ThumbnailExtractor};
//!
//! let options = ExtractOptions::new()
//!     .with_count(12)
//!     .with_seed(42)
//!     .with_compression(PngCompression::Best)
//!     .with_output_dir("stills");
//! let report = ThumbnailExtractor::new(options).extract("input.mp4")?;
//! for skipped in &report.skipped {
//!     eprintln!("frame {} skipped: {}", skipped.frame_number, skipped.reason);
//! }
//! # Ok::<(), thumbpick::ThumbpickError>(())
//! ```
//!
//! ## Behaviour
//!
//! - Videos shorter than the requested count yield every frame, in order.
//! - A frame that fails to decode is skipped; the run continues.
//! - A missing or unreadable video is an error.
//! - Without a usable frame rate, the frame index stands in for seconds in
//!   file names.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod configuration;
pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod media;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod progress;
pub mod sampling;
pub mod source;
mod utilities;
pub mod video;

pub use configuration::{
    DEFAULT_OUTPUT_DIR, DEFAULT_THUMBNAIL_COUNT, ExtractOptions, PixelFormat, PngCompression,
};
pub use error::ThumbpickError;
pub use extractor::{
    ExtractionReport, SkippedFrame, ThumbnailExtractor, ThumbnailRecord, extract_thumbnails,
};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use media::MediaFile;
pub use metadata::{MediaMetadata, VideoMetadata};
pub use naming::{FrameTimestamp, frame_seconds, thumbnail_file_name};
pub use progress::{FrameOutcome, ProgressCallback, ProgressInfo};
pub use sampling::FrameSelection;
pub use source::FrameSource;
pub use video::VideoHandle;
