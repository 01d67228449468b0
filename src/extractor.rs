//! Random thumbnail extraction.
//!
//! [`ThumbnailExtractor`] samples frame indices from a video, decodes each
//! one and writes it as a PNG named after its position, frame index and
//! timestamp. A frame that fails to decode is skipped and the run carries on;
//! only problems with the source itself or with the output directory stop it.
//!
//! # Example
//!
//! ```no_run
//! use thumbpick::{ExtractOptions, ThumbnailExtractor, ThumbpickError};
//!
//! let options = ExtractOptions::new().with_count(8).with_output_dir("stills");
//! let report = ThumbnailExtractor::new(options).extract("input.mp4")?;
//! println!("wrote {} thumbnails", report.extracted_count());
//! # Ok::<(), ThumbpickError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{
    configuration::ExtractOptions,
    error::ThumbpickError,
    media::MediaFile,
    naming::{self, FrameTimestamp},
    output,
    progress::{FrameOutcome, ProgressTracker},
    sampling::FrameSelection,
    source::FrameSource,
};

/// One thumbnail written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailRecord {
    /// 1-based extraction order.
    pub position: usize,
    /// Source frame index.
    pub frame_number: u64,
    /// Timestamp encoded in the file name.
    pub timestamp: FrameTimestamp,
    /// Full path of the written file.
    pub path: PathBuf,
}

/// A selected frame that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFrame {
    /// 1-based extraction order.
    pub position: usize,
    /// Source frame index.
    pub frame_number: u64,
    /// Why the frame was skipped.
    pub reason: String,
}

/// Outcome of an extraction run.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractionReport {
    /// The frame indices that were attempted.
    pub selection: FrameSelection,
    /// Directory the thumbnails were written into.
    pub output_dir: PathBuf,
    /// Thumbnails written, in extraction order.
    pub thumbnails: Vec<ThumbnailRecord>,
    /// Frames that failed to decode, in extraction order.
    pub skipped: Vec<SkippedFrame>,
}

impl ExtractionReport {
    /// Number of thumbnails successfully written.
    pub fn extracted_count(&self) -> usize {
        self.thumbnails.len()
    }
}

/// Samples and writes thumbnails according to an [`ExtractOptions`].
#[derive(Debug, Clone, Default)]
pub struct ThumbnailExtractor {
    options: ExtractOptions,
}

impl ThumbnailExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open `video_path` and extract thumbnails from it.
    ///
    /// The output directory is only created once the video has been opened
    /// successfully. The video is closed before this returns, on success and
    /// on error alike.
    ///
    /// # Errors
    ///
    /// - [`ThumbpickError::InvalidSampleCount`] if the configured count is zero.
    /// - [`ThumbpickError::SourceNotFound`] if `video_path` does not exist.
    /// - [`ThumbpickError::FileOpen`] / [`ThumbpickError::NoVideoStream`] if
    ///   the file cannot be opened as a video.
    /// - [`ThumbpickError::IoError`] / [`ThumbpickError::ImageError`] if the
    ///   output directory or a thumbnail cannot be written.
    pub fn extract<P: AsRef<Path>>(
        &self,
        video_path: P,
    ) -> Result<ExtractionReport, ThumbpickError> {
        if self.options.count == 0 {
            return Err(ThumbpickError::InvalidSampleCount);
        }

        let mut media = MediaFile::open_video(video_path)?;
        self.run(&mut media)
    }

    /// Extract thumbnails from an already opened source.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](ThumbnailExtractor::extract), minus the open
    /// errors. Frame-local decode errors never surface here; they are listed
    /// in [`ExtractionReport::skipped`].
    pub fn run<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<ExtractionReport, ThumbpickError> {
        let video = source.video_metadata()?;
        let frames_per_second = video.frames_per_second;
        let total_frames = video.frame_count;

        let selection =
            FrameSelection::sample_seeded(total_frames, self.options.count, self.options.seed)?;

        let output_dir = self.options.output_dir.clone();
        output::ensure_output_dir(&output_dir)?;

        log::info!(
            "Extracting {} of {} requested thumbnails from {} frames into {}",
            selection.len(),
            selection.requested(),
            total_frames,
            output_dir.display(),
        );

        let mut tracker =
            ProgressTracker::new(self.options.progress.clone(), selection.len() as u64);
        let mut thumbnails = Vec::with_capacity(selection.len());
        let mut skipped = Vec::new();

        for (offset, &frame_number) in selection.indices().iter().enumerate() {
            let position = offset + 1;
            let timestamp = FrameTimestamp::of_frame(frame_number, frames_per_second);

            match source.read_frame(frame_number, self.options.pixel_format) {
                Ok(image) => {
                    let file_name = naming::thumbnail_file_name(position, frame_number, timestamp);
                    let path = output_dir.join(&file_name);
                    output::save_png(&image, &path, self.options.compression)?;

                    log::debug!(
                        "[{position}/{}] frame {frame_number} ({timestamp}) -> {file_name}",
                        selection.len(),
                    );
                    tracker.advance(frame_number, timestamp, FrameOutcome::Written(path.clone()));
                    thumbnails.push(ThumbnailRecord {
                        position,
                        frame_number,
                        timestamp,
                        path,
                    });
                }
                Err(error) if error.is_frame_local() => {
                    log::warn!("Could not read frame {frame_number}: {error}");
                    let reason = error.to_string();
                    tracker.advance(
                        frame_number,
                        timestamp,
                        FrameOutcome::Skipped(reason.clone()),
                    );
                    skipped.push(SkippedFrame {
                        position,
                        frame_number,
                        reason,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        tracker.finish();

        log::info!(
            "Extracted {} thumbnails to {} ({} skipped)",
            thumbnails.len(),
            output_dir.display(),
            skipped.len(),
        );

        Ok(ExtractionReport {
            selection,
            output_dir,
            thumbnails,
            skipped,
        })
    }
}

/// Extract `requested_count` random thumbnails from `video_path` into
/// `output_dir` with default settings, returning how many were written.
///
/// # Errors
///
/// See [`ThumbnailExtractor::extract`].
///
/// # Example
///
/// ```no_run
/// let written = thumbpick::extract_thumbnails("input.mp4", 20, "thumbnails")?;
/// println!("{written} thumbnails written");
/// # Ok::<(), thumbpick::ThumbpickError>(())
/// ```
pub fn extract_thumbnails<P: AsRef<Path>, Q: AsRef<Path>>(
    video_path: P,
    requested_count: u32,
    output_dir: Q,
) -> Result<usize, ThumbpickError> {
    let options = ExtractOptions::new()
        .with_count(requested_count)
        .with_output_dir(output_dir);
    let report = ThumbnailExtractor::new(options).extract(video_path)?;
    Ok(report.extracted_count())
}
