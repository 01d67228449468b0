//! The frame-source abstraction driven by the extractor.

use image::DynamicImage;

use crate::{
    configuration::PixelFormat, error::ThumbpickError, media::MediaFile, metadata::VideoMetadata,
};

/// Anything that can report video metadata and decode a frame by index.
///
/// [`MediaFile`] is the FFmpeg-backed implementation. The extractor only
/// talks to this trait, so it can be driven by other decoders as well.
pub trait FrameSource {
    /// Metadata of the video stream frames are read from.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbpickError::NoVideoStream`] when there is none.
    fn video_metadata(&self) -> Result<&VideoMetadata, ThumbpickError>;

    /// Seek to `frame_number` and decode that one frame.
    ///
    /// # Errors
    ///
    /// Any error here is treated as affecting only this frame when
    /// [`ThumbpickError::is_frame_local`] says so.
    fn read_frame(
        &mut self,
        frame_number: u64,
        pixel_format: PixelFormat,
    ) -> Result<DynamicImage, ThumbpickError>;
}

impl FrameSource for MediaFile {
    fn video_metadata(&self) -> Result<&VideoMetadata, ThumbpickError> {
        self.metadata
            .video
            .as_ref()
            .ok_or(ThumbpickError::NoVideoStream)
    }

    fn read_frame(
        &mut self,
        frame_number: u64,
        pixel_format: PixelFormat,
    ) -> Result<DynamicImage, ThumbpickError> {
        self.video().frame_with_format(frame_number, pixel_format)
    }
}
