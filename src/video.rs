//! Video frame decoding.
//!
//! This module provides [`VideoHandle`], which seeks the demuxer to a frame
//! index and decodes that single frame into an [`image::DynamicImage`].

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use ffmpeg_sys_next::AV_TIME_BASE;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::{configuration::PixelFormat, error::ThumbpickError, media::MediaFile, utilities};

/// Frame decoding operations.
///
/// Obtained via [`MediaFile::video`]. Each call builds a fresh decoder, seeks,
/// and decodes forward to the requested frame. The decoder is dropped when
/// the call returns.
pub struct VideoHandle<'a> {
    pub(crate) media: &'a mut MediaFile,
}

/// Works out which frame index a decoded frame sits at.
enum FrameLocator {
    /// Map presentation timestamps to indices through the frame rate.
    Timestamp {
        time_base: Rational,
        start_pts: i64,
        frames_per_second: f64,
    },
    /// No usable frame rate: count frames from the start of the stream.
    Ordinal { next: u64 },
}

impl FrameLocator {
    fn locate(&mut self, frame: &VideoFrame) -> u64 {
        match self {
            FrameLocator::Timestamp {
                time_base,
                start_pts,
                frames_per_second,
            } => {
                let pts = frame.timestamp().or(frame.pts()).unwrap_or(*start_pts);
                utilities::pts_to_frame_number(pts, *start_pts, *time_base, *frames_per_second)
            }
            FrameLocator::Ordinal { next } => {
                let current = *next;
                *next += 1;
                current
            }
        }
    }
}

impl<'a> VideoHandle<'a> {
    /// Decode a single frame by index (0-based) as RGB8.
    ///
    /// # Errors
    ///
    /// See [`frame_with_format`](VideoHandle::frame_with_format).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use thumbpick::MediaFile;
    ///
    /// let mut media = MediaFile::open("input.mp4")?;
    /// let frame = media.video().frame(100)?;
    /// frame.save("frame_100.png")?;
    /// # Ok::<(), thumbpick::ThumbpickError>(())
    /// ```
    pub fn frame(&mut self, frame_number: u64) -> Result<DynamicImage, ThumbpickError> {
        self.frame_with_format(frame_number, PixelFormat::Rgb8)
    }

    /// Decode a single frame by index (0-based) in the given pixel format.
    ///
    /// With a known frame rate this seeks to the nearest keyframe at or before
    /// the target and decodes forward until a frame at or past the target
    /// index appears. Without one it rewinds to the start and counts frames.
    ///
    /// # Errors
    ///
    /// - [`ThumbpickError::NoVideoStream`] if the file has no video.
    /// - [`ThumbpickError::FrameOutOfRange`] if `frame_number` is not below
    ///   the known frame count.
    /// - [`ThumbpickError::VideoDecodeError`] if the stream ends before the
    ///   frame is reached.
    /// - [`ThumbpickError::FfmpegError`] if seeking or decoding fails.
    pub fn frame_with_format(
        &mut self,
        frame_number: u64,
        pixel_format: PixelFormat,
    ) -> Result<DynamicImage, ThumbpickError> {
        let video_stream_index = self
            .media
            .video_stream_index
            .ok_or(ThumbpickError::NoVideoStream)?;

        let video_metadata = self
            .media
            .metadata
            .video
            .as_ref()
            .ok_or(ThumbpickError::NoVideoStream)?;

        let total_frames = video_metadata.frame_count;
        let frames_per_second = video_metadata.frames_per_second;

        if total_frames > 0 && frame_number >= total_frames {
            return Err(ThumbpickError::FrameOutOfRange {
                frame_number,
                total_frames,
            });
        }

        let stream = self
            .media
            .input_context
            .stream(video_stream_index)
            .ok_or(ThumbpickError::NoVideoStream)?;
        let time_base = stream.time_base();
        let start_pts = utilities::stream_start_pts(stream.start_time());
        let start_seconds = utilities::pts_to_seconds(start_pts, time_base);
        let start_timestamp = (start_seconds * f64::from(AV_TIME_BASE)).round() as i64;
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let (width, height) = (decoder.width(), decoder.height());
        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            pixel_format.to_ffmpeg_pixel(),
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let mut locator = if frames_per_second > 0.0 {
            let target_timestamp = utilities::frame_number_to_seek_timestamp(
                frame_number,
                frames_per_second,
                start_seconds,
            );
            log::debug!("Seeking to frame {frame_number} (ts={target_timestamp}us)");
            let input = &mut self.media.input_context;
            if let Err(error) = input.seek(target_timestamp, ..target_timestamp) {
                // No keyframe at or before the target: decode from the start.
                log::debug!("Seek to {target_timestamp}us failed ({error}); rewinding");
                input.seek(start_timestamp, ..)?;
            }
            FrameLocator::Timestamp {
                time_base,
                start_pts,
                frames_per_second,
            }
        } else {
            log::debug!("No frame rate; rewinding to count up to frame {frame_number}");
            self.media.input_context.seek(start_timestamp, ..)?;
            FrameLocator::Ordinal { next: 0 }
        };

        let mut target = DecodeTarget {
            frame_number,
            pixel_format,
            width,
            height,
            scaler: &mut scaler,
            locator: &mut locator,
        };

        for (stream, packet) in self.media.input_context.packets() {
            if stream.index() != video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;
            if let Some(image) = target.drain(&mut decoder)? {
                return Ok(image);
            }
        }

        decoder.send_eof()?;
        if let Some(image) = target.drain(&mut decoder)? {
            return Ok(image);
        }

        Err(ThumbpickError::VideoDecodeError(format!(
            "Could not locate frame {frame_number} in the video stream"
        )))
    }
}

/// Everything needed to recognise and convert the target frame.
struct DecodeTarget<'s> {
    frame_number: u64,
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
    scaler: &'s mut ScalingContext,
    locator: &'s mut FrameLocator,
}

impl DecodeTarget<'_> {
    /// Pull every ready frame out of `decoder`, stopping at the target.
    fn drain(
        &mut self,
        decoder: &mut VideoDecoder,
    ) -> Result<Option<DynamicImage>, ThumbpickError> {
        let mut decoded_frame = VideoFrame::empty();
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            if self.locator.locate(&decoded_frame) >= self.frame_number {
                let mut converted_frame = VideoFrame::empty();
                self.scaler.run(&decoded_frame, &mut converted_frame)?;
                return convert_frame_to_image(
                    &converted_frame,
                    self.width,
                    self.height,
                    self.pixel_format,
                )
                .map(Some);
            }
        }
        Ok(None)
    }
}

/// Convert a scaled video frame to an [`image::DynamicImage`].
fn convert_frame_to_image(
    frame: &VideoFrame,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
) -> Result<DynamicImage, ThumbpickError> {
    let buffer = utilities::frame_to_buffer(frame, width, height, pixel_format.bytes_per_pixel());
    let image = match pixel_format {
        PixelFormat::Rgb8 => RgbImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgb8),
        PixelFormat::Rgba8 => {
            RgbaImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgba8)
        }
        PixelFormat::Gray8 => {
            GrayImage::from_raw(width, height, buffer).map(DynamicImage::ImageLuma8)
        }
    };
    image.ok_or_else(|| {
        ThumbpickError::VideoDecodeError(
            "Failed to construct image from decoded frame data".to_string(),
        )
    })
}
