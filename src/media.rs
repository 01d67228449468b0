//! Core [`MediaFile`] implementation.
//!
//! `MediaFile` opens a video file, reads and caches its metadata, and hands
//! out a [`VideoHandle`] for seeking to and decoding individual frames.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    codec::context::Context as CodecContext, format::context::Input, format::stream::Stream,
    media::Type,
};

use crate::{
    error::ThumbpickError,
    metadata::{MediaMetadata, VideoMetadata},
    utilities,
    video::VideoHandle,
};

/// An opened video file.
///
/// Created via [`MediaFile::open`]. Holds the FFmpeg demuxer context and the
/// metadata read at open time. The demuxer is closed when the value is
/// dropped.
///
/// # Example
///
/// ```no_run
/// use thumbpick::{MediaFile, ThumbpickError};
///
/// let mut media = MediaFile::open("input.mp4")?;
/// println!("Duration: {:?}", media.metadata().duration);
///
/// let frame = media.video().frame(0)?;
/// frame.save("first_frame.png")?;
/// # Ok::<(), ThumbpickError>(())
/// ```
pub struct MediaFile {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: MediaMetadata,
    /// Index of the best video stream.
    pub(crate) video_stream_index: Option<usize>,
    /// Path to the opened media file.
    pub(crate) file_path: PathBuf,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a video file for frame extraction.
    ///
    /// Initializes FFmpeg (idempotent), checks the path exists, opens the
    /// container, locates the best video stream and caches its metadata.
    ///
    /// # Errors
    ///
    /// - [`ThumbpickError::SourceNotFound`] if `path` does not exist.
    /// - [`ThumbpickError::FileOpen`] if the container cannot be opened or its
    ///   video codec cannot be read.
    /// - [`ThumbpickError::NoVideoStream`] if the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ThumbpickError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        if !path.exists() {
            return Err(ThumbpickError::SourceNotFound { path: file_path });
        }

        log::debug!("Opening media file: {}", file_path.display());

        ffmpeg_next::init().map_err(|error| ThumbpickError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ThumbpickError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let format = input_context.format().name().to_string();

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index());

        let video = match video_stream_index.and_then(|index| input_context.stream(index)) {
            Some(stream) => Some(read_video_metadata(&stream, duration, &file_path)?),
            None => None,
        };

        let metadata = MediaMetadata {
            video,
            duration,
            format,
        };

        log::info!(
            "Opened media file: {} (format={}, duration={:.2}s)",
            file_path.display(),
            metadata.format,
            metadata.duration.as_secs_f64(),
        );

        if let Some(video) = &metadata.video {
            log::debug!(
                "Video stream: index={}, {}x{}, {:.2} fps, codec={}, {} frames",
                video.stream_index,
                video.width,
                video.height,
                video.frames_per_second,
                video.codec,
                video.frame_count,
            );
        }

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            file_path,
        })
    }

    /// Open a file and require that it carries a video stream.
    ///
    /// # Errors
    ///
    /// Everything [`open`](MediaFile::open) returns, plus
    /// [`ThumbpickError::NoVideoStream`] for audio-only or data-only files.
    pub fn open_video<P: AsRef<Path>>(path: P) -> Result<Self, ThumbpickError> {
        let media = Self::open(path)?;
        if media.metadata.video.is_none() {
            return Err(ThumbpickError::NoVideoStream);
        }
        Ok(media)
    }

    /// Get a reference to the cached media metadata.
    pub fn metadata(&self) -> &MediaMetadata {
        &self.metadata
    }

    /// Obtain a [`VideoHandle`] for decoding frames.
    ///
    /// The handle borrows this file mutably because seeking moves the shared
    /// demuxer position.
    pub fn video(&mut self) -> VideoHandle<'_> {
        VideoHandle { media: self }
    }
}

/// Read dimensions, rate, frame count and codec for one video stream.
fn read_video_metadata(
    stream: &Stream<'_>,
    container_duration: Duration,
    path: &Path,
) -> Result<VideoMetadata, ThumbpickError> {
    let index = stream.index();

    let decoder_context = CodecContext::from_parameters(stream.parameters()).map_err(|error| {
        ThumbpickError::FileOpen {
            path: path.to_path_buf(),
            reason: format!("Failed to read video codec parameters for stream {index}: {error}"),
        }
    })?;
    let video_decoder =
        decoder_context
            .decoder()
            .video()
            .map_err(|error| ThumbpickError::FileOpen {
                path: path.to_path_buf(),
                reason: format!("Failed to create video decoder for stream {index}: {error}"),
            })?;

    // Average rate first, then the stream's nominal rate.
    let frames_per_second = utilities::rational_to_f64(stream.avg_frame_rate())
        .or_else(|| utilities::rational_to_f64(stream.rate()))
        .unwrap_or(0.0);

    let stream_duration = {
        let length = stream.duration();
        if length > 0 {
            Duration::from_secs_f64(utilities::pts_to_seconds(length, stream.time_base()))
        } else {
            container_duration
        }
    };

    // Prefer the header's frame count; estimate only when it is missing.
    let frame_count = if stream.frames() > 0 {
        stream.frames() as u64
    } else if frames_per_second > 0.0 {
        (stream_duration.as_secs_f64() * frames_per_second) as u64
    } else {
        0
    };

    let codec = video_decoder
        .codec()
        .map(|codec| codec.name().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(VideoMetadata {
        width: video_decoder.width(),
        height: video_decoder.height(),
        frames_per_second,
        frame_count,
        codec,
        stream_index: index,
    })
}
