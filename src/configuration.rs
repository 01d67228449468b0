//! Extraction configuration.
//!
//! [`ExtractOptions`] is a builder that carries the sample size, output
//! directory, RNG seed, output encoding and progress callback into
//! [`ThumbnailExtractor`](crate::ThumbnailExtractor).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use thumbpick::{ExtractOptions, PngCompression, ProgressCallback, ProgressInfo};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{:?}", info.current, info.total);
//!     }
//! }
//!
//! let options = ExtractOptions::new()
//!     .with_count(12)
//!     .with_output_dir("stills")
//!     .with_seed(7)
//!     .with_compression(PngCompression::Best)
//!     .with_progress(Arc::new(LogProgress));
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ffmpeg_next::format::Pixel;
use image::codecs::png::CompressionType;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Number of thumbnails extracted when no count is given.
pub const DEFAULT_THUMBNAIL_COUNT: u32 = 20;

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "thumbnails";

/// Output pixel format for extracted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGB (24 bpp). This is the default.
    #[default]
    Rgb8,
    /// 8-bit RGBA with alpha pre-set to 255 (32 bpp).
    Rgba8,
    /// 8-bit grayscale (8 bpp).
    Gray8,
}

impl PixelFormat {
    /// Map to the corresponding FFmpeg pixel format constant.
    pub(crate) fn to_ffmpeg_pixel(self) -> Pixel {
        match self {
            PixelFormat::Rgb8 => Pixel::RGB24,
            PixelFormat::Rgba8 => Pixel::RGBA,
            PixelFormat::Gray8 => Pixel::GRAY8,
        }
    }

    /// Bytes per pixel in the packed output buffer.
    pub(crate) fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// PNG deflate effort.
///
/// Every level is lossless; they only trade file size against encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    /// Fastest encoding, largest files. This is the default.
    #[default]
    Fast,
    /// The encoder's balanced default.
    Default,
    /// Smallest files, slowest encoding.
    Best,
}

impl PngCompression {
    pub(crate) fn to_compression_type(self) -> CompressionType {
        match self {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Configuration for a thumbnail extraction run.
///
/// All fields have defaults matching the CLI: 20 thumbnails into
/// `thumbnails/`, entropy-seeded sampling, RGB8 frames and fast PNG
/// compression.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) count: u32,
    pub(crate) output_dir: PathBuf,
    pub(crate) seed: Option<u64>,
    pub(crate) pixel_format: PixelFormat,
    pub(crate) compression: PngCompression,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("count", &self.count)
            .field("output_dir", &self.output_dir)
            .field("seed", &self.seed)
            .field("pixel_format", &self.pixel_format)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            count: DEFAULT_THUMBNAIL_COUNT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: None,
            pixel_format: PixelFormat::default(),
            compression: PngCompression::default(),
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the number of thumbnails to extract.
    ///
    /// Zero is accepted here but rejected when the extraction starts.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the directory thumbnails are written into.
    #[must_use]
    pub fn with_output_dir<P: AsRef<Path>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    /// Seed the frame sampler so repeated runs pick the same frames.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the output pixel format for extracted frames.
    #[must_use]
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Set the PNG compression level.
    #[must_use]
    pub fn with_compression(mut self, compression: PngCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Attach a progress callback, invoked once per attempted frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The requested sample size.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The sampler seed, if one was set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The output pixel format.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// The PNG compression level.
    pub fn compression(&self) -> PngCompression {
        self.compression
    }
}
