//! Lossless PNG output.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use image::{
    DynamicImage,
    codecs::png::{FilterType, PngEncoder},
};

use crate::{configuration::PngCompression, error::ThumbpickError};

/// Create `output_dir` and any missing parents. An existing directory is
/// left as it is.
pub fn ensure_output_dir(output_dir: &Path) -> Result<(), ThumbpickError> {
    if !output_dir.is_dir() {
        log::debug!("Creating output directory {}", output_dir.display());
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Write `image` to `path` as PNG, replacing any existing file.
///
/// Rows are written unfiltered; `compression` only picks the deflate level.
///
/// # Errors
///
/// Returns [`ThumbpickError::IoError`] if the file cannot be created, or
/// [`ThumbpickError::ImageError`] if encoding fails.
pub fn save_png(
    image: &DynamicImage,
    path: &Path,
    compression: PngCompression,
) -> Result<(), ThumbpickError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new_with_quality(
        &mut writer,
        compression.to_compression_type(),
        FilterType::NoFilter,
    );
    image.write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}
