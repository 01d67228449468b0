//! Extraction tests driven by synthetic frame sources.
//!
//! These cover sampling, naming, skipping and counting without needing media
//! fixtures on disk.

use std::{
    collections::HashSet,
    path::Path,
    sync::{Arc, Mutex},
};

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use thumbpick::{
    ExtractOptions, FrameOutcome, FrameSelection, FrameSource, PixelFormat, ProgressCallback,
    ProgressInfo, ThumbnailExtractor, ThumbpickError, VideoMetadata,
};

struct SyntheticVideo {
    metadata: VideoMetadata,
    failing: Vec<u64>,
    reads: Vec<u64>,
}

impl SyntheticVideo {
    fn new(frame_count: u64, frames_per_second: f64) -> Self {
        Self {
            metadata: VideoMetadata {
                width: 8,
                height: 6,
                frames_per_second,
                frame_count,
                codec: "synthetic".to_string(),
                stream_index: 0,
            },
            failing: Vec::new(),
            reads: Vec::new(),
        }
    }

    fn failing_on(mut self, frames: &[u64]) -> Self {
        self.failing.extend_from_slice(frames);
        self
    }
}

fn synthetic_frame(frame_number: u64) -> DynamicImage {
    let shade = (frame_number % 256) as u8;
    DynamicImage::ImageRgb8(RgbImage::from_fn(8, 6, |x, y| {
        Rgb([shade, (x * 30) as u8, (y * 40) as u8])
    }))
}

impl FrameSource for SyntheticVideo {
    fn video_metadata(&self) -> Result<&VideoMetadata, ThumbpickError> {
        Ok(&self.metadata)
    }

    fn read_frame(
        &mut self,
        frame_number: u64,
        _pixel_format: PixelFormat,
    ) -> Result<DynamicImage, ThumbpickError> {
        self.reads.push(frame_number);
        if self.failing.contains(&frame_number) {
            return Err(ThumbpickError::VideoDecodeError(format!(
                "synthetic failure at {frame_number}"
            )));
        }
        Ok(synthetic_frame(frame_number))
    }
}

fn png_files_in(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(directory)
        .expect("Failed to list output dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".png"))
        .collect();
    names.sort();
    names
}

#[test]
fn hundred_frames_twenty_thumbnails() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output_dir = temporary_directory.path().join("thumbnails");

    let mut video = SyntheticVideo::new(100, 25.0);
    let options = ExtractOptions::new()
        .with_count(20)
        .with_output_dir(&output_dir);
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    assert_eq!(report.extracted_count(), 20);
    assert!(report.skipped.is_empty());
    assert_eq!(video.reads.len(), 20);

    let indices = report.selection.indices();
    assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(indices.iter().all(|&index| index < 100));
    assert_eq!(video.reads, indices);

    let names = png_files_in(&output_dir);
    assert_eq!(names.len(), 20);
    assert!(names[0].starts_with("thumbnail_01_frame_"));
    assert!(names[19].starts_with("thumbnail_20_frame_"));
}

#[test]
fn short_video_extracts_every_frame_in_order() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");

    let mut video = SyntheticVideo::new(5, 30.0);
    let options = ExtractOptions::new()
        .with_count(20)
        .with_output_dir(temporary_directory.path());
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    assert!(report.selection.is_exhaustive());
    assert_eq!(report.selection.indices(), &[0, 1, 2, 3, 4]);
    assert_eq!(video.reads, vec![0, 1, 2, 3, 4]);
    assert_eq!(report.extracted_count(), 5);
    assert_eq!(png_files_in(temporary_directory.path()).len(), 5);
}

#[test]
fn failed_frame_is_skipped_and_run_continues() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");

    // Same seed, same selection: pick one of the frames the run will attempt.
    let expected = FrameSelection::sample_seeded(100, 20, Some(11)).unwrap();
    let broken = expected.indices()[7];

    let mut video = SyntheticVideo::new(100, 25.0).failing_on(&[broken]);
    let options = ExtractOptions::new()
        .with_count(20)
        .with_seed(11)
        .with_output_dir(temporary_directory.path());
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("A single bad frame must not abort the run");

    assert_eq!(report.selection, expected);
    assert_eq!(video.reads.len(), 20);
    assert_eq!(report.extracted_count(), 19);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].frame_number, broken);
    assert_eq!(report.skipped[0].position, 8);
    assert!(report.skipped[0].reason.contains("synthetic failure"));
    assert_eq!(png_files_in(temporary_directory.path()).len(), 19);

    // Positions keep counting across the gap.
    let positions: Vec<usize> = report.thumbnails.iter().map(|t| t.position).collect();
    assert!(!positions.contains(&8));
    assert_eq!(positions.last(), Some(&20));
}

#[test]
fn zero_frame_rate_uses_index_as_seconds() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");

    let mut video = SyntheticVideo::new(3, 0.0);
    let options = ExtractOptions::new()
        .with_count(10)
        .with_output_dir(temporary_directory.path());
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    assert_eq!(
        png_files_in(temporary_directory.path()),
        vec![
            "thumbnail_01_frame_000000_00m00s.png",
            "thumbnail_02_frame_000001_00m01s.png",
            "thumbnail_03_frame_000002_00m02s.png",
        ]
    );
    assert_eq!(report.thumbnails[2].timestamp.seconds, 2);
}

#[test]
fn names_are_unique_and_follow_frame_order() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");

    let mut video = SyntheticVideo::new(90_000, 29.97);
    let options = ExtractOptions::new()
        .with_count(50)
        .with_seed(2024)
        .with_output_dir(temporary_directory.path());
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    let names: HashSet<_> = report.thumbnails.iter().map(|t| t.path.clone()).collect();
    assert_eq!(names.len(), 50);

    let frames: Vec<u64> = report.thumbnails.iter().map(|t| t.frame_number).collect();
    assert!(frames.windows(2).all(|pair| pair[0] < pair[1]));

    for thumbnail in &report.thumbnails {
        let name = thumbnail.path.file_name().unwrap().to_string_lossy();
        assert!(name.contains(&format!("_frame_{:06}_", thumbnail.frame_number)));
    }
}

#[test]
fn written_png_is_pixel_exact() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");

    let mut video = SyntheticVideo::new(1, 24.0);
    let options = ExtractOptions::new()
        .with_count(1)
        .with_output_dir(temporary_directory.path());
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    let written = image::open(&report.thumbnails[0].path).expect("Failed to read PNG back");
    assert_eq!(written.dimensions(), (8, 6));
    assert_eq!(written.to_rgb8(), synthetic_frame(0).to_rgb8());
}

#[test]
fn existing_output_dir_is_reused_and_files_overwritten() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let keep = temporary_directory.path().join("notes.txt");
    std::fs::write(&keep, b"keep me").unwrap();

    for _ in 0..2 {
        let mut video = SyntheticVideo::new(2, 1.0);
        let options = ExtractOptions::new()
            .with_count(2)
            .with_output_dir(temporary_directory.path());
        let _report = ThumbnailExtractor::new(options)
            .run(&mut video)
            .expect("Extraction failed");
    }

    assert!(keep.exists());
    assert_eq!(png_files_in(temporary_directory.path()).len(), 2);
}

#[test]
fn non_frame_error_aborts_the_run() {
    struct BrokenSource(VideoMetadata);

    impl FrameSource for BrokenSource {
        fn video_metadata(&self) -> Result<&VideoMetadata, ThumbpickError> {
            Ok(&self.0)
        }

        fn read_frame(&mut self, _: u64, _: PixelFormat) -> Result<DynamicImage, ThumbpickError> {
            Err(ThumbpickError::NoVideoStream)
        }
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut source = BrokenSource(SyntheticVideo::new(10, 10.0).metadata);
    let options = ExtractOptions::new()
        .with_count(3)
        .with_output_dir(temporary_directory.path());

    let result = ThumbnailExtractor::new(options).run(&mut source);
    assert!(matches!(result, Err(ThumbpickError::NoVideoStream)));
}

#[test]
fn empty_video_writes_nothing() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");

    let mut video = SyntheticVideo::new(0, 25.0);
    let options = ExtractOptions::new().with_output_dir(temporary_directory.path());
    let report = ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    assert!(report.selection.is_empty());
    assert_eq!(report.extracted_count(), 0);
    assert!(video.reads.is_empty());
}

struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

#[test]
fn progress_reports_every_attempt_then_finishes() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let recorder = Arc::new(RecordingProgress {
        infos: Mutex::new(Vec::new()),
    });

    let mut video = SyntheticVideo::new(4, 2.0).failing_on(&[2]);
    let options = ExtractOptions::new()
        .with_count(4)
        .with_output_dir(temporary_directory.path())
        .with_progress(recorder.clone());
    ThumbnailExtractor::new(options)
        .run(&mut video)
        .expect("Extraction failed");

    let infos = recorder.infos.lock().unwrap();
    assert_eq!(infos.len(), 5);

    let currents: Vec<u64> = infos.iter().map(|info| info.current).collect();
    assert_eq!(currents, vec![1, 2, 3, 4, 4]);
    assert!(infos.iter().all(|info| info.total == 4));

    assert!(matches!(infos[0].outcome, FrameOutcome::Written(_)));
    assert!(matches!(infos[2].outcome, FrameOutcome::Skipped(_)));
    assert_eq!(infos[2].frame_number, Some(2));
    assert_eq!(infos[4].outcome, FrameOutcome::Finished);
    assert!((infos[4].percentage - 100.0).abs() < f32::EPSILON);
}
