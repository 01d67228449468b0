use std::{error::Error, path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use thumbpick::{
    DEFAULT_OUTPUT_DIR, DEFAULT_THUMBNAIL_COUNT, ExtractOptions, ExtractionReport, FfmpegLogLevel,
    FrameOutcome, MediaFile, PixelFormat, PngCompression, ProgressCallback, ProgressInfo,
    ThumbnailExtractor, VideoMetadata,
};

const DEFAULT_VIDEO_PATH: &str = "video-5df6800d-31d4-4fe7-976f-dcd992dd48f6.mp4";

const CLI_AFTER_HELP: &str = "Examples:\n  thumbpick input.mp4\n  thumbpick input.mp4 12 --out stills --seed 7\n  thumbpick input.mp4 40 --progress --compression best\n  thumbpick input.mp4 --json\n  thumbpick --completions zsh > _thumbpick";

#[derive(Debug, Parser)]
#[command(
    name = "thumbpick",
    version,
    about = "Extract random lossless PNG thumbnails from a video file",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video path.
    #[arg(default_value = DEFAULT_VIDEO_PATH)]
    video_path: PathBuf,

    /// Number of thumbnails to extract (falls back to 20 if not a positive integer).
    #[arg(allow_negative_numbers = true)]
    num_thumbnails: Option<String>,

    /// Output directory for the thumbnails.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    out: PathBuf,

    /// Seed for reproducible frame selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Pixel format of the written images (rgb8, rgba8, gray8).
    #[arg(long)]
    pixel_format: Option<String>,

    /// PNG compression effort (fast, default, best). All levels are lossless.
    #[arg(long)]
    compression: Option<String>,

    /// Show a progress bar instead of one line per frame.
    #[arg(long)]
    progress: bool,

    /// Print the extraction report as JSON.
    #[arg(long)]
    json: bool,

    /// Show library log output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn parse_thumbnail_count(value: Option<&str>) -> Result<u32, String> {
    let Some(value) = value else {
        return Ok(DEFAULT_THUMBNAIL_COUNT);
    };
    match value.trim().parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(format!(
            "Invalid number of thumbnails '{value}', using default: {DEFAULT_THUMBNAIL_COUNT}"
        )),
    }
}

fn parse_pixel_format(value: &str) -> Option<PixelFormat> {
    match value.to_ascii_lowercase().as_str() {
        "rgb8" | "rgb" => Some(PixelFormat::Rgb8),
        "rgba8" | "rgba" => Some(PixelFormat::Rgba8),
        "gray8" | "gray" | "greyscale" | "grayscale" => Some(PixelFormat::Gray8),
        _ => None,
    }
}

fn parse_compression(value: &str) -> Option<PngCompression> {
    match value.to_ascii_lowercase().as_str() {
        "fast" | "fastest" => Some(PngCompression::Fast),
        "default" => Some(PngCompression::Default),
        "best" | "smallest" => Some(PngCompression::Best),
        _ => None,
    }
}

fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

fn init_logging(verbose: bool) -> Result<(), Box<dyn Error>> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Off)
        .level_for("thumbpick", level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn build_options(cli: &Cli, count: u32) -> Result<ExtractOptions, Box<dyn Error>> {
    let mut options = ExtractOptions::new()
        .with_count(count)
        .with_output_dir(&cli.out);

    if let Some(seed) = cli.seed {
        options = options.with_seed(seed);
    }

    if let Some(pixel_str) = &cli.pixel_format {
        let pixel = parse_pixel_format(pixel_str)
            .ok_or(format!("unsupported --pixel-format: {pixel_str}"))?;
        options = options.with_pixel_format(pixel);
    }

    if let Some(compression_str) = &cli.compression {
        let compression = parse_compression(compression_str)
            .ok_or(format!("unsupported --compression: {compression_str}"))?;
        options = options.with_compression(compression);
    }

    Ok(options)
}

fn print_video_info(video: &VideoMetadata) {
    println!("{}", "Video info:".bold());
    println!("  Total frames: {}", video.frame_count);
    println!("  FPS: {:.2}", video.frames_per_second);
    println!("  Resolution: {}x{}", video.width, video.height);
    println!(
        "  Duration: {:.2} seconds",
        video.estimated_duration().as_secs_f64()
    );
}

/// One console line per attempted frame.
struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        match (&info.outcome, info.frame_number, info.timestamp) {
            (FrameOutcome::Written(path), Some(frame_number), Some(timestamp)) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                println!(
                    "  [{}/{}] Extracted frame {frame_number} ({timestamp}) -> {file_name}",
                    info.current, info.total,
                );
            }
            (FrameOutcome::Skipped(reason), Some(frame_number), _) => {
                warn(&format!("Could not read frame {frame_number}: {reason}"));
            }
            _ => {}
        }
    }
}

/// An `indicatif` bar advanced once per attempted frame.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(length: u64) -> Result<Self, Box<dyn Error>> {
        let bar = ProgressBar::new(length);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        match &info.outcome {
            FrameOutcome::Written(path) => {
                self.bar.set_position(info.current);
                if let Some(name) = path.file_name() {
                    self.bar.set_message(name.to_string_lossy().into_owned());
                }
            }
            FrameOutcome::Skipped(reason) => {
                self.bar.set_position(info.current);
                if let Some(frame_number) = info.frame_number {
                    self.bar.println(format!(
                        "{} Could not read frame {frame_number}: {reason}",
                        "warning:".yellow().bold()
                    ));
                }
            }
            FrameOutcome::Finished => self.bar.finish_with_message("done"),
        }
    }
}

fn short_video_warning(frame_count: u64, count: u32) -> Option<String> {
    (frame_count < u64::from(count)).then(|| {
        format!("Video has fewer frames ({frame_count}) than requested thumbnails ({count})")
    })
}

fn report_json(report: &ExtractionReport, video: &VideoMetadata) -> serde_json::Value {
    json!({
        "video": {
            "frame_count": video.frame_count,
            "fps": video.frames_per_second,
            "width": video.width,
            "height": video.height,
            "codec": video.codec,
        },
        "requested": report.selection.requested(),
        "selected": report.selection.indices(),
        "output_dir": report.output_dir.display().to_string(),
        "warnings": short_video_warning(
            report.selection.total_frames(),
            report.selection.requested(),
        )
        .into_iter()
        .collect::<Vec<_>>(),
        "extracted": report.extracted_count(),
        "thumbnails": report.thumbnails.iter().map(|thumbnail| json!({
            "position": thumbnail.position,
            "frame_number": thumbnail.frame_number,
            "timestamp": thumbnail.timestamp.to_string(),
            "path": thumbnail.path.display().to_string(),
        })).collect::<Vec<_>>(),
        "skipped": report.skipped.iter().map(|skipped| json!({
            "position": skipped.position,
            "frame_number": skipped.frame_number,
            "reason": skipped.reason,
        })).collect::<Vec<_>>(),
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "thumbpick", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose)?;

    if let Some(level) = &cli.log_level {
        thumbpick::set_ffmpeg_log_level(level.parse::<FfmpegLogLevel>()?);
    }

    let count = parse_thumbnail_count(cli.num_thumbnails.as_deref()).unwrap_or_else(|message| {
        warn(&message);
        DEFAULT_THUMBNAIL_COUNT
    });
    let mut options = build_options(&cli, count)?;

    let mut media = MediaFile::open_video(&cli.video_path)?;
    let video = media
        .metadata()
        .video
        .clone()
        .ok_or("No video stream found in file")?;

    // In JSON mode the warning is part of the report instead.
    if !cli.json {
        print_video_info(&video);
        println!("\nExtracting {count} random thumbnails...");
        if let Some(message) = short_video_warning(video.frame_count, count) {
            warn(&message);
        }
    }

    if cli.progress {
        let length = video.frame_count.min(u64::from(count));
        options = options.with_progress(Arc::new(BarProgress::new(length)?));
    } else if !cli.json {
        options = options.with_progress(Arc::new(ConsoleProgress));
    }

    let report = ThumbnailExtractor::new(options).run(&mut media)?;
    drop(media);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report_json(&report, &video))?
        );
    } else {
        println!(
            "\n{} {}",
            "success:".green().bold(),
            format!(
                "Extracted {} thumbnails to '{}' directory",
                report.extracted_count(),
                report.output_dir.display()
            )
            .green()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
