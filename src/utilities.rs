//! Helpers shared by the decoder code.
//!
//! Pixel-plane packing and timestamp conversion.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};
use ffmpeg_sys_next::{AV_NOPTS_VALUE, AV_TIME_BASE};

/// Copy pixel data from an FFmpeg video frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × bpp).
/// `bytes_per_pixel` is 3 for RGB24, 4 for RGBA and 1 for GRAY8.
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let row_length = width as usize * bytes_per_pixel;
    let rows = height as usize;
    let plane = video_frame.data(0);
    let stride = video_frame.stride(0);

    if stride == row_length {
        return plane[..row_length * rows].to_vec();
    }

    plane
        .chunks(stride)
        .take(rows)
        .flat_map(|row| &row[..row_length])
        .copied()
        .collect()
}

/// PTS in `time_base` units, as seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// A stream's declared start time, or 0 when FFmpeg has none for it.
///
/// Frame indices count from this point, so the first frame of a stream that
/// starts at 1.4 s (typical for MPEG-TS) is frame 0.
pub(crate) fn stream_start_pts(start_time: i64) -> i64 {
    if start_time == AV_NOPTS_VALUE { 0 } else { start_time }
}

/// Nearest frame index for a PTS, counted from `start_pts`.
///
/// Frames before the stream start (pre-roll) map to frame 0.
pub(crate) fn pts_to_frame_number(
    pts: i64,
    start_pts: i64,
    time_base: Rational,
    frames_per_second: f64,
) -> u64 {
    let seconds = pts_to_seconds(pts.saturating_sub(start_pts), time_base).max(0.0);
    (seconds * frames_per_second).round() as u64
}

/// Container seek timestamp for a frame index of a stream starting at
/// `start_seconds`.
///
/// `Input::seek` with no stream selected expects absolute `AV_TIME_BASE`
/// units (microseconds). `frames_per_second` must be positive.
pub(crate) fn frame_number_to_seek_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    start_seconds: f64,
) -> i64 {
    let seconds = start_seconds + frame_number as f64 / frames_per_second;
    (seconds * AV_TIME_BASE as f64).round() as i64
}

/// Convert an FFmpeg rational to a float, or `None` when it is undefined.
pub(crate) fn rational_to_f64(rational: Rational) -> Option<f64> {
    if rational.numerator() > 0 && rational.denominator() > 0 {
        Some(rational.numerator() as f64 / rational.denominator() as f64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::Rational;

    use super::*;

    const MPEG_TS: Rational = Rational(1, 90_000);

    #[test]
    fn missing_start_time_counts_from_zero() {
        assert_eq!(stream_start_pts(AV_NOPTS_VALUE), 0);
        assert_eq!(stream_start_pts(126_000), 126_000);
    }

    #[test]
    fn frame_numbers_are_relative_to_stream_start() {
        // 1.4 s into a 30 fps transport stream.
        let start = 126_000;
        assert_eq!(pts_to_frame_number(start, start, MPEG_TS, 30.0), 0);
        assert_eq!(pts_to_frame_number(start + 3_000, start, MPEG_TS, 30.0), 1);
        assert_eq!(pts_to_frame_number(start + 30_000, start, MPEG_TS, 30.0), 10);
        assert_eq!(pts_to_frame_number(start - 3_000, start, MPEG_TS, 30.0), 0);
    }

    #[test]
    fn frame_numbers_round_to_nearest() {
        let time_base = Rational(1, 1_000);
        assert_eq!(pts_to_frame_number(33, 0, time_base, 30.0), 1);
        assert_eq!(pts_to_frame_number(1_001, 0, time_base, 29.97), 30);
    }

    #[test]
    fn seek_target_includes_stream_start() {
        assert_eq!(frame_number_to_seek_timestamp(0, 30.0, 0.0), 0);
        assert_eq!(frame_number_to_seek_timestamp(30, 30.0, 0.0), 1_000_000);
        assert_eq!(frame_number_to_seek_timestamp(0, 30.0, 1.4), 1_400_000);
        assert_eq!(frame_number_to_seek_timestamp(15, 30.0, 2.0), 2_500_000);
    }
}
