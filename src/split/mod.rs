//! Video splitting engine — the core feature of Segmenta.
//!
//! Wraps ffmpeg/ffprobe behind a small interface: probe the duration of an
//! input file, then run a single segmenting invocation that writes numbered
//! `part_NNN.mp4` files into an output directory. Two fixed command
//! templates exist: stream copy (fast, original quality) and H.264/AAC
//! re-encode (slower, 50-70% smaller files).

pub mod scratch;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;

use crate::core::config;
use crate::core::error::AppError;
use crate::core::process::{run_with_timeout, FFMPEG_TIMEOUT, FFPROBE_TIMEOUT};

/// Filename prefix for produced segments
pub const SEGMENT_FILE_PREFIX: &str = "part_";

/// ffmpeg output pattern for segment files (zero-padded index keeps
/// lexicographic order equal to sequence order)
pub const SEGMENT_FILE_PATTERN: &str = "part_%03d.mp4";

/// Errors that can occur while splitting
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("ffmpeg error: {0}")]
    Ffmpeg(String),

    #[error("ffprobe error: {0}")]
    Ffprobe(String),

    #[error("input file not found: {0}")]
    InputNotFound(String),

    #[error("no segments produced in {0}")]
    NoSegments(String),

    #[error("output directory {0} already contains segment files")]
    OutputNotEmpty(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SplitResult<T> = Result<T, SplitError>;

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        AppError::Split(err.to_string())
    }
}

/// Options for a split run
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Length of each segment in seconds
    pub segment_duration: u64,
    /// Re-encode with H.264/AAC instead of stream copy
    pub compress: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            segment_duration: config::split::SEGMENT_DURATION_SECS,
            compress: config::split::ENABLE_COMPRESSION,
        }
    }
}

impl SplitOptions {
    /// Options honoring the SEGMENT_DURATION / ENABLE_COMPRESSION env overrides
    pub fn from_config() -> Self {
        Self {
            segment_duration: config::split::segment_duration_secs(),
            compress: config::split::compression_enabled(),
        }
    }
}

/// The external-tool collaborator: owns the ffmpeg/ffprobe binary names.
///
/// Constructed from config in production; tests can point it at fakes.
#[derive(Debug, Clone)]
pub struct Splitter {
    ffmpeg: String,
    ffprobe: String,
}

impl Splitter {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Splitter using the FFMPEG_BIN / FFPROBE_BIN configuration
    pub fn from_config() -> Self {
        Self::new(config::FFMPEG_BIN.clone(), config::FFPROBE_BIN.clone())
    }

    /// Check if ffmpeg is available
    pub async fn check_ffmpeg(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get video duration in seconds using ffprobe
    pub async fn probe_duration<P: AsRef<Path>>(&self, path: P) -> SplitResult<f64> {
        let input = path.as_ref();

        if !input.exists() {
            return Err(SplitError::InputNotFound(input.display().to_string()));
        }

        let mut cmd = Command::new(&self.ffprobe);
        cmd.args(probe_args(input));

        let output = run_with_timeout(&mut cmd, FFPROBE_TIMEOUT)
            .await
            .map_err(|e| SplitError::Ffprobe(e.to_string()))?;

        if !output.status.success() {
            return Err(SplitError::Ffprobe(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let duration_str = String::from_utf8_lossy(&output.stdout);
        duration_str
            .trim()
            .parse::<f64>()
            .map_err(|_| SplitError::Ffprobe("Failed to parse duration".to_string()))
    }

    /// Split a video into fixed-duration segments.
    ///
    /// Writes `part_000.mp4`, `part_001.mp4`, … into `output_dir` and
    /// returns the produced paths in index order. ffmpeg stderr is carried
    /// in the error on failure. The output directory must not already hold
    /// `part_*` files: stale segments from an earlier run would be
    /// indistinguishable from this run's output.
    pub async fn split<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        options: &SplitOptions,
    ) -> SplitResult<Vec<PathBuf>> {
        let input = input_path.as_ref();
        let out_dir = output_dir.as_ref();

        if !input.exists() {
            return Err(SplitError::InputNotFound(input.display().to_string()));
        }

        if !collect_segments(out_dir)?.is_empty() {
            return Err(SplitError::OutputNotEmpty(out_dir.display().to_string()));
        }

        let output_pattern = out_dir.join(SEGMENT_FILE_PATTERN);
        let args = segment_args(input, &output_pattern, options);

        log::info!(
            "✂️  Splitting {} into {}s segments (compress: {})",
            input.display(),
            options.segment_duration,
            options.compress
        );

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(&args);

        let output = run_with_timeout(&mut cmd, FFMPEG_TIMEOUT)
            .await
            .map_err(|e| SplitError::Ffmpeg(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("FFmpeg segmenting error: {}", stderr);
            return Err(SplitError::Ffmpeg(stderr.to_string()));
        }

        let parts = collect_segments(out_dir)?;
        if parts.is_empty() {
            return Err(SplitError::NoSegments(out_dir.display().to_string()));
        }

        log::info!("✅ Produced {} segments in {}", parts.len(), out_dir.display());
        Ok(parts)
    }
}

/// Arguments for the ffprobe duration query
pub fn probe_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "default=noprint_wrappers=1:nokey=1".to_string(),
        input.to_string_lossy().into_owned(),
    ]
}

/// Arguments for the segmenting invocation, one of two fixed templates.
///
/// Copy mode stream-copies all streams; compress mode re-encodes to
/// H.264 (CRF 28, medium preset) with 128k AAC audio and faststart.
pub fn segment_args(input: &Path, output_pattern: &Path, options: &SplitOptions) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
    ];

    if options.compress {
        args.extend(
            [
                "-c:v",
                "libx264",
                "-preset",
                config::split::COMPRESSION_PRESET,
                "-crf",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args.push(config::split::COMPRESSION_CRF.to_string());
        args.extend(
            [
                "-c:a",
                "aac",
                "-b:a",
                config::split::COMPRESSION_AUDIO_BITRATE,
                "-movflags",
                "+faststart",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
    } else {
        args.push("-c".to_string());
        args.push("copy".to_string());
    }

    args.push("-map".to_string());
    args.push("0".to_string());
    args.push("-f".to_string());
    args.push("segment".to_string());
    args.push("-segment_time".to_string());
    args.push(options.segment_duration.to_string());
    args.push("-reset_timestamps".to_string());
    args.push("1".to_string());

    if options.compress {
        // Prevents muxing queue overflows on high-bitrate sources
        args.push("-max_muxing_queue_size".to_string());
        args.push("1024".to_string());
    }

    args.push(output_pattern.to_string_lossy().into_owned());
    args
}

/// Enumerate produced segment files in a directory, sorted by filename.
///
/// Only `part_*` files are returned; the zero-padded index makes the
/// lexicographic sort equal to sequence order.
pub fn collect_segments(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut parts: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(SEGMENT_FILE_PREFIX))
                    .unwrap_or(false)
        })
        .collect();
    parts.sort();
    Ok(parts)
}

/// Estimate how many segments a video of the given duration produces
/// (ceiling division, at least 1)
pub fn estimate_segments(duration_secs: f64, segment_duration: u64) -> u64 {
    if segment_duration == 0 {
        return 1;
    }
    let count = (duration_secs / segment_duration as f64).ceil() as u64;
    count.max(1)
}
