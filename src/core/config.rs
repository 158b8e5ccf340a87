use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Cached ffmpeg binary path
/// Read once at startup from FFMPEG_BIN environment variable or defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Cached ffprobe binary path
/// Read once at startup from FFPROBE_BIN environment variable or defaults to "ffprobe"
pub static FFPROBE_BIN: Lazy<String> = Lazy::new(|| env::var("FFPROBE_BIN").unwrap_or_else(|_| "ffprobe".to_string()));

/// Process-wide scratch directory root
/// Read from VIDEO_WORK_DIR environment variable
/// Per-user subdirectories are created under this root while a video is
/// being processed and removed afterwards.
/// Supports tilde (~) expansion for home directory
pub static WORK_DIR: Lazy<String> = Lazy::new(|| {
    let raw = env::var("VIDEO_WORK_DIR").unwrap_or_else(|_| "/tmp/video_processing".to_string());
    shellexpand::tilde(&raw).into_owned()
});

/// Optional Groq API key, read from GROQ_API_KEY
/// Currently only surfaced in /status; no feature consumes it yet.
pub static GROQ_API_KEY: Lazy<Option<String>> = Lazy::new(|| env::var("GROQ_API_KEY").ok());

/// Path to the log file
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "segmenta.log".to_string()));

/// Splitting configuration
pub mod split {
    /// Default length of each produced segment (in seconds)
    pub const SEGMENT_DURATION_SECS: u64 = 30;

    /// Whether segments are re-encoded (H.264/AAC) instead of stream-copied
    pub const ENABLE_COMPRESSION: bool = true;

    /// CRF for the re-encode path (18 = excellent, 28 = good, 35 = mediocre)
    pub const COMPRESSION_CRF: u8 = 28;

    /// x264 preset for the re-encode path
    pub const COMPRESSION_PRESET: &str = "medium";

    /// Audio bitrate for the re-encode path
    pub const COMPRESSION_AUDIO_BITRATE: &str = "128k";

    /// Segment duration, honoring the SEGMENT_DURATION env override
    pub fn segment_duration_secs() -> u64 {
        std::env::var("SEGMENT_DURATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&d| d > 0)
            .unwrap_or(SEGMENT_DURATION_SECS)
    }

    /// Compression flag, honoring the ENABLE_COMPRESSION env override
    pub fn compression_enabled() -> bool {
        std::env::var("ENABLE_COMPRESSION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(ENABLE_COMPRESSION)
    }
}

/// Validation configuration
pub mod validation {
    /// Maximum size for a produced segment in MB
    /// Kept under the 50 MB Telegram Bot API upload limit
    pub const MAX_FILE_SIZE_MB: u64 = 45;

    /// Maximum segment size in bytes
    pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for HTTP requests (in seconds)
    /// Generous because sending video segments back can take a while
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
