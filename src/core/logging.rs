//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup logging of the effective split settings

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective splitting configuration at application startup
pub fn log_split_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("✂️  Split Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⏱️  Segment duration: {}s", config::split::segment_duration_secs());
    log::info!(
        "🗜️  Compression: {}",
        if config::split::compression_enabled() {
            "enabled (H.264/AAC re-encode)"
        } else {
            "disabled (stream copy)"
        }
    );
    log::info!("📦 Max segment size: {} MB", config::validation::MAX_FILE_SIZE_MB);
    log::info!("📂 Work dir: {}", &*config::WORK_DIR);
    log::info!("🎞️  ffmpeg: {}", &*config::FFMPEG_BIN);
    log::info!("🔎 ffprobe: {}", &*config::FFPROBE_BIN);
    if config::GROQ_API_KEY.is_some() {
        log::info!("🔑 GROQ_API_KEY: set");
    } else {
        log::info!("🔑 GROQ_API_KEY: not set");
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global logger can only be installed once per process, so the
    // first-init and second-init assertions share one test.
    #[test]
    fn test_init_logger_first_succeeds_then_rejects_reinit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segmenta.log");

        init_logger(path.to_str().unwrap()).unwrap();
        assert!(path.exists());

        assert!(init_logger(path.to_str().unwrap()).is_err());
    }
}
