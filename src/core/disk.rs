//! Disk space monitoring and validation
//!
//! Provides utilities for checking available disk space and refusing
//! uploads when the scratch partition is nearly full.

use crate::core::config;
use crate::core::error::AppError;
use std::path::Path;

/// Minimum required disk space before accepting an upload (500 MB)
pub const MIN_DISK_SPACE_BYTES: u64 = 500 * 1024 * 1024;

/// Result of disk space check
#[derive(Debug, Clone)]
pub struct DiskSpaceInfo {
    /// Available space in bytes
    pub available_bytes: u64,
    /// Total space in bytes
    pub total_bytes: u64,
    /// Used percentage (0-100)
    pub used_percent: f64,
    /// Path that was checked
    pub path: String,
}

impl DiskSpaceInfo {
    /// Returns available space in GB
    pub fn available_gb(&self) -> f64 {
        self.available_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }

    /// Check if there's enough space to process another upload
    pub fn has_enough_space(&self) -> bool {
        self.available_bytes >= MIN_DISK_SPACE_BYTES
    }
}

/// Get disk space information for a path using df command
///
/// This is a cross-platform approach that works on Linux and macOS.
pub fn get_disk_space(path: &str) -> Result<DiskSpaceInfo, AppError> {
    let expanded_path = shellexpand::tilde(path).into_owned();
    let check_path = if Path::new(&expanded_path).exists() {
        expanded_path.clone()
    } else {
        // If path doesn't exist, use parent directory
        Path::new(&expanded_path)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string())
    };

    let output = std::process::Command::new("df")
        .args(["-k", &check_path]) // -k for 1K blocks
        .output()
        .map_err(|e| AppError::Split(format!("Failed to run df command: {}", e)))?;

    if !output.status.success() {
        return Err(AppError::Split(format!(
            "df command failed for {}: {}",
            check_path,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    // Skip header line, parse data line
    if lines.len() < 2 {
        return Err(AppError::Split("Unexpected df output format".to_string()));
    }

    // df output: Filesystem 1K-blocks Used Available Use% Mounted
    let parts: Vec<&str> = lines[1].split_whitespace().collect();
    if parts.len() < 4 {
        return Err(AppError::Split("Unexpected df output format".to_string()));
    }

    let total_kb: u64 = parts[1]
        .parse()
        .map_err(|_| AppError::Split("Failed to parse total blocks".to_string()))?;
    let available_kb: u64 = parts[3]
        .parse()
        .map_err(|_| AppError::Split("Failed to parse available blocks".to_string()))?;

    let total_bytes = total_kb * 1024;
    let available_bytes = available_kb * 1024;
    let used_bytes = total_bytes.saturating_sub(available_bytes);
    let used_percent = if total_bytes > 0 {
        (used_bytes as f64 / total_bytes as f64) * 100.0
    } else {
        0.0
    };

    Ok(DiskSpaceInfo {
        available_bytes,
        total_bytes,
        used_percent,
        path: check_path,
    })
}

/// Check if there's enough disk space to process an upload
///
/// Returns Ok(DiskSpaceInfo) if there's enough space, or an error otherwise.
pub fn check_disk_space_for_upload() -> Result<DiskSpaceInfo, AppError> {
    let work_dir = &*config::WORK_DIR;
    let info = get_disk_space(work_dir)?;

    if !info.has_enough_space() {
        log::error!(
            "🚨 Insufficient disk space: {:.2} GB available (need {:.2} GB)",
            info.available_gb(),
            MIN_DISK_SPACE_BYTES as f64 / (1024.0 * 1024.0 * 1024.0)
        );
        return Err(AppError::Validation(format!(
            "Not enough disk space: {:.2} GB free",
            info.available_gb()
        )));
    }

    Ok(info)
}
