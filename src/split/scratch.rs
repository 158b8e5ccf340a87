//! Per-request scratch directory bookkeeping
//!
//! Every upload is processed inside `<work_dir>/<user_id>/` with segments
//! written to an `output/` subdirectory. The directory is removed when the
//! guard drops, so every exit path of a handler cleans up after itself.

use std::path::{Path, PathBuf};

/// A per-user scratch directory, removed on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create `<root>/<user_id>` (and the root itself if needed).
    pub fn create(root: &Path, user_id: i64) -> std::io::Result<Self> {
        let path = root.join(user_id.to_string());
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// The scratch directory itself
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for the downloaded input file inside the scratch directory.
    ///
    /// Only the final path component of `file_name` is used, so names coming
    /// from Telegram cannot escape the scratch directory.
    pub fn input_path(&self, file_name: &str) -> PathBuf {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .unwrap_or("video.mp4");
        self.path.join(name)
    }

    /// The `output/` subdirectory for produced segments, created on first use.
    pub fn output_dir(&self) -> std::io::Result<PathBuf> {
        let out = self.path.join("output");
        std::fs::create_dir_all(&out)?;
        Ok(out)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to clean up scratch dir {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_cleanup_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let scratch_path;
        {
            let scratch = ScratchDir::create(root.path(), 12345).unwrap();
            scratch_path = scratch.path().to_path_buf();
            assert!(scratch_path.ends_with("12345"));
            assert!(scratch_path.is_dir());

            let out = scratch.output_dir().unwrap();
            assert!(out.is_dir());
            std::fs::write(out.join("part_000.mp4"), b"x").unwrap();
            std::fs::write(scratch.input_path("clip.mp4"), b"x").unwrap();
        }
        // Guard dropped: whole tree gone, files and all
        assert!(!scratch_path.exists());
    }

    #[test]
    fn test_cleanup_happens_without_output_dir() {
        // The failure path never creates output/; cleanup must still work
        let root = tempfile::tempdir().unwrap();
        let scratch_path;
        {
            let scratch = ScratchDir::create(root.path(), 7).unwrap();
            scratch_path = scratch.path().to_path_buf();
        }
        assert!(!scratch_path.exists());
    }

    #[test]
    fn test_input_path_strips_directories() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path(), 1).unwrap();

        let path = scratch.input_path("../../etc/passwd");
        assert_eq!(path, scratch.path().join("passwd"));

        let path = scratch.input_path("nested/dir/clip.mp4");
        assert_eq!(path, scratch.path().join("clip.mp4"));
    }

    #[test]
    fn test_input_path_fallback_name() {
        let root = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(root.path(), 1).unwrap();

        assert_eq!(scratch.input_path(""), scratch.path().join("video.mp4"));
        assert_eq!(scratch.input_path(".."), scratch.path().join("video.mp4"));
    }
}
