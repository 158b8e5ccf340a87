//! Integration tests for the splitting pipeline against fake ffmpeg/ffprobe
//! binaries, plus the scratch-directory lifetime guarantees.

use std::path::{Path, PathBuf};

use segmenta::split::scratch::ScratchDir;
use segmenta::split::{collect_segments, estimate_segments, SplitError, SplitOptions, Splitter};

/// Write an executable shell script into `dir` and return its path.
#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[cfg(unix)]
#[tokio::test]
async fn split_returns_segments_in_index_order() {
    let dir = tempfile::tempdir().unwrap();

    // Fake ffmpeg: the last argument is the output pattern; create three
    // numbered parts next to it, deliberately out of order.
    let fake_ffmpeg = write_script(
        dir.path(),
        "ffmpeg",
        "#!/bin/sh\n\
         for last; do :; done\n\
         out=$(dirname \"$last\")\n\
         touch \"$out/part_002.mp4\" \"$out/part_000.mp4\" \"$out/part_001.mp4\"\n",
    );

    let input = dir.path().join("input.mp4");
    std::fs::write(&input, b"not a real video").unwrap();
    let out_dir = dir.path().join("output");
    std::fs::create_dir(&out_dir).unwrap();

    let splitter = Splitter::new(fake_ffmpeg.to_str().unwrap(), "ffprobe");
    let parts = splitter
        .split(&input, &out_dir, &SplitOptions::default())
        .await
        .unwrap();

    let names: Vec<_> = parts
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["part_000.mp4", "part_001.mp4", "part_002.mp4"]);
}

#[cfg(unix)]
#[tokio::test]
async fn split_surfaces_ffmpeg_stderr_on_failure() {
    let dir = tempfile::tempdir().unwrap();

    let fake_ffmpeg = write_script(
        dir.path(),
        "ffmpeg",
        "#!/bin/sh\necho 'moov atom not found' >&2\nexit 1\n",
    );

    let input = dir.path().join("input.mp4");
    std::fs::write(&input, b"garbage").unwrap();
    let out_dir = dir.path().join("output");
    std::fs::create_dir(&out_dir).unwrap();

    let splitter = Splitter::new(fake_ffmpeg.to_str().unwrap(), "ffprobe");
    let err = splitter
        .split(&input, &out_dir, &SplitOptions::default())
        .await
        .unwrap_err();

    match err {
        SplitError::Ffmpeg(stderr) => assert!(stderr.contains("moov atom not found")),
        other => panic!("expected Ffmpeg error, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn split_with_no_output_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    // ffmpeg "succeeds" but produces nothing
    let fake_ffmpeg = write_script(dir.path(), "ffmpeg", "#!/bin/sh\nexit 0\n");

    let input = dir.path().join("input.mp4");
    std::fs::write(&input, b"x").unwrap();
    let out_dir = dir.path().join("output");
    std::fs::create_dir(&out_dir).unwrap();

    let splitter = Splitter::new(fake_ffmpeg.to_str().unwrap(), "ffprobe");
    let err = splitter
        .split(&input, &out_dir, &SplitOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SplitError::NoSegments(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn probe_duration_parses_ffprobe_output() {
    let dir = tempfile::tempdir().unwrap();

    let fake_ffprobe = write_script(dir.path(), "ffprobe", "#!/bin/sh\necho '12.480000'\n");

    let input = dir.path().join("input.mp4");
    std::fs::write(&input, b"x").unwrap();

    let splitter = Splitter::new("ffmpeg", fake_ffprobe.to_str().unwrap());
    let duration = splitter.probe_duration(&input).await.unwrap();
    assert!((duration - 12.48).abs() < 1e-9);
}

#[cfg(unix)]
#[tokio::test]
async fn probe_duration_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let fake_ffprobe = write_script(dir.path(), "ffprobe", "#!/bin/sh\necho 'bad input' >&2\nexit 1\n");

    let input = dir.path().join("input.mp4");
    std::fs::write(&input, b"x").unwrap();

    let splitter = Splitter::new("ffmpeg", fake_ffprobe.to_str().unwrap());
    let err = splitter.probe_duration(&input).await.unwrap_err();
    assert!(matches!(err, SplitError::Ffprobe(_)));
}

#[test]
fn scratch_dir_is_removed_after_a_failed_run() {
    // Mirror the handler's failure path: scratch created, input written,
    // no output ever produced, guard dropped.
    let root = tempfile::tempdir().unwrap();
    let scratch_path;
    {
        let scratch = ScratchDir::create(root.path(), 424242).unwrap();
        scratch_path = scratch.path().to_path_buf();
        std::fs::write(scratch.input_path("video.mp4"), b"x").unwrap();
    }
    assert!(!scratch_path.exists());
    // The shared root stays for the next request
    assert!(root.path().exists());
}

#[test]
fn scratch_dirs_for_different_senders_are_independent() {
    // Two senders processed concurrently under one root: finishing (and
    // dropping) one guard must leave the other's in-flight files intact.
    let root = tempfile::tempdir().unwrap();
    let first = ScratchDir::create(root.path(), 777000).unwrap();
    std::fs::write(first.input_path("clip.mp4"), b"x").unwrap();
    {
        let second = ScratchDir::create(root.path(), 778000).unwrap();
        std::fs::write(second.input_path("clip.mp4"), b"y").unwrap();
    }
    assert!(first.path().is_dir());
    assert!(first.input_path("clip.mp4").exists());
}

#[test]
fn segment_estimate_matches_collected_output() {
    // A 95s video at 30s per segment: 4 segments expected, and the
    // enumeration of 4 produced files agrees.
    let expected = estimate_segments(95.0, 30);
    assert_eq!(expected, 4);

    let dir = tempfile::tempdir().unwrap();
    for i in 0..expected {
        std::fs::write(dir.path().join(format!("part_{:03}.mp4", i)), b"x").unwrap();
    }
    let parts = collect_segments(dir.path()).unwrap();
    assert_eq!(parts.len() as u64, expected);
}
