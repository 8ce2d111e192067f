use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use revocal::application::ports::{
    AudioExtractor, ExtractionError, MuxError, VideoMuxer,
};
use revocal::application::services::{call_with_retry, CallPolicy};
use revocal::infrastructure::media::{FfmpegAudioExtractor, FfmpegVideoMuxer};

/// Stand-in codec binary that appends heartbeats forever, standing in for a
/// hung ffmpeg invocation.
fn hung_binary(dir: &TempDir, heartbeat: &Path) -> PathBuf {
    let script = dir.path().join("hung-codec.sh");
    let body = format!(
        "#!/bin/sh\nwhile true; do\n  echo beat >> \"{}\"\n  sleep 0.05\ndone\n",
        heartbeat.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn short_policy() -> CallPolicy {
    CallPolicy {
        timeout: Duration::from_millis(200),
        retry_backoff: Duration::from_millis(10),
    }
}

async fn heartbeat_len(path: &Path) -> u64 {
    tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0)
}

#[tokio::test]
async fn given_hung_extractor_when_call_times_out_then_no_orphan_keeps_writing() {
    let dir = TempDir::new().unwrap();
    let heartbeat = dir.path().join("heartbeat.log");
    let video = dir.path().join("clip.mp4");
    std::fs::write(&video, b"stub video").unwrap();
    let output = dir.path().join("out.wav");

    let extractor = FfmpegAudioExtractor::new(hung_binary(&dir, &heartbeat));
    let result = call_with_retry(
        &short_policy(),
        "audio extraction",
        ExtractionError::Timeout,
        || extractor.extract(&video, &output),
    )
    .await;
    assert!(matches!(result, Err(ExtractionError::Timeout(_))));

    // Both attempts were dropped; their children must be dead, not still
    // appending heartbeats.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let settled = heartbeat_len(&heartbeat).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(heartbeat_len(&heartbeat).await, settled);
}

#[tokio::test]
async fn given_hung_muxer_when_call_times_out_then_no_orphan_keeps_writing() {
    let dir = TempDir::new().unwrap();
    let heartbeat = dir.path().join("heartbeat.log");
    let video = dir.path().join("clip.mp4");
    let audio = dir.path().join("voice.wav");
    std::fs::write(&video, b"stub video").unwrap();
    std::fs::write(&audio, b"stub audio").unwrap();
    let output = dir.path().join("out.mp4");

    let muxer = FfmpegVideoMuxer::new(hung_binary(&dir, &heartbeat));
    let result = call_with_retry(&short_policy(), "video mux", MuxError::Timeout, || {
        muxer.replace_audio(&video, &audio, &output)
    })
    .await;
    assert!(matches!(result, Err(MuxError::Timeout(_))));

    tokio::time::sleep(Duration::from_millis(300)).await;
    let settled = heartbeat_len(&heartbeat).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(heartbeat_len(&heartbeat).await, settled);
}

#[tokio::test]
async fn given_missing_video_when_extracting_then_input_is_rejected_before_spawning() {
    let dir = TempDir::new().unwrap();
    let extractor = FfmpegAudioExtractor::default();

    let result = extractor
        .extract(&dir.path().join("absent.mp4"), &dir.path().join("out.wav"))
        .await;
    assert!(matches!(result, Err(ExtractionError::InputNotFound(_))));
}

#[tokio::test]
async fn given_missing_audio_when_muxing_then_input_is_rejected_before_spawning() {
    let dir = TempDir::new().unwrap();
    let video = dir.path().join("clip.mp4");
    std::fs::write(&video, b"stub video").unwrap();
    let muxer = FfmpegVideoMuxer::default();

    let result = muxer
        .replace_audio(&video, &dir.path().join("absent.wav"), &dir.path().join("out.mp4"))
        .await;
    assert!(matches!(result, Err(MuxError::InputNotFound(_))));
}
