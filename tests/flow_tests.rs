//! Duration gate and submission integration tests

use std::fs;
use std::time::Duration;

use voice_tasks::application::ports::FinishedRecording;
use voice_tasks::application::{gate_recording, NewTask, TaskSubmitter};
use voice_tasks::domain::clip::{ClipRejection, ClipWindow};
use voice_tasks::domain::task::TaskType;
use voice_tasks::infrastructure::JsonTaskStore;

fn finished_take(dir: &tempfile::TempDir, secs: u64) -> FinishedRecording {
    let path = dir.path().join(format!("audio_take_{}.flac", secs));
    fs::write(&path, b"fLaC").unwrap();
    FinishedRecording {
        path,
        elapsed: Duration::from_secs(secs),
    }
}

#[test]
fn nine_second_take_is_rejected_and_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let take = finished_take(&dir, 9);
    let path = take.path.clone();

    let err = gate_recording(take, &ClipWindow::default_window()).unwrap_err();
    assert_eq!(err, ClipRejection::TooShort { min: 10 });
    assert!(!path.exists(), "rejected clip file should be deleted");
}

#[test]
fn twenty_one_second_take_is_rejected_and_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let take = finished_take(&dir, 21);
    let path = take.path.clone();

    let err = gate_recording(take, &ClipWindow::default_window()).unwrap_err();
    assert_eq!(err, ClipRejection::TooLong { max: 20 });
    assert!(!path.exists());
}

#[test]
fn boundary_takes_are_accepted_and_kept() {
    let dir = tempfile::tempdir().unwrap();

    for secs in [10, 20] {
        let take = finished_take(&dir, secs);
        let clip = gate_recording(take, &ClipWindow::default_window()).unwrap();
        assert_eq!(u64::from(clip.duration_sec), secs);
        assert!(clip.path.exists(), "accepted clip file should survive");
    }
}

#[test]
fn custom_window_moves_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let window = ClipWindow::new(5, 8);

    let take = finished_take(&dir, 6);
    assert!(gate_recording(take, &window).is_ok());

    let take = finished_take(&dir, 9);
    assert!(gate_recording(take, &window).is_err());
}

#[tokio::test]
async fn accepted_clip_submits_end_to_end() {
    let audio_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();

    let take = finished_take(&audio_dir, 12);
    let clip = gate_recording(take, &ClipWindow::default_window()).unwrap();

    let submitter = TaskSubmitter::new(JsonTaskStore::new(data_dir.path()));
    let draft = NewTask {
        text: Some("a short passage".to_string()),
        audio_path: Some(clip.path.to_string_lossy().to_string()),
        duration_sec: clip.duration_sec,
        ..Default::default()
    };

    let submission = submitter
        .submit(TaskType::TextReading, draft)
        .await
        .unwrap();
    assert!(submission.preserved_corrupt.is_none());

    use voice_tasks::application::ports::TaskStore;
    let stored = submitter.store().load_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, submission.task.id);
    assert_eq!(stored[0].duration_sec, 12);
    assert_eq!(stored[0].text.as_deref(), Some("a short passage"));
    assert!(stored[0].audio_path.is_some());
}
