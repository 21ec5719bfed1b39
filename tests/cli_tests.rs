//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn voice_tasks_bin() -> Command {
    Command::cargo_bin("voice-tasks").expect("binary builds")
}

#[test]
fn help_lists_subcommands() {
    voice_tasks_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("task")
                .and(predicate::str::contains("history"))
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("play"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn version_names_the_binary() {
    voice_tasks_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-tasks"));
}

#[test]
fn task_help_lists_kinds() {
    voice_tasks_bin()
        .args(["task", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("text-reading")
                .and(predicate::str::contains("image-description"))
                .and(predicate::str::contains("photo-capture")),
        );
}

#[test]
fn history_on_fresh_data_dir_reports_nothing() {
    let dir = tempfile::tempdir().unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .arg("history")
        .assert()
        .success()
        .stderr(predicate::str::contains("No tasks recorded yet"));
}

#[test]
fn history_lists_seeded_tasks() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[
            {
                "id": "11111111-aaaa-bbbb-cccc-000000000001",
                "task_type": "text_reading",
                "text": "a passage",
                "audio_path": "/data/audio_1.flac",
                "duration_sec": 12,
                "timestamp": "2025-06-01T10:00:00.000000Z"
            }
        ]"#,
    )
    .unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("11111111")
                .and(predicate::str::contains("text_reading"))
                .and(predicate::str::contains("12s")),
        );
}

#[test]
fn history_limit_caps_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[
            {
                "id": "aaaa-1", "task_type": "photo_capture",
                "image_path": "/data/p1.jpg",
                "duration_sec": 0, "timestamp": "2025-06-02T10:00:00.000000Z"
            },
            {
                "id": "bbbb-2", "task_type": "photo_capture",
                "image_path": "/data/p2.jpg",
                "duration_sec": 0, "timestamp": "2025-06-01T10:00:00.000000Z"
            }
        ]"#,
    )
    .unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .args(["history", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aaaa-1").and(predicate::str::contains("bbbb-2").not()));
}

#[test]
fn show_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .args(["show", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task matches"));
}

#[test]
fn show_finds_task_by_prefix() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[
            {
                "id": "11111111-aaaa-bbbb-cccc-000000000001",
                "task_type": "image_description",
                "image_url": "https://cdn.example/mug.jpg",
                "audio_path": "/data/audio_1.flac",
                "duration_sec": 15,
                "timestamp": "2025-06-01T10:00:00.000000Z"
            }
        ]"#,
    )
    .unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .args(["show", "11111111"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("image_description")
                .and(predicate::str::contains("https://cdn.example/mug.jpg"))
                .and(predicate::str::contains("15s")),
        );
}

#[test]
fn play_without_audio_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[
            {
                "id": "aaaa-1", "task_type": "photo_capture",
                "image_path": "/data/p1.jpg",
                "duration_sec": 0, "timestamp": "2025-06-01T10:00:00.000000Z"
            }
        ]"#,
    )
    .unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .args(["play", "aaaa-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no audio clip"));
}

#[test]
fn corrupt_history_warns_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "{broken").unwrap();

    voice_tasks_bin()
        .env("VOICE_TASKS_DATA_DIR", dir.path())
        .arg("history")
        .assert()
        .success()
        .stderr(predicate::str::contains("unreadable"));
}

#[test]
fn config_set_rejects_unknown_key() {
    voice_tasks_bin()
        .args(["config", "set", "api_key", "x"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_help_lists_actions() {
    voice_tasks_bin()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("set"))
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("list"))
                .and(predicate::str::contains("path")),
        );
}
