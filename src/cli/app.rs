//! Main app runner for the guided task and history commands

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::ports::{
    CatalogClient, ClipPlayer, ConfigStore, FinishedRecording, LoadOutcome, PlaybackEnd,
    RecordingError, RecordingSession, TaskStore,
};
use crate::application::{gate_recording, NewTask, SubmitError, TaskSubmitter};
use crate::domain::clip::{ClipWindow, RecordedClip};
use crate::domain::config::AppConfig;
use crate::domain::flow::{
    ImageDescriptionEvent, ImageDescriptionFlow, PhotoCaptureEvent, PhotoCaptureFlow,
    TextReadingEvent, TextReadingFlow, ACK_PROMPTS,
};
use crate::domain::task::{Task, TaskType};
use crate::infrastructure::{
    CpalSession, DummyJsonCatalog, JsonTaskStore, PhotoImporter, RodioClipPlayer, XdgConfigStore,
};

use super::args::TaskCommand;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli (clap already folded the env var in)
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Run one guided capture task end to end.
pub async fn run_task(kind: TaskCommand, config: &AppConfig) -> ExitCode {
    match kind {
        TaskCommand::TextReading => run_text_reading(config).await,
        TaskCommand::ImageDescription => run_image_description(config).await,
        TaskCommand::PhotoCapture { image } => run_photo_capture(config, &image).await,
    }
}

async fn run_text_reading(config: &AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut prompt = Prompt::new();
    let data_dir = config.data_dir_or_default();
    let catalog = DummyJsonCatalog::with_base_url(config.catalog_url_or_default());
    let session = CpalSession::new(&data_dir);
    let player = RodioClipPlayer::new();
    let submitter = TaskSubmitter::new(JsonTaskStore::new(&data_dir));
    let window = config.clip_window_or_default();

    let mut state = TextReadingFlow::new().apply(TextReadingEvent::FetchStarted);
    presenter.start_spinner("Fetching a passage...");
    state = match catalog.fetch_random_item().await {
        Ok(Some(item)) => {
            presenter.spinner_success("Passage ready");
            state.apply(TextReadingEvent::PassageLoaded(item.description))
        }
        Ok(None) => {
            presenter.spinner_fail("The catalog returned no items");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.output("");
    presenter.output("Read this passage aloud:");
    if let Some(passage) = &state.passage {
        presenter.output(&format!("  {}", passage));
    }
    presenter.output("");

    let clip =
        match capture_reviewed_clip(&session, &player, &window, &mut prompt, &mut presenter).await
        {
            Some(clip) => clip,
            None => return ExitCode::from(EXIT_ERROR),
        };
    state = state.apply(TextReadingEvent::ClipAccepted(clip.clone()));

    presenter.output("");
    for (index, ack) in ACK_PROMPTS.iter().enumerate() {
        if prompt.confirm(&presenter, ack).await {
            state = state.apply(TextReadingEvent::AckToggled(index));
        }
    }

    if !state.can_submit() {
        presenter.error("All confirmations are required; the take was discarded.");
        let _ = std::fs::remove_file(&clip.path);
        return ExitCode::from(EXIT_ERROR);
    }

    let draft = NewTask {
        text: state.passage.clone(),
        audio_path: Some(clip.path.to_string_lossy().to_string()),
        duration_sec: clip.duration_sec,
        ..Default::default()
    };
    finish_submit(
        &submitter,
        TaskType::TextReading,
        draft,
        Some(&clip.path),
        &presenter,
    )
    .await
}

async fn run_image_description(config: &AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut prompt = Prompt::new();
    let data_dir = config.data_dir_or_default();
    let catalog = DummyJsonCatalog::with_base_url(config.catalog_url_or_default());
    let session = CpalSession::new(&data_dir);
    let player = RodioClipPlayer::new();
    let submitter = TaskSubmitter::new(JsonTaskStore::new(&data_dir));
    let window = config.clip_window_or_default();

    let mut state = ImageDescriptionFlow::new().apply(ImageDescriptionEvent::FetchStarted);
    presenter.start_spinner("Fetching a product image...");
    state = match catalog.fetch_random_item().await {
        Ok(Some(item)) => {
            presenter.spinner_success("Product ready");
            let image_url = item.primary_image().map(str::to_string);
            state.apply(ImageDescriptionEvent::ItemLoaded {
                title: item.title,
                image_url,
            })
        }
        Ok(None) => {
            presenter.spinner_fail("The catalog returned no items");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let image_url = match &state.image_url {
        Some(url) => url.clone(),
        None => {
            // ItemLoaded recorded the reason
            presenter.error(state.error.as_deref().unwrap_or("Catalog item has no image"));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.output("");
    presenter.output("Open this image and describe what you see:");
    if let Some(title) = &state.item_title {
        presenter.output(&format!("  {}", title));
    }
    presenter.output(&format!("  {}", image_url));
    presenter.output("");

    let clip =
        match capture_reviewed_clip(&session, &player, &window, &mut prompt, &mut presenter).await
        {
            Some(clip) => clip,
            None => return ExitCode::from(EXIT_ERROR),
        };
    state = state.apply(ImageDescriptionEvent::ClipAccepted(clip.clone()));

    if !state.can_submit() {
        presenter.error("Nothing to submit.");
        return ExitCode::from(EXIT_ERROR);
    }

    let draft = NewTask {
        image_url: Some(image_url),
        audio_path: Some(clip.path.to_string_lossy().to_string()),
        duration_sec: clip.duration_sec,
        ..Default::default()
    };
    finish_submit(
        &submitter,
        TaskType::ImageDescription,
        draft,
        Some(&clip.path),
        &presenter,
    )
    .await
}

async fn run_photo_capture(config: &AppConfig, image: &Path) -> ExitCode {
    let mut presenter = Presenter::new();
    let mut prompt = Prompt::new();
    let data_dir = config.data_dir_or_default();
    let session = CpalSession::new(&data_dir);
    let player = RodioClipPlayer::new();
    let submitter = TaskSubmitter::new(JsonTaskStore::new(&data_dir));
    let window = config.clip_window_or_default();

    let importer = PhotoImporter::new(&data_dir);
    let imported = match importer.import(image) {
        Ok(path) => path,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.success(&format!("Photo imported to {}", imported.display()));

    let mut state =
        PhotoCaptureFlow::new().apply(PhotoCaptureEvent::PhotoAttached(imported.clone()));

    presenter.output_inline("Describe the photo (optional, Enter to skip): ");
    let description = prompt.line().await;
    state = state.apply(PhotoCaptureEvent::DescriptionEdited(description));

    // Audio is optional here; a failed or abandoned take does not lose the photo
    let mut clip = None;
    if prompt
        .confirm(&presenter, "Record a spoken description?")
        .await
    {
        match capture_reviewed_clip(&session, &player, &window, &mut prompt, &mut presenter).await
        {
            Some(recorded) => {
                state = state.apply(PhotoCaptureEvent::ClipAccepted(recorded.clone()));
                clip = Some(recorded);
            }
            None => presenter.info("Continuing without audio"),
        }
    }

    if !state.can_submit() {
        presenter.error("Nothing to submit.");
        return ExitCode::from(EXIT_ERROR);
    }

    let draft = NewTask {
        text: state.description_text(),
        image_path: Some(imported.to_string_lossy().to_string()),
        audio_path: clip
            .as_ref()
            .map(|c| c.path.to_string_lossy().to_string()),
        duration_sec: clip.as_ref().map(|c| c.duration_sec).unwrap_or(0),
        ..Default::default()
    };
    let clip_path = clip.as_ref().map(|c| c.path.as_path());
    finish_submit(
        &submitter,
        TaskType::PhotoCapture,
        draft,
        clip_path,
        &presenter,
    )
    .await
}

/// List completed tasks, most recent first.
pub async fn run_history(limit: Option<usize>, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let store = JsonTaskStore::new(config.data_dir_or_default());

    let tasks = match store.load_outcome().await {
        Ok(LoadOutcome::Loaded(tasks)) => tasks,
        Ok(LoadOutcome::Missing) => Vec::new(),
        Ok(LoadOutcome::Corrupt { preserved }) => {
            match preserved {
                Some(path) => presenter.warn(&format!(
                    "Task history was unreadable; the damaged file was moved to {}",
                    path.display()
                )),
                None => presenter.warn("Task history was unreadable and has been reset"),
            }
            Vec::new()
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if tasks.is_empty() {
        presenter.info("No tasks recorded yet.");
        return ExitCode::from(EXIT_SUCCESS);
    }

    let shown = limit.unwrap_or(tasks.len());
    for task in tasks.iter().take(shown) {
        presenter.output(&format!(
            "{}  {}  {:>3}s  {}",
            task.short_id(),
            format!("{:<17}", task.task_type.to_string()),
            task.duration_sec,
            task.timestamp
        ));
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Show one task in full.
pub async fn run_show(id: &str, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let store = JsonTaskStore::new(config.data_dir_or_default());

    let tasks = match store.load_all().await {
        Ok(tasks) => tasks,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let task = match find_task(&tasks, id) {
        Ok(task) => task,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.key_value("id", &task.id);
    presenter.key_value("type", &task.task_type.to_string());
    presenter.key_value("created", &task.timestamp);
    if let Some(text) = &task.text {
        presenter.key_value("text", text);
    }
    if let Some(url) = &task.image_url {
        presenter.key_value("image_url", url);
    }
    if let Some(path) = &task.image_path {
        presenter.key_value("image_path", path);
    }
    if let Some(path) = &task.audio_path {
        presenter.key_value("audio_path", path);
        presenter.key_value("duration", &format!("{}s", task.duration_sec));
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Replay a task's audio clip.
pub async fn run_play(id: &str, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let store = JsonTaskStore::new(config.data_dir_or_default());

    let tasks = match store.load_all().await {
        Ok(tasks) => tasks,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let task = match find_task(&tasks, id) {
        Ok(task) => task,
        Err(message) => {
            presenter.error(&message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let audio_path = match &task.audio_path {
        Some(path) => path.clone(),
        None => {
            presenter.error("Task has no audio clip");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let player = RodioClipPlayer::new();
    presenter.info(&format!("Playing {} ({}s)", audio_path, task.duration_sec));
    match player.play(Path::new(&audio_path)).await {
        Ok(handle) => match handle.finished().await {
            PlaybackEnd::Finished | PlaybackEnd::Stopped => {
                presenter.success("Playback finished");
                ExitCode::from(EXIT_SUCCESS)
            }
            PlaybackEnd::Failed(message) => {
                presenter.error(&message);
                ExitCode::from(EXIT_ERROR)
            }
        },
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Resolve a task by full id or unique prefix.
fn find_task<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task, String> {
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(id)).collect();
    match matches.as_slice() {
        [] => Err(format!("No task matches '{}'", id)),
        [task] => Ok(task),
        _ => Err(format!(
            "'{}' matches {} tasks; use more of the id",
            id,
            matches.len()
        )),
    }
}

/// Line-oriented stdin prompts.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// Next line from stdin; EOF reads as empty.
    async fn line(&mut self) -> String {
        self.lines
            .next_line()
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Show a message and wait for Enter.
    async fn pause(&mut self, presenter: &Presenter, message: &str) {
        presenter.output_inline(&format!("{} ", message));
        let _ = self.line().await;
    }

    /// Wait for Enter without printing anything.
    async fn pause_silent(&mut self) {
        let _ = self.line().await;
    }

    /// Ask a yes/no question, defaulting to no.
    async fn confirm(&mut self, presenter: &Presenter, question: &str) -> bool {
        presenter.output_inline(&format!("{} [y/N] ", question));
        matches!(self.line().await.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Record takes until one passes the duration gate and the user keeps it.
/// Returns None when the user gives up or the input device fails.
async fn capture_reviewed_clip<R, P>(
    session: &R,
    player: &P,
    window: &ClipWindow,
    prompt: &mut Prompt,
    presenter: &mut Presenter,
) -> Option<RecordedClip>
where
    R: RecordingSession,
    P: ClipPlayer,
{
    presenter.info(&format!(
        "Recordings must be between {} and {} seconds.",
        window.min_secs(),
        window.max_secs()
    ));

    loop {
        let finished = match record_take(session, prompt, presenter).await {
            Ok(finished) => finished,
            Err(e) => {
                presenter.error(&e.to_string());
                return None;
            }
        };

        match gate_recording(finished, window) {
            Ok(clip) => match review_clip(&clip, player, prompt, presenter).await {
                Review::Keep => return Some(clip),
                Review::Retake => {
                    let _ = std::fs::remove_file(&clip.path);
                }
            },
            Err(rejection) => {
                // gate_recording already deleted the file
                presenter.error(&rejection.to_string());
                if !prompt.confirm(presenter, "Record another take?").await {
                    return None;
                }
            }
        }
    }
}

/// One press-to-release take: Enter starts, Enter stops.
async fn record_take<R: RecordingSession>(
    session: &R,
    prompt: &mut Prompt,
    presenter: &mut Presenter,
) -> Result<FinishedRecording, RecordingError> {
    prompt
        .pause(presenter, "Press Enter to start recording...")
        .await;
    session.start().await?;

    presenter.start_spinner(&recording_spinner_message(presenter, 0));
    let mut ticker = tokio::time::interval(StdDuration::from_millis(250));
    loop {
        tokio::select! {
            _ = prompt.pause_silent() => break,
            _ = ticker.tick() => {
                let message =
                    recording_spinner_message(presenter, session.elapsed().as_secs());
                presenter.update_spinner(&message);
            }
        }
    }

    match session.stop().await {
        Ok(finished) => {
            presenter.spinner_success(&format!("Recorded {} seconds", finished.elapsed.as_secs()));
            Ok(finished)
        }
        Err(e) => {
            presenter.stop_spinner();
            Err(e)
        }
    }
}

/// Spinner line shown while a take is rolling. Fixed-width elapsed time
/// so the line does not jitter as it counts up.
fn recording_spinner_message(presenter: &Presenter, elapsed_secs: u64) -> String {
    format!(
        "Recording {} (press Enter to stop)",
        presenter.format_elapsed(elapsed_secs)
    )
}

enum Review {
    Keep,
    Retake,
}

/// Let the user replay the take before deciding to keep or redo it.
async fn review_clip<P: ClipPlayer>(
    clip: &RecordedClip,
    player: &P,
    prompt: &mut Prompt,
    presenter: &mut Presenter,
) -> Review {
    loop {
        presenter.output_inline("[p]lay, [r]etake, or Enter to continue: ");
        match prompt.line().await.trim().to_lowercase().as_str() {
            "p" | "play" => match player.play(&clip.path).await {
                Ok(handle) => match handle.finished().await {
                    PlaybackEnd::Finished => presenter.info("Playback finished"),
                    PlaybackEnd::Stopped => presenter.info("Playback stopped"),
                    PlaybackEnd::Failed(message) => presenter.warn(&message),
                },
                Err(e) => presenter.warn(&e.to_string()),
            },
            "r" | "retake" => {
                player.stop().await;
                return Review::Retake;
            }
            _ => {
                player.stop().await;
                return Review::Keep;
            }
        }
    }
}

/// Persist a validated draft and report the result.
async fn finish_submit<S: TaskStore>(
    submitter: &TaskSubmitter<S>,
    task_type: TaskType,
    draft: NewTask,
    clip_path: Option<&Path>,
    presenter: &Presenter,
) -> ExitCode {
    match submitter.submit(task_type, draft).await {
        Ok(submission) => {
            if let Some(path) = &submission.preserved_corrupt {
                presenter.warn(&format!(
                    "Previous task history was unreadable; the damaged file was moved to {}",
                    path.display()
                ));
            }
            presenter.success(&format!("Task saved ({})", submission.task.short_id()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e @ SubmitError::Store(_)) => {
            presenter.error(&e.to_string());
            // The media survives a failed save; tell the user where it is
            if let Some(path) = clip_path {
                presenter.warn(&format!("Your recording is still at {}", path.display()));
            }
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            task_type: TaskType::TextReading,
            text: Some("passage".into()),
            image_url: None,
            image_path: None,
            audio_path: Some("/data/a.flac".into()),
            duration_sec: 12,
            timestamp: "2025-01-01T00:00:00.000000Z".into(),
        }
    }

    #[test]
    fn find_task_by_full_id() {
        let tasks = vec![task("aaaa-1111"), task("bbbb-2222")];
        assert_eq!(find_task(&tasks, "bbbb-2222").unwrap().id, "bbbb-2222");
    }

    #[test]
    fn find_task_by_unique_prefix() {
        let tasks = vec![task("aaaa-1111"), task("bbbb-2222")];
        assert_eq!(find_task(&tasks, "bb").unwrap().id, "bbbb-2222");
    }

    #[test]
    fn find_task_rejects_ambiguous_prefix() {
        let tasks = vec![task("aaaa-1111"), task("aaab-2222")];
        let err = find_task(&tasks, "aaa").unwrap_err();
        assert!(err.contains("2 tasks"));
    }

    #[test]
    fn find_task_rejects_unknown_id() {
        let tasks = vec![task("aaaa-1111")];
        assert!(find_task(&tasks, "zzzz").is_err());
    }

    #[test]
    fn recording_spinner_shows_elapsed_seconds() {
        let presenter = Presenter::new();
        let message = recording_spinner_message(&presenter, 12);
        assert!(message.contains("12s"));
        assert!(message.contains("Enter"));
    }
}
