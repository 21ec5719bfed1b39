//! Rodio-based clip playback adapter
//!
//! The output stream lives on a dedicated thread (rodio's OutputStream is
//! not Send); the player keeps a shared handle to the sink so a later
//! `play` or `stop` can preempt it. Each session carries a single-fire
//! completion signal that always resolves: `Finished` on natural end,
//! `Stopped` on preemption, `Failed` if the device goes away after the
//! file was accepted.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::{oneshot, Mutex};

use crate::application::ports::{ClipPlayer, PlaybackEnd, PlaybackError, PlaybackHandle};

/// How long to wait for the playback thread to hand its sink over
const SINK_HANDOVER_TIMEOUT: StdDuration = StdDuration::from_secs(2);

struct ActivePlayback {
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
}

/// Result of waiting for the playback thread's sink.
enum SinkHandover<T> {
    /// Arrived in time; becomes the tracked active session.
    Tracked(T),
    /// Raced in after the deadline; the session is already written off
    /// and this sink must be stopped, never tracked.
    Late(T),
    /// Never arrived; the stop flag keeps the stranded thread from
    /// starting an untracked session.
    Abandoned,
}

/// Clip player backed by rodio.
pub struct RodioClipPlayer {
    active: Mutex<Option<ActivePlayback>>,
}

impl RodioClipPlayer {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }

    async fn preempt(&self) {
        let mut active = self.active.lock().await;
        if let Some(playback) = active.take() {
            playback.stopped.store(true, Ordering::SeqCst);
            playback.sink.stop();
        }
    }

    /// Wait for the playback thread to hand over its sink. A session whose
    /// device is not up within the deadline is written off: the stop flag
    /// is raised before anything else, so the thread either sees it and
    /// abandons the sink, or the sink arrives here as `Late` and gets
    /// stopped directly. Either way it can never play untracked.
    fn recv_sink<T>(
        rx: &mpsc::Receiver<T>,
        stopped: &AtomicBool,
        timeout: StdDuration,
    ) -> SinkHandover<T> {
        match rx.recv_timeout(timeout) {
            Ok(sink) => SinkHandover::Tracked(sink),
            Err(_) => match Self::write_off(rx, stopped) {
                Some(sink) => SinkHandover::Late(sink),
                None => SinkHandover::Abandoned,
            },
        }
    }

    /// Flag the session stopped, then drain a sink that raced in anyway.
    fn write_off<T>(rx: &mpsc::Receiver<T>, stopped: &AtomicBool) -> Option<T> {
        stopped.store(true, Ordering::SeqCst);
        rx.try_recv().ok()
    }
}

impl Default for RodioClipPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipPlayer for RodioClipPlayer {
    async fn play(&self, path: &Path) -> Result<PlaybackHandle, PlaybackError> {
        // At most one playback session: starting a new one preempts the
        // old one unconditionally
        self.preempt().await;

        // Open and decode up front so a bad file is a typed error rather
        // than a silent no-op
        let file = File::open(path).map_err(|e| PlaybackError::OpenFailed(e.to_string()))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::OpenFailed(e.to_string()))?;

        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_thread = Arc::clone(&stopped);
        let (done_tx, done_rx) = oneshot::channel();
        let (sink_tx, sink_rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let (_stream, stream_handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = done_tx.send(PlaybackEnd::Failed(e.to_string()));
                    return;
                }
            };

            let sink = match Sink::try_new(&stream_handle) {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    let _ = done_tx.send(PlaybackEnd::Failed(e.to_string()));
                    return;
                }
            };

            let _ = sink_tx.send(Arc::clone(&sink));

            // The caller may have written this session off during a slow
            // device open; an untracked sink must never start playing
            if stopped_thread.load(Ordering::SeqCst) {
                let _ = done_tx.send(PlaybackEnd::Stopped);
                return;
            }

            sink.append(source);
            // Returns early when the sink is stopped from outside
            sink.sleep_until_end();

            let end = if stopped_thread.load(Ordering::SeqCst) {
                PlaybackEnd::Stopped
            } else {
                PlaybackEnd::Finished
            };
            let _ = done_tx.send(end);
        });

        match Self::recv_sink(&sink_rx, &stopped, SINK_HANDOVER_TIMEOUT) {
            SinkHandover::Tracked(sink) => {
                let mut active = self.active.lock().await;
                *active = Some(ActivePlayback { sink, stopped });
            }
            SinkHandover::Late(sink) => sink.stop(),
            SinkHandover::Abandoned => {}
        }

        Ok(PlaybackHandle::new(done_rx))
    }

    async fn stop(&self) {
        self.preempt().await;
    }
}
