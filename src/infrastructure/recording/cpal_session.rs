//! Cross-platform push-to-record session using cpal
//!
//! Captures mono 16-bit PCM at the device's native rate and finalizes each
//! take as a FLAC clip file named `audio_<uuid>.flac` in the data
//! directory.
//!
//! The stream is managed on a dedicated thread because cpal::Stream is not
//! thread-safe; the session talks to it through atomics and a shared
//! sample buffer.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration as StdDuration, Instant};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::time::sleep;
use uuid::Uuid;

use super::flac_writer;
use crate::application::ports::{FinishedRecording, RecordingError, RecordingSession};

/// How long to wait for the capture device to come up before giving up.
/// A stuck device open must not block the caller indefinitely.
const START_TIMEOUT: StdDuration = StdDuration::from_secs(2);

/// Poll interval while waiting for the stream to come up
const START_POLL: StdDuration = StdDuration::from_millis(25);

/// Grace period for the stream thread to drain after the flag drops
const DRAIN_DELAY: StdDuration = StdDuration::from_millis(100);

struct ActiveTake {
    path: PathBuf,
    started_at: Instant,
}

/// Push-to-record session backed by cpal.
pub struct CpalSession {
    out_dir: PathBuf,
    /// Recorded audio samples (mono, i16, at device sample rate)
    samples: Arc<StdMutex<Vec<i16>>>,
    /// Device sample rate as reported when the stream came up
    device_sample_rate: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
    stream_ready: Arc<AtomicBool>,
    /// Failure reported by the stream thread, if it never came up
    start_failure: Arc<StdMutex<Option<RecordingError>>>,
    take: StdMutex<Option<ActiveTake>>,
}

impl CpalSession {
    /// Create a session writing clips into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            samples: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_recording: Arc::new(AtomicBool::new(false)),
            stream_ready: Arc::new(AtomicBool::new(false)),
            start_failure: Arc::new(StdMutex::new(None)),
            take: StdMutex::new(None),
        }
    }

    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoInputDevice)
    }

    /// Pick a capture configuration, preferring mono and i16/f32 formats.
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best_config {
                None => true,
                // Prefer mono over stereo
                Some(current) => config.channels() < current.channels(),
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(RecordingError::StartFailed(
            "No suitable config found".into(),
        ))?;

        // Prefer 44.1kHz for voice clips, otherwise take the lowest rate
        // the device offers
        let preferred = cpal::SampleRate(44_100);
        let sample_rate = if config_range.min_sample_rate() <= preferred
            && config_range.max_sample_rate() >= preferred
        {
            preferred
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix stereo (or more) down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    fn mint_clip_path(&self) -> PathBuf {
        self.out_dir.join(format!("audio_{}.flac", Uuid::new_v4()))
    }

    fn fail_start(
        failure_slot: &Arc<StdMutex<Option<RecordingError>>>,
        is_recording: &Arc<AtomicBool>,
        error: RecordingError,
    ) {
        if let Ok(mut slot) = failure_slot.lock() {
            *slot = Some(error);
        }
        is_recording.store(false, Ordering::SeqCst);
    }

    /// Run the capture stream until the recording flag drops.
    fn run_stream(
        samples: Arc<StdMutex<Vec<i16>>>,
        device_sample_rate: Arc<AtomicU32>,
        is_recording: Arc<AtomicBool>,
        stream_ready: Arc<AtomicBool>,
        start_failure: Arc<StdMutex<Option<RecordingError>>>,
    ) {
        let device = match Self::get_input_device() {
            Ok(d) => d,
            Err(e) => return Self::fail_start(&start_failure, &is_recording, e),
        };

        let (config, sample_format) = match Self::get_input_config(&device) {
            Ok(c) => c,
            Err(e) => return Self::fail_start(&start_failure, &is_recording, e),
        };

        let channels = config.channels;
        device_sample_rate.store(config.sample_rate.0, Ordering::SeqCst);

        let samples_clone = Arc::clone(&samples);
        let recording_clone = Arc::clone(&is_recording);

        let stream_result = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if recording_clone.load(Ordering::SeqCst) {
                        let mono = CpalSession::mix_to_mono(data, channels);
                        if let Ok(mut buffer) = samples_clone.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            ),

            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if recording_clone.load(Ordering::SeqCst) {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        let mono = CpalSession::mix_to_mono(&i16_data, channels);
                        if let Ok(mut buffer) = samples_clone.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            ),

            _ => {
                return Self::fail_start(
                    &start_failure,
                    &is_recording,
                    RecordingError::StartFailed("Unsupported sample format".into()),
                )
            }
        };

        let stream = match stream_result {
            Ok(s) => s,
            Err(e) => {
                return Self::fail_start(
                    &start_failure,
                    &is_recording,
                    RecordingError::StartFailed(e.to_string()),
                )
            }
        };

        if let Err(e) = stream.play() {
            return Self::fail_start(
                &start_failure,
                &is_recording,
                RecordingError::StartFailed(e.to_string()),
            );
        }

        stream_ready.store(true, Ordering::SeqCst);

        while is_recording.load(Ordering::SeqCst) {
            std::thread::sleep(StdDuration::from_millis(50));
        }

        drop(stream);
    }

    /// Reset capture state for a fresh take, discarding any active one.
    /// Preemption, not queueing: at most one take is ever live.
    async fn arm_new_take(&self) {
        if self.is_recording.load(Ordering::SeqCst) {
            let _ = self.cancel().await;
        }

        if let Ok(mut buffer) = self.samples.lock() {
            buffer.clear();
        }
        if let Ok(mut slot) = self.start_failure.lock() {
            *slot = None;
        }
        self.stream_ready.store(false, Ordering::SeqCst);
        self.is_recording.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> Option<RecordingError> {
        self.start_failure.lock().ok().and_then(|mut s| s.take())
    }
}

#[async_trait]
impl RecordingSession for CpalSession {
    async fn start(&self) -> Result<PathBuf, RecordingError> {
        self.arm_new_take().await;

        let samples = Arc::clone(&self.samples);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let is_recording = Arc::clone(&self.is_recording);
        let stream_ready = Arc::clone(&self.stream_ready);
        let start_failure = Arc::clone(&self.start_failure);

        std::thread::spawn(move || {
            Self::run_stream(
                samples,
                device_sample_rate,
                is_recording,
                stream_ready,
                start_failure,
            );
        });

        // Wait for the stream to come up, bail out on failure or timeout
        let deadline = Instant::now() + START_TIMEOUT;
        loop {
            if self.stream_ready.load(Ordering::SeqCst) {
                break;
            }
            if !self.is_recording.load(Ordering::SeqCst) {
                return Err(self
                    .take_failure()
                    .unwrap_or(RecordingError::StartFailed("Failed to start recording".into())));
            }
            if Instant::now() >= deadline {
                self.is_recording.store(false, Ordering::SeqCst);
                return Err(RecordingError::StartTimeout);
            }
            sleep(START_POLL).await;
        }

        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        let path = self.mint_clip_path();
        if let Ok(mut take) = self.take.lock() {
            *take = Some(ActiveTake {
                path: path.clone(),
                started_at: Instant::now(),
            });
        }

        Ok(path)
    }

    async fn stop(&self) -> Result<FinishedRecording, RecordingError> {
        // The release instant bounds the measured duration, before any
        // cleanup grace period
        let take = match self.take.lock().ok().and_then(|mut t| t.take()) {
            Some(take) => take,
            None => return Err(RecordingError::NotRecording),
        };
        let elapsed = take.started_at.elapsed();

        // Release the stream unconditionally, whatever happens below
        self.is_recording.store(false, Ordering::SeqCst);
        sleep(DRAIN_DELAY).await;

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(RecordingError::Failed("Sample rate not set".into()));
        }

        let samples = match self.samples.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => return Err(RecordingError::Failed("Sample buffer poisoned".into())),
        };

        if samples.is_empty() {
            return Err(RecordingError::Failed("No audio data captured".into()));
        }

        // Encode in a blocking task (CPU-intensive work)
        let encoded =
            tokio::task::spawn_blocking(move || flac_writer::encode_clip(&samples, sample_rate))
                .await
                .map_err(|e| RecordingError::Failed(format!("Encode task error: {}", e)))?
                .map_err(|e| RecordingError::Failed(e.to_string()))?;

        tokio::fs::write(&take.path, encoded)
            .await
            .map_err(|e| RecordingError::Failed(e.to_string()))?;

        Ok(FinishedRecording {
            path: take.path,
            elapsed,
        })
    }

    async fn cancel(&self) -> Result<(), RecordingError> {
        self.is_recording.store(false, Ordering::SeqCst);
        sleep(DRAIN_DELAY).await;

        if let Ok(mut buffer) = self.samples.lock() {
            buffer.clear();
        }
        // The clip file is only written at stop, so there is nothing to
        // delete; dropping the take is enough.
        if let Ok(mut take) = self.take.lock() {
            *take = None;
        }

        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    fn elapsed(&self) -> StdDuration {
        self.take
            .lock()
            .ok()
            .and_then(|take| take.as_ref().map(|t| t.started_at.elapsed()))
            .unwrap_or(StdDuration::ZERO)
    }
}
