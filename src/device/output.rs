//! The device thread and its owner-facing handle.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::warn;

use super::sink::create_sink_at;
use super::types::{DeviceCmd, DeviceEvent};

/// Owner-side handle to the audio thread.
pub struct PlaybackDevice {
    tx: Sender<DeviceCmd>,
    events: Receiver<DeviceEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackDevice {
    /// Spawn the audio thread. `progress_tick` is the cadence of
    /// `DeviceEvent::Progress` while playing.
    pub fn new(progress_tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<DeviceCmd>();
        let (event_tx, events) = mpsc::channel::<DeviceEvent>();

        let join = spawn_device_thread(rx, event_tx, progress_tick);

        Self {
            tx,
            events,
            join: Mutex::new(Some(join)),
        }
    }

    /// Clone of the command sender, for seek callbacks and the like.
    pub fn sender(&self) -> Sender<DeviceCmd> {
        self.tx.clone()
    }

    pub fn send(&self, cmd: DeviceCmd) -> Result<(), mpsc::SendError<DeviceCmd>> {
        self.tx.send(cmd)
    }

    /// Wait up to `timeout` for the next device event.
    pub fn poll_event(&self, timeout: Duration) -> Option<DeviceEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Ask the thread to fade out and wait for it to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(DeviceCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn spawn_device_thread(
    rx: Receiver<DeviceCmd>,
    event_tx: Sender<DeviceEvent>,
    progress_tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a long-lived process.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        // Kept across the sink's lifetime so Seek can rebuild after the
        // source ends.
        let mut current: Option<PathBuf> = None;
        let mut paused = true;

        // Source start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        loop {
            match rx.recv_timeout(progress_tick) {
                Ok(cmd) => match cmd {
                    DeviceCmd::Load { path, autoplay } => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &path, Duration::ZERO) {
                            Ok(new_sink) => {
                                if autoplay {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                    paused = false;
                                } else {
                                    started_at = None;
                                    paused = true;
                                }
                                accumulated = Duration::ZERO;
                                sink = Some(new_sink);
                                current = Some(path);
                            }
                            Err(e) => {
                                warn!(path = %path.display(), error = %e, "failed to open audio source");
                                sink = None;
                                current = None;
                                paused = true;
                                started_at = None;
                                accumulated = Duration::ZERO;
                            }
                        }
                    }

                    DeviceCmd::Play => {
                        if let Some(s) = sink.as_ref() {
                            if paused {
                                s.play();
                                started_at = Some(Instant::now());
                                paused = false;
                            }
                        }
                    }

                    DeviceCmd::Pause => {
                        if let Some(s) = sink.as_ref() {
                            if !paused {
                                s.pause();
                                if let Some(st) = started_at {
                                    accumulated += st.elapsed();
                                }
                                started_at = None;
                                paused = true;
                            }
                        }
                    }

                    DeviceCmd::Seek(secs) => {
                        // Scrubbing: rebuild the sink and skip into the file.
                        // Works even after the previous sink drained (repeat,
                        // stop-rewind), as long as a source is loaded.
                        let Some(path) = current.clone() else {
                            continue;
                        };

                        let target = Duration::from_secs_f64(secs.max(0.0));
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &path, target) {
                            Ok(new_sink) => {
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = target;
                                let _ = event_tx.send(DeviceEvent::Progress(target.as_secs_f64()));
                            }
                            Err(e) => {
                                warn!(path = %path.display(), error = %e, "failed to reopen source for seek");
                                sink = None;
                                paused = true;
                                started_at = None;
                            }
                        }
                    }

                    DeviceCmd::Stop => {
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }
                        sink = None;
                        current = None;
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;
                    }

                    DeviceCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, fade_out_ms);
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic tick: report progress, or that the source
                    // finished on its own. Advancing is the owner's call.
                    if let Some(ref s) = sink {
                        if !paused {
                            if s.empty() {
                                sink = None;
                                paused = true;
                                started_at = None;
                                accumulated = Duration::ZERO;
                                let _ = event_tx.send(DeviceEvent::Ended);
                            } else {
                                let elapsed = accumulated
                                    + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                                let _ = event_tx.send(DeviceEvent::Progress(elapsed.as_secs_f64()));
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
