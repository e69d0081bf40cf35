//! Device command and event types.

use std::path::PathBuf;

/// Commands accepted by the device thread.
#[derive(Debug)]
pub enum DeviceCmd {
    /// Load a new audio source, optionally starting playback immediately.
    Load { path: PathBuf, autoplay: bool },
    /// Resume the current source.
    Play,
    /// Pause the current source.
    Pause,
    /// Jump to an absolute position (seconds) in the current source.
    Seek(f64),
    /// Stop playback and drop the current source.
    Stop,
    /// Quit the device thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Signals the device reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Elapsed seconds in the current source; emitted periodically while
    /// playing.
    Progress(f64),
    /// The current source finished on its own.
    Ended,
}
