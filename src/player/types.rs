//! Player-facing small types: repeat mode, queue origin and the derived
//! transport state.

/// How playback continues when the current track ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    Off,
    /// Restart the current track when it ends.
    One,
    /// Wrap around to the start of the queue.
    All,
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Off
    }
}

/// Which queue-building action produced the current queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QueueOrigin {
    /// No queue-building action: ad-hoc single-track playback.
    None,
    /// The whole archive.
    Global,
    /// One collection (including the virtual promoted channel).
    Collection,
    /// One release.
    Release,
}

impl Default for QueueOrigin {
    fn default() -> Self {
        Self::None
    }
}

/// Transport summary derived from the loaded track and the play flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing has been loaded yet.
    Idle,
    Playing,
    Paused,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Callback used to forward seek requests to the playback device.
pub type SeekHandler = Box<dyn Fn(f64) + Send>;
