//! The queue & transport engine.
//!
//! `Player` owns the ordered play queue, the transport flags and the
//! promoted set. It never talks to the audio device directly: the runtime
//! observes its state and drives the device, and feeds device signals back
//! in through `set_current_time` / `on_playback_ended`. Every catalog
//! lookup may fail (ids can outlive a snapshot reload); failed lookups are
//! no-ops, never errors.

use tracing::debug;

use crate::catalog::{CatalogHandle, Release, Track};

use super::promoted::{MemoryPromoted, PromotedStore};
use super::types::{QueueOrigin, RepeatMode, SeekHandler, TransportState};

/// The playback queue and transport state machine.
pub struct Player {
    catalog: CatalogHandle,

    queue: Vec<String>,
    /// Index of the current entry; `None` until a queue or track is set.
    position: Option<usize>,
    origin: QueueOrigin,
    context: Option<String>,

    /// Snapshot of the currently loaded track.
    current: Option<Track>,
    /// Release the current track was launched from. Display metadata only:
    /// next/previous never update it, so it can go stale after navigation.
    current_release: Option<Release>,
    playing: bool,
    current_time: f64,
    repeat: RepeatMode,

    promoted: Box<dyn PromotedStore>,
    seek_handler: Option<SeekHandler>,
}

impl Player {
    /// Create a player over `catalog` with a fresh in-memory promoted set.
    pub fn new(catalog: CatalogHandle) -> Self {
        Self::with_promoted_store(catalog, Box::new(MemoryPromoted::default()))
    }

    /// Create a player with a caller-provided promoted store.
    pub fn with_promoted_store(catalog: CatalogHandle, promoted: Box<dyn PromotedStore>) -> Self {
        Self {
            catalog,
            queue: Vec::new(),
            position: None,
            origin: QueueOrigin::None,
            context: None,
            current: None,
            current_release: None,
            playing: false,
            current_time: 0.0,
            repeat: RepeatMode::Off,
            promoted,
            seek_handler: None,
        }
    }

    fn lookup(&self, track_id: &str) -> Option<Track> {
        self.catalog
            .lock()
            .ok()
            .and_then(|c| c.track(track_id).cloned())
    }

    /// Replace the queue wholesale and point readiness at its first element.
    ///
    /// Does not start playback, and does not validate membership: ids that
    /// resolve to nothing are skipped at playback time, not rejected here.
    pub fn set_queue(
        &mut self,
        track_ids: Vec<String>,
        origin: QueueOrigin,
        context: Option<String>,
    ) {
        self.queue = track_ids;
        self.position = Some(0);
        self.origin = origin;
        self.context = context;
    }

    /// Start playing `track_id`, optionally remembering the release it was
    /// launched from.
    ///
    /// Two distinct cases: when the id is already in the queue, playback
    /// jumps to its first occurrence and the queue is reused; otherwise the
    /// queue is replaced by a single-element queue holding just this track
    /// and the origin/context are cleared. An unknown id is ignored.
    pub fn play_track(&mut self, track_id: &str, release: Option<Release>) {
        let Some(track) = self.lookup(track_id) else {
            debug!(track_id, "ignoring play for unknown track");
            return;
        };

        match self.queue.iter().position(|id| id.as_str() == track_id) {
            Some(index) => {
                // Queue reused: only the position moves.
                self.position = Some(index);
            }
            None => {
                // Queue replaced: ad-hoc single-track playback.
                self.queue = vec![track_id.to_string()];
                self.position = Some(0);
                self.origin = QueueOrigin::None;
                self.context = None;
            }
        }

        self.current = Some(track);
        self.current_release = release;
        self.playing = true;
        self.current_time = 0.0;
    }

    /// Flip play/pause. No-op until a track has been loaded.
    pub fn toggle_play(&mut self) {
        if self.current.is_some() {
            self.playing = !self.playing;
        }
    }

    /// Advance to the next queue entry.
    ///
    /// Under repeat-one this does nothing: restart-on-end belongs to the
    /// device integration, and a manual skip is deliberately ignored. At
    /// the end of the queue, repeat-all wraps to the start; otherwise the
    /// transport is left untouched.
    pub fn play_next(&mut self) {
        if self.repeat == RepeatMode::One {
            return;
        }
        let _ = self.step_forward();
    }

    /// Step back to the previous queue entry.
    ///
    /// Previous always wraps from the first entry to the last, regardless
    /// of repeat mode.
    pub fn play_previous(&mut self) {
        if self.queue.is_empty() {
            debug!("previous requested with an empty queue");
            return;
        }

        let prev = match self.position {
            Some(p) if p > 0 => p - 1,
            _ => self.queue.len() - 1,
        };

        let _ = self.load_queue_entry(prev);
    }

    /// Restart or advance after the device reports end-of-track.
    ///
    /// Repeat-one keeps queue and position and only rewinds the clock (the
    /// runtime restarts the source); every other mode advances like
    /// [`Player::play_next`], and when there is nowhere to go the play flag
    /// is cleared so the transport does not claim to be playing a finished
    /// source.
    pub fn on_playback_ended(&mut self) {
        if self.repeat == RepeatMode::One {
            self.current_time = 0.0;
            self.playing = true;
            return;
        }

        if !self.step_forward() {
            self.playing = false;
        }
    }

    // Advance one entry forward; true when a new entry was loaded.
    fn step_forward(&mut self) -> bool {
        if self.queue.is_empty() {
            debug!("next requested with an empty queue");
            return false;
        }

        let mut next = self.position.map_or(0, |p| p + 1);
        if next >= self.queue.len() {
            if self.repeat == RepeatMode::All {
                next = 0;
            } else {
                return false;
            }
        }

        self.load_queue_entry(next)
    }

    // Resolve and load the queue entry at `index`. An id that no longer
    // resolves leaves queue, position and transport untouched.
    fn load_queue_entry(&mut self, index: usize) -> bool {
        let track_id = &self.queue[index];
        let Some(track) = self.lookup(track_id) else {
            debug!(%track_id, "queue entry no longer resolves; staying put");
            return false;
        };

        self.current = Some(track);
        self.position = Some(index);
        self.playing = true;
        self.current_time = 0.0;
        true
    }

    /// Forward a seek request to the attached device callback.
    ///
    /// Silently does nothing when no device is attached. The engine does
    /// not clamp; callers clamp to the track duration before asking.
    pub fn seek_to(&self, time: f64) {
        match &self.seek_handler {
            Some(handler) => handler(time),
            None => debug!("seek requested before a device was attached"),
        }
    }

    /// Attach the callback `seek_to` forwards to.
    pub fn attach_seek_handler(&mut self, handler: SeekHandler) {
        self.seek_handler = Some(handler);
    }

    /// Record playback progress reported by the device. Not validated
    /// against the track duration.
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Flip promoted membership for `track_id`. The id is not checked
    /// against the catalog.
    pub fn toggle_promote(&mut self, track_id: &str) {
        self.promoted.toggle(track_id);
    }

    /// Whether `track_id` is in the promoted set.
    pub fn is_promoted(&self, track_id: &str) -> bool {
        self.promoted.contains(track_id)
    }

    /// Promoted track ids, sorted.
    pub fn promoted_ids(&self) -> Vec<String> {
        self.promoted.ids()
    }

    /// Cycle `off -> one -> all -> off`.
    pub fn cycle_repeat_mode(&mut self) {
        self.repeat = match self.repeat {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        };
    }

    /// Set the repeat mode directly (startup default).
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn origin(&self) -> QueueOrigin {
        self.origin
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn current_release(&self) -> Option<&Release> {
        self.current_release.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Derived transport summary: `Idle` until a track loads, then
    /// `Playing`/`Paused` by the play flag.
    pub fn transport_state(&self) -> TransportState {
        match (&self.current, self.playing) {
            (None, _) => TransportState::Idle,
            (Some(_), true) => TransportState::Playing,
            (Some(_), false) => TransportState::Paused,
        }
    }
}
