use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            playback: PlaybackSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Archive root holding `collections.json`, `tracks.json` and the
    /// per-collection directories. A command-line argument overrides it.
    pub archives_dir: String,
    /// Probe audio files for a duration when the registry omits one.
    pub backfill_durations: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            archives_dir: "archives".to_string(),
            backfill_durations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether the initial global queue is shuffled.
    pub shuffle: bool,
    /// Default repeat mode.
    pub repeat_mode: RepeatModeSetting,
    /// Start playing the head of the queue on startup.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat_mode: RepeatModeSetting::Off,
            autoplay: false,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "none", alias = "no-repeat", alias = "no_repeat")]
    Off,
    #[serde(
        alias = "one",
        alias = "repeat_one",
        alias = "repeat-one",
        alias = "loop-one"
    )]
    One,
    #[serde(
        alias = "all",
        alias = "repeat_all",
        alias = "repeat-all",
        alias = "loop-all"
    )]
    All,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Cadence of playback progress reports (milliseconds). Must be >= 1.
    pub progress_tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            progress_tick_ms: 500,
            quit_fade_out_ms: 500,
        }
    }
}
