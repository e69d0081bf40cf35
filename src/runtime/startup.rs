use tracing::debug;

use crate::catalog::CatalogHandle;
use crate::config;
use crate::player::{self, Player, QueueOrigin, RepeatMode};

/// Apply configured playback defaults: repeat mode, the initial global
/// queue (shuffled when configured) and optional autoplay of its head.
pub fn apply_playback_defaults(
    player: &mut Player,
    catalog: &CatalogHandle,
    settings: &config::Settings,
) {
    player.set_repeat_mode(match settings.playback.repeat_mode {
        config::RepeatModeSetting::Off => RepeatMode::Off,
        config::RepeatModeSetting::One => RepeatMode::One,
        config::RepeatModeSetting::All => RepeatMode::All,
    });

    let ids = catalog
        .lock()
        .ok()
        .map(|c| c.all_track_ids())
        .unwrap_or_default();
    let ids = if settings.playback.shuffle {
        player::shuffled(ids)
    } else {
        ids
    };

    debug!(
        len = ids.len(),
        shuffle = settings.playback.shuffle,
        "initial global queue"
    );
    player.set_queue(ids, QueueOrigin::Global, None);

    if settings.playback.autoplay {
        if let Some(first) = player.queue().first().cloned() {
            player.play_track(&first, None);
        }
    }
}
