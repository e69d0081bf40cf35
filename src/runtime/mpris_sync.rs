use std::path::Path;

use crate::mpris::{MprisHandle, NowPlaying};
use crate::player::Player;

/// Push the player's transport state and now-playing metadata to MPRIS.
pub fn update_mpris(mpris: &MprisHandle, player: &Player, archives_dir: &Path) {
    mpris.set_transport(player.transport_state());

    let now = player.current_track().map(|track| NowPlaying {
        title: track.title.clone(),
        artist: (!track.artist.is_empty()).then(|| track.artist.clone()),
        album: player.current_release().map(|r| r.label()),
        url: Some(format!(
            "file://{}",
            archives_dir.join(&track.audio_file).display()
        )),
        length_micros: Some(track.duration * 1_000_000),
    });

    mpris.set_track_metadata(player.position(), now);
}
