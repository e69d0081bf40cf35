use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::config;
use crate::device::{DeviceCmd, DeviceEvent, PlaybackDevice};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Player, RepeatMode, TransportState};
use crate::runtime::mpris_sync::update_mpris;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Track id the device currently has loaded.
    device_track: Option<String>,
    /// Whether the device was last told to play.
    device_playing: bool,
    /// Last transport state pushed to MPRIS.
    last_mpris_transport: TransportState,
    /// Last track id pushed to MPRIS.
    last_mpris_track: Option<String>,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `player`.
    pub fn new(player: &Player) -> Self {
        Self {
            device_track: None,
            device_playing: false,
            last_mpris_transport: player.transport_state(),
            last_mpris_track: None,
        }
    }
}

/// Main runtime loop: applies MPRIS control commands and device signals to
/// the player, then reconciles the device and MPRIS with the player's
/// state. Returns `Ok(())` when shutdown is requested.
pub fn run(
    settings: &config::Settings,
    player: &mut Player,
    archives_dir: &Path,
    device: &PlaybackDevice,
    mpris: &MprisHandle,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState::new(player);

    loop {
        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, player, device) {
                return Ok(());
            }
        }

        match device.poll_event(Duration::from_millis(50)) {
            Some(DeviceEvent::Progress(secs)) => player.set_current_time(secs),
            Some(DeviceEvent::Ended) => {
                player.on_playback_ended();
                if player.repeat_mode() == RepeatMode::One && player.is_playing() {
                    // Restart-on-end for repeat-one is this seam's job: the
                    // engine only rewound its clock, the device reloads the
                    // same source from the top.
                    if let Some(path) = current_audio_path(player, archives_dir) {
                        let _ = device.send(DeviceCmd::Load {
                            path,
                            autoplay: true,
                        });
                    }
                }
            }
            None => {}
        }

        sync_device(&mut state, player, archives_dir, device);
        sync_mpris(&mut state, player, archives_dir, mpris);
    }
}

fn current_audio_path(player: &Player, archives_dir: &Path) -> Option<PathBuf> {
    player
        .current_track()
        .map(|t| archives_dir.join(&t.audio_file))
}

// Tell the device about player-side changes: a new current track, or a
// play/pause flip on the same track.
fn sync_device(
    state: &mut EventLoopState,
    player: &Player,
    archives_dir: &Path,
    device: &PlaybackDevice,
) {
    let current = player.current_track().map(|t| t.id.clone());

    if current != state.device_track {
        if let Some(path) = current_audio_path(player, archives_dir) {
            let _ = device.send(DeviceCmd::Load {
                path,
                autoplay: player.is_playing(),
            });
        }
        state.device_track = current;
        state.device_playing = player.is_playing();
        return;
    }

    if player.is_playing() != state.device_playing {
        let cmd = if player.is_playing() {
            DeviceCmd::Play
        } else {
            DeviceCmd::Pause
        };
        let _ = device.send(cmd);
        state.device_playing = player.is_playing();
    }
}

fn sync_mpris(
    state: &mut EventLoopState,
    player: &Player,
    archives_dir: &Path,
    mpris: &MprisHandle,
) {
    let transport = player.transport_state();
    let track = player.current_track().map(|t| t.id.clone());

    if transport != state.last_mpris_transport || track != state.last_mpris_track {
        update_mpris(mpris, player, archives_dir);
        state.last_mpris_transport = transport;
        state.last_mpris_track = track;
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    player: &mut Player,
    device: &PlaybackDevice,
) -> bool {
    match cmd {
        ControlCmd::Quit => {
            device.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        ControlCmd::Play => match player.transport_state() {
            TransportState::Paused => player.toggle_play(),
            TransportState::Idle => play_queue_head(player),
            TransportState::Playing => {}
        },
        ControlCmd::Pause => {
            if player.transport_state() == TransportState::Playing {
                player.toggle_play();
            }
        }
        ControlCmd::PlayPause => match player.transport_state() {
            TransportState::Idle => play_queue_head(player),
            _ => player.toggle_play(),
        },
        ControlCmd::Stop => {
            // The engine has no idle re-entry; stop is "pause, rewound to
            // the top of the track".
            if player.transport_state() == TransportState::Playing {
                player.toggle_play();
            }
            player.seek_to(0.0);
            player.set_current_time(0.0);
        }
        ControlCmd::Next => player.play_next(),
        ControlCmd::Prev => player.play_previous(),
    }

    false
}

fn play_queue_head(player: &mut Player) {
    if let Some(first) = player.queue().first().cloned() {
        player.play_track(&first, None);
    }
}
