//! MPRIS (`org.mpris.MediaPlayer2`) integration over the session bus.
//!
//! Media keys and `playerctl` are the player's control surface: commands
//! are forwarded to the runtime as [`ControlCmd`]s, and the runtime
//! publishes transport state and now-playing metadata back through
//! [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::warn;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::player::TransportState;

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

/// Now-playing metadata published over MPRIS.
#[derive(Clone, Debug, Default)]
pub struct NowPlaying {
    pub title: String,
    pub artist: Option<String>,
    /// Release label of the launch context, e.g. `"EP 3"`.
    pub album: Option<String>,
    pub url: Option<String>,
    pub length_micros: Option<u64>,
}

#[derive(Debug, Default)]
struct SharedState {
    transport: TransportState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<u64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_transport(&self, transport: TransportState) {
        if let Ok(mut s) = self.state.lock() {
            s.transport = transport;
        }
    }

    /// Publish metadata for the current queue entry, or clear it.
    pub fn set_track_metadata(&self, index: Option<usize>, now: Option<NowPlaying>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };

        match now {
            Some(now) => {
                s.title = Some(now.title);
                s.artist = now.artist.into_iter().collect();
                s.album = now.album;
                s.url = now.url;
                s.length_micros = now.length_micros;
                s.track_id = index.and_then(|i| {
                    ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{i}"))
                        .ok()
                        .map(Into::into)
                });
            }
            None => {
                s.title = None;
                s.artist = Vec::new();
                s.album = None;
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.transport {
            TransportState::Idle => "Stopped",
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut insert = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(track_id) = s.track_id.clone() {
            insert("mpris:trackid", Value::from(track_id.into_inner()));
        }
        if let Some(title) = s.title.clone() {
            insert("xesam:title", Value::from(title));
        }
        if !s.artist.is_empty() {
            insert("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = s.album.clone() {
            insert("xesam:album", Value::from(album));
        }
        if let Some(url) = s.url.clone() {
            insert("xesam:url", Value::from(url));
        }
        if let Some(length) = s.length_micros {
            insert("mpris:length", Value::from(length as i64));
        }

        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.encore")
                .await
            {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
