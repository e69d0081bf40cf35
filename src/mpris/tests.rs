use super::*;
use std::sync::mpsc;

fn make_now_playing() -> NowPlaying {
    NowPlaying {
        title: "Test Title".to_string(),
        artist: Some("Test Artist".to_string()),
        album: Some("EP 7".to_string()),
        url: Some("file:///tmp/archive/test.mp3".to_string()),
        length_micros: Some(1_234_567),
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.set_track_metadata(Some(7), Some(make_now_playing()));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("EP 7"));
        assert!(s.url.as_deref().unwrap().contains("/tmp/archive/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_state_to_spec_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.transport = TransportState::Idle;
    }
    assert_eq!(iface.playback_status(), "Stopped");

    {
        let mut s = state.lock().unwrap();
        s.transport = TransportState::Playing;
    }
    assert_eq!(iface.playback_status(), "Playing");

    {
        let mut s = state.lock().unwrap();
        s.transport = TransportState::Paused;
    }
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.artist = vec!["Artist".to_string()];
        s.album = Some("Album".to_string());
        s.url = Some("file:///tmp/test.mp3".to_string());
        s.length_micros = Some(42);
        s.track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1")
            .ok()
            .map(|p| p.into());
    }

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_of_an_idle_player_is_empty() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert!(iface.metadata().is_empty());
}
