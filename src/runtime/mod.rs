//! Runtime wiring: settings, catalog, player, device, MPRIS and the event
//! loop that keeps them in agreement.

use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use tracing::info;

use crate::catalog::{Catalog, CatalogHandle};
use crate::device::{DeviceCmd, PlaybackDevice};
use crate::mpris::ControlCmd;
use crate::player::Player;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = settings::load_settings();

    let archives_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&settings.catalog.archives_dir));

    let catalog = Catalog::load(&archives_dir, settings.catalog.backfill_durations)?;
    info!(
        tracks = catalog.track_count(),
        path = %archives_dir.display(),
        "archive loaded"
    );
    if let Some(latest) = catalog.latest_release() {
        info!(
            release = %latest.release.label(),
            collection = %latest.collection_name,
            tracks = latest.track_ids.len(),
            "latest release"
        );
    }

    let catalog: CatalogHandle = Arc::new(Mutex::new(catalog));
    let mut player = Player::new(catalog.clone());

    let device = PlaybackDevice::new(Duration::from_millis(settings.audio.progress_tick_ms));
    let seek_tx = device.sender();
    player.attach_seek_handler(Box::new(move |time| {
        let _ = seek_tx.send(DeviceCmd::Seek(time));
    }));

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    startup::apply_playback_defaults(&mut player, &catalog, &settings);
    mpris_sync::update_mpris(&mpris, &player, &archives_dir);

    event_loop::run(
        &settings,
        &mut player,
        &archives_dir,
        &device,
        &mpris,
        &control_rx,
    )
}
