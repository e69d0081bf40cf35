//! Catalog loading from the archive's JSON manifests.
//!
//! The archive layout is `collections.json` and `tracks.json` at the root,
//! plus one `manifest.json` per collection directory listing its releases.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use lofty::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::model::{Catalog, Collection, Release, Track};

/// Errors for the two required catalog files. Per-collection manifests fail
/// soft instead: a collection without a usable manifest lists no releases.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct CollectionsFile {
    collections: Vec<Collection>,
}

#[derive(Deserialize)]
struct TracksFile {
    tracks: HashMap<String, Track>,
}

#[derive(Deserialize)]
struct ManifestFile {
    releases: Vec<Release>,
}

impl Catalog {
    /// Load a catalog snapshot from the archive at `dir`.
    ///
    /// With `backfill_durations`, tracks whose registry entry carries no
    /// duration get one by probing the audio file's tags.
    pub fn load(dir: &Path, backfill_durations: bool) -> Result<Catalog, CatalogError> {
        let CollectionsFile { mut collections } = read_json(&dir.join("collections.json"))?;
        let TracksFile { mut tracks } = read_json(&dir.join("tracks.json"))?;

        // The registry key is authoritative for the track id.
        for (id, track) in tracks.iter_mut() {
            track.id = id.clone();
        }

        if backfill_durations {
            backfill_missing_durations(dir, &mut tracks);
        }

        let mut releases: HashMap<String, Vec<Release>> = HashMap::new();
        for collection in collections.iter().filter(|c| !c.is_virtual) {
            let path = dir.join(&collection.id).join("manifest.json");
            match read_json::<ManifestFile>(&path) {
                Ok(manifest) => {
                    releases.insert(collection.id.clone(), manifest.releases);
                }
                Err(e) => {
                    warn!(collection = %collection.id, error = %e, "collection has no usable manifest");
                }
            }
        }

        collections.insert(0, promoted_collection());

        debug!(
            tracks = tracks.len(),
            collections = collections.len(),
            "catalog loaded"
        );

        Ok(Catalog::new(collections, tracks, releases))
    }
}

/// The synthesized "Promoted" channel, backed by the promoted set rather
/// than archive data.
fn promoted_collection() -> Collection {
    Collection {
        id: "promoted".to_string(),
        name: "Promoted".to_string(),
        artist: String::new(),
        description: "Your promoted tracks".to_string(),
        active: true,
        is_virtual: true,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let bytes = fs::read(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn backfill_missing_durations(dir: &Path, tracks: &mut HashMap<String, Track>) {
    for track in tracks.values_mut().filter(|t| t.duration == 0) {
        let path = dir.join(&track.audio_file);
        if let Ok(tagged) = lofty::read_from_path(&path) {
            track.duration = tagged.properties().duration().as_secs();
        }
    }
}
