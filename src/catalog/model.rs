//! Catalog model types: `Track`, `Collection`, `Release` and the snapshot
//! that owns them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Deserialize;

/// A single audio track from the archive's track registry.
///
/// Tracks are immutable once loaded; playback state refers to them by id.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Registry key; the map key in `tracks.json` is authoritative.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    /// Track length in whole seconds.
    #[serde(default)]
    pub duration: u64,
    /// Audio file path, relative to the archive root.
    pub audio_file: String,
    pub collection_id: String,
    /// Label of the release this track first appeared in, e.g. `"EP 3"`.
    pub first_appearance: String,
}

/// A named grouping of tracks and releases (a "channel").
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Synthesized collections (e.g. "Promoted") are not backed by archive data.
    #[serde(default)]
    pub is_virtual: bool,
}

fn default_active() -> bool {
    true
}

/// A numbered publication event within a collection.
///
/// A release does not list its tracks; membership is derived by matching
/// each track's `first_appearance` against [`Release::label`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Release {
    pub release_number: u32,
    pub release_type: String,
    /// ISO-8601 date string; compared lexicographically.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub track_count: usize,
    /// Total length in whole seconds.
    #[serde(default)]
    pub total_duration: u64,
}

impl Release {
    /// The label tracks use to reference this release, e.g. `"EP 3"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.release_type, self.release_number)
    }
}

/// A release joined with its collection and derived track membership.
#[derive(Debug, Clone)]
pub struct ReleaseWithTracks {
    pub release: Release,
    pub collection_id: String,
    pub collection_name: String,
    pub track_ids: Vec<String>,
}

/// Read-only snapshot of the archive catalog.
pub struct Catalog {
    collections: Vec<Collection>,
    tracks: HashMap<String, Track>,
    /// Releases per collection id.
    releases: HashMap<String, Vec<Release>>,
}

/// Shared handle to the catalog; the snapshot behind it may be replaced
/// wholesale on reload, so holders must tolerate lookups failing.
pub type CatalogHandle = Arc<Mutex<Catalog>>;

impl Catalog {
    /// Assemble a snapshot from already-loaded parts.
    pub fn new(
        collections: Vec<Collection>,
        tracks: HashMap<String, Track>,
        releases: HashMap<String, Vec<Release>>,
    ) -> Self {
        Self {
            collections,
            tracks,
            releases,
        }
    }

    /// Look up a track by id.
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Releases of `collection_id`, empty for unknown or virtual collections.
    pub fn releases(&self, collection_id: &str) -> &[Release] {
        self.releases
            .get(collection_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// All track ids, sorted so the global queue has a stable order.
    pub fn all_track_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tracks.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Track ids of `collection_id`, ordered by owning release date, then
    /// release number, then id ("play in order").
    pub fn collection_track_ids(&self, collection_id: &str) -> Vec<String> {
        let releases = self.releases(collection_id);
        let owning_release = |track: &Track| {
            releases
                .iter()
                .find(|r| r.label() == track.first_appearance)
        };

        let mut members: Vec<&Track> = self
            .tracks
            .values()
            .filter(|t| t.collection_id == collection_id)
            .collect();

        members.sort_by(|a, b| {
            let ra = owning_release(a);
            let rb = owning_release(b);
            let date_a = ra.and_then(|r| r.release_date.as_deref()).unwrap_or("");
            let date_b = rb.and_then(|r| r.release_date.as_deref()).unwrap_or("");
            date_a
                .cmp(date_b)
                .then_with(|| {
                    let num_a = ra.map(|r| r.release_number).unwrap_or(0);
                    let num_b = rb.map(|r| r.release_number).unwrap_or(0);
                    num_a.cmp(&num_b)
                })
                .then_with(|| a.id.cmp(&b.id))
        });

        members.into_iter().map(|t| t.id.clone()).collect()
    }

    /// Track ids belonging to `release` of `collection_id`, sorted by id.
    pub fn release_track_ids(&self, collection_id: &str, release: &Release) -> Vec<String> {
        let label = release.label();
        let mut ids: Vec<String> = self
            .tracks
            .values()
            .filter(|t| t.collection_id == collection_id && t.first_appearance == label)
            .map(|t| t.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// The most recent dated release across all non-virtual collections.
    pub fn latest_release(&self) -> Option<ReleaseWithTracks> {
        let mut latest: Option<ReleaseWithTracks> = None;

        for collection in self.collections.iter().filter(|c| !c.is_virtual) {
            for release in self.releases(&collection.id) {
                let Some(date) = release.release_date.as_deref() else {
                    continue;
                };
                let newer = latest
                    .as_ref()
                    .map(|l| l.release.release_date.as_deref().unwrap_or("") < date)
                    .unwrap_or(true);
                if newer {
                    latest = Some(ReleaseWithTracks {
                        track_ids: self.release_track_ids(&collection.id, release),
                        release: release.clone(),
                        collection_id: collection.id.clone(),
                        collection_name: collection.name.clone(),
                    });
                }
            }
        }

        latest
    }
}
