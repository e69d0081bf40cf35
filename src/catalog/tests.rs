use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::*;

fn write_archive(dir: &Path) {
    fs::write(
        dir.join("collections.json"),
        r##"{
  "collections": [
    {
      "id": "radio",
      "name": "Radio Sessions",
      "artist": "The Band",
      "releaseType": "EP",
      "folderPath": "radio",
      "color": "#fbbf24",
      "description": "Live radio sessions",
      "active": true
    },
    {
      "id": "basement",
      "name": "Basement Tapes",
      "artist": "The Band",
      "active": true
    },
    {
      "id": "ghost",
      "name": "No Manifest Here",
      "active": true
    }
  ]
}"##,
    )
    .unwrap();

    fs::write(
        dir.join("tracks.json"),
        r#"{
  "tracks": {
    "t1": {
      "title": "Opener",
      "artist": "The Band",
      "duration": 120,
      "audio_file": "radio/audio/opener.mp3",
      "collection_id": "radio",
      "first_appearance": "EP 1"
    },
    "t2": {
      "title": "Closer",
      "artist": "The Band",
      "duration": 200,
      "audio_file": "radio/audio/closer.mp3",
      "collection_id": "radio",
      "first_appearance": "EP 2"
    },
    "t3": {
      "title": "Deep Cut",
      "artist": "The Band",
      "duration": 95,
      "audio_file": "radio/audio/deep-cut.mp3",
      "collection_id": "radio",
      "first_appearance": "EP 1"
    },
    "b1": {
      "title": "Rehearsal",
      "artist": "The Band",
      "duration": 300,
      "audio_file": "basement/audio/rehearsal.mp3",
      "collection_id": "basement",
      "first_appearance": "Tape 1"
    }
  }
}"#,
    )
    .unwrap();

    let radio = dir.join("radio");
    fs::create_dir_all(&radio).unwrap();
    fs::write(
        radio.join("manifest.json"),
        r#"{
  "releases": [
    {
      "release_number": 1,
      "release_type": "EP",
      "release_date": "2023-01-15",
      "track_count": 2,
      "total_duration": 215
    },
    {
      "release_number": 2,
      "release_type": "EP",
      "release_date": "2024-06-01",
      "track_count": 1,
      "total_duration": 200
    }
  ]
}"#,
    )
    .unwrap();

    let basement = dir.join("basement");
    fs::create_dir_all(&basement).unwrap();
    fs::write(
        basement.join("manifest.json"),
        r#"{
  "releases": [
    {
      "release_number": 1,
      "release_type": "Tape",
      "release_date": "2024-01-01",
      "track_count": 1,
      "total_duration": 300
    }
  ]
}"#,
    )
    .unwrap();
}

fn load_fixture() -> (tempfile::TempDir, Catalog) {
    let dir = tempdir().unwrap();
    write_archive(dir.path());
    let catalog = Catalog::load(dir.path(), false).unwrap();
    (dir, catalog)
}

#[test]
fn load_injects_virtual_promoted_collection_first() {
    let (_dir, catalog) = load_fixture();

    let first = &catalog.collections()[0];
    assert_eq!(first.id, "promoted");
    assert!(first.is_virtual);
    // The archive's own collections follow, in file order.
    assert_eq!(catalog.collections()[1].id, "radio");
    assert_eq!(catalog.collections().len(), 4);
}

#[test]
fn registry_key_is_authoritative_for_track_id() {
    let (_dir, catalog) = load_fixture();

    let track = catalog.track("t1").unwrap();
    assert_eq!(track.id, "t1");
    assert_eq!(track.title, "Opener");
    assert_eq!(track.duration, 120);
}

#[test]
fn unknown_track_lookup_is_none() {
    let (_dir, catalog) = load_fixture();
    assert!(catalog.track("nope").is_none());
}

#[test]
fn release_membership_is_derived_from_first_appearance() {
    let (_dir, catalog) = load_fixture();

    let releases = catalog.releases("radio");
    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].label(), "EP 1");

    assert_eq!(
        catalog.release_track_ids("radio", &releases[0]),
        vec!["t1".to_string(), "t3".to_string()]
    );
    assert_eq!(
        catalog.release_track_ids("radio", &releases[1]),
        vec!["t2".to_string()]
    );
    // Same release label under another collection matches nothing.
    assert!(catalog.release_track_ids("basement", &releases[0]).is_empty());
}

#[test]
fn collection_track_ids_order_by_release_date_then_id() {
    let (_dir, catalog) = load_fixture();

    // EP 1 (2023) before EP 2 (2024); within EP 1, ids break the tie.
    assert_eq!(
        catalog.collection_track_ids("radio"),
        vec!["t1".to_string(), "t3".to_string(), "t2".to_string()]
    );
}

#[test]
fn latest_release_picks_most_recent_dated_release() {
    let (_dir, catalog) = load_fixture();

    let latest = catalog.latest_release().unwrap();
    assert_eq!(latest.collection_id, "radio");
    assert_eq!(latest.release.label(), "EP 2");
    assert_eq!(latest.track_ids, vec!["t2".to_string()]);
}

#[test]
fn missing_manifest_is_tolerated() {
    let (_dir, catalog) = load_fixture();

    // "ghost" has no directory at all; it just lists no releases.
    assert!(catalog.releases("ghost").is_empty());
    assert_eq!(catalog.track_count(), 4);
}

#[test]
fn all_track_ids_are_sorted() {
    let (_dir, catalog) = load_fixture();
    assert_eq!(catalog.all_track_ids(), vec!["b1", "t1", "t2", "t3"]);
}

#[test]
fn missing_required_files_are_hard_errors() {
    let dir = tempdir().unwrap();
    assert!(Catalog::load(dir.path(), false).is_err());
}
