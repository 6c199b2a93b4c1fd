use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use tejido_core::collab::{ArtistId, CrawlResult};
use tejido_core::ports::{CacheError, CacheStore};

use crate::io::atomic_write;

/// File-backed snapshot store: one pretty-printed JSON document per artist
/// id under `dir`. Dates round-trip as ISO-8601 calendar strings via the
/// domain's serde derives.
///
/// `put` goes through `atomic_write`, so concurrent readers never observe a
/// half-written snapshot. Anything unreadable or undecodable surfaces as
/// `CacheError`, which the crawler downgrades to a miss.
pub struct JsonSnapshotStore {
  dir: PathBuf,
}

impl JsonSnapshotStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn snapshot_path(&self, id: &ArtistId) -> PathBuf {
    // Catalog ids are URL-safe tokens, usable as file names verbatim.
    self.dir.join(format!("{id}.json"))
  }
}

impl CacheStore for JsonSnapshotStore {
  fn get(&self, id: &ArtistId) -> Result<Option<CrawlResult>, CacheError> {
    let path = self.snapshot_path(id);

    let content = match std::fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(CacheError::Io(e.to_string())),
    };

    let result: CrawlResult =
      serde_json::from_str(&content).map_err(|e| CacheError::Corrupt(e.to_string()))?;

    debug!(artist = %id, path = %path.display(), "snapshot loaded");
    Ok(Some(result))
  }

  fn put(&self, id: &ArtistId, result: &CrawlResult) -> Result<(), CacheError> {
    let encoded =
      serde_json::to_vec_pretty(result).map_err(|e| CacheError::Io(e.to_string()))?;

    atomic_write(&self.snapshot_path(id), &encoded).map_err(|e| CacheError::Io(e.to_string()))?;

    debug!(artist = %id, bytes = encoded.len(), "snapshot written");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use std::collections::BTreeMap;
  use tejido_core::collab::{ArtistProfile, Track, TrackCredit, TrackId};
  use tempfile::tempdir;

  fn sample_result() -> CrawlResult {
    let seed = ArtistProfile {
      id: ArtistId::new("X"),
      name: "Seed".to_string(),
      image_url: Some("https://img.example/x.jpg".to_string()),
      genres: vec!["rock".to_string()],
    };
    let collab = ArtistProfile {
      id: ArtistId::new("A"),
      name: "Alpha".to_string(),
      image_url: None,
      genres: vec![],
    };

    let track = Track {
      id: TrackId::new("t1"),
      name: "Uno".to_string(),
      url: "https://example.com/t1".to_string(),
      thumbnail_url: None,
      preview_url: Some("https://example.com/t1.mp3".to_string()),
      credited: vec![
        TrackCredit { id: ArtistId::new("X"), name: "Seed".to_string() },
        TrackCredit { id: ArtistId::new("A"), name: "Alpha".to_string() },
      ],
      collaboration_groups: vec![vec![ArtistId::new("X"), ArtistId::new("A")]],
    };

    CrawlResult {
      seed: seed.clone(),
      stats: BTreeMap::from([(ArtistId::new("X"), 1), (ArtistId::new("A"), 1)]),
      last_collab: BTreeMap::from([(
        ArtistId::new("A"),
        NaiveDate::from_ymd_opt(2021, 6, 15).unwrap(),
      )]),
      tracks: BTreeMap::from([(TrackId::new("t1"), track)]),
      artists: BTreeMap::from([(ArtistId::new("X"), seed), (ArtistId::new("A"), collab)]),
    }
  }

  #[test]
  fn test_put_then_get_round_trips_losslessly() {
    let tmp = tempdir().unwrap();
    let store = JsonSnapshotStore::new(tmp.path());
    let result = sample_result();

    store.put(&ArtistId::new("X"), &result).unwrap();
    let loaded = store.get(&ArtistId::new("X")).unwrap().unwrap();

    assert_eq!(loaded, result);
    // dates must persist as unambiguous calendar strings
    let raw = std::fs::read_to_string(tmp.path().join("X.json")).unwrap();
    assert!(raw.contains("2021-06-15"));
  }

  #[test]
  fn test_missing_snapshot_is_none() {
    let tmp = tempdir().unwrap();
    let store = JsonSnapshotStore::new(tmp.path());

    assert!(store.get(&ArtistId::new("nobody")).unwrap().is_none());
  }

  #[test]
  fn test_corrupt_snapshot_is_reported() {
    let tmp = tempdir().unwrap();
    let store = JsonSnapshotStore::new(tmp.path());
    std::fs::write(tmp.path().join("X.json"), "{ truncated").unwrap();

    let err = store.get(&ArtistId::new("X")).unwrap_err();
    assert!(matches!(err, CacheError::Corrupt(_)));
  }

  #[test]
  fn test_put_replaces_previous_snapshot() {
    let tmp = tempdir().unwrap();
    let store = JsonSnapshotStore::new(tmp.path());

    let mut result = sample_result();
    store.put(&ArtistId::new("X"), &result).unwrap();

    result.stats.insert(ArtistId::new("B"), 3);
    store.put(&ArtistId::new("X"), &result).unwrap();

    let loaded = store.get(&ArtistId::new("X")).unwrap().unwrap();
    assert_eq!(loaded.collab_count(&ArtistId::new("B")), 3);
    // no stray temp file left behind
    assert!(!tmp.path().join("X.tmp").exists());
  }
}
