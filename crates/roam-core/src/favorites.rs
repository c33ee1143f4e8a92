//! [`FavoritesStore`] — the on-device favorites collection.
//!
//! The whole collection is one JSON array stored under a single key of a
//! [`BlobStore`]. Every write is a full read-modify-write cycle with no
//! locking: two interleaved writers can lose an update. Callers serialize
//! writes per key (the explore view does this by taking `&mut self`).
//!
//! The public methods never return errors. Read failures degrade to "no
//! favorites" and write failures to `false`; both are logged. The `try_*`
//! methods expose the underlying error for callers that want it.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::{
  blob::BlobStore,
  category::CategoryKind,
  favorite::{FavoriteKey, FavoriteRecord},
  place::PlaceRecord,
  Error, Result,
};

/// Storage key of the favorites blob.
pub const FAVORITES_KEY: &str = "@uttaradit_favorites";

/// Outcome of [`FavoritesStore::try_add`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
  Added(FavoriteRecord),
  AlreadyPresent,
}

/// The favorites collection over a blob store `B`.
#[derive(Debug, Clone)]
pub struct FavoritesStore<B> {
  blobs: B,
  key:   String,
}

impl<B: BlobStore> FavoritesStore<B> {
  /// A store keeping its collection under [`FAVORITES_KEY`].
  pub fn new(blobs: B) -> Self { Self::with_key(blobs, FAVORITES_KEY) }

  /// A store keeping its collection under a caller-chosen key.
  pub fn with_key(blobs: B, key: impl Into<String>) -> Self {
    Self { blobs, key: key.into() }
  }

  pub fn key(&self) -> &str { &self.key }

  pub fn blobs(&self) -> &B { &self.blobs }

  // ── Fallible core ───────────────────────────────────────────────────────

  /// Read and decode the collection. An absent blob is an empty collection.
  pub async fn try_get_all(&self) -> Result<Vec<FavoriteRecord>> {
    let raw = self.blobs.get(&self.key).await.map_err(Error::storage)?;
    match raw {
      Some(json) => Ok(serde_json::from_str(&json)?),
      None => Ok(Vec::new()),
    }
  }

  /// Read the collection ahead of a write. A corrupt blob is replaced
  /// rather than wedging every later write; a failed read aborts the write.
  async fn read_for_write(&self) -> Result<Vec<FavoriteRecord>> {
    match self.try_get_all().await {
      Err(Error::Serialization(e)) => {
        warn!(key = %self.key, error = %e, "favorites blob is corrupt; overwriting");
        Ok(Vec::new())
      }
      other => other,
    }
  }

  async fn write_all(&self, favorites: &[FavoriteRecord]) -> Result<()> {
    let json = serde_json::to_string(favorites)?;
    self.blobs.set(&self.key, json).await.map_err(Error::storage)
  }

  /// Append a snapshot of `place` unless `(place.id, category)` is present.
  pub async fn try_add(
    &self,
    place: &PlaceRecord,
    category: CategoryKind,
  ) -> Result<AddOutcome> {
    let mut favorites = self.read_for_write().await?;
    if favorites.iter().any(|f| f.is(place.id, category)) {
      return Ok(AddOutcome::AlreadyPresent);
    }

    let record = FavoriteRecord::snapshot(place, category, Utc::now());
    favorites.push(record.clone());
    self.write_all(&favorites).await?;
    Ok(AddOutcome::Added(record))
  }

  /// Drop every record with key `(id, category)` and write the rest back.
  /// Returns how many records were dropped.
  pub async fn try_remove(&self, id: i64, category: CategoryKind) -> Result<usize> {
    let mut favorites = self.read_for_write().await?;
    let before = favorites.len();
    favorites.retain(|f| !f.is(id, category));
    self.write_all(&favorites).await?;
    Ok(before - favorites.len())
  }

  pub async fn try_clear(&self) -> Result<()> {
    self.blobs.remove(&self.key).await.map_err(Error::storage)
  }

  // ── Boundary ────────────────────────────────────────────────────────────

  /// Every stored favorite. Empty on a missing, unreadable or corrupt blob.
  pub async fn get_all(&self) -> Vec<FavoriteRecord> {
    match self.try_get_all().await {
      Ok(favorites) => favorites,
      Err(e) => {
        warn!(key = %self.key, error = %e, "reading favorites failed; treating as empty");
        Vec::new()
      }
    }
  }

  /// The composite keys of every stored favorite, from a single read.
  pub async fn keys(&self) -> HashSet<FavoriteKey> {
    self.get_all().await.iter().map(FavoriteRecord::key).collect()
  }

  pub async fn exists(&self, id: i64, category: CategoryKind) -> bool {
    self.get_all().await.iter().any(|f| f.is(id, category))
  }

  /// Add a favorite. `false` if it was already present or the write failed.
  pub async fn add(&self, place: &PlaceRecord, category: CategoryKind) -> bool {
    match self.try_add(place, category).await {
      Ok(AddOutcome::Added(_)) => {
        debug!(id = place.id, %category, "favorite added");
        true
      }
      Ok(AddOutcome::AlreadyPresent) => {
        debug!(id = place.id, %category, "favorite already present");
        false
      }
      Err(e) => {
        error!(id = place.id, %category, error = %e, "adding favorite failed");
        false
      }
    }
  }

  /// Remove a favorite. Removing an absent key still succeeds.
  pub async fn remove(&self, id: i64, category: CategoryKind) -> bool {
    match self.try_remove(id, category).await {
      Ok(removed) => {
        debug!(id, %category, removed, "favorite removed");
        true
      }
      Err(e) => {
        error!(id, %category, error = %e, "removing favorite failed");
        false
      }
    }
  }

  /// Delete the whole collection.
  pub async fn clear(&self) -> bool {
    match self.try_clear().await {
      Ok(()) => {
        debug!(key = %self.key, "favorites cleared");
        true
      }
      Err(e) => {
        error!(key = %self.key, error = %e, "clearing favorites failed");
        false
      }
    }
  }

  /// Favorites, most recently added first.
  pub async fn favorites_by_recency(&self) -> Vec<FavoriteRecord> {
    let mut favorites = self.get_all().await;
    favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    favorites
  }
}
