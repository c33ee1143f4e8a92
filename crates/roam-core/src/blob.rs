//! The `BlobStore` trait — string-keyed, string-valued persistence.
//!
//! Implemented by storage backends (e.g. `roam-store-sqlite`). The favorites
//! store keeps its whole collection under a single key, so nothing above
//! this layer ever sees more than one blob at a time.

use std::{
  collections::HashMap,
  future::Future,
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  },
};

use thiserror::Error;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a durable key/value blob store.
///
/// Every operation is fallible. Callers decide how to degrade; backends only
/// report.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the blob stored under `key`. Returns `None` if absent.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous blob.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete the blob under `key`. Deleting an absent key succeeds.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// Failure injected by [`MemoryBlobStore`].
#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("read failed (injected)")]
  Read,

  #[error("write failed (injected)")]
  Write,
}

/// A process-local [`BlobStore`].
///
/// Cloning is cheap; clones share the same map, so a test can keep a handle
/// and inspect or corrupt the raw blob behind a favorites store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
  blobs:       Arc<Mutex<HashMap<String, String>>>,
  fail_reads:  Arc<AtomicBool>,
  fail_writes: Arc<AtomicBool>,
}

impl MemoryBlobStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent `get` fail until reset.
  pub fn fail_reads(&self, fail: bool) { self.fail_reads.store(fail, Ordering::SeqCst); }

  /// Make every subsequent `set`/`remove` fail until reset.
  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// Raw access to a blob, bypassing failure injection.
  pub fn raw(&self, key: &str) -> Option<String> {
    self.lock().get(key).cloned()
  }

  /// Overwrite a blob directly, bypassing failure injection.
  pub fn put_raw(&self, key: &str, value: impl Into<String>) {
    self.lock().insert(key.to_owned(), value.into());
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    // A poisoned map is still a valid map.
    self.blobs.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl BlobStore for MemoryBlobStore {
  type Error = MemoryError;

  async fn get(&self, key: &str) -> Result<Option<String>, MemoryError> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(MemoryError::Read);
    }
    Ok(self.lock().get(key).cloned())
  }

  async fn set(&self, key: &str, value: String) -> Result<(), MemoryError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryError::Write);
    }
    self.lock().insert(key.to_owned(), value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), MemoryError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryError::Write);
    }
    self.lock().remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn set_get_remove() {
    let store = MemoryBlobStore::new();
    assert_eq!(store.get("k").await.unwrap(), None);

    store.set("k", "v1".into()).await.unwrap();
    store.set("k", "v2".into()).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

    store.remove("k").await.unwrap();
    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
  }

  #[tokio::test]
  async fn injected_failures() {
    let store = MemoryBlobStore::new();
    store.put_raw("k", "v");

    store.fail_reads(true);
    assert!(store.get("k").await.is_err());
    store.fail_reads(false);

    store.fail_writes(true);
    assert!(store.set("k", "x".into()).await.is_err());
    assert!(store.remove("k").await.is_err());
    assert_eq!(store.raw("k").as_deref(), Some("v"));
  }

  #[tokio::test]
  async fn clones_share_state() {
    let a = MemoryBlobStore::new();
    let b = a.clone();
    a.set("k", "v".into()).await.unwrap();
    assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
  }
}
