//! [`SqliteBlobStore`] — the SQLite implementation of [`BlobStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use roam_core::blob::BlobStore;

use crate::{schema::SCHEMA, Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A blob store backed by a single SQLite file.
///
/// Cloning shares the underlying connection.
#[derive(Clone)]
pub struct SqliteBlobStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteBlobStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening blob store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// When the blob under `key` was last written. `None` if absent.
  pub async fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
    let key = key.to_owned();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT updated_at FROM blobs WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|s| {
        DateTime::parse_from_rfc3339(&s)
          .map(|dt| dt.with_timezone(&Utc))
          .map_err(|e| Error::DateParse(e.to_string()))
      })
      .transpose()
  }
}

// ─── BlobStore impl ──────────────────────────────────────────────────────────

impl BlobStore for SqliteBlobStore {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();

    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM blobs WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(value)
  }

  async fn set(&self, key: &str, value: String) -> Result<()> {
    let key    = key.to_owned();
    let at_str = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value      = excluded.value,
             updated_at = excluded.updated_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM blobs WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
