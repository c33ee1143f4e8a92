//! The `PlaceSource` trait — read-only remote category listings.

use std::{collections::HashMap, future::Future};

use thiserror::Error;

use crate::{category::CategoryKind, place::PlaceRecord};

/// Abstraction over the remote source of place records.
///
/// One call per category; a failure means "no data for this category" to
/// every caller in this crate.
pub trait PlaceSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every record of `category`, in the source's listing order.
  fn fetch(
    &self,
    category: CategoryKind,
  ) -> impl Future<Output = Result<Vec<PlaceRecord>, Self::Error>> + Send + '_;
}

// ─── Fixed data ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
#[error("fetching {0} failed")]
pub struct StaticFetchError(pub CategoryKind);

/// A [`PlaceSource`] serving fixed data, for tests.
///
/// Categories with no data set return an empty list. Categories marked with
/// [`StaticSource::failing`] return an error.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
  data:    HashMap<CategoryKind, Vec<PlaceRecord>>,
  failing: Vec<CategoryKind>,
}

impl StaticSource {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, category: CategoryKind, places: Vec<PlaceRecord>) -> Self {
    self.data.insert(category, places);
    self
  }

  pub fn failing(mut self, category: CategoryKind) -> Self {
    self.failing.push(category);
    self
  }
}

impl PlaceSource for StaticSource {
  type Error = StaticFetchError;

  async fn fetch(&self, category: CategoryKind) -> Result<Vec<PlaceRecord>, StaticFetchError> {
    if self.failing.contains(&category) {
      return Err(StaticFetchError(category));
    }
    Ok(self.data.get(&category).cloned().unwrap_or_default())
  }
}
