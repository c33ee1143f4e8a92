//! Place records as served by the remote category source.
//!
//! Records are owned by the remote source. The core only reads them; a
//! favorite keeps its own snapshot (see [`crate::favorite`]).

use serde::{Deserialize, Serialize};

use crate::intent::{self, IntentError};

/// A single point of interest from one category table.
///
/// `id` is unique within its table only. Pair it with a
/// [`CategoryKind`](crate::category::CategoryKind) to identify a place
/// globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
  pub id:            i64,
  pub name:          String,
  #[serde(default)]
  pub image_url:     Option<String>,
  #[serde(default)]
  pub address:       Option<String>,
  #[serde(default)]
  pub lat:           Option<f64>,
  #[serde(default)]
  pub lng:           Option<f64>,
  #[serde(default)]
  pub phone:         Option<String>,
  #[serde(default)]
  pub festival_date: Option<String>,
}

impl PlaceRecord {
  /// A record with only the required fields set.
  pub fn new(id: i64, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      image_url: None,
      address: None,
      lat: None,
      lng: None,
      phone: None,
      festival_date: None,
    }
  }

  /// Case-insensitive substring match against the name or the address.
  ///
  /// `needle` must already be lowercased. An empty needle matches.
  pub fn matches(&self, needle: &str) -> bool {
    if needle.is_empty() {
      return true;
    }
    self.name.to_lowercase().contains(needle)
      || self
        .address
        .as_deref()
        .is_some_and(|a| a.to_lowercase().contains(needle))
  }

  pub fn has_location(&self) -> bool { self.lat.is_some() && self.lng.is_some() }

  pub fn navigation_url(&self) -> Result<String, IntentError> {
    intent::navigation_url(self.lat, self.lng)
  }

  pub fn dial_url(&self) -> Result<String, IntentError> {
    intent::dial_url(self.phone.as_deref())
  }
}
