//! Favorite records — immutable snapshots of a place at favoriting time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  category::CategoryKind,
  intent::{self, IntentError},
  place::PlaceRecord,
};

/// Composite identity of a favorite. The same numeric id in two categories
/// names two different places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FavoriteKey {
  pub id:       i64,
  pub category: CategoryKind,
}

impl FavoriteKey {
  pub fn new(id: i64, category: CategoryKind) -> Self { Self { id, category } }
}

/// A persisted favorite.
///
/// The serialized field names (`type`, `addedAt`) are those of the on-device
/// blob and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
  pub id:            i64,
  #[serde(rename = "type")]
  pub category:      CategoryKind,
  pub name:          String,
  #[serde(default)]
  pub image_url:     Option<String>,
  #[serde(default)]
  pub address:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lat:           Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lng:           Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub festival_date: Option<String>,
  #[serde(rename = "addedAt")]
  pub added_at:      DateTime<Utc>,
}

impl FavoriteRecord {
  /// Snapshot `place` as a favorite of `category`, stamped `added_at`.
  pub fn snapshot(
    place: &PlaceRecord,
    category: CategoryKind,
    added_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: place.id,
      category,
      name: place.name.clone(),
      image_url: place.image_url.clone(),
      address: place.address.clone(),
      lat: place.lat,
      lng: place.lng,
      phone: place.phone.clone(),
      festival_date: place.festival_date.clone(),
      added_at,
    }
  }

  pub fn key(&self) -> FavoriteKey { FavoriteKey::new(self.id, self.category) }

  pub fn is(&self, id: i64, category: CategoryKind) -> bool {
    self.id == id && self.category == category
  }

  pub fn navigation_url(&self) -> Result<String, IntentError> {
    intent::navigation_url(self.lat, self.lng)
  }

  pub fn dial_url(&self) -> Result<String, IntentError> {
    intent::dial_url(self.phone.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn blob_field_names() {
    let mut place = PlaceRecord::new(3, "Cafe Orange");
    place.phone = Some("055-000".into());
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let fav = FavoriteRecord::snapshot(&place, CategoryKind::Cafe, at);

    let v = serde_json::to_value(&fav).unwrap();
    assert_eq!(v["type"], "cafe");
    assert_eq!(v["addedAt"], "2025-01-02T03:04:05Z");
    assert_eq!(v["phone"], "055-000");
    assert!(v.get("lat").is_none());
    assert!(v["image_url"].is_null());
  }

  #[test]
  fn decodes_blob_written_by_older_clients() {
    let json = r#"{
      "id": 12,
      "type": "temple",
      "name": "Wat Thammathipatai",
      "image_url": null,
      "address": "Uttaradit",
      "lat": 17.62,
      "lng": 100.1,
      "addedAt": "2024-11-30T10:15:00.000Z"
    }"#;
    let fav: FavoriteRecord = serde_json::from_str(json).unwrap();
    assert_eq!(fav.key(), FavoriteKey::new(12, CategoryKind::Temple));
    assert!(fav.phone.is_none());
    assert!(fav.navigation_url().is_ok());
  }

  #[test]
  fn key_is_composite() {
    let at = Utc::now();
    let place = PlaceRecord::new(1, "Same id");
    let a = FavoriteRecord::snapshot(&place, CategoryKind::Cafe, at);
    let b = FavoriteRecord::snapshot(&place, CategoryKind::Restaurant, at);
    assert_ne!(a.key(), b.key());
    assert!(a.is(1, CategoryKind::Cafe));
    assert!(!a.is(1, CategoryKind::Restaurant));
  }
}
