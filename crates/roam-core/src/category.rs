//! Place categories and the per-category presentation rules.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The closed set of place categories served by the remote source.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
  TouristSpot,
  Restaurant,
  Cafe,
  Temple,
  Festival,
}

/// Sort direction for a remote category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
  Ascending,
  Descending,
}

impl SortOrder {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Ascending => "asc",
      Self::Descending => "desc",
    }
  }
}

impl CategoryKind {
  /// Every category, in display order.
  pub const ALL: [CategoryKind; 5] = [
    CategoryKind::TouristSpot,
    CategoryKind::Restaurant,
    CategoryKind::Cafe,
    CategoryKind::Temple,
    CategoryKind::Festival,
  ];

  /// Wire name, identical to the serde representation.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::TouristSpot => "tourist_spot",
      Self::Restaurant => "restaurant",
      Self::Cafe => "cafe",
      Self::Temple => "temple",
      Self::Festival => "festival",
    }
  }

  /// Name of the remote table holding this category's records.
  pub fn table(self) -> &'static str {
    match self {
      Self::TouristSpot => "tourist_spots",
      Self::Restaurant => "restaurants",
      Self::Cafe => "cafes",
      Self::Temple => "temples",
      Self::Festival => "festivals",
    }
  }

  /// Column and direction the remote listing is ordered by.
  ///
  /// Festivals come soonest-first; everything else newest-first.
  pub fn ordering(self) -> (&'static str, SortOrder) {
    match self {
      Self::Festival => ("festival_date", SortOrder::Ascending),
      _ => ("created_at", SortOrder::Descending),
    }
  }

  /// Section heading shown above the category's cards.
  pub fn title(self) -> &'static str {
    match self {
      Self::TouristSpot => "Attractions",
      Self::Restaurant => "Restaurants",
      Self::Cafe => "Cafes",
      Self::Temple => "Temples",
      Self::Festival => "Festivals",
    }
  }

  /// Whether cards of this category offer a directions action.
  pub fn can_navigate(self) -> bool { !matches!(self, Self::Festival) }

  /// Whether cards of this category offer a call action.
  pub fn can_call(self) -> bool { matches!(self, Self::Restaurant | Self::Cafe) }
}

impl fmt::Display for CategoryKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CategoryKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    CategoryKind::ALL
      .into_iter()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| Error::UnknownCategory(s.to_owned()))
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// The category selector of the explore view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
  #[default]
  All,
  Only(CategoryKind),
}

impl CategoryFilter {
  pub fn includes(self, kind: CategoryKind) -> bool {
    match self {
      Self::All => true,
      Self::Only(k) => k == kind,
    }
  }
}

impl FromStr for CategoryFilter {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "all" {
      return Ok(Self::All);
    }
    s.parse().map(Self::Only)
  }
}

impl fmt::Display for CategoryFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Only(k) => k.fmt(f),
    }
  }
}
