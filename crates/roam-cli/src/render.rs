//! Plain-text rendering of the explore and favorites views.

use std::fmt;

use roam_core::{explore::Section, favorite::FavoriteRecord};

const HEART: &str = "♥";
const EMPTY_HEART: &str = "♡";

/// Render filtered explore sections, or the empty-state line.
pub fn sections(sections: &[Section<'_>]) -> String { SectionList(sections).to_string() }

/// Render the favorites list, most recent first as given.
pub fn favorites(favorites: &[FavoriteRecord]) -> String {
  FavoriteList(favorites).to_string()
}

struct SectionList<'a, 'p>(&'a [Section<'p>]);

impl fmt::Display for SectionList<'_, '_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() {
      return writeln!(f, "No places found.");
    }

    for (i, section) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      writeln!(f, "{} ({})", section.title(), section.items.len())?;

      for item in &section.items {
        let heart = if item.favorited { HEART } else { EMPTY_HEART };
        let place = item.place;
        writeln!(f, "  {heart} [{}] {}", place.id, place.name)?;
        details(f, place.address.as_deref(), place.festival_date.as_deref())?;
        write_actions(f, item.shows_navigate(), item.shows_call())?;
      }
    }
    Ok(())
  }
}

struct FavoriteList<'a>(&'a [FavoriteRecord]);

impl fmt::Display for FavoriteList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() {
      return writeln!(f, "No favorites yet.");
    }

    writeln!(f, "Favorites ({})", self.0.len())?;
    for fav in self.0 {
      writeln!(f, "  {HEART} [{} {}] {}", fav.category, fav.id, fav.name)?;
      details(f, fav.address.as_deref(), fav.festival_date.as_deref())?;
      writeln!(f, "      added {}", fav.added_at.format("%Y-%m-%d %H:%M"))?;
      write_actions(
        f,
        fav.category.can_navigate() && fav.navigation_url().is_ok(),
        fav.category.can_call() && fav.dial_url().is_ok(),
      )?;
    }
    Ok(())
  }
}

fn details(f: &mut fmt::Formatter<'_>, address: Option<&str>, date: Option<&str>) -> fmt::Result {
  if let Some(address) = address {
    writeln!(f, "      {address}")?;
  }
  if let Some(date) = date {
    writeln!(f, "      date: {date}")?;
  }
  Ok(())
}

fn write_actions(f: &mut fmt::Formatter<'_>, navigate: bool, call: bool) -> fmt::Result {
  let actions = actions(navigate, call);
  if actions.is_empty() {
    return Ok(());
  }
  writeln!(f, "      actions: {actions}")
}

fn actions(navigate: bool, call: bool) -> String {
  let mut names = Vec::new();
  if navigate {
    names.push("navigate");
  }
  if call {
    names.push("call");
  }
  names.join(", ")
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use roam_core::{category::CategoryKind, explore::ExploreItem, place::PlaceRecord};

  use super::*;

  #[test]
  fn empty_state() {
    assert_eq!(sections(&[]), "No places found.\n");
    assert_eq!(favorites(&[]), "No favorites yet.\n");
  }

  #[test]
  fn section_with_actions_and_heart() {
    let mut cafe = PlaceRecord::new(2, "Cafe Orange");
    cafe.address = Some("Bangkok".into());
    cafe.lat = Some(13.7);
    cafe.lng = Some(100.5);
    cafe.phone = Some("02-000".into());

    let section = Section {
      category: CategoryKind::Cafe,
      items:    vec![ExploreItem {
        place:     &cafe,
        category:  CategoryKind::Cafe,
        favorited: true,
      }],
    };

    let out = sections(&[section]);
    assert_eq!(
      out,
      "Cafes (1)\n  ♥ [2] Cafe Orange\n      Bangkok\n      actions: navigate, call\n"
    );
  }

  #[test]
  fn festival_shows_date_and_no_actions() {
    let mut fair = PlaceRecord::new(4, "Langsat Fair");
    fair.festival_date = Some("2025-09-12".into());

    let section = Section {
      category: CategoryKind::Festival,
      items:    vec![ExploreItem {
        place:     &fair,
        category:  CategoryKind::Festival,
        favorited: false,
      }],
    };

    let out = sections(&[section]);
    assert!(out.contains("♡ [4] Langsat Fair"));
    assert!(out.contains("date: 2025-09-12"));
    assert!(!out.contains("actions"));
  }

  #[test]
  fn favorites_list() {
    let mut wat = PlaceRecord::new(3, "Wat Thammathipatai");
    wat.lat = Some(17.6);
    wat.lng = Some(100.1);
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    let fav = FavoriteRecord::snapshot(&wat, CategoryKind::Temple, at);

    let out = favorites(&[fav]);
    assert!(out.starts_with("Favorites (1)\n"));
    assert!(out.contains("♥ [temple 3] Wat Thammathipatai"));
    assert!(out.contains("added 2025-03-01 09:30"));
    assert!(out.contains("actions: navigate\n"));
  }

  #[test]
  fn sections_are_separated_by_a_blank_line() {
    let wat = PlaceRecord::new(3, "Wat Thammathipatai");
    let mut cafe = PlaceRecord::new(2, "Cafe Orange");
    cafe.phone = Some("n/a".into());

    let out = sections(&[
      Section {
        category: CategoryKind::Cafe,
        items:    vec![ExploreItem { place: &cafe, category: CategoryKind::Cafe, favorited: false }],
      },
      Section {
        category: CategoryKind::Temple,
        items:    vec![ExploreItem { place: &wat, category: CategoryKind::Temple, favorited: false }],
      },
    ]);
    assert_eq!(
      out,
      "Cafes (1)\n  ♡ [2] Cafe Orange\n\nTemples (1)\n  ♡ [3] Wat Thammathipatai\n"
    );
  }
}
