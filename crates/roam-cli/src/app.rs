//! Command dispatch over an [`ExploreView`].
//!
//! Every command returns the text to print on stdout. User-facing notices
//! (partial load failures) are collected in `notices` for the caller to show
//! on stderr.

use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use roam_core::{
  blob::BlobStore,
  category::{CategoryFilter, CategoryKind},
  explore::{ExploreView, Notice},
  favorites::FavoritesStore,
  source::PlaceSource,
};
use tracing::info;

use crate::render;

/// Which outbound intent to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
  Navigate,
  Call,
}

/// Top-level application state.
pub struct App<S, B> {
  view:        ExploreView<S, B>,
  /// Notices raised while running the last command.
  pub notices: Vec<Notice>,
}

impl<S, B> App<S, B>
where
  S: PlaceSource,
  B: BlobStore,
{
  pub fn new(source: S, store: FavoritesStore<B>) -> Self {
    Self {
      view:    ExploreView::new(Arc::new(source), Arc::new(store)),
      notices: Vec::new(),
    }
  }

  fn store(&self) -> &FavoritesStore<B> { self.view.store() }

  async fn load(&mut self) {
    if let Some(notice) = self.view.load_all().await {
      self.notices.push(notice);
    }
    self.view.take_notice();
  }

  /// `explore [--query Q] [--category C]`
  pub async fn explore(&mut self, query: &str, filter: CategoryFilter) -> Result<String> {
    self.load().await;
    let sections = self.view.apply_filters(query, filter);
    Ok(render::sections(&sections))
  }

  /// `toggle <category> <id>`
  pub async fn toggle(&mut self, category: CategoryKind, id: i64) -> Result<String> {
    self.load().await;

    let Some(place) = self.view.find(id, category).cloned() else {
      // Gone from the listing (or the fetch failed); a stored favorite can
      // still be removed.
      if self.store().exists(id, category).await {
        if !self.store().remove(id, category).await {
          bail!(Notice::FavoriteUpdateFailed);
        }
        return Ok(format!("Removed {category} {id} from favorites.\n"));
      }
      bail!("no {category} with id {id}");
    };

    let favorited = self.view.toggle_favorite(&place, category).await?;
    info!(id, %category, favorited, "favorite toggled");
    Ok(if favorited {
      format!("Added {} to favorites.\n", place.name)
    } else {
      format!("Removed {} from favorites.\n", place.name)
    })
  }

  /// `favorites list`
  pub async fn list_favorites(&self) -> Result<String> {
    let favorites = self.store().favorites_by_recency().await;
    Ok(render::favorites(&favorites))
  }

  /// `favorites clear`
  pub async fn clear_favorites(&self) -> Result<String> {
    if !self.store().clear().await {
      bail!(Notice::FavoriteUpdateFailed);
    }
    Ok("Favorites cleared.\n".to_string())
  }

  /// `navigate <category> <id>` / `call <category> <id>`
  ///
  /// Prints the intent URL. Favorites are checked first so a saved place
  /// works without the network.
  pub async fn intent(
    &mut self,
    intent: Intent,
    category: CategoryKind,
    id: i64,
  ) -> Result<String> {
    let saved = self
      .store()
      .get_all()
      .await
      .into_iter()
      .find(|f| f.is(id, category));

    let url = if let Some(fav) = saved {
      match intent {
        Intent::Navigate => fav.navigation_url(),
        Intent::Call => fav.dial_url(),
      }
    } else {
      self.load().await;
      let place = self
        .view
        .find(id, category)
        .ok_or_else(|| anyhow!("no {category} with id {id}"))?;
      match intent {
        Intent::Navigate => place.navigation_url(),
        Intent::Call => place.dial_url(),
      }
    };

    Ok(format!("{}\n", url?))
  }
}

#[cfg(test)]
mod tests {
  use roam_core::{
    blob::MemoryBlobStore,
    place::PlaceRecord,
    source::StaticSource,
  };

  use super::*;

  fn app(source: StaticSource) -> (App<StaticSource, MemoryBlobStore>, MemoryBlobStore) {
    let blobs = MemoryBlobStore::new();
    (App::new(source, FavoritesStore::new(blobs.clone())), blobs)
  }

  fn source() -> StaticSource {
    let mut wat = PlaceRecord::new(1, "Wat Thammathipatai");
    wat.address = Some("Uttaradit".into());
    wat.lat = Some(17.62);
    wat.lng = Some(100.09);
    let mut cafe = PlaceRecord::new(2, "Cafe Orange");
    cafe.address = Some("Bangkok".into());
    cafe.phone = Some("055-411-234".into());

    StaticSource::new()
      .with(CategoryKind::Temple, vec![wat])
      .with(CategoryKind::Cafe, vec![cafe])
  }

  #[tokio::test]
  async fn explore_filters_and_marks_favorites() {
    let (mut a, _) = app(source());
    a.toggle(CategoryKind::Temple, 1).await.unwrap();

    let out = a.explore("wat", CategoryFilter::All).await.unwrap();
    assert!(out.starts_with("Temples (1)\n"));
    assert!(out.contains("♥ [1] Wat Thammathipatai"));
    assert!(!out.contains("Cafe Orange"));

    let out = a
      .explore("nothing", CategoryFilter::Only(CategoryKind::Cafe))
      .await
      .unwrap();
    assert_eq!(out, "No places found.\n");
  }

  #[tokio::test]
  async fn explore_collects_load_notice() {
    let (mut a, _) = app(source().failing(CategoryKind::Festival));
    let out = a.explore("", CategoryFilter::All).await.unwrap();

    assert!(out.contains("Cafe Orange"));
    assert_eq!(a.notices, vec![Notice::LoadFailed(vec![CategoryKind::Festival])]);
  }

  #[tokio::test]
  async fn toggle_twice_round_trips() {
    let (mut a, _) = app(source());
    let out = a.toggle(CategoryKind::Cafe, 2).await.unwrap();
    assert_eq!(out, "Added Cafe Orange to favorites.\n");
    assert!(a.list_favorites().await.unwrap().contains("[cafe 2] Cafe Orange"));

    let out = a.toggle(CategoryKind::Cafe, 2).await.unwrap();
    assert_eq!(out, "Removed Cafe Orange from favorites.\n");
    assert_eq!(a.list_favorites().await.unwrap(), "No favorites yet.\n");
  }

  #[tokio::test]
  async fn toggle_unknown_place_fails() {
    let (mut a, _) = app(source());
    assert!(a.toggle(CategoryKind::Restaurant, 99).await.is_err());
  }

  #[tokio::test]
  async fn toggle_removes_favorite_missing_from_listing() {
    let (mut a, _) = app(source());
    a.store().add(&PlaceRecord::new(7, "Closed down"), CategoryKind::Restaurant).await;

    let out = a.toggle(CategoryKind::Restaurant, 7).await.unwrap();
    assert_eq!(out, "Removed restaurant 7 from favorites.\n");
    assert!(!a.store().exists(7, CategoryKind::Restaurant).await);
  }

  #[tokio::test]
  async fn toggle_write_failure_is_an_error() {
    let (mut a, blobs) = app(source());
    blobs.fail_writes(true);
    let err = a.toggle(CategoryKind::Cafe, 2).await.unwrap_err();
    assert_eq!(err.to_string(), "failed to update favorites");
  }

  #[tokio::test]
  async fn clear_favorites() {
    let (mut a, _) = app(source());
    a.toggle(CategoryKind::Cafe, 2).await.unwrap();
    assert_eq!(a.clear_favorites().await.unwrap(), "Favorites cleared.\n");
    assert_eq!(a.list_favorites().await.unwrap(), "No favorites yet.\n");
  }

  #[tokio::test]
  async fn intents() {
    let (mut a, _) = app(source());

    let out = a.intent(Intent::Navigate, CategoryKind::Temple, 1).await.unwrap();
    assert_eq!(
      out,
      "https://www.google.com/maps/dir/?api=1&destination=17.62,100.09\n"
    );
    let out = a.intent(Intent::Call, CategoryKind::Cafe, 2).await.unwrap();
    assert_eq!(out, "tel:055411234\n");

    let err = a.intent(Intent::Navigate, CategoryKind::Cafe, 2).await.unwrap_err();
    assert_eq!(err.to_string(), "location not available");
    let err = a.intent(Intent::Call, CategoryKind::Temple, 1).await.unwrap_err();
    assert_eq!(err.to_string(), "phone not available");
  }

  #[tokio::test]
  async fn intent_uses_saved_favorite_when_offline() {
    let (mut a, _) = app(source());
    a.toggle(CategoryKind::Temple, 1).await.unwrap();

    // Same store, but the remote source is now down.
    let mut offline = StaticSource::new();
    for category in CategoryKind::ALL {
      offline = offline.failing(category);
    }
    let store = FavoritesStore::new(a.store().blobs().clone());
    let mut b = App::new(offline, store);

    let out = b.intent(Intent::Navigate, CategoryKind::Temple, 1).await.unwrap();
    assert!(out.starts_with("https://www.google.com/maps/dir/"));
  }
}
