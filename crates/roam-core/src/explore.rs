//! [`ExploreView`] — the aggregated, filterable, favorite-aware place list.
//!
//! A load fans out one fetch per category, joins them, and resolves which of
//! the returned places are favorites. Filtering is pure and borrows the
//! loaded data. Toggling a favorite writes through to the
//! [`FavoritesStore`] and, on success, updates the local favorited-key
//! mirror without re-reading the store. [`ExploreView::refresh`] rebuilds the
//! mirror from scratch.
//!
//! ```text
//! Idle ──load_all──▶ Loading ──▶ Ready ──refresh──▶ Refreshing ──▶ Ready
//! ```
//!
//! Fetch failures never leave the view in an error state: failed categories
//! come back empty and a single [`Notice`] is raised.

use std::{
  collections::{BTreeMap, HashSet},
  sync::Arc,
};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
  blob::BlobStore,
  category::{CategoryFilter, CategoryKind},
  favorite::FavoriteKey,
  favorites::{AddOutcome, FavoritesStore},
  place::PlaceRecord,
  source::PlaceSource,
};

// ─── State ───────────────────────────────────────────────────────────────────

/// Lifecycle of one explore view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
  #[default]
  Idle,
  Loading,
  Refreshing,
  Ready,
}

/// A user-visible problem. Raised, never fatal; the view stays interactive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Notice {
  #[error("failed to load data for {}", list_categories(.0))]
  LoadFailed(Vec<CategoryKind>),

  #[error("failed to update favorites")]
  FavoriteUpdateFailed,
}

fn list_categories(categories: &[CategoryKind]) -> String {
  categories
    .iter()
    .map(|c| c.title())
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Everything one load produced, ready to be applied to a view.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
  /// Records per category. Failed categories map to an empty list.
  pub places:    BTreeMap<CategoryKind, Vec<PlaceRecord>>,
  /// Categories whose fetch failed, in display order.
  pub failed:    Vec<CategoryKind>,
  /// Composite keys of the loaded places that are favorites.
  pub favorites: HashSet<FavoriteKey>,
}

/// Fetch every category concurrently and resolve favorites.
///
/// The fetches are issued together and joined, so latency is that of the
/// slowest one. A failing category never aborts the others.
pub async fn fetch_all<S, B>(source: &S, store: &FavoritesStore<B>) -> LoadOutcome
where
  S: PlaceSource,
  B: BlobStore,
{
  let (spots, restaurants, cafes, temples, festivals) = tokio::join!(
    source.fetch(CategoryKind::TouristSpot),
    source.fetch(CategoryKind::Restaurant),
    source.fetch(CategoryKind::Cafe),
    source.fetch(CategoryKind::Temple),
    source.fetch(CategoryKind::Festival),
  );
  let results = [spots, restaurants, cafes, temples, festivals];

  let mut outcome = LoadOutcome::default();
  for (category, result) in CategoryKind::ALL.into_iter().zip(results) {
    let places = match result {
      Ok(places) => {
        debug!(%category, count = places.len(), "category loaded");
        places
      }
      Err(e) => {
        warn!(%category, error = %e, "category fetch failed");
        outcome.failed.push(category);
        Vec::new()
      }
    };
    outcome.places.insert(category, places);
  }

  let stored = store.keys().await;
  outcome.favorites = outcome
    .places
    .iter()
    .flat_map(|(&category, places)| {
      places.iter().map(move |p| FavoriteKey::new(p.id, category))
    })
    .filter(|key| stored.contains(key))
    .collect();

  outcome
}

/// Identifies one started load; see [`ExploreView::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

// ─── Filtered output ─────────────────────────────────────────────────────────

/// One place as rendered in the explore list.
#[derive(Debug, Clone, Copy)]
pub struct ExploreItem<'a> {
  pub place:     &'a PlaceRecord,
  pub category:  CategoryKind,
  pub favorited: bool,
}

impl ExploreItem<'_> {
  /// Whether the card shows a directions action.
  pub fn shows_navigate(&self) -> bool {
    self.category.can_navigate() && self.place.has_location()
  }

  /// Whether the card shows a call action.
  pub fn shows_call(&self) -> bool {
    self.category.can_call() && self.place.dial_url().is_ok()
  }
}

/// A non-empty category section of the filtered list.
#[derive(Debug, Clone)]
pub struct Section<'a> {
  pub category: CategoryKind,
  pub items:    Vec<ExploreItem<'a>>,
}

impl Section<'_> {
  pub fn title(&self) -> &'static str { self.category.title() }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// The explore view over a place source `S` and a blob store `B`.
pub struct ExploreView<S, B> {
  source:    Arc<S>,
  store:     Arc<FavoritesStore<B>>,
  places:    BTreeMap<CategoryKind, Vec<PlaceRecord>>,
  favorites: HashSet<FavoriteKey>,
  state:     ViewState,
  notice:    Option<Notice>,
  /// Ticket of the newest load started.
  latest:    u64,
}

impl<S, B> ExploreView<S, B>
where
  S: PlaceSource,
  B: BlobStore,
{
  pub fn new(source: Arc<S>, store: Arc<FavoritesStore<B>>) -> Self {
    Self {
      source,
      store,
      places: BTreeMap::new(),
      favorites: HashSet::new(),
      state: ViewState::Idle,
      notice: None,
      latest: 0,
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn state(&self) -> ViewState { self.state }

  pub fn store(&self) -> &Arc<FavoritesStore<B>> { &self.store }

  pub fn source(&self) -> &Arc<S> { &self.source }

  /// The most recent notice, if it has not been taken.
  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn take_notice(&mut self) -> Option<Notice> { self.notice.take() }

  /// Loaded records of `category`, unfiltered.
  pub fn places(&self, category: CategoryKind) -> &[PlaceRecord] {
    self.places.get(&category).map(Vec::as_slice).unwrap_or_default()
  }

  /// Look up a loaded place by its composite key.
  pub fn find(&self, id: i64, category: CategoryKind) -> Option<&PlaceRecord> {
    self.places(category).iter().find(|p| p.id == id)
  }

  /// Favorited state from the local mirror.
  pub fn is_favorited(&self, id: i64, category: CategoryKind) -> bool {
    self.favorites.contains(&FavoriteKey::new(id, category))
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Mark a load as started and return its ticket.
  ///
  /// Use with [`fetch_all`] and [`ExploreView::finish_load`] when the fetch
  /// runs outside the view, e.g. on a spawned task.
  pub fn begin_load(&mut self) -> LoadTicket {
    self.latest += 1;
    self.state = match self.state {
      ViewState::Idle | ViewState::Loading => ViewState::Loading,
      ViewState::Ready | ViewState::Refreshing => ViewState::Refreshing,
    };
    LoadTicket(self.latest)
  }

  /// Apply a finished load. Results of a load superseded by a newer
  /// [`begin_load`](Self::begin_load) are dropped; returns whether `outcome`
  /// was applied.
  pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
    if ticket.0 < self.latest {
      debug!(ticket = ticket.0, latest = self.latest, "discarding stale load");
      return false;
    }

    self.places = outcome.places;
    self.favorites = outcome.favorites;
    if !outcome.failed.is_empty() {
      self.notice = Some(Notice::LoadFailed(outcome.failed));
    } else if matches!(self.notice, Some(Notice::LoadFailed(_))) {
      self.notice = None;
    }
    self.state = ViewState::Ready;
    true
  }

  /// Fetch every category and rebuild the favorited-key set.
  ///
  /// Never fails as a whole. Returns the load notice if any category failed.
  pub async fn load_all(&mut self) -> Option<Notice> {
    let ticket = self.begin_load();
    let outcome = fetch_all(&*self.source, &*self.store).await;
    let failed = !outcome.failed.is_empty();
    self.finish_load(ticket, outcome);
    if failed { self.notice.clone() } else { None }
  }

  /// Full resync: reload every category and recompute the mirror from the
  /// store.
  pub async fn refresh(&mut self) -> Option<Notice> { self.load_all().await }

  // ── Filtering ─────────────────────────────────────────────────────────────

  /// The loaded places matching `query` and `filter`, grouped by category.
  ///
  /// `query` is a case-insensitive substring of name or address, taken as
  /// typed; a blank query matches everything. Categories with no match are
  /// omitted.
  pub fn apply_filters(&self, query: &str, filter: CategoryFilter) -> Vec<Section<'_>> {
    let needle = if query.trim().is_empty() { String::new() } else { query.to_lowercase() };

    CategoryKind::ALL
      .into_iter()
      .filter(|&category| filter.includes(category))
      .filter_map(|category| {
        let items: Vec<_> = self
          .places(category)
          .iter()
          .filter(|p| p.matches(&needle))
          .map(|place| ExploreItem {
            place,
            category,
            favorited: self.is_favorited(place.id, category),
          })
          .collect();
        (!items.is_empty()).then_some(Section { category, items })
      })
      .collect()
  }

  /// `false` exactly when every filtered category is empty.
  pub fn has_data(&self, query: &str, filter: CategoryFilter) -> bool {
    !self.apply_filters(query, filter).is_empty()
  }

  // ── Favorites ─────────────────────────────────────────────────────────────

  /// Flip the favorited state of `place` in `category`.
  ///
  /// Returns the new state. On a storage failure the mirror is left alone and
  /// a [`Notice::FavoriteUpdateFailed`] is raised and returned.
  pub async fn toggle_favorite(
    &mut self,
    place: &PlaceRecord,
    category: CategoryKind,
  ) -> Result<bool, Notice> {
    let key = FavoriteKey::new(place.id, category);

    let result = if self.favorites.contains(&key) {
      self.store.try_remove(place.id, category).await.map(|_| false)
    } else {
      self.store.try_add(place, category).await.map(|outcome| {
        if outcome == AddOutcome::AlreadyPresent {
          debug!(id = place.id, %category, "favorite already stored; syncing mirror");
        }
        true
      })
    };

    match result {
      Ok(true) => {
        self.favorites.insert(key);
        Ok(true)
      }
      Ok(false) => {
        self.favorites.remove(&key);
        Ok(false)
      }
      Err(e) => {
        error!(id = place.id, %category, error = %e, "toggling favorite failed");
        self.notice = Some(Notice::FavoriteUpdateFailed);
        Err(Notice::FavoriteUpdateFailed)
      }
    }
  }
}
