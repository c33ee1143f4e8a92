//! Async HTTP client for the remote category tables.
//!
//! The tables are served by a PostgREST-style endpoint: one
//! `GET /rest/v1/<table>` per category, authenticated by an API key.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use roam_core::{category::CategoryKind, place::PlaceRecord, source::PlaceSource};
use thiserror::Error;
use tracing::debug;

/// Connection settings for the remote category API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub api_key:  String,
}

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("GET {table} failed: {source}")]
  Request {
    table:  &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("GET {table} → {status}")]
  Status {
    table:  &'static str,
    status: StatusCode,
  },

  #[error("deserialising {table}: {source}")]
  Decode {
    table:  &'static str,
    #[source]
    source: reqwest::Error,
  },
}

/// [`PlaceSource`] over the remote REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestSource {
  client: Client,
  config: ApiConfig,
}

impl RestSource {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, category: CategoryKind) -> String {
    format!(
      "{}/rest/v1/{}",
      self.config.base_url.trim_end_matches('/'),
      category.table()
    )
  }

  /// Query string selecting every column in the category's listing order.
  fn query(category: CategoryKind) -> [(&'static str, String); 2] {
    let (column, order) = category.ordering();
    [
      ("select", "*".to_string()),
      ("order", format!("{column}.{}", order.as_str())),
    ]
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.api_key.is_empty() {
      req
    } else {
      req
        .header("apikey", &self.config.api_key)
        .bearer_auth(&self.config.api_key)
    }
  }
}

impl PlaceSource for RestSource {
  type Error = FetchError;

  async fn fetch(&self, category: CategoryKind) -> Result<Vec<PlaceRecord>, FetchError> {
    let table = category.table();
    debug!(table, "fetching category");

    let resp = self
      .auth(self.client.get(self.url(category)))
      .query(&Self::query(category))
      .send()
      .await
      .map_err(|source| FetchError::Request { table, source })?;

    if !resp.status().is_success() {
      return Err(FetchError::Status { table, status: resp.status() });
    }
    resp
      .json()
      .await
      .map_err(|source| FetchError::Decode { table, source })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn source(base_url: &str) -> RestSource {
    RestSource::new(ApiConfig {
      base_url: base_url.into(),
      api_key:  "anon".into(),
    })
    .unwrap()
  }

  #[test]
  fn url_per_table() {
    let s = source("https://example.supabase.co/");
    assert_eq!(
      s.url(CategoryKind::TouristSpot),
      "https://example.supabase.co/rest/v1/tourist_spots"
    );
    assert_eq!(
      s.url(CategoryKind::Cafe),
      "https://example.supabase.co/rest/v1/cafes"
    );
  }

  #[test]
  fn festivals_sorted_by_date() {
    let q = RestSource::query(CategoryKind::Festival);
    assert_eq!(q[1], ("order", "festival_date.asc".to_string()));
    let q = RestSource::query(CategoryKind::Restaurant);
    assert_eq!(q[1], ("order", "created_at.desc".to_string()));
  }

  #[test]
  fn request_carries_key_and_query() {
    let s = source("http://localhost:54321");
    let req = s
      .auth(s.client.get(s.url(CategoryKind::Temple)))
      .query(&RestSource::query(CategoryKind::Temple))
      .build()
      .unwrap();

    assert_eq!(
      req.url().as_str(),
      "http://localhost:54321/rest/v1/temples?select=*&order=created_at.desc"
    );
    assert_eq!(req.headers()["apikey"], "anon");
    assert_eq!(req.headers()["authorization"], "Bearer anon");
  }
}
