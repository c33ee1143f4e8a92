//! Core types and logic for the roam place guide.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Persistence and the remote category source are reached through the
//! [`blob::BlobStore`] and [`source::PlaceSource`] traits; the other crates
//! in the workspace provide the concrete backends.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod blob;
pub mod category;
pub mod error;
pub mod explore;
pub mod favorite;
pub mod favorites;
pub mod intent;
pub mod place;
pub mod source;

pub use error::{Error, Result};
