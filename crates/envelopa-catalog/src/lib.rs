//! # envelopa-catalog: Catalog Layer for Envelopa
//!
//! Owns catalog reference data for the quoting engine: the seam the REST
//! client plugs into, and an in-memory TTL cache so totals can recompute
//! on every keystroke without hammering the backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quoting UI ──► CatalogCache ──► CatalogSource (REST client, or        │
//! │                      │            in-memory fake in tests)             │
//! │                      │                                                  │
//! │                      └──► ServiceCatalog ──► envelopa-core pricing     │
//! │                                                                         │
//! │  The engine only ever sees eligible services: the cache filters raw    │
//! │  records through ServiceCatalog::from_services on every fetch.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Notes
//! The cache deliberately has NO cross-session persistence: a new session
//! starts with a fresh fetch. The previous incarnation of this layer kept
//! the service catalog in durable local storage, which meant quoting
//! against prices from days ago after any backend edit.

pub mod cache;
pub mod error;
pub mod source;

pub use cache::{CatalogCache, DEFAULT_TTL};
pub use error::{CatalogError, CatalogResult};
pub use source::CatalogSource;
