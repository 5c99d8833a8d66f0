//! # Catalog Source
//!
//! The seam between the quoting engine and whatever actually serves the
//! catalogs.
//!
//! The application implements [`CatalogSource`] over its REST client; tests
//! implement it in memory. The cache layer (see `cache.rs`) sits on top of
//! either and neither knows the difference.

use envelopa_core::types::{AdditionalService, CatalogProduct};

use crate::error::CatalogResult;

/// Provider of catalog reference data.
///
/// ## Contract
/// - `fetch_services` returns RAW service records; the cache filters them
///   through `ServiceCatalog::from_services`, so sources don't need to
///   pre-filter eligibility
/// - Both fetches are read-only: stock levels and prices are never written
///   back through this seam
/// - Failures surface as `CatalogError::Unavailable`; the caller decides
///   whether to keep showing stale data or notify the user
///
/// ## Usage
/// ```rust,ignore
/// struct RestCatalog { client: ApiClient }
///
/// impl CatalogSource for RestCatalog {
///     async fn fetch_products(&self) -> CatalogResult<Vec<CatalogProduct>> {
///         self.client.get("/produtos").await
///             .map_err(|e| CatalogError::unavailable(e.to_string()))
///     }
///     async fn fetch_services(&self) -> CatalogResult<Vec<AdditionalService>> {
///         self.client.get("/servicos-adicionais").await
///             .map_err(|e| CatalogError::unavailable(e.to_string()))
///     }
/// }
/// ```
pub trait CatalogSource {
    /// Fetches the material (vinyl film) catalog.
    fn fetch_products(
        &self,
    ) -> impl std::future::Future<Output = CatalogResult<Vec<CatalogProduct>>> + Send;

    /// Fetches the raw additional-services catalog.
    fn fetch_services(
        &self,
    ) -> impl std::future::Future<Output = CatalogResult<Vec<AdditionalService>>> + Send;
}
