pub mod enrichment;
pub mod errors;
pub mod executor;
pub mod moysklad_api_client;
pub mod reference_map;

#[cfg(test)]
pub(crate) mod fake_api;

pub use errors::{ApiError, EnrichmentError};
pub use executor::{PagingOptions, RefreshExecutor, RefreshOutcome};
pub use moysklad_api_client::{MoySkladApi, MoySkladApiClient};
