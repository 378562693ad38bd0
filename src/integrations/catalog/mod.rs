pub mod client;

pub use client::{CardCatalogResponse, CardDto, CatalogApi, CatalogClient};

#[cfg(test)]
pub use client::MockCatalogApi;
