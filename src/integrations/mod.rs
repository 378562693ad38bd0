// src/integrations/mod.rs
//
// External integrations (infrastructure, not domain)

pub mod catalog;

pub use catalog::{CardCatalogResponse, CardDto, CatalogApi, CatalogClient};
