// src/integrations/catalog/client.rs
//
// Remote card catalog API client
//
// ARCHITECTURE:
// - Plain HTTP client for the card catalog endpoint
// - Maps external data → wire DTOs (NO domain mutation)
// - Used by CatalogSyncService
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never creates or modifies domain entities directly
// - Returns DTOs that services can map
// - Handles all external API concerns

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Full-catalog bulk response. `count` is informational only and is not
/// validated against `cards.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalogResponse {
    pub count: i64,
    pub cards: Vec<CardDto>,
}

/// One raw catalog record. Every field is optional on the wire; the sync
/// service sanitizes and rejects as needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDto {
    #[serde(rename = "Season")]
    pub season: Option<String>,
    #[serde(rename = "Card Number")]
    pub card_number: Option<String>,
    #[serde(rename = "Player Name")]
    pub player_name: Option<String>,
    #[serde(rename = "Team")]
    pub team: Option<String>,
    #[serde(rename = "Card Image URL")]
    pub card_image_url: Option<String>,
}

/// Abstraction over the catalog endpoint so services can be tested
/// against a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// One GET returning every card in the catalog
    async fn fetch_all_cards(&self) -> AppResult<CardCatalogResponse>;
}

/// Catalog API Client
pub struct CatalogClient {
    base_url: String,
    http_client: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch_all_cards(&self) -> AppResult<CardCatalogResponse> {
        let url = format!("{}/api/cards", self.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Catalog request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Catalog API returned status: {}",
                response.status()
            )));
        }

        let catalog: CardCatalogResponse = response
            .json()
            .await
            .map_err(|e| AppError::Http(format!("Failed to parse catalog response: {}", e)))?;

        Ok(catalog)
    }
}
