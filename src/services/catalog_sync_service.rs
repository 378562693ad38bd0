// src/services/catalog_sync_service.rs
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::domain::card::Card;
use crate::error::{AppError, AppResult};
use crate::events::{CatalogSynced, EventBus};
use crate::integrations::catalog::{CardDto, CatalogApi};
use crate::repositories::CardRepository;

/// Outcome of a completed catalog sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Records the remote endpoint returned.
    pub fetched: usize,
    /// Records that survived sanitization and were written to the store.
    pub mapped: usize,
}

pub struct CatalogSyncService {
    card_repo: Arc<dyn CardRepository>,
    catalog_api: Arc<dyn CatalogApi>,
    event_bus: Arc<EventBus>,
}

impl CatalogSyncService {
    pub fn new(
        card_repo: Arc<dyn CardRepository>,
        catalog_api: Arc<dyn CatalogApi>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            card_repo,
            catalog_api,
            event_bus,
        }
    }

    /// Fetches the full remote catalog and merges it into the local store.
    ///
    /// Local user state (favorite flag, formation slot) is snapshotted before
    /// the fetch and re-applied to the incoming rows keyed by card id, so a
    /// full upsert never loses it. An empty or fully-rejected response leaves
    /// the store untouched and surfaces as an error so callers can retry.
    /// Rows present locally but absent from the response are never deleted.
    pub async fn run_sync(&self) -> AppResult<SyncReport> {
        let snapshot: HashMap<String, (bool, Option<i64>)> = self
            .card_repo
            .all_user_state()?
            .into_iter()
            .map(|s| (s.id, (s.is_favorite, s.position_in_formation)))
            .collect();
        debug!("catalog sync: snapshotted user state for {} cards", snapshot.len());

        let response = self.catalog_api.fetch_all_cards().await?;
        let fetched = response.cards.len();
        debug!(
            "catalog sync: fetched {} records (reported count {})",
            fetched, response.count
        );

        let mut cards: Vec<Card> = Vec::with_capacity(fetched);
        for dto in &response.cards {
            let Some(mut card) = map_record(dto) else {
                continue;
            };
            if let Some(&(is_favorite, position)) = snapshot.get(&card.id) {
                card.is_favorite = is_favorite;
                card.position_in_formation = position;
            }
            cards.push(card);
        }

        if cards.is_empty() {
            warn!("catalog sync: no usable records in response, store left untouched");
            return Err(AppError::EmptySyncResponse);
        }

        self.card_repo.upsert_all(&cards)?;
        let mapped = cards.len();
        info!("catalog sync: upserted {} of {} fetched records", mapped, fetched);

        self.event_bus.emit(CatalogSynced::new(fetched, mapped));
        Ok(SyncReport { fetched, mapped })
    }
}

/// Maps a raw catalog record to a [`Card`], dropping records that carry no
/// identifying signal in any field.
fn map_record(dto: &CardDto) -> Option<Card> {
    let has_signal = [&dto.season, &dto.card_number, &dto.player_name, &dto.team]
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()));
    if !has_signal {
        return None;
    }
    Some(Card::from_catalog(
        dto.season.as_deref(),
        dto.card_number.as_deref(),
        dto.player_name.as_deref(),
        dto.team.as_deref(),
        dto.card_image_url.as_deref(),
    ))
}
