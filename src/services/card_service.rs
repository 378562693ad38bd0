// src/services/card_service.rs
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use tokio::sync::watch;

use crate::domain::card::Card;
use crate::domain::recent_search::RecentSearch;
use crate::error::{AppError, AppResult};
use crate::events::{CardViewed, EventBus, FavoriteChanged, RecentSearchAdded, SlotCleared};
use crate::repositories::{CardRepository, RecentSearchRepository};
use crate::services::query_service::subscribe_store_events;

/// Per-card user actions: favorites, view tracking, recent searches.
pub struct CardService {
    card_repo: Arc<dyn CardRepository>,
    recent_search_repo: Arc<dyn RecentSearchRepository>,
    event_bus: Arc<EventBus>,
}

impl CardService {
    pub fn new(
        card_repo: Arc<dyn CardRepository>,
        recent_search_repo: Arc<dyn RecentSearchRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            card_repo,
            recent_search_repo,
            event_bus,
        }
    }

    pub fn card_details(&self, id: &str) -> AppResult<Card> {
        self.card_repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::NotFound(format!("card '{}' not found", id)))
    }

    /// Live view of a single card; None when the id is not in the store yet
    /// (it can appear after a later sync).
    pub fn watch_card(&self, id: &str) -> AppResult<watch::Receiver<Option<Card>>> {
        let (tx, rx) = watch::channel(self.card_repo.get_by_id(id)?);
        let card_repo = Arc::clone(&self.card_repo);
        let id = id.to_string();
        subscribe_store_events(&self.event_bus, tx, move || card_repo.get_by_id(&id));
        Ok(rx)
    }

    pub fn card_count(&self) -> AppResult<i64> {
        self.card_repo.count()
    }

    /// Flips the favorite flag and returns the new state. Unfavoriting a card
    /// that occupies a formation slot clears the slot in the same statement,
    /// so no observer can see a favorited-off card still assigned.
    pub fn toggle_favorite(&self, id: &str) -> AppResult<bool> {
        let card = self.card_details(id)?;

        if card.is_favorite {
            self.card_repo.unfavorite_and_clear_slot(id)?;
            self.event_bus
                .emit(FavoriteChanged::new(id.to_string(), false));
            if card.position_in_formation.is_some() {
                self.event_bus.emit(SlotCleared::new(id.to_string()));
            }
            Ok(false)
        } else {
            self.card_repo.set_favorite(id, true)?;
            self.event_bus
                .emit(FavoriteChanged::new(id.to_string(), true));
            Ok(true)
        }
    }

    /// Stamps the card as viewed now and returns the timestamp used.
    pub fn mark_viewed(&self, id: &str) -> AppResult<i64> {
        // Fail loudly on unknown ids rather than silently updating zero rows.
        self.card_details(id)?;
        let timestamp = Utc::now().timestamp_millis();
        self.card_repo.set_last_viewed(id, timestamp)?;
        self.event_bus
            .emit(CardViewed::new(id.to_string(), timestamp));
        Ok(timestamp)
    }

    /// Records a search query. Blank queries are ignored; repeats of an
    /// existing query just bump its recency.
    pub fn add_recent_search(&self, query: &str) -> AppResult<()> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            debug!("ignoring blank recent search");
            return Ok(());
        }
        let search = RecentSearch {
            query: trimmed.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        self.recent_search_repo.insert(&search)?;
        self.event_bus
            .emit(RecentSearchAdded::new(trimmed.to_string()));
        Ok(())
    }

    pub fn recent_searches(&self) -> AppResult<Vec<RecentSearch>> {
        self.recent_search_repo.recent()
    }

    pub fn delete_recent_search(&self, query: &str) -> AppResult<()> {
        self.recent_search_repo.delete_by_query(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};
    use crate::repositories::{SqliteCardRepository, SqliteRecentSearchRepository};

    fn card(season: &str, number: &str, name: &str, team: &str) -> Card {
        Card::from_catalog(Some(season), Some(number), Some(name), Some(team), None)
    }

    fn service_with(cards: &[Card]) -> (CardService, Arc<dyn CardRepository>) {
        let pool = create_test_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        let pool = Arc::new(pool);
        let card_repo: Arc<dyn CardRepository> =
            Arc::new(SqliteCardRepository::new(Arc::clone(&pool)));
        let search_repo = Arc::new(SqliteRecentSearchRepository::new(pool));
        card_repo.upsert_all(cards).unwrap();
        let service = CardService::new(
            Arc::clone(&card_repo),
            search_repo,
            Arc::new(EventBus::new()),
        );
        (service, card_repo)
    }

    #[test]
    fn test_toggle_favorite_flips_state() {
        let (service, repo) = service_with(&[card("2003-04", "6", "Thierry Henry", "Arsenal")]);

        assert!(service.toggle_favorite("2003-04-6").unwrap());
        assert!(repo.get_by_id("2003-04-6").unwrap().unwrap().is_favorite);

        assert!(!service.toggle_favorite("2003-04-6").unwrap());
        assert!(!repo.get_by_id("2003-04-6").unwrap().unwrap().is_favorite);
    }

    #[test]
    fn test_unfavorite_clears_formation_slot() {
        let (service, repo) = service_with(&[card("2003-04", "6", "Thierry Henry", "Arsenal")]);
        service.toggle_favorite("2003-04-6").unwrap();
        repo.set_position("2003-04-6", Some(9)).unwrap();

        service.toggle_favorite("2003-04-6").unwrap();

        let stored = repo.get_by_id("2003-04-6").unwrap().unwrap();
        assert!(!stored.is_favorite);
        assert_eq!(stored.position_in_formation, None);
    }

    #[test]
    fn test_toggle_favorite_unknown_card() {
        let (service, _) = service_with(&[]);
        assert!(matches!(
            service.toggle_favorite("missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_mark_viewed_stamps_timestamp() {
        let (service, repo) = service_with(&[card("WC2002", "184", "Ronaldo", "Brazil")]);

        let stamped = service.mark_viewed("WC2002-184").unwrap();

        let stored = repo.get_by_id("WC2002-184").unwrap().unwrap();
        assert_eq!(stored.last_viewed_timestamp, Some(stamped));
    }

    #[test]
    fn test_watch_card_tracks_favorite_changes() {
        let (service, _) = service_with(&[card("2003-04", "6", "Thierry Henry", "Arsenal")]);
        let rx = service.watch_card("2003-04-6").unwrap();
        assert!(!rx.borrow().as_ref().unwrap().is_favorite);

        service.toggle_favorite("2003-04-6").unwrap();
        assert!(rx.borrow().as_ref().unwrap().is_favorite);
    }

    #[test]
    fn test_watch_card_unknown_id_starts_none() {
        let (service, _) = service_with(&[]);
        let rx = service.watch_card("not-yet-synced").unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let (service, _) = service_with(&[]);
        service.add_recent_search("   ").unwrap();
        assert!(service.recent_searches().unwrap().is_empty());
    }

    #[test]
    fn test_search_is_trimmed_and_stored() {
        let (service, _) = service_with(&[]);
        service.add_recent_search("  henry ").unwrap();

        let searches = service.recent_searches().unwrap();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].query, "henry");
    }
}
