// src/services/query_service.rs
use std::collections::HashMap;
use std::sync::Arc;

use log::error;
use tokio::sync::watch;

use crate::domain::card::Card;
use crate::domain::shelves::{self, ShelfKind, CAROUSEL_SIZE};
use crate::error::AppResult;
use crate::events::{
    CardViewed, CatalogSynced, DomainEvent, EventBus, FavoriteChanged, SlotAssigned, SlotCleared,
};
use crate::repositories::{CardQuery, CardRepository};

/// Recently-viewed shelf keeps the latest N opened cards.
pub const RECENTLY_VIEWED_LIMIT: i64 = 20;

const SUGGESTION_LIMIT: i64 = 8;

/// One window of a query result, with enough bookkeeping to fetch the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPage {
    pub cards: Vec<Card>,
    pub offset: i64,
    /// Total rows matching the query, across all pages.
    pub total: i64,
    /// Offset to request the following window, `None` on the last page.
    pub next_offset: Option<i64>,
}

/// Read side of the card store: filtered pages, curated shelves, and live
/// variants of both that re-emit whenever the store changes.
pub struct QueryService {
    card_repo: Arc<dyn CardRepository>,
    event_bus: Arc<EventBus>,
}

impl QueryService {
    pub fn new(card_repo: Arc<dyn CardRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            card_repo,
            event_bus,
        }
    }

    pub fn page(&self, query: &CardQuery, offset: i64, limit: i64) -> AppResult<CardPage> {
        compute_page(self.card_repo.as_ref(), query, offset, limit)
    }

    /// Live variant of [`page`](Self::page). The receiver holds the current
    /// window and is refreshed before any mutating call returns, so readers
    /// never observe a stale page across a favorite toggle, slot change,
    /// view stamp, or catalog sync.
    pub fn watch_page(
        &self,
        query: CardQuery,
        offset: i64,
        limit: i64,
    ) -> AppResult<watch::Receiver<CardPage>> {
        let (tx, rx) = watch::channel(self.page(&query, offset, limit)?);
        let card_repo = Arc::clone(&self.card_repo);
        subscribe_store_events(&self.event_bus, tx, move || {
            compute_page(card_repo.as_ref(), &query, offset, limit)
        });
        Ok(rx)
    }

    pub fn favorites(&self) -> AppResult<Vec<Card>> {
        self.card_repo.favorites()
    }

    pub fn watch_favorites(&self) -> AppResult<watch::Receiver<Vec<Card>>> {
        let (tx, rx) = watch::channel(self.favorites()?);
        let card_repo = Arc::clone(&self.card_repo);
        subscribe_store_events(&self.event_bus, tx, move || card_repo.favorites());
        Ok(rx)
    }

    /// Cards for a curated shelf, restricted to the active mode's universe.
    /// The recently-viewed shelf is derived from view timestamps instead of
    /// a fixed id list.
    pub fn shelf(&self, kind: ShelfKind, wc2002_mode: bool) -> AppResult<Vec<Card>> {
        fetch_shelf(self.card_repo.as_ref(), kind, wc2002_mode)
    }

    pub fn watch_shelf(
        &self,
        kind: ShelfKind,
        wc2002_mode: bool,
    ) -> AppResult<watch::Receiver<Vec<Card>>> {
        let (tx, rx) = watch::channel(self.shelf(kind, wc2002_mode)?);
        let card_repo = Arc::clone(&self.card_repo);
        subscribe_store_events(&self.event_bus, tx, move || {
            fetch_shelf(card_repo.as_ref(), kind, wc2002_mode)
        });
        Ok(rx)
    }

    pub fn recently_viewed(&self, wc2002_mode: bool) -> AppResult<Vec<Card>> {
        self.card_repo
            .recently_viewed(wc2002_mode, RECENTLY_VIEWED_LIMIT)
    }

    pub fn watch_recently_viewed(
        &self,
        wc2002_mode: bool,
    ) -> AppResult<watch::Receiver<Vec<Card>>> {
        let (tx, rx) = watch::channel(self.recently_viewed(wc2002_mode)?);
        let card_repo = Arc::clone(&self.card_repo);
        subscribe_store_events(&self.event_bus, tx, move || {
            card_repo.recently_viewed(wc2002_mode, RECENTLY_VIEWED_LIMIT)
        });
        Ok(rx)
    }

    /// Headline strip on the home screen: the first [`CAROUSEL_SIZE`] ids of
    /// the featured shelf, in curated order. Ids the store has not synced
    /// yet are skipped rather than backfilled from later shelf positions.
    pub fn featured_carousel(&self, wc2002_mode: bool) -> AppResult<Vec<Card>> {
        let ids: Vec<String> = shelves::shelf_ids(ShelfKind::Featured, wc2002_mode)
            .unwrap_or(&[])
            .iter()
            .take(CAROUSEL_SIZE)
            .map(|id| id.to_string())
            .collect();
        let mut by_id: HashMap<String, Card> = self
            .card_repo
            .get_by_ids(&ids, wc2002_mode)?
            .into_iter()
            .map(|card| (card.id.clone(), card))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub fn team_filter_options(&self, wc2002_mode: bool) -> AppResult<Vec<String>> {
        self.card_repo.distinct_teams(wc2002_mode)
    }

    pub fn season_filter_options(&self, wc2002_mode: bool) -> AppResult<Vec<String>> {
        self.card_repo.distinct_seasons(wc2002_mode)
    }

    pub fn search_suggestions(&self, prefix: &str) -> AppResult<Vec<String>> {
        let trimmed = prefix.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        self.card_repo.search_suggestions(trimmed, SUGGESTION_LIMIT)
    }
}

fn compute_page(
    repo: &dyn CardRepository,
    query: &CardQuery,
    offset: i64,
    limit: i64,
) -> AppResult<CardPage> {
    let total = repo.query_count(query)?;
    // A degenerate window would otherwise report the same next_offset forever.
    if limit <= 0 {
        return Ok(CardPage {
            cards: Vec::new(),
            offset,
            total,
            next_offset: None,
        });
    }
    let cards = repo.query_page(query, offset, limit)?;
    let next_offset = if offset + (cards.len() as i64) < total {
        Some(offset + limit)
    } else {
        None
    };
    Ok(CardPage {
        cards,
        offset,
        total,
        next_offset,
    })
}

fn fetch_shelf(repo: &dyn CardRepository, kind: ShelfKind, wc2002_mode: bool) -> AppResult<Vec<Card>> {
    match shelves::shelf_ids(kind, wc2002_mode) {
        Some(ids) => {
            let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
            repo.get_by_ids(&ids, wc2002_mode)
        }
        None => repo.recently_viewed(wc2002_mode, RECENTLY_VIEWED_LIMIT),
    }
}

/// Wires a watch channel to every event that can change what a read
/// observes. Handlers run synchronously inside `emit`, which is what makes
/// the watch channels consistent with the store by the time a mutation
/// returns. Each handler is scoped to the channel: once every receiver is
/// gone the bus skips it and sweeps it out, so short-lived watchers do not
/// pile up over the app's lifetime.
pub(crate) fn subscribe_store_events<T, F>(event_bus: &EventBus, tx: watch::Sender<T>, recompute: F)
where
    T: Send + Sync + 'static,
    F: Fn() -> AppResult<T> + Send + Sync + Clone + 'static,
{
    subscribe_refresh::<CatalogSynced, _, _>(event_bus, &tx, recompute.clone());
    subscribe_refresh::<FavoriteChanged, _, _>(event_bus, &tx, recompute.clone());
    subscribe_refresh::<CardViewed, _, _>(event_bus, &tx, recompute.clone());
    subscribe_refresh::<SlotAssigned, _, _>(event_bus, &tx, recompute.clone());
    subscribe_refresh::<SlotCleared, _, _>(event_bus, &tx, recompute);
}

fn subscribe_refresh<E, T, F>(event_bus: &EventBus, tx: &watch::Sender<T>, recompute: F)
where
    E: DomainEvent + 'static,
    T: Send + Sync + 'static,
    F: Fn() -> AppResult<T> + Send + Sync + 'static,
{
    let sender = tx.clone();
    let gate = tx.clone();
    event_bus.subscribe_scoped::<E, _, _>(
        move |_| match recompute() {
            Ok(value) => {
                let _ = sender.send(value);
            }
            Err(e) => error!("live query refresh failed: {}", e),
        },
        // Sender clones do not keep the channel open; this turns false as
        // soon as the last receiver is dropped.
        move || !gate.is_closed(),
    );
}
