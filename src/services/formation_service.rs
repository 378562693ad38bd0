// src/services/formation_service.rs
use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

use crate::domain::card::Card;
use crate::domain::{DomainError, Formation};
use crate::error::AppResult;
use crate::events::{EventBus, SlotAssigned, SlotCleared};
use crate::repositories::CardRepository;
use crate::services::query_service::subscribe_store_events;

/// The user's starting XI plus the favorites still on the bench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineup {
    /// Slot index to the card occupying it.
    pub assigned: HashMap<i64, Card>,
    /// Favorited cards without a slot, in favorites order.
    pub available: Vec<Card>,
}

/// Places favorited cards into formation slots. A slot holds at most one
/// card; assigning over an occupied slot evicts the occupant back to the
/// bench rather than failing.
pub struct FormationService {
    card_repo: Arc<dyn CardRepository>,
    event_bus: Arc<EventBus>,
}

impl FormationService {
    pub fn new(card_repo: Arc<dyn CardRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            card_repo,
            event_bus,
        }
    }

    pub fn lineup(&self) -> AppResult<Lineup> {
        build_lineup(self.card_repo.as_ref())
    }

    /// Live lineup, refreshed before any mutating call returns.
    pub fn watch_lineup(&self) -> AppResult<watch::Receiver<Lineup>> {
        let (tx, rx) = watch::channel(self.lineup()?);
        let card_repo = Arc::clone(&self.card_repo);
        subscribe_store_events(&self.event_bus, tx, move || build_lineup(card_repo.as_ref()));
        Ok(rx)
    }

    /// Puts a favorited card into `slot` of the given shape. If another card
    /// holds the slot it is evicted first; if the card itself was in a
    /// different slot it simply moves. Events fire only after both writes so
    /// no observer sees the half-finished swap.
    pub fn assign(&self, card_id: &str, slot: i64, shape: Formation) -> AppResult<()> {
        let card = self
            .card_repo
            .get_by_id(card_id)?
            .ok_or_else(|| DomainError::CardNotFound(card_id.to_string()))?;
        if !card.is_favorite {
            return Err(DomainError::NotFavorited(card_id.to_string()).into());
        }
        let slot_count = shape.slot_count();
        if slot < 0 || slot >= slot_count {
            return Err(DomainError::SlotOutOfRange { slot, slot_count }.into());
        }

        let lineup = self.lineup()?;
        let evicted = match lineup.assigned.get(&slot) {
            Some(occupant) if occupant.id != card_id => {
                debug!("evicting '{}' from slot {}", occupant.id, slot);
                self.card_repo.set_position(&occupant.id, None)?;
                Some(occupant.id.clone())
            }
            _ => None,
        };
        self.card_repo.set_position(card_id, Some(slot))?;

        if let Some(evicted_id) = evicted {
            self.event_bus.emit(SlotCleared::new(evicted_id));
        }
        self.event_bus
            .emit(SlotAssigned::new(card_id.to_string(), slot));
        Ok(())
    }

    /// Removes a card from its slot. A card without a slot is a no-op.
    pub fn unassign(&self, card_id: &str) -> AppResult<()> {
        let card = self
            .card_repo
            .get_by_id(card_id)?
            .ok_or_else(|| DomainError::CardNotFound(card_id.to_string()))?;
        if card.position_in_formation.is_none() {
            return Ok(());
        }
        self.card_repo.set_position(card_id, None)?;
        self.event_bus.emit(SlotCleared::new(card_id.to_string()));
        Ok(())
    }

    /// Slots holding a card that the given shape does not have. Switching
    /// from a wider shape can strand assignments; they are reported here but
    /// never silently cleared, so switching back restores them.
    pub fn orphaned_slots(&self, shape: Formation) -> AppResult<Vec<(i64, Card)>> {
        let lineup = self.lineup()?;
        let slot_count = shape.slot_count();
        let mut orphaned: Vec<(i64, Card)> = lineup
            .assigned
            .into_iter()
            .filter(|(slot, _)| *slot < 0 || *slot >= slot_count)
            .collect();
        orphaned.sort_by_key(|(slot, _)| *slot);
        Ok(orphaned)
    }
}

fn build_lineup(repo: &dyn CardRepository) -> AppResult<Lineup> {
    let favorites = repo.favorites()?;
    let mut assigned = HashMap::new();
    let mut available = Vec::new();
    for card in favorites {
        match card.position_in_formation {
            Some(slot) => {
                assigned.insert(slot, card);
            }
            None => available.push(card),
        }
    }
    Ok(Lineup {
        assigned,
        available,
    })
}
