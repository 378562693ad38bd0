// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// CATALOG SYNC EVENTS
// ============================================================================

/// Emitted when a catalog sync completed and replaced store contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSynced {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Records in the remote response
    pub fetched: usize,
    /// Records that survived sanitization and were upserted
    pub mapped: usize,
}

impl CatalogSynced {
    pub fn new(fetched: usize, mapped: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            fetched,
            mapped,
        }
    }
}

impl DomainEvent for CatalogSynced {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CatalogSynced" }
}

// ============================================================================
// CARD USER-STATE EVENTS
// ============================================================================

/// Emitted when a card's favorite flag changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub card_id: String,
    pub is_favorite: bool,
}

impl FavoriteChanged {
    pub fn new(card_id: String, is_favorite: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            card_id,
            is_favorite,
        }
    }
}

impl DomainEvent for FavoriteChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FavoriteChanged" }
}

/// Emitted when a card detail view stamped the card as viewed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardViewed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub card_id: String,
    /// Epoch millis written to the row
    pub timestamp: i64,
}

impl CardViewed {
    pub fn new(card_id: String, timestamp: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            card_id,
            timestamp,
        }
    }
}

impl DomainEvent for CardViewed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CardViewed" }
}

// ============================================================================
// FORMATION EVENTS
// ============================================================================

/// Emitted after a card took a formation slot (any evicted occupant has
/// already been cleared when this fires)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssigned {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub card_id: String,
    pub slot: i64,
}

impl SlotAssigned {
    pub fn new(card_id: String, slot: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            card_id,
            slot,
        }
    }
}

impl DomainEvent for SlotAssigned {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SlotAssigned" }
}

/// Emitted when a card's slot was cleared (unassign or unfavorite)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub card_id: String,
}

impl SlotCleared {
    pub fn new(card_id: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            card_id,
        }
    }
}

impl DomainEvent for SlotCleared {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SlotCleared" }
}

// ============================================================================
// SEARCH EVENTS
// ============================================================================

/// Emitted when a search query was added to the recent-search history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentSearchAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub query: String,
}

impl RecentSearchAdded {
    pub fn new(query: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            query,
        }
    }
}

impl DomainEvent for RecentSearchAdded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "RecentSearchAdded" }
}

// ============================================================================
// SETTINGS EVENTS
// ============================================================================

/// Emitted when a persisted setting changed value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub key: String,
}

impl SettingChanged {
    pub fn new(key: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            key,
        }
    }
}

impl DomainEvent for SettingChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SettingChanged" }
}
