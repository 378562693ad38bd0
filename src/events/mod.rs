// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};

pub use types::DomainEvent;

pub use types::{
    // Catalog sync
    CatalogSynced,
    // Card user state
    CardViewed,
    FavoriteChanged,
    // Formation
    SlotAssigned,
    SlotCleared,
    // Search
    RecentSearchAdded,
    // Settings
    SettingChanged,
};
