// src/lib.rs
// CardHub - Local-first football trading card collection manager
//
// Architecture:
// - Domain-centric: All business rules live in domain
// - Event-driven: Services coordinate through events
// - Explicit: No implicit behavior, no magic
// - Local-first: The SQLite store is the single source of truth;
//   the remote catalog is merged into it, never the other way around

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// EXTERNAL INTEGRATIONS
// ============================================================================

pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    card_id,
    shelf_ids,
    validate_card,
    // Card
    Card,
    DomainError,
    DomainResult,
    // Formation
    Formation,
    FormationRow,
    // Recent searches
    RecentSearch,
    // Shelves
    ShelfKind,
    // Sorting
    SortOrder,
    WC2002_SEASON,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    CardViewed,
    CatalogSynced,
    DomainEvent,
    EventBus,
    FavoriteChanged,
    RecentSearchAdded,
    SettingChanged,
    SlotAssigned,
    SlotCleared,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AppSettings,
    CardPage,
    CardService,
    CatalogSyncService,
    FormationService,
    JobState,
    Lineup,
    QueryService,
    RetryPolicy,
    SettingsService,
    SyncReport,
    SyncScheduler,
    INITIAL_SYNC_JOB,
};
