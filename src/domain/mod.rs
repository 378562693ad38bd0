// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod card;
pub mod formation;
pub mod recent_search;
pub mod shelves;
pub mod sort_order;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card Domain
pub use card::{card_id, validate_card, Card, WC2002_SEASON};

// Sorting
pub use sort_order::SortOrder;

// Formation (starting XI)
pub use formation::{Formation, FormationRow};

// Recent searches
pub use recent_search::RecentSearch;

// Curated shelves
pub use shelves::{shelf_ids, ShelfKind};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card {0} is not favorited and cannot be placed in the formation")]
    NotFavorited(String),

    #[error("Slot {slot} is outside the valid range 0..{slot_count}")]
    SlotOutOfRange { slot: i64, slot_count: i64 },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
