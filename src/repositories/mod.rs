// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod card_repository;
pub mod recent_search_repository;
pub mod settings_repository;

pub use card_repository::{CardQuery, CardRepository, CardUserState, SqliteCardRepository};
pub use recent_search_repository::{RecentSearchRepository, SqliteRecentSearchRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
