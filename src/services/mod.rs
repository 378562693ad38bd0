// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod card_service;
pub mod catalog_sync_service;
pub mod query_service;
pub mod formation_service;
pub mod settings_service;
pub mod sync_scheduler;

#[cfg(test)]
mod sync_scheduler_tests;

// Re-export all services and their types
pub use card_service::{
    CardService,
};

pub use catalog_sync_service::{
    CatalogSyncService,
    SyncReport,
};

pub use query_service::{
    QueryService,
    CardPage,
};

pub use formation_service::{
    FormationService,
    Lineup,
};

pub use settings_service::{
    SettingsService,
    AppSettings,
};

pub use sync_scheduler::{
    SyncScheduler,
    JobState,
    RetryPolicy,
    INITIAL_SYNC_JOB,
};
