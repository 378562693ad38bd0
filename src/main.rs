// src/main.rs
use std::sync::Arc;

use log::info;

use cardhub::db::{create_connection_pool, get_database_stats, initialize_database};
use cardhub::events::EventBus;
use cardhub::integrations::catalog::CatalogClient;
use cardhub::repositories::*;
use cardhub::services::*;

const DEFAULT_CATALOG_URL: &str = "https://plcards.app";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. INFRASTRUCTURE
    let event_bus = Arc::new(EventBus::new());
    let pool = Arc::new(create_connection_pool()?);
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }

    let catalog_url =
        std::env::var("CARDHUB_CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());
    let catalog_client = Arc::new(CatalogClient::new(catalog_url)?);

    // 2. REPOSITORIES
    let card_repo: Arc<dyn CardRepository> = Arc::new(SqliteCardRepository::new(pool.clone()));
    let settings_repo: Arc<dyn SettingsRepository> =
        Arc::new(SqliteSettingsRepository::new(pool.clone()));

    // 3. SERVICES
    let sync_service = Arc::new(CatalogSyncService::new(
        card_repo.clone(),
        catalog_client,
        event_bus.clone(),
    ));
    let query_service = Arc::new(QueryService::new(card_repo.clone(), event_bus.clone()));
    let settings_service = Arc::new(SettingsService::new(settings_repo, event_bus.clone()));
    let scheduler = SyncScheduler::new(sync_service);

    // 4. STARTUP SYNC
    info!("enqueueing startup catalog sync");
    let mut sync_rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, RetryPolicy::default());
    loop {
        let state = sync_rx.borrow().clone();
        if state.is_terminal() {
            info!("startup sync finished: {:?}", state);
            break;
        }
        sync_rx.changed().await?;
    }

    let settings = settings_service.settings()?;
    {
        let conn = pool.get()?;
        let stats = get_database_stats(&conn)?;
        info!(
            "store ready: {} cards ({} favorites), {} recent searches",
            stats.card_count, stats.favorite_count, stats.recent_search_count
        );
    }

    let featured = query_service.featured_carousel(settings.is_wc2002_mode)?;
    for card in &featured {
        info!("featured: {} ({}, {})", card.player_name, card.team, card.season);
    }

    Ok(())
}
