// src/services/settings_service.rs
use std::sync::Arc;

use log::error;
use tokio::sync::watch;

use crate::domain::SortOrder;
use crate::error::AppResult;
use crate::events::{EventBus, SettingChanged};
use crate::repositories::SettingsRepository;

pub const KEY_DARK_THEME: &str = "is_dark_theme";
pub const KEY_DYNAMIC_COLOR: &str = "use_dynamic_color";
pub const KEY_WC2002_MODE: &str = "is_wc2002_mode";
pub const KEY_DEFAULT_SORT_ORDER: &str = "default_sort_order";

/// User preferences as one snapshot. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub is_dark_theme: bool,
    pub use_dynamic_color: bool,
    pub is_wc2002_mode: bool,
    pub default_sort_order: SortOrder,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            is_dark_theme: false,
            use_dynamic_color: true,
            is_wc2002_mode: false,
            default_sort_order: SortOrder::default(),
        }
    }
}

pub struct SettingsService {
    settings_repo: Arc<dyn SettingsRepository>,
    event_bus: Arc<EventBus>,
}

impl SettingsService {
    pub fn new(settings_repo: Arc<dyn SettingsRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            settings_repo,
            event_bus,
        }
    }

    pub fn settings(&self) -> AppResult<AppSettings> {
        load_settings(self.settings_repo.as_ref())
    }

    pub fn set_dark_theme(&self, enabled: bool) -> AppResult<()> {
        self.set_bool(KEY_DARK_THEME, enabled)
    }

    pub fn set_dynamic_color(&self, enabled: bool) -> AppResult<()> {
        self.set_bool(KEY_DYNAMIC_COLOR, enabled)
    }

    pub fn set_wc2002_mode(&self, enabled: bool) -> AppResult<()> {
        self.set_bool(KEY_WC2002_MODE, enabled)
    }

    pub fn set_default_sort_order(&self, order: SortOrder) -> AppResult<()> {
        self.settings_repo
            .set(KEY_DEFAULT_SORT_ORDER, order.settings_key())?;
        self.event_bus
            .emit(SettingChanged::new(KEY_DEFAULT_SORT_ORDER.to_string()));
        Ok(())
    }

    /// Snapshot stream that re-emits after every setting write.
    pub fn watch_settings(&self) -> AppResult<watch::Receiver<AppSettings>> {
        let (tx, rx) = watch::channel(self.settings()?);
        let settings_repo = Arc::clone(&self.settings_repo);
        let gate = tx.clone();
        self.event_bus.subscribe_scoped::<SettingChanged, _, _>(
            move |_| match load_settings(settings_repo.as_ref()) {
                Ok(snapshot) => {
                    let _ = tx.send(snapshot);
                }
                Err(e) => error!("settings refresh failed: {}", e),
            },
            move || !gate.is_closed(),
        );
        Ok(rx)
    }

    fn set_bool(&self, key: &str, enabled: bool) -> AppResult<()> {
        self.settings_repo
            .set(key, if enabled { "true" } else { "false" })?;
        self.event_bus.emit(SettingChanged::new(key.to_string()));
        Ok(())
    }
}

fn load_settings(repo: &dyn SettingsRepository) -> AppResult<AppSettings> {
    let defaults = AppSettings::default();
    Ok(AppSettings {
        is_dark_theme: read_bool(repo, KEY_DARK_THEME, defaults.is_dark_theme)?,
        use_dynamic_color: read_bool(repo, KEY_DYNAMIC_COLOR, defaults.use_dynamic_color)?,
        is_wc2002_mode: read_bool(repo, KEY_WC2002_MODE, defaults.is_wc2002_mode)?,
        default_sort_order: match repo.get(KEY_DEFAULT_SORT_ORDER)? {
            Some(key) => SortOrder::from_settings_key(&key),
            None => defaults.default_sort_order,
        },
    })
}

fn read_bool(repo: &dyn SettingsRepository, key: &str, default: bool) -> AppResult<bool> {
    Ok(match repo.get(key)?.as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    })
}
