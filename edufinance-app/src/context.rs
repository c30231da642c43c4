use analytics::AverageMode;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::storage::Store;
use crate::sync::{PageKind, SyncBus, SyncKind};
use crate::toast::Toaster;

/// Knobs read by the page controllers
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub readiness_timeout: Duration,
    pub seed_demo_data: bool,
    pub seed_days: u32,
    pub average_mode: AverageMode,
    pub reminder_window_days: i64,
    pub recent_limit: usize,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PageSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            readiness_timeout: config.readiness_timeout(),
            seed_demo_data: config.dashboard.seed_demo_data,
            seed_days: config.dashboard.seed_days,
            average_mode: config.dashboard.average_daily,
            reminder_window_days: config.dashboard.reminder_window_days,
            recent_limit: config.dashboard.recent_limit,
        }
    }
}

/// Everything a page controller depends on, passed in explicitly.
///
/// One context corresponds to one document: controllers built from the same
/// context share the sync bus and toast slot. [`AppContext::open_tab`] gives
/// a second document on the same storage.
#[derive(Clone)]
pub struct AppContext {
    pub store: Store,
    pub bus: SyncBus,
    pub identity: Arc<dyn IdentityProvider>,
    pub clock: Arc<dyn Clock>,
    pub toaster: Toaster,
    pub settings: Arc<PageSettings>,
}

impl AppContext {
    pub fn new(
        store: Store,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
        toast_duration: Duration,
        settings: PageSettings,
    ) -> Self {
        Self {
            store,
            bus: SyncBus::new(),
            identity,
            clock,
            toaster: Toaster::new(toast_duration),
            settings: Arc::new(settings),
        }
    }

    /// A separate document sharing storage and identity but with its own
    /// bus and toasts
    pub fn open_tab(&self) -> AppContext {
        Self {
            store: self.store.open_tab(),
            bus: SyncBus::new(),
            identity: self.identity.clone(),
            clock: self.clock.clone(),
            toaster: Toaster::new(self.toaster.duration()),
            settings: self.settings.clone(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn emit(&self, kind: SyncKind, source: PageKind) -> usize {
        self.bus.emit(kind, source)
    }
}
