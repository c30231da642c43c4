//! Page controllers
//!
//! Each page owns an in-memory copy of the entities it shows, loaded from the
//! [`Store`](crate::storage::Store). A [`Mount`] drives the page lifecycle:
//! wait for the identity provider (bounded), subscribe to the in-tab sync bus
//! and to cross-tab storage events, load, then reload whenever another page
//! or tab changes a key the page reads.

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod expense_ops;
pub mod expenses;
pub mod profile;
pub mod shell;
pub mod split;
pub mod tips;

pub use analysis::AnalysisPage;
pub use auth::AuthPage;
pub use dashboard::DashboardPage;
pub use expenses::ExpensesPage;
pub use profile::ProfilePage;
pub use shell::ShellPage;
pub use split::SplitPage;
pub use tips::TipsPage;

use shared_types::{keys, Identity, Theme};
use std::ops::{Deref, DerefMut};
use tokio::sync::broadcast;

use crate::context::AppContext;
use crate::identity::{await_readiness, Readiness};
use crate::storage::StorageSubscription;
use crate::sync::{drain, PageKind, SyncEvent, SyncKind};

pub trait Page {
    const KIND: PageKind;

    /// Storage keys this page reads in [`Page::load`]
    const WATCHED_KEYS: &'static [&'static str];

    fn context(&self) -> &AppContext;

    /// Re-read everything from the store
    fn load(&mut self);

    /// Write first-run data. Called once per mount, before the first load,
    /// and never on reloads.
    fn seed(&mut self) {}

    fn reloads_on(kind: SyncKind) -> bool {
        kind.keys().iter().any(|key| Self::WATCHED_KEYS.contains(key))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MountState {
    Uninitialized,
    Loading,
    Ready { identity: Option<Identity> },
    /// Identity provider failed or timed out; running on local data only
    Degraded { warning: String },
    Unmounted,
}

pub struct Mount<P: Page> {
    page: P,
    state: MountState,
    theme: Theme,
    sync_events: Option<broadcast::Receiver<SyncEvent>>,
    storage_events: Option<StorageSubscription>,
}

impl<P: Page> Mount<P> {
    pub fn new(page: P) -> Self {
        Self {
            page,
            state: MountState::Uninitialized,
            theme: Theme::default(),
            sync_events: None,
            storage_events: None,
        }
    }

    pub async fn init(&mut self) -> &MountState {
        self.state = MountState::Loading;
        let ctx = self.page.context().clone();

        // Subscribe before loading so no change slips between the two
        self.sync_events = Some(ctx.bus.subscribe());
        self.storage_events = Some(ctx.store.subscribe());

        let readiness =
            await_readiness(ctx.identity.as_ref(), ctx.settings.readiness_timeout).await;

        self.theme = ctx.store.load(keys::THEME, &Theme::default());
        self.page.seed();
        self.page.load();

        self.state = match readiness {
            Readiness::Ready(identity) => MountState::Ready { identity },
            Readiness::Degraded(warning) => {
                ctx.toaster.warning(warning.clone());
                MountState::Degraded { warning }
            }
        };
        tracing::debug!("{:?} page mounted: {:?}", P::KIND, self.state);
        &self.state
    }

    /// Handle pending sync and storage events. Reloads the page at most once
    /// and returns whether it did.
    pub fn pump(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }

        let mut reload = false;
        let mut theme_changed = false;

        if let Some(receiver) = self.sync_events.as_mut() {
            let (events, lagged) = drain(receiver);
            reload |= lagged;
            for event in events.into_iter().filter(|e| e.source != P::KIND) {
                theme_changed |= event.kind.keys().contains(&keys::THEME);
                reload |= P::reloads_on(event.kind);
            }
        }

        if let Some(subscription) = self.storage_events.as_mut() {
            let (events, lagged) = subscription.drain();
            reload |= lagged;
            for event in events {
                theme_changed |= event.key == keys::THEME;
                reload |= P::WATCHED_KEYS.iter().any(|key| *key == event.key);
            }
        }

        if theme_changed || reload {
            self.theme = self.page.context().store.load(keys::THEME, &Theme::default());
        }
        if reload {
            tracing::debug!("Reloading {:?} page after external change", P::KIND);
            self.page.load();
        }
        reload
    }

    pub fn teardown(&mut self) {
        self.sync_events = None;
        self.storage_events = None;
        self.page.context().toaster.dismiss();
        self.state = MountState::Unmounted;
    }

    pub fn state(&self) -> &MountState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, MountState::Ready { .. } | MountState::Degraded { .. })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }
}

impl<P: Page> Deref for Mount<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.page
    }
}

impl<P: Page> DerefMut for Mount<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.page
    }
}
