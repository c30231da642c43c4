//! Shared fixtures for controller and identity tests

use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::{Identity, ProfileSeed, User};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::clock::FixedClock;
use crate::context::{AppContext, PageSettings};
use crate::identity::{IdentityError, IdentityProvider};
use crate::storage::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Ready,
    /// `ready()` never resolves
    Hang,
    /// Every call reports the service as unavailable
    Fail,
}

pub struct StubIdentity {
    mode: StubMode,
    state: watch::Sender<Option<Identity>>,
    profiles: Mutex<HashMap<String, User>>,
}

impl StubIdentity {
    pub fn new(mode: StubMode) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            mode,
            state,
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        self.state.send_replace(identity);
    }

    pub fn remote_profile(&self, uid: &str) -> Option<User> {
        self.profiles.lock().unwrap().get(uid).cloned()
    }

    async fn gate(&self) -> Result<(), IdentityError> {
        match self.mode {
            StubMode::Ready => Ok(()),
            StubMode::Hang => std::future::pending().await,
            StubMode::Fail => Err(IdentityError::Unavailable("stub offline".to_string())),
        }
    }

    fn identity_for(email: &str) -> Identity {
        Identity {
            uid: format!("uid-{}", email.trim().to_lowercase()),
            email: email.trim().to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn ready(&self) -> Result<(), IdentityError> {
        self.gate().await
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        seed: &ProfileSeed,
    ) -> Result<Identity, IdentityError> {
        self.gate().await?;
        let identity = Self::identity_for(email);
        let mut profile = shared_types::defaults::default_user();
        profile.name = seed.name.clone();
        profile.email = identity.email.clone();
        profile.budget = seed.budget;
        profile.currency = seed.currency;
        self.profiles.lock().unwrap().insert(identity.uid.clone(), profile);
        self.set_identity(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.gate().await?;
        if password.starts_with("wrong") {
            return Err(IdentityError::InvalidCredentials);
        }
        let identity = Self::identity_for(email);
        self.set_identity(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.set_identity(None);
        Ok(())
    }

    fn on_auth_state_changed(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    async fn save_profile(&self, uid: &str, profile: &User) -> Result<(), IdentityError> {
        self.gate().await?;
        self.profiles.lock().unwrap().insert(uid.to_string(), profile.clone());
        Ok(())
    }

    async fn fetch_profile(&self, uid: &str) -> Result<Option<User>, IdentityError> {
        self.gate().await?;
        Ok(self.remote_profile(uid))
    }
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Settings with seeding off so tests start from empty storage
pub fn quiet_settings() -> PageSettings {
    PageSettings {
        readiness_timeout: Duration::from_millis(500),
        seed_demo_data: false,
        ..PageSettings::default()
    }
}

pub fn context_with(
    identity: Arc<StubIdentity>,
    today: NaiveDate,
    settings: PageSettings,
) -> AppContext {
    AppContext::new(
        Store::in_memory(),
        identity,
        Arc::new(FixedClock { today }),
        Duration::from_millis(3000),
        settings,
    )
}

/// In-memory context with a ready stub provider and a fixed day
pub fn test_context(today: NaiveDate) -> AppContext {
    context_with(Arc::new(StubIdentity::new(StubMode::Ready)), today, quiet_settings())
}
