//! External identity/profile provider
//!
//! The core only needs an opaque identity and an optional remote copy of the
//! profile. Readiness is awaited with a bound so pages never hang on a slow
//! or missing provider; they fall back to local-only data instead.

pub mod local;

pub use local::LocalIdentityProvider;

use async_trait::async_trait;
use shared_types::{Identity, ProfileSeed, User};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    AccountExists(String),

    #[error("Not signed in")]
    NotSignedIn,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves once the provider has finished initializing
    async fn ready(&self) -> Result<(), IdentityError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        seed: &ProfileSeed,
    ) -> Result<Identity, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Current identity, updated on every sign-in/out
    fn on_auth_state_changed(&self) -> watch::Receiver<Option<Identity>>;

    /// Mirror the local profile to the remote profile document of `uid`
    async fn save_profile(&self, uid: &str, profile: &User) -> Result<(), IdentityError>;

    async fn fetch_profile(&self, uid: &str) -> Result<Option<User>, IdentityError>;

    fn current_identity(&self) -> Option<Identity> {
        self.on_auth_state_changed().borrow().clone()
    }
}

/// Outcome of waiting for the provider
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    Ready(Option<Identity>),
    /// Provider failed or timed out; carry on with local data and show the
    /// warning
    Degraded(String),
}

pub async fn await_readiness(provider: &dyn IdentityProvider, timeout: Duration) -> Readiness {
    match tokio::time::timeout(timeout, provider.ready()).await {
        Ok(Ok(())) => Readiness::Ready(provider.current_identity()),
        Ok(Err(e)) => {
            tracing::warn!("Identity provider failed to start: {}", e);
            Readiness::Degraded(format!("Working offline: {e}"))
        }
        Err(_) => {
            tracing::warn!(
                "Identity provider not ready after {}ms, continuing in local-only mode",
                timeout.as_millis()
            );
            Readiness::Degraded(
                "Working offline: account services did not respond, changes stay on this device"
                    .to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubIdentity, StubMode};

    #[tokio::test(start_paused = true)]
    async fn test_ready_provider_reports_identity() {
        let provider = StubIdentity::new(StubMode::Ready);
        provider.set_identity(Some(Identity {
            uid: "u1".to_string(),
            email: "a@b.co".to_string(),
        }));

        let readiness = await_readiness(&provider, Duration::from_secs(3)).await;
        assert!(matches!(readiness, Readiness::Ready(Some(ref id)) if id.uid == "u1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out_to_degraded() {
        let provider = StubIdentity::new(StubMode::Hang);
        let readiness = await_readiness(&provider, Duration::from_millis(500)).await;
        assert!(matches!(readiness, Readiness::Degraded(_)));
    }

    #[tokio::test]
    async fn test_failing_provider_is_degraded() {
        let provider = StubIdentity::new(StubMode::Fail);
        match await_readiness(&provider, Duration::from_secs(1)).await {
            Readiness::Degraded(warning) => assert!(warning.contains("offline")),
            other => panic!("expected degraded, got {other:?}"),
        }
    }
}
