use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{keys, new_id, Identity, ProfileSeed, User};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::watch;

use super::{IdentityError, IdentityProvider};
use crate::storage::Store;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalAccount {
    uid: String,
    email: String,
    salt: String,
    password_hash: String,
    #[serde(default)]
    profile: Option<User>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountBook {
    /// Keyed by normalized email
    accounts: BTreeMap<String, LocalAccount>,
    signed_in: Option<String>,
}

impl AccountBook {
    fn identity_of(&self, email_key: &str) -> Option<Identity> {
        self.accounts.get(email_key).map(|account| Identity {
            uid: account.uid.clone(),
            email: account.email.clone(),
        })
    }

    fn by_uid_mut(&mut self, uid: &str) -> Option<&mut LocalAccount> {
        self.accounts.values_mut().find(|a| a.uid == uid)
    }
}

/// Identity provider that keeps accounts on the device, under the accounts
/// storage key. Stands in for a hosted auth service.
pub struct LocalIdentityProvider {
    store: Store,
    state: watch::Sender<Option<Identity>>,
    startup_delay: Duration,
}

impl LocalIdentityProvider {
    pub fn new(store: Store, startup_delay: Duration) -> Self {
        let book: AccountBook = store.load(keys::ACCOUNTS, &AccountBook::default());
        let restored = book
            .signed_in
            .as_deref()
            .and_then(|email_key| book.identity_of(email_key));
        if let Some(identity) = &restored {
            tracing::info!("Restored signed-in account {}", identity.email);
        }

        let (state, _) = watch::channel(restored);
        Self {
            store,
            state,
            startup_delay,
        }
    }

    fn book(&self) -> AccountBook {
        self.store.load(keys::ACCOUNTS, &AccountBook::default())
    }

    fn persist(&self, book: &AccountBook) -> Result<(), IdentityError> {
        if self.store.save(keys::ACCOUNTS, book) {
            Ok(())
        } else {
            Err(IdentityError::Unavailable(
                "account data could not be written".to_string(),
            ))
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn ready(&self) -> Result<(), IdentityError> {
        if !self.startup_delay.is_zero() {
            tokio::time::sleep(self.startup_delay).await;
        }
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        seed: &ProfileSeed,
    ) -> Result<Identity, IdentityError> {
        let email_key = normalize_email(email);
        let mut book = self.book();
        if book.accounts.contains_key(&email_key) {
            return Err(IdentityError::AccountExists(email_key));
        }

        let salt = new_id();
        let account = LocalAccount {
            uid: new_id(),
            email: email.trim().to_string(),
            password_hash: hash_password(&salt, password),
            salt,
            profile: Some(User {
                name: seed.name.clone(),
                email: email.trim().to_string(),
                budget: seed.budget,
                currency: seed.currency,
                notifications: true,
                phone: None,
                avatar: None,
            }),
        };
        book.accounts.insert(email_key.clone(), account);
        book.signed_in = Some(email_key.clone());
        self.persist(&book)?;

        let identity = book.identity_of(&email_key).ok_or(IdentityError::NotSignedIn)?;
        tracing::info!("Created local account {}", identity.email);
        self.state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email_key = normalize_email(email);
        let mut book = self.book();

        let valid = book
            .accounts
            .get(&email_key)
            .map(|account| account.password_hash == hash_password(&account.salt, password))
            .unwrap_or(false);
        if !valid {
            tracing::info!("Rejected sign-in for {}", email_key);
            return Err(IdentityError::InvalidCredentials);
        }

        book.signed_in = Some(email_key.clone());
        self.persist(&book)?;

        let identity = book.identity_of(&email_key).ok_or(IdentityError::NotSignedIn)?;
        self.state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let mut book = self.book();
        if book.signed_in.take().is_some() {
            self.persist(&book)?;
        }
        self.state.send_replace(None);
        Ok(())
    }

    fn on_auth_state_changed(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    async fn save_profile(&self, uid: &str, profile: &User) -> Result<(), IdentityError> {
        let mut book = self.book();
        let account = book.by_uid_mut(uid).ok_or(IdentityError::NotSignedIn)?;
        account.profile = Some(profile.clone());
        self.persist(&book)
    }

    async fn fetch_profile(&self, uid: &str) -> Result<Option<User>, IdentityError> {
        let book = self.book();
        Ok(book
            .accounts
            .values()
            .find(|account| account.uid == uid)
            .and_then(|account| account.profile.clone()))
    }
}
