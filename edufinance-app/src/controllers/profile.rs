use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use shared_types::{defaults, keys, UpdateProfileRequest, User, ValidationError};
use std::path::Path;

use super::Page;
use crate::context::AppContext;
use crate::sync::{PageKind, SyncKind};

/// Larger images would eat most of the storage quota
pub const MAX_AVATAR_BYTES: usize = 256 * 1024;

pub struct ProfilePage {
    ctx: AppContext,
    pub user: User,
}

impl ProfilePage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user: defaults::default_user(),
        }
    }

    /// Validate and apply an edit, save it locally, then mirror it to the
    /// remote profile when someone is signed in. Returns whether the local
    /// save succeeded.
    pub async fn update(&mut self, update: UpdateProfileRequest) -> Result<bool, ValidationError> {
        let mut edited = self.user.clone();
        edited.apply(update)?;
        self.user = edited;

        let saved = self.ctx.store.save(keys::USER, &self.user);
        if !saved {
            self.ctx
                .toaster
                .warning("Profile updated for now, but it could not be saved on this device");
            return Ok(false);
        }
        self.ctx.emit(SyncKind::UserUpdated, Self::KIND);

        if self.mirror().await {
            self.ctx.toaster.success("Profile updated");
        }
        Ok(true)
    }

    async fn mirror(&self) -> bool {
        let Some(identity) = self.ctx.identity.current_identity() else {
            return true;
        };

        let call = self.ctx.identity.save_profile(&identity.uid, &self.user);
        match tokio::time::timeout(self.ctx.settings.readiness_timeout, call).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!("Failed to mirror profile of {}: {}", identity.uid, e);
                self.ctx
                    .toaster
                    .warning("Profile saved on this device only: account sync failed");
                false
            }
            Err(_) => {
                tracing::warn!("Timed out mirroring profile of {}", identity.uid);
                self.ctx
                    .toaster
                    .warning("Profile saved on this device only: account sync timed out");
                false
            }
        }
    }

    /// Replace the local profile with the remote copy when they differ.
    /// Returns whether anything changed.
    pub async fn sync_from_remote(&mut self) -> bool {
        let Some(identity) = self.ctx.identity.current_identity() else {
            return false;
        };

        let call = self.ctx.identity.fetch_profile(&identity.uid);
        let remote = match tokio::time::timeout(self.ctx.settings.readiness_timeout, call).await {
            Ok(Ok(Some(remote))) => remote,
            Ok(Ok(None)) => return false,
            Ok(Err(e)) => {
                tracing::warn!("Failed to fetch remote profile: {}", e);
                return false;
            }
            Err(_) => {
                tracing::warn!("Timed out fetching remote profile");
                return false;
            }
        };

        if remote == self.user {
            return false;
        }
        self.user = remote;
        if self.ctx.store.save(keys::USER, &self.user) {
            self.ctx.emit(SyncKind::UserUpdated, Self::KIND);
        }
        true
    }

    /// Remove every stored key except local accounts, then reload defaults.
    /// Returns how many keys were removed.
    pub fn clear_all_data(&mut self) -> usize {
        let mut removed = 0;
        for key in keys::ALL.iter().filter(|k| **k != keys::ACCOUNTS) {
            if self.ctx.store.contains(key) {
                self.ctx.store.remove(key);
                removed += 1;
            }
        }
        tracing::info!("Cleared {} stored keys", removed);

        self.load();
        self.ctx.emit(SyncKind::DataCleared, Self::KIND);
        self.ctx.toaster.success("All data cleared");
        removed
    }
}

/// `data:` URI for an avatar image, or `None` when the file type is not an
/// image we know or the file is too large
pub fn avatar_data_uri(bytes: &[u8], file_name: &str) -> Option<String> {
    if bytes.is_empty() || bytes.len() > MAX_AVATAR_BYTES {
        return None;
    }

    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };

    Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

impl Page for ProfilePage {
    const KIND: PageKind = PageKind::Profile;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::USER];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn load(&mut self) {
        self.user = self.ctx.store.load(keys::USER, &defaults::default_user());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityProvider;
    use crate::test_support::{context_with, day, quiet_settings, test_context, StubIdentity, StubMode};
    use shared_types::{Currency, Identity};
    use std::sync::Arc;

    fn identity() -> Identity {
        Identity {
            uid: "u1".to_string(),
            email: "liya@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_negative_budget_rejected_without_changes() {
        let ctx = test_context(day("2025-11-20"));
        let mut page = ProfilePage::new(ctx.clone());
        page.load();

        let result = page
            .update(UpdateProfileRequest {
                name: Some("Changed".to_string()),
                budget: Some(-10.0),
                ..Default::default()
            })
            .await;
        assert_eq!(result, Err(ValidationError::NegativeBudget));
        assert_eq!(page.user, defaults::default_user());
        assert!(!ctx.store.contains(keys::USER));
    }

    #[tokio::test]
    async fn test_update_mirrors_to_remote() {
        let identity_provider = Arc::new(StubIdentity::new(StubMode::Ready));
        identity_provider.set_identity(Some(identity()));
        let ctx = context_with(identity_provider.clone(), day("2025-11-20"), quiet_settings());
        let mut page = ProfilePage::new(ctx.clone());
        page.load();

        let saved = page
            .update(UpdateProfileRequest {
                budget: Some(3000.0),
                currency: Some(Currency::Usd),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(saved);

        let remote = identity_provider.remote_profile("u1").unwrap();
        assert_eq!(remote.budget, 3000.0);
        assert_eq!(remote.currency, Currency::Usd);
        assert_eq!(ctx.toaster.current().unwrap().message, "Profile updated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_keeps_local_save() {
        let identity_provider = Arc::new(StubIdentity::new(StubMode::Fail));
        identity_provider.set_identity(Some(identity()));
        let ctx = context_with(identity_provider, day("2025-11-20"), quiet_settings());
        let mut page = ProfilePage::new(ctx.clone());
        page.load();

        let saved = page
            .update(UpdateProfileRequest {
                name: Some("Liya".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(saved);

        let stored: User = ctx.store.load(keys::USER, &defaults::default_user());
        assert_eq!(stored.name, "Liya");
        assert!(ctx.toaster.current().unwrap().message.contains("this device only"));
    }

    #[tokio::test]
    async fn test_sync_from_remote() {
        let identity_provider = Arc::new(StubIdentity::new(StubMode::Ready));
        let ctx = context_with(identity_provider.clone(), day("2025-11-20"), quiet_settings());
        let mut page = ProfilePage::new(ctx);
        page.load();
        assert!(!page.sync_from_remote().await);

        identity_provider.set_identity(Some(identity()));
        let mut remote = defaults::default_user();
        remote.name = "Remote".to_string();
        identity_provider.save_profile("u1", &remote).await.unwrap();

        assert!(page.sync_from_remote().await);
        assert_eq!(page.user.name, "Remote");
        assert!(!page.sync_from_remote().await);
    }

    #[tokio::test]
    async fn test_clear_all_data_keeps_accounts() {
        let ctx = test_context(day("2025-11-20"));
        ctx.store.save(keys::EXPENSES, &vec![1, 2]);
        ctx.store.save(keys::THEME, &"dark");
        ctx.store.save(keys::ACCOUNTS, &"accounts");
        let mut events = ctx.bus.subscribe();

        let mut page = ProfilePage::new(ctx.clone());
        page.load();
        assert_eq!(page.clear_all_data(), 2);
        assert!(!ctx.store.contains(keys::EXPENSES));
        assert!(ctx.store.contains(keys::ACCOUNTS));

        let (seen, _) = crate::sync::drain(&mut events);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, SyncKind::DataCleared);
    }

    #[test]
    fn test_avatar_data_uri() {
        let uri = avatar_data_uri(b"\x89PNG", "me.PNG").unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        assert_eq!(avatar_data_uri(b"text", "notes.txt"), None);
        assert_eq!(avatar_data_uri(&[], "empty.png"), None);
        assert_eq!(avatar_data_uri(&vec![0u8; MAX_AVATAR_BYTES + 1], "big.jpg"), None);
    }
}
