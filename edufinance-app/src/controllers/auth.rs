use shared_types::validation::is_plausible_email;
use shared_types::{defaults, keys, Currency, Identity, ProfileSeed, Session, User, ValidationError};
use std::future::Future;

use super::Page;
use crate::context::AppContext;
use crate::identity::IdentityError;
use crate::sync::{PageKind, SyncKind};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Account service did not respond in time")]
    Timeout,
}

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Blank means the default budget
    pub budget: String,
    pub currency: Currency,
}

impl SignUpForm {
    fn validate(&self) -> Result<ProfileSeed, ValidationError> {
        check_credentials(&self.email, &self.password)?;

        let budget = match self.budget.trim() {
            "" => defaults::DEFAULT_BUDGET,
            raw => {
                let budget: f64 = raw.parse().map_err(|_| ValidationError::InvalidAmount)?;
                if !budget.is_finite() || budget < 0.0 {
                    return Err(ValidationError::NegativeBudget);
                }
                budget
            }
        };

        let name = match self.name.trim() {
            "" => defaults::default_user().name,
            name => name.to_string(),
        };

        Ok(ProfileSeed {
            name,
            budget,
            currency: self.currency,
        })
    }
}

fn check_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

pub struct AuthPage {
    ctx: AppContext,
    pub session: Option<Session>,
}

impl AuthPage {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, session: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_authenticated)
    }

    pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<Identity, AuthError> {
        let seed = form.validate()?;
        let identity = self
            .bounded(self.ctx.identity.sign_up(&form.email, &form.password, &seed))
            .await?;

        let mut user = defaults::default_user();
        user.name = seed.name;
        user.email = identity.email.clone();
        user.budget = seed.budget;
        user.currency = seed.currency;
        if self.ctx.store.save(keys::USER, &user) {
            self.ctx.emit(SyncKind::UserUpdated, Self::KIND);
        }

        self.start_session(&identity, true);
        self.ctx.toaster.success("Account created");
        Ok(identity)
    }

    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Identity, AuthError> {
        check_credentials(email, password)?;
        let identity = self
            .bounded(self.ctx.identity.sign_in(email, password))
            .await?;

        // Pick up the profile saved with the account, if the provider has one
        match self.bounded(self.ctx.identity.fetch_profile(&identity.uid)).await {
            Ok(Some(profile)) => {
                if self.ctx.store.save(keys::USER, &profile) {
                    self.ctx.emit(SyncKind::UserUpdated, Self::KIND);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Signed in without remote profile: {}", e),
        }

        self.start_session(&identity, remember);
        self.ctx.toaster.success("Welcome back");
        Ok(identity)
    }

    pub async fn sign_out(&mut self) {
        if let Err(e) = self.bounded(self.ctx.identity.sign_out()).await {
            tracing::warn!("Identity provider sign-out failed: {}", e);
        }
        self.ctx.store.remove(keys::SESSION);
        self.session = None;
        self.ctx.emit(SyncKind::SessionChanged, Self::KIND);
        self.ctx.toaster.success("Signed out");
    }

    /// Stored user, for pages that greet by name after sign-in
    pub fn user(&self) -> User {
        self.ctx.store.load(keys::USER, &defaults::default_user())
    }

    fn start_session(&mut self, identity: &Identity, remember: bool) {
        let session = Session {
            is_authenticated: true,
            email: identity.email.clone(),
            remember,
            authenticated_at: self.ctx.clock.now_timestamp(),
        };
        if self.ctx.store.save(keys::SESSION, &session) {
            self.ctx.emit(SyncKind::SessionChanged, Self::KIND);
        }
        tracing::info!("Session started for {}", identity.email);
        self.session = Some(session);
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, IdentityError>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.ctx.settings.readiness_timeout, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::Timeout),
        }
    }
}

impl Page for AuthPage {
    const KIND: PageKind = PageKind::Auth;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::SESSION];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn load(&mut self) {
        self.session = self.ctx.store.load_optional(keys::SESSION);
    }
}
