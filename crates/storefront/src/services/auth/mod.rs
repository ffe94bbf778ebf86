//! Identity provider seam.
//!
//! Sign-in itself happens elsewhere (a hosted popup in the browser build).
//! The storefront only needs the current profile and a way to follow it.

mod error;

pub use error::AuthError;

use std::future::Future;

use ecofeira_core::UserProfile;
use tokio::sync::watch;

/// Source of the signed-in user.
pub trait IdentityProvider: Send + Sync {
    /// Start an interactive sign-in.
    fn sign_in(&self) -> impl Future<Output = Result<UserProfile, AuthError>> + Send;

    /// Sign the current user out.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Follow the current user; `None` while signed out.
    fn subscribe(&self) -> watch::Receiver<Option<UserProfile>>;
}

/// Provider backed by a locally configured profile.
#[derive(Debug)]
pub struct LocalIdentity {
    profile: Option<UserProfile>,
    current: watch::Sender<Option<UserProfile>>,
}

impl LocalIdentity {
    /// Create a signed-out provider that signs in as `profile`.
    #[must_use]
    pub fn new(profile: Option<UserProfile>) -> Self {
        let (current, _) = watch::channel(None);
        Self { profile, current }
    }

    /// Create a provider that is already signed in.
    #[must_use]
    pub fn signed_in(profile: UserProfile) -> Self {
        let (current, _) = watch::channel(Some(profile.clone()));
        Self {
            profile: Some(profile),
            current,
        }
    }

    /// Snapshot of the current user.
    #[must_use]
    pub fn current(&self) -> Option<UserProfile> {
        self.current.borrow().clone()
    }
}

impl IdentityProvider for LocalIdentity {
    async fn sign_in(&self) -> Result<UserProfile, AuthError> {
        let profile = self.profile.clone().ok_or(AuthError::NotConfigured)?;
        tracing::info!(uid = %profile.uid, "Signed in");
        self.current.send_replace(Some(profile.clone()));
        Ok(profile)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.current.send_replace(None).is_some() {
            tracing::info!("Signed out");
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.current.subscribe()
    }
}
