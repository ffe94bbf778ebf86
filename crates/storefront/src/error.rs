//! Unified error handling with Sentry integration.
//!
//! Nothing in the storefront core propagates failures to the shopper: fetch
//! errors become an empty catalog, bad storage becomes empty slots, foreign
//! messages are dropped. `AppError` is what the edges (CLI, bridge handlers)
//! see, and [`AppError::report`] is how they log it.

use thiserror::Error;

use crate::backup::BridgeError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::StorageError;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog fetch or conversion failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local storage read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backup bridge rejected a message or transition.
    #[error("Backup error: {0}")]
    Bridge(#[from] BridgeError),

    /// Identity provider operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Log the error and capture unexpected ones to Sentry.
    ///
    /// `NotFound` is a normal outcome of user input and only gets a warning.
    pub fn report(&self) {
        if matches!(self, Self::NotFound(_)) {
            tracing::warn!(error = %self, "Lookup failed");
            return;
        }

        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("list", "Added to shopping list", Some(&[("product", "Arroz 5kg")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
