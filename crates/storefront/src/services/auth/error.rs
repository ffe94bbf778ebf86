//! Identity provider error types.

use thiserror::Error;

/// Errors that can occur while signing in or out.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The shopper closed the sign-in prompt.
    #[error("sign-in cancelled")]
    Cancelled,

    /// No account is configured for this provider.
    #[error("no account configured")]
    NotConfigured,

    /// The provider reported a failure.
    #[error("identity provider error: {0}")]
    Provider(String),
}
