//! Driving port for sign-in and password reset.
//!
//! Inbound adapters call this port to turn credentials into an [`Identity`]
//! without knowing which auth provider or profile store sits behind it.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, Identity, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in identity with its role.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error>;

    /// Request a password reset e-mail.
    ///
    /// Succeeds for unknown accounts so callers cannot probe which e-mails
    /// are registered.
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error>;
}
