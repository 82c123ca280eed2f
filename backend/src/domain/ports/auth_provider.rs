//! Driven port for the external password authentication provider.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, LoginCredentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth provider adapters.
    pub enum AuthProviderError {
        /// Email and password did not match.
        InvalidCredentials => "invalid email or password",
        /// No account exists for the email.
        UnknownAccount => "no account exists for that email",
        /// The provider could not be reached or timed out.
        Unavailable { message: String } => "auth provider unavailable: {message}",
        /// The provider answered with an unexpected error.
        Rejected { message: String } => "auth provider rejected the request: {message}",
    }
}

/// Account details returned by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub uid: UserId,
    pub email: EmailAddress,
    pub display_name: Option<DisplayName>,
}

/// Port for password sign-in and reset e-mails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify credentials with the provider.
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedAccount, AuthProviderError>;

    /// Ask the provider to e-mail a password reset link.
    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), AuthProviderError>;
}

/// An account known to [`FixtureAuthProvider`].
#[derive(Debug, Clone)]
pub struct FixtureAccount {
    pub uid: UserId,
    pub email: EmailAddress,
    pub password: String,
    pub display_name: Option<DisplayName>,
}

/// In-memory provider for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureAuthProvider {
    accounts: Vec<FixtureAccount>,
}

impl FixtureAuthProvider {
    /// Provider that knows exactly `accounts`.
    pub fn new(accounts: Vec<FixtureAccount>) -> Self {
        Self { accounts }
    }

    fn find(&self, email: &EmailAddress) -> Option<&FixtureAccount> {
        self.accounts.iter().find(|account| &account.email == email)
    }
}

#[async_trait]
impl AuthProvider for FixtureAuthProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedAccount, AuthProviderError> {
        let account = self
            .find(credentials.email())
            .ok_or(AuthProviderError::UnknownAccount)?;
        if account.password != credentials.password() {
            return Err(AuthProviderError::InvalidCredentials);
        }
        Ok(AuthenticatedAccount {
            uid: account.uid.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
        })
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), AuthProviderError> {
        self.find(email)
            .map(|_| ())
            .ok_or(AuthProviderError::UnknownAccount)
    }
}
