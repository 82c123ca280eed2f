//! Login service combining the auth provider with stored user profiles.
//!
//! The auth provider vouches for the credentials; the `users` collection
//! supplies the role and preferred display name. An account without a
//! profile document signs in as a regular user.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AuthProvider, AuthProviderError, AuthenticatedAccount, DocumentStore, LoginService,
};
use crate::domain::store_errors::map_store_error;
use crate::domain::{
    CollectionName, DisplayName, DocumentId, EmailAddress, Error, Identity, LoginCredentials,
    Role,
};

fn map_auth_error(error: AuthProviderError) -> Error {
    match error {
        AuthProviderError::InvalidCredentials | AuthProviderError::UnknownAccount => {
            Error::unauthorized("invalid email or password")
        }
        AuthProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("auth provider unavailable: {message}"))
        }
        AuthProviderError::Rejected { message } => {
            Error::internal(format!("auth provider error: {message}"))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProfileFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// [`LoginService`] backed by an [`AuthProvider`] and the `users` collection.
#[derive(Clone)]
pub struct AccountLoginService<A, S> {
    auth: Arc<A>,
    store: Arc<S>,
}

impl<A, S> AccountLoginService<A, S> {
    /// Create a login service over the given provider and profile store.
    pub fn new(auth: Arc<A>, store: Arc<S>) -> Self {
        Self { auth, store }
    }
}

impl<A, S> AccountLoginService<A, S>
where
    S: DocumentStore,
{
    async fn load_profile(&self, account: &AuthenticatedAccount) -> Result<ProfileFields, Error> {
        let id = DocumentId::new(account.uid.as_ref())
            .map_err(|err| Error::internal(format!("invalid profile id: {err}")))?;
        let Some(document) = self
            .store
            .fetch_by_id(CollectionName::Users, &id)
            .await
            .map_err(map_store_error)?
        else {
            debug!(uid = %account.uid, "no profile document; defaulting to user role");
            return Ok(ProfileFields::default());
        };
        serde_json::from_value(Value::Object(document.fields)).or_else(|err| {
            warn!(uid = %account.uid, error = %err, "malformed profile document ignored");
            Ok(ProfileFields::default())
        })
    }
}

fn resolve_role(uid: &str, raw: Option<&str>) -> Role {
    match raw.map(str::parse::<Role>) {
        None => Role::default(),
        Some(Ok(role)) => role,
        Some(Err(err)) => {
            warn!(%uid, error = %err, "unknown role in profile; defaulting to user");
            Role::default()
        }
    }
}

fn resolve_name(account: &AuthenticatedAccount, stored: Option<&str>) -> Result<DisplayName, Error> {
    if let Some(name) = stored.and_then(|raw| DisplayName::new(raw).ok()) {
        return Ok(name);
    }
    if let Some(name) = account.display_name.clone() {
        return Ok(name);
    }
    let local = account
        .email
        .as_ref()
        .split('@')
        .next()
        .unwrap_or_default();
    DisplayName::new(local).map_err(|err| Error::internal(format!("no usable display name: {err}")))
}

#[async_trait]
impl<A, S> LoginService for AccountLoginService<A, S>
where
    A: AuthProvider,
    S: DocumentStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error> {
        let account = self
            .auth
            .sign_in(credentials)
            .await
            .map_err(map_auth_error)?;
        let profile = self.load_profile(&account).await?;
        let role = resolve_role(account.uid.as_ref(), profile.role.as_deref());
        let name = resolve_name(&account, profile.name.as_deref())?;
        info!(uid = %account.uid, %role, "signed in");
        Ok(Identity::new(account.uid, name, account.email, role))
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        match self.auth.send_password_reset(email).await {
            Ok(()) => Ok(()),
            Err(AuthProviderError::UnknownAccount) => {
                debug!("password reset requested for unknown account");
                Ok(())
            }
            Err(err) => Err(map_auth_error(err)),
        }
    }
}

#[cfg(test)]
#[path = "login_service_tests.rs"]
mod tests;
