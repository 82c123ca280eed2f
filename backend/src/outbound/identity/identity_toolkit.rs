//! Reqwest-backed Identity Toolkit auth provider.
//!
//! Transport concerns only: request bodies, the request timeout, and mapping
//! the provider's error codes onto `AuthProviderError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::{debug, warn};

use super::dto::{ErrorEnvelopeDto, OobCodeRequestDto, SignInRequestDto, SignInResponseDto};
use crate::domain::ports::{AuthProvider, AuthProviderError, AuthenticatedAccount};
use crate::domain::{DisplayName, EmailAddress, LoginCredentials, UserId};

const SIGN_IN_PATH: &str = "./accounts:signInWithPassword";
const SEND_OOB_CODE_PATH: &str = "./accounts:sendOobCode";
const PASSWORD_RESET_REQUEST: &str = "PASSWORD_RESET";

/// Endpoint, key and timeout for the Identity Toolkit API.
#[derive(Debug, Clone)]
pub struct IdentityToolkitConfig {
    /// Base URL ending in `/v1/`, e.g. `https://identitytoolkit.googleapis.com/v1/`.
    pub endpoint: Url,
    /// Web API key sent as the `key` query parameter.
    pub api_key: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

/// [`AuthProvider`] adapter for the Identity Toolkit REST API.
pub struct IdentityToolkitAuthProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl IdentityToolkitAuthProvider {
    /// Build the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: IdentityToolkitConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: with_trailing_slash(config.endpoint),
            api_key: config.api_key,
        })
    }

    fn url(&self, path: &str) -> Result<Url, AuthProviderError> {
        let mut url = self
            .endpoint
            .join(path)
            .map_err(|err| AuthProviderError::rejected(format!("invalid endpoint: {err}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, AuthProviderError> {
        let response = self
            .client
            .post(self.url(path)?)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        Ok(bytes.to_vec())
    }
}

fn with_trailing_slash(mut endpoint: Url) -> Url {
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint
}

#[async_trait]
impl AuthProvider for IdentityToolkitAuthProvider {
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedAccount, AuthProviderError> {
        let body = self
            .post(
                SIGN_IN_PATH,
                &SignInRequestDto {
                    email: credentials.email().as_ref(),
                    password: credentials.password(),
                    return_secure_token: true,
                },
            )
            .await?;
        parse_account(&body)
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), AuthProviderError> {
        self.post(
            SEND_OOB_CODE_PATH,
            &OobCodeRequestDto {
                request_type: PASSWORD_RESET_REQUEST,
                email: email.as_ref(),
            },
        )
        .await?;
        debug!("password reset e-mail requested");
        Ok(())
    }
}

fn parse_account(body: &[u8]) -> Result<AuthenticatedAccount, AuthProviderError> {
    let decoded: SignInResponseDto = serde_json::from_slice(body)
        .map_err(|err| AuthProviderError::rejected(format!("invalid sign-in payload: {err}")))?;
    let uid = UserId::new(decoded.local_id)
        .map_err(|err| AuthProviderError::rejected(format!("invalid account id: {err}")))?;
    let email = EmailAddress::new(&decoded.email)
        .map_err(|err| AuthProviderError::rejected(format!("invalid account email: {err}")))?;
    let display_name = decoded
        .display_name
        .as_deref()
        .and_then(|name| DisplayName::new(name).ok());
    Ok(AuthenticatedAccount {
        uid,
        email,
        display_name,
    })
}

fn map_transport_error(error: reqwest::Error) -> AuthProviderError {
    if error.is_timeout() {
        AuthProviderError::unavailable("request timed out")
    } else {
        AuthProviderError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthProviderError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return AuthProviderError::unavailable(format!("status {}", status.as_u16()));
    }
    let Ok(envelope) = serde_json::from_slice::<ErrorEnvelopeDto>(body) else {
        return AuthProviderError::rejected(format!("status {}", status.as_u16()));
    };
    match envelope.code() {
        "EMAIL_NOT_FOUND" => AuthProviderError::UnknownAccount,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            AuthProviderError::InvalidCredentials
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthProviderError::unavailable("too many attempts"),
        other => {
            warn!(code = other, status = status.as_u16(), "identity provider refused request");
            AuthProviderError::rejected(other)
        }
    }
}
