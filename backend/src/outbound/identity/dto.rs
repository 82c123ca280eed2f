//! Wire types for the Identity Toolkit `accounts:*` endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignInRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignInResponseDto {
    pub(super) local_id: String,
    pub(super) email: String,
    #[serde(default)]
    pub(super) display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OobCodeRequestDto<'a> {
    pub(super) request_type: &'static str,
    pub(super) email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: String,
}

impl ErrorEnvelopeDto {
    /// Leading error code, e.g. `TOO_MANY_ATTEMPTS_TRY_LATER` from
    /// `"TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"`.
    pub(super) fn code(&self) -> &str {
        self.error
            .message
            .split_once(':')
            .map_or(self.error.message.as_str(), |(code, _)| code)
            .trim()
    }
}
