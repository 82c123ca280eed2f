//! HTTP inbound adapter exposing the JSON API under `/api/v1`.

pub mod auth;
pub mod broadcasts;
pub mod error;
pub mod health;
pub mod records;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub(crate) mod validation;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
