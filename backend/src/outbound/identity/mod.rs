//! Identity provider adapters.
//!
//! Implements the `AuthProvider` port against the Identity Toolkit REST API.

mod dto;
mod identity_toolkit;

pub use identity_toolkit::{IdentityToolkitAuthProvider, IdentityToolkitConfig};
