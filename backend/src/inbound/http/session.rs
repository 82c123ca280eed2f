//! Cookie-backed session holding the signed-in identity.
//!
//! Handlers never touch `actix_session::Session` directly: they persist or
//! clear an [`Identity`] and read back a [`Viewer`] for the request.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Identity, Viewer};

pub(crate) const IDENTITY_KEY: &str = "identity";

/// Session wrapper exposing identity-level operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `identity` for the rest of the session and rotate the cookie.
    pub fn persist_identity(&self, identity: &Identity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The stored identity, if any.
    ///
    /// A cookie whose identity no longer validates is removed and treated as
    /// signed out.
    pub fn identity(&self) -> Option<Identity> {
        self.0
            .get::<Identity>(IDENTITY_KEY)
            .unwrap_or_else(|error| {
                warn!(%error, "discarding unreadable identity in session cookie");
                self.0.remove(IDENTITY_KEY);
                None
            })
    }

    /// Per-request viewer built from the stored identity.
    pub fn viewer(&self) -> Viewer {
        Viewer::from(self.identity())
    }

    /// Drop everything held in the session.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
