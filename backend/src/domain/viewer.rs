//! Per-request viewer context.
//!
//! A [`Viewer`] is built once per request from the session and handed to
//! every use case explicitly. Authorisation is a plain role comparison against
//! it; there is no policy engine.

use serde::{Deserialize, Serialize};

use super::{Error, Identity, Role, UserId};

/// Coarse role of whoever is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    /// Signed in with the admin role.
    Admin,
    /// Signed in as a regular user.
    User,
    /// No identity in the session.
    Anonymous,
}

impl From<Role> for ViewerRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
        }
    }
}

/// Immutable identity context for a single request.
///
/// # Examples
/// ```
/// use tracker::domain::{Viewer, ViewerRole};
///
/// let viewer = Viewer::Anonymous;
/// assert_eq!(viewer.current_role(), ViewerRole::Anonymous);
/// assert!(viewer.require_identity().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Viewer {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    /// A signed-in identity.
    SignedIn(Identity),
}

impl Viewer {
    /// Role of the viewer, or [`ViewerRole::Anonymous`] when nobody is signed in.
    pub fn current_role(&self) -> ViewerRole {
        match self {
            Self::Anonymous => ViewerRole::Anonymous,
            Self::SignedIn(identity) => identity.role().into(),
        }
    }

    /// Borrow the identity if one is present.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::SignedIn(identity) => Some(identity),
        }
    }

    /// Identifier of the signed-in user, if any.
    pub fn uid(&self) -> Option<&UserId> {
        self.identity().map(Identity::uid)
    }

    /// Whether the viewer holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.current_role() == ViewerRole::Admin
    }

    /// Return the identity or an `unauthorized` error.
    pub fn require_identity(&self) -> Result<&Identity, Error> {
        self.identity()
            .ok_or_else(|| Error::unauthorized("sign in required"))
    }

    /// Return the identity when it belongs to an admin.
    ///
    /// Anonymous viewers get `unauthorized`; signed-in non-admins get
    /// `forbidden`.
    pub fn require_admin(&self) -> Result<&Identity, Error> {
        let identity = self.require_identity()?;
        if identity.is_admin() {
            Ok(identity)
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }
}

impl From<Option<Identity>> for Viewer {
    fn from(value: Option<Identity>) -> Self {
        value.map_or(Self::Anonymous, Self::SignedIn)
    }
}

/// Navigation destinations offered to a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavLink {
    /// Landing page.
    Home,
    /// About page.
    About,
    /// Sign-in form.
    Login,
    /// Account registration.
    Register,
    /// Record overview with status counts.
    Dashboard,
    /// Records created by the viewer.
    MyProjects,
    /// Project submission form.
    SubmitProject,
    /// Approved reviews and the review form.
    Reviews,
    /// Account profile.
    Profile,
    /// Ends the session.
    SignOut,
    /// Admin overview of every record.
    Admin,
    /// Pending review queue.
    Moderation,
    /// Broadcast composer.
    Broadcasts,
}

const ANONYMOUS_LINKS: &[NavLink] = &[
    NavLink::Home,
    NavLink::About,
    NavLink::Login,
    NavLink::Register,
];

const USER_LINKS: &[NavLink] = &[
    NavLink::Home,
    NavLink::About,
    NavLink::Dashboard,
    NavLink::MyProjects,
    NavLink::SubmitProject,
    NavLink::Reviews,
    NavLink::Profile,
    NavLink::SignOut,
];

const ADMIN_EXTRA_LINKS: &[NavLink] = &[NavLink::Admin, NavLink::Moderation, NavLink::Broadcasts];

/// Role-gated navigation links, in display order.
pub fn navigation_links(viewer: &Viewer) -> Vec<NavLink> {
    match viewer.current_role() {
        ViewerRole::Anonymous => ANONYMOUS_LINKS.to_vec(),
        ViewerRole::User => USER_LINKS.to_vec(),
        ViewerRole::Admin => USER_LINKS
            .iter()
            .chain(ADMIN_EXTRA_LINKS)
            .copied()
            .collect(),
    }
}
