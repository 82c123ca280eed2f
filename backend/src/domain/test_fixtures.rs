//! Shared builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use crate::domain::{
    DisplayName, Document, DocumentId, EmailAddress, Identity, Role, UserId, Viewer,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn identity(uid: &str, role: Role) -> Identity {
    Identity::new(
        UserId::new(uid).expect("fixture uid"),
        DisplayName::new(format!("User {uid}")).expect("fixture name"),
        EmailAddress::new(format!("{uid}@example.com")).expect("fixture email"),
        role,
    )
}

pub(crate) fn admin_viewer() -> Viewer {
    Viewer::SignedIn(identity("admin-1", Role::Admin))
}

pub(crate) fn user_viewer(uid: &str) -> Viewer {
    Viewer::SignedIn(identity(uid, Role::User))
}

pub(crate) fn document(id: &str, fields: Value) -> Document {
    Document::new(
        DocumentId::new(id).expect("fixture id"),
        fields.as_object().cloned().expect("fixture fields must be an object"),
    )
}

pub(crate) fn doc_id(id: &str) -> DocumentId {
    DocumentId::new(id).expect("fixture id")
}
