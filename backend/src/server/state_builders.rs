//! Builders wiring document stores and auth providers into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use serde_json::json;
use tracing::{info, warn};

use tracker::domain::ports::{AuthProvider, DocumentStore, FixtureAccount, FixtureAuthProvider};
use tracker::domain::{
    AccountLoginService, BroadcastService, CollectionName, DisplayName, Document, DocumentId,
    EmailAddress, RecordService, ReviewService, Role, UserId,
};
use tracker::inbound::http::state::HttpState;
use tracker::outbound::identity::{IdentityToolkitAuthProvider, IdentityToolkitConfig};
use tracker::outbound::persistence::{DieselDocumentStore, MemoryDocumentStore};
use tracker::settings::AuthBackend;

use super::ServerConfig;

/// A development login seeded into the fixture provider and the `users` collection.
struct SeedAccount {
    uid: &'static str,
    email: &'static str,
    name: &'static str,
    role: Role,
}

const SEED_ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        uid: "fixture-admin",
        email: "admin@tracker.local",
        name: "Tracker Admin",
        role: Role::Admin,
    },
    SeedAccount {
        uid: "fixture-user",
        email: "user@tracker.local",
        name: "Tracker User",
        role: Role::User,
    },
];

fn invalid_seed(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("invalid fixture account: {err}"))
}

fn fixture_accounts(password: &str) -> std::io::Result<Vec<FixtureAccount>> {
    SEED_ACCOUNTS
        .iter()
        .map(|seed| {
            Ok(FixtureAccount {
                uid: UserId::new(seed.uid).map_err(invalid_seed)?,
                email: EmailAddress::new(seed.email).map_err(invalid_seed)?,
                password: password.to_owned(),
                display_name: Some(DisplayName::new(seed.name).map_err(invalid_seed)?),
            })
        })
        .collect()
}

fn seed_profiles() -> std::io::Result<Vec<(CollectionName, Document)>> {
    SEED_ACCOUNTS
        .iter()
        .map(|seed| {
            let id = DocumentId::new(seed.uid).map_err(invalid_seed)?;
            let fields = json!({ "name": seed.name, "role": seed.role.as_str() });
            let serde_json::Value::Object(fields) = fields else {
                return Err(invalid_seed("profile is not an object"));
            };
            Ok((CollectionName::Users, Document::new(id, fields)))
        })
        .collect()
}

fn wire<A, S>(auth: Arc<A>, store: Arc<S>) -> HttpState
where
    A: AuthProvider + 'static,
    S: DocumentStore + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::from_services(
        Arc::new(AccountLoginService::new(auth, store.clone())),
        Arc::new(RecordService::new(store.clone(), clock.clone())),
        Arc::new(ReviewService::new(store.clone(), clock.clone())),
        Arc::new(BroadcastService::new(store, clock)),
    )
}

fn wire_with_auth<S>(config: &ServerConfig, store: Arc<S>) -> std::io::Result<HttpState>
where
    S: DocumentStore + 'static,
{
    match &config.auth {
        AuthBackend::IdentityToolkit {
            endpoint,
            api_key,
            timeout,
        } => {
            let provider = IdentityToolkitAuthProvider::new(IdentityToolkitConfig {
                endpoint: endpoint.clone(),
                api_key: api_key.clone(),
                timeout: *timeout,
            })
            .map_err(|err| {
                std::io::Error::other(format!("identity toolkit client failed: {err}"))
            })?;
            info!(endpoint = %endpoint, "using Identity Toolkit for sign-in");
            Ok(wire(Arc::new(provider), store))
        }
        AuthBackend::Fixture {
            seed_accounts: true,
        } => {
            let accounts = fixture_accounts(&config.fixture_password)?;
            info!(count = accounts.len(), "using fixture accounts for sign-in");
            Ok(wire(Arc::new(FixtureAuthProvider::new(accounts)), store))
        }
        AuthBackend::Fixture {
            seed_accounts: false,
        } => {
            warn!("no identity provider configured; sign-in is disabled");
            Ok(wire(Arc::new(FixtureAuthProvider::default()), store))
        }
    }
}

/// Build the handler state over PostgreSQL when a pool is configured, process
/// memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let seeds = matches!(
        config.auth,
        AuthBackend::Fixture {
            seed_accounts: true
        }
    );
    let state = match &config.db_pool {
        Some(pool) => {
            if seeds {
                info!("fixture profiles are not written to PostgreSQL; roles come from stored users");
            }
            wire_with_auth(config, Arc::new(DieselDocumentStore::new(pool.clone())))?
        }
        None => {
            let store = if seeds {
                MemoryDocumentStore::with_documents(seed_profiles()?)
            } else {
                MemoryDocumentStore::new()
            };
            info!("documents are held in memory and lost on restart");
            wire_with_auth(config, Arc::new(store))?
        }
    };
    Ok(web::Data::new(state))
}
