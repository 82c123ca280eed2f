//! Behaviour tests for review moderation.
//!
//! Scenarios drive `PendingReviews` through the real review service over an
//! in-memory store whose writes can be switched off.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tracker::domain::ports::{DocumentStore, DocumentStoreError};
use tracker::domain::{
    CollectionName, DisplayName, Document, DocumentId, EmailAddress, Error, ErrorCode, Fields,
    Identity, Moderation, PendingReviews, Review, ReviewService, Role, UserId, Viewer,
};
use tracker::outbound::persistence::MemoryDocumentStore;

/// Memory store that refuses every write while `offline` is set.
#[derive(Default)]
struct SwitchableStore {
    inner: MemoryDocumentStore,
    offline: AtomicBool,
}

impl SwitchableStore {
    fn check_online(&self) -> Result<(), DocumentStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::connection("store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SwitchableStore {
    async fn fetch_all(
        &self,
        collection: CollectionName,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        self.inner.fetch_all(collection).await
    }

    async fn fetch_where(
        &self,
        collection: CollectionName,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        self.inner.fetch_where(collection, field, value).await
    }

    async fn fetch_by_id(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        self.inner.fetch_by_id(collection, id).await
    }

    async fn insert(
        &self,
        collection: CollectionName,
        fields: Fields,
    ) -> Result<DocumentId, DocumentStoreError> {
        self.check_online()?;
        self.inner.insert(collection, fields).await
    }

    async fn update(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.check_online()?;
        self.inner.update(collection, id, fields).await
    }

    async fn update_unless_set(
        &self,
        collection: CollectionName,
        id: &DocumentId,
        guard_field: &str,
        fields: Fields,
    ) -> Result<(), DocumentStoreError> {
        self.check_online()?;
        self.inner
            .update_unless_set(collection, id, guard_field, fields)
            .await
    }

    async fn delete(
        &self,
        collection: CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        self.check_online()?;
        self.inner.delete(collection, id).await
    }
}

struct ModerationWorld {
    runtime: Runtime,
    store: Arc<SwitchableStore>,
    service: ReviewService<SwitchableStore>,
    admin: Viewer,
    ids: RefCell<HashMap<String, DocumentId>>,
    pending: RefCell<PendingReviews>,
    outcome: RefCell<Option<Result<Review, Error>>>,
}

impl ModerationWorld {
    fn new() -> Self {
        let store = Arc::new(SwitchableStore::default());
        let admin = Identity::new(
            UserId::new("admin-1").expect("uid"),
            DisplayName::new("Ada Admin").expect("name"),
            EmailAddress::new("admin@tracker.test").expect("email"),
            Role::Admin,
        );
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("test runtime"),
            service: ReviewService::new(store.clone(), Arc::new(DefaultClock)),
            store,
            admin: Viewer::from(Some(admin)),
            ids: RefCell::new(HashMap::new()),
            pending: RefCell::new(PendingReviews::default()),
            outcome: RefCell::new(None),
        }
    }

    fn store_review(&self, name: &str, fields: Value) {
        let fields = fields.as_object().cloned().expect("review fields");
        let id = self
            .runtime
            .block_on(self.store.insert(CollectionName::Reviews, fields))
            .expect("seed review");
        self.ids.borrow_mut().insert(name.to_owned(), id);
    }

    fn id(&self, name: &str) -> DocumentId {
        self.ids
            .borrow()
            .get(name)
            .cloned()
            .expect("review named in scenario")
    }

    fn reload(&self) {
        let pending = self
            .runtime
            .block_on(PendingReviews::load(&self.service, &self.admin))
            .expect("pending reviews");
        *self.pending.borrow_mut() = pending;
    }

    fn decide(&self, name: &str, approved: bool) {
        let id = self.id(name);
        let mut pending = self.pending.borrow_mut();
        let result = self.runtime.block_on(pending.handle_review_approval(
            &self.service,
            &self.admin,
            &id,
            approved,
        ));
        *self.outcome.borrow_mut() = Some(result);
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&Result<Review, Error>),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("decision attempted"));
    }
}

#[fixture]
fn world() -> ModerationWorld {
    ModerationWorld::new()
}

#[given("reviews p1 and p2 awaiting moderation")]
fn two_pending_reviews(world: &ModerationWorld) {
    for (name, message) in [("p1", "Delivered early"), ("p2", "Friendly team")] {
        world.store_review(
            name,
            json!({ "userId": "user-alice", "message": message, "rating": 5,
                    "approved": false, "moderation": "pending" }),
        );
    }
    world.reload();
}

#[given("a review {name} stored with only a comment")]
fn comment_only_review(world: &ModerationWorld, name: String) {
    world.store_review(
        &name,
        json!({ "userId": "user-bob", "projectId": "proj-1", "comment": "Fast", "rating": 3 }),
    );
}

#[given("the document store rejects writes")]
fn store_rejects_writes(world: &ModerationWorld) {
    world.store.offline.store(true, Ordering::SeqCst);
}

#[when("the admin approves {name}")]
fn admin_approves(world: &ModerationWorld, name: String) {
    world.decide(&name, true);
}

#[when("the admin rejects {name}")]
fn admin_rejects(world: &ModerationWorld, name: String) {
    world.decide(&name, false);
}

#[when("the pending set is reloaded")]
fn pending_set_reloaded(world: &ModerationWorld) {
    world.reload();
}

#[then("the decision is stored as approved")]
fn decision_stored_as_approved(world: &ModerationWorld) {
    world.with_outcome(|outcome| {
        let review = outcome.as_ref().expect("decision persisted");
        assert_eq!(review.moderation, Moderation::Approved);
    });
    let stored = world
        .runtime
        .block_on(world.store.fetch_by_id(CollectionName::Reviews, &world.id("p1")))
        .expect("store read")
        .expect("review stored");
    assert_eq!(stored.field("approved"), Some(&json!(true)));
    assert_eq!(stored.field("moderation"), Some(&json!("approved")));
}

#[then("the failure is reported as service unavailable")]
fn failure_is_unavailable(world: &ModerationWorld) {
    world.with_outcome(|outcome| {
        let error = outcome.as_ref().expect_err("write failed");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    });
}

#[then("the decision is reported as a conflict")]
fn decision_conflicts(world: &ModerationWorld) {
    world.with_outcome(|outcome| {
        let error = outcome.as_ref().expect_err("already decided");
        assert_eq!(error.code(), ErrorCode::Conflict);
    });
}

#[then("{name} is no longer pending")]
fn no_longer_pending(world: &ModerationWorld, name: String) {
    assert!(!world.pending.borrow().contains(&world.id(&name)));
}

#[then("{name} is still pending")]
fn still_pending(world: &ModerationWorld, name: String) {
    assert!(world.pending.borrow().contains(&world.id(&name)));
}

#[scenario(path = "tests/features/review_moderation.feature")]
fn review_moderation_scenarios(world: ModerationWorld) {
    drop(world);
}
