//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so tests can swap in mocks or in-memory services.

use std::sync::Arc;

use crate::domain::ports::{
    BroadcastsCommand, BroadcastsQuery, LoginService, RecordsCommand, RecordsQuery,
    ReviewModeration, ReviewsCommand, ReviewsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub records: Arc<dyn RecordsQuery>,
    pub records_command: Arc<dyn RecordsCommand>,
    pub reviews: Arc<dyn ReviewsQuery>,
    pub reviews_command: Arc<dyn ReviewsCommand>,
    pub moderation: Arc<dyn ReviewModeration>,
    pub broadcasts: Arc<dyn BroadcastsQuery>,
    pub broadcasts_command: Arc<dyn BroadcastsCommand>,
}

impl HttpState {
    /// Wire one service per area into every port it implements.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use tracker::domain::ports::FixtureAuthProvider;
    /// use tracker::domain::{AccountLoginService, BroadcastService, RecordService, ReviewService};
    /// use tracker::inbound::http::state::HttpState;
    /// use tracker::outbound::persistence::MemoryDocumentStore;
    ///
    /// let store = Arc::new(MemoryDocumentStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let state = HttpState::from_services(
    ///     Arc::new(AccountLoginService::new(
    ///         Arc::new(FixtureAuthProvider::default()),
    ///         store.clone(),
    ///     )),
    ///     Arc::new(RecordService::new(store.clone(), clock.clone())),
    ///     Arc::new(ReviewService::new(store.clone(), clock.clone())),
    ///     Arc::new(BroadcastService::new(store, clock)),
    /// );
    /// # let _ = state;
    /// ```
    pub fn from_services<L, R, V, B>(
        login: Arc<L>,
        records: Arc<R>,
        reviews: Arc<V>,
        broadcasts: Arc<B>,
    ) -> Self
    where
        L: LoginService + 'static,
        R: RecordsQuery + RecordsCommand + 'static,
        V: ReviewsQuery + ReviewsCommand + ReviewModeration + 'static,
        B: BroadcastsQuery + BroadcastsCommand + 'static,
    {
        Self {
            login,
            records: records.clone(),
            records_command: records,
            reviews: reviews.clone(),
            reviews_command: reviews.clone(),
            moderation: reviews,
            broadcasts: broadcasts.clone(),
            broadcasts_command: broadcasts,
        }
    }
}
