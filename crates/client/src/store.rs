//! Per-view product store.
//!
//! Holds the request state and the latest snapshot for one catalog view.
//! At most one load runs at a time; a load replaces the snapshot wholesale, so
//! readers always see a complete collection from a single response.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use catalog_core::{Entity, Product, ProductId};
use catalog_products::{ContactChannel, FilterCriteria, ProductCard, derive_view_refs};

use crate::error::FetchError;
use crate::fetcher::ProductSource;
use crate::view::{EmptyReason, ViewState};

/// Lifecycle of the most recent load.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(FetchError),
}

/// Result of a [`CatalogStore::load`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Snapshot replaced; carries the product count.
    Loaded(usize),
    Failed(FetchError),
    /// Another load was running; nothing was requested.
    AlreadyInFlight,
}

#[derive(Debug)]
struct StoreState {
    status: RequestState,
    products: Arc<[Product]>,
    last_fetched: Option<DateTime<Utc>>,
}

pub struct CatalogStore<S> {
    source: S,
    in_flight: AtomicBool,
    state: RwLock<StoreState>,
}

impl<S: ProductSource> CatalogStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            in_flight: AtomicBool::new(false),
            state: RwLock::new(StoreState {
                status: RequestState::Idle,
                products: Arc::from(Vec::new()),
                last_fetched: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the collection unless a fetch is already running.
    ///
    /// A failed load keeps the previous snapshot.
    pub async fn load(&self) -> LoadOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("product load already in flight; ignoring");
            return LoadOutcome::AlreadyInFlight;
        }
        let mut guard = InFlightGuard {
            store: self,
            finished: false,
        };

        self.write().status = RequestState::Loading;

        let outcome = match self.source.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                let mut state = self.write();
                state.products = Arc::from(products);
                state.status = RequestState::Success;
                state.last_fetched = Some(Utc::now());
                LoadOutcome::Loaded(count)
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "product load failed");
                self.write().status = RequestState::Error(err.clone());
                LoadOutcome::Failed(err)
            }
        };

        guard.finished = true;
        outcome
    }

    pub fn status(&self) -> RequestState {
        self.read().status.clone()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.read().last_fetched
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Current collection. Cheap to clone; never mutated after publication.
    pub fn snapshot(&self) -> Arc<[Product]> {
        Arc::clone(&self.read().products)
    }

    pub fn find(&self, id: &ProductId) -> Option<Product> {
        self.read().products.iter().find(|p| p.id() == id).cloned()
    }

    /// Runs the filter/sort engine over the current snapshot and maps the
    /// outcome to a render state.
    pub fn view(
        &self,
        criteria: &FilterCriteria,
        contact: &ContactChannel,
        now: DateTime<Utc>,
    ) -> ViewState {
        let state = self.read();

        if state.last_fetched.is_none() {
            return match &state.status {
                RequestState::Error(err) => ViewState::failed(err.clone()),
                _ => ViewState::Loading,
            };
        }

        if !state.products.iter().any(|p| p.is_active) {
            return ViewState::Empty(EmptyReason::NoProducts);
        }

        let visible = derive_view_refs(&state.products, criteria);
        if visible.is_empty() {
            return ViewState::Empty(EmptyReason::NoMatches);
        }

        ViewState::Ready(
            visible
                .into_iter()
                .map(|p| ProductCard::build(p, contact, now))
                .collect(),
        )
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the in-flight flag even when the load future is dropped
/// mid-request (view teardown).
struct InFlightGuard<'a, S: ProductSource> {
    store: &'a CatalogStore<S>,
    finished: bool,
}

impl<S: ProductSource> Drop for InFlightGuard<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.store.write();
            if state.status == RequestState::Loading {
                state.status = RequestState::Idle;
            }
        }
        self.store.in_flight.store(false, Ordering::Release);
    }
}
