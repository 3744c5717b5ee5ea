//! Scripted collaborators for tests and local demos.
//!
//! Both mocks answer from a queue of scripted responses, falling back to a
//! default once the queue is empty, and record every request they receive.

use crate::catalog::{CatalogClient, CatalogQuery, FetchError, FetchFuture};
use crate::mutation::{CartLineAdd, MutationFuture, MutationOutcome, OrderService};
use crate::types::OfferCandidate;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type FetchResult = Result<Vec<OfferCandidate>, FetchError>;

/// In-memory [`CatalogClient`]
#[derive(Debug)]
pub struct MockCatalog {
    scripted: Mutex<VecDeque<FetchResult>>,
    fallback: FetchResult,
    latency: Duration,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl MockCatalog {
    /// Catalog that returns no candidates
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback: Ok(Vec::new()),
            latency: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answer every query with `offers`
    #[must_use]
    pub fn with_offers(mut self, offers: Vec<OfferCandidate>) -> Self {
        self.fallback = Ok(offers);
        self
    }

    /// Fail every query with `error`
    #[must_use]
    pub fn with_failure(mut self, error: FetchError) -> Self {
        self.fallback = Err(error);
        self
    }

    /// Wait `latency` before answering
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Answer the next unscripted query with `result`
    pub fn push_response(&self, result: Result<Vec<OfferCandidate>, FetchError>) {
        lock(&self.scripted).push_back(result);
    }

    /// Queries received so far
    #[must_use]
    pub fn queries(&self) -> Vec<CatalogQuery> {
        lock(&self.queries).clone()
    }

    /// Number of queries received
    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.queries).len()
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient for MockCatalog {
    fn fetch_offers(&self, query: &CatalogQuery) -> FetchFuture {
        lock(&self.queries).push(query.clone());
        let result = lock(&self.scripted)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let latency = self.latency;

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        })
    }
}

/// In-memory [`OrderService`]
#[derive(Debug)]
pub struct MockOrderService {
    scripted: Mutex<VecDeque<MutationOutcome>>,
    fallback: MutationOutcome,
    latency: Duration,
    changes: Mutex<Vec<CartLineAdd>>,
}

impl MockOrderService {
    /// Service that accepts every change with an empty order
    #[must_use]
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback: MutationOutcome::Success { lines: Vec::new() },
            latency: Duration::ZERO,
            changes: Mutex::new(Vec::new()),
        }
    }

    /// Answer every change with `outcome`
    #[must_use]
    pub fn with_outcome(mut self, outcome: MutationOutcome) -> Self {
        self.fallback = outcome;
        self
    }

    /// Wait `latency` before answering
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Answer the next unscripted change with `outcome`
    pub fn push_outcome(&self, outcome: MutationOutcome) {
        lock(&self.scripted).push_back(outcome);
    }

    /// Changes received so far
    #[must_use]
    pub fn changes(&self) -> Vec<CartLineAdd> {
        lock(&self.changes).clone()
    }

    /// Number of changes received
    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.changes).len()
    }
}

impl Default for MockOrderService {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderService for MockOrderService {
    fn add_line(&self, change: CartLineAdd) -> MutationFuture {
        lock(&self.changes).push(change);
        let outcome = lock(&self.scripted)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        let latency = self.latency;

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::types::{PurchasableUnitId, RegionCode};

    #[tokio::test]
    async fn catalog_serves_script_then_fallback() {
        let catalog = MockCatalog::new().with_failure(FetchError::Transport("offline".to_string()));
        catalog.push_response(Ok(Vec::new()));
        let query = CatalogQuery::new(RegionCode::DE, &CatalogConfig::default());

        assert_eq!(catalog.fetch_offers(&query).await, Ok(Vec::new()));
        assert!(catalog.fetch_offers(&query).await.is_err());
        assert_eq!(catalog.calls(), 2);
        assert_eq!(catalog.queries()[0].region, RegionCode::DE);
    }

    #[tokio::test]
    async fn order_service_records_changes() {
        let orders = MockOrderService::new();
        orders.push_outcome(MutationOutcome::Error {
            message: "nope".to_string(),
        });

        let first = orders.add_line(CartLineAdd::one(PurchasableUnitId::new("V1"))).await;
        let second = orders.add_line(CartLineAdd::one(PurchasableUnitId::new("V2"))).await;

        assert!(matches!(first, MutationOutcome::Error { .. }));
        assert!(matches!(second, MutationOutcome::Success { .. }));
        assert_eq!(orders.changes()[1].unit_id.as_str(), "V2");
    }
}
