//! Common test setup functions.

use std::sync::Arc;
use std::time::Duration;

use analytics_core::Location;
use api::{router, AppState};
use axum::Router;
use tracker::PageViewTracker;

use crate::mocks::{MockEventStore, MockLocationResolver};

/// Test context wiring the real router and pipeline over mock seams.
///
/// The production code paths are exercised end to end; only the row store
/// and the geolocation providers are replaced.
pub struct TestContext {
    pub store: Arc<MockEventStore>,
    pub router: Router,
}

impl TestContext {
    /// Context whose geolocation always misses.
    pub fn new() -> Self {
        Self::with_location(None)
    }

    /// Context whose geolocation always resolves to `location`.
    pub fn with_location(location: Option<Location>) -> Self {
        let store = MockEventStore::new();
        let tracker = Arc::new(PageViewTracker::new(
            store.clone(),
            Arc::new(MockLocationResolver(location)),
        ));
        let state = AppState::new(tracker, store.clone());

        Self {
            router: router(state),
            store,
        }
    }

    /// Waits until the spawned recording pipeline has written `n` events.
    ///
    /// The track endpoint responds before the pipeline runs, so assertions
    /// on store contents need this.
    pub async fn wait_for_events(&self, n: usize) {
        for _ in 0..100 {
            if self.store.event_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "timed out waiting for {} events, store has {}",
            n,
            self.store.event_count()
        );
    }

    /// Gives the spawned pipeline time to run, for asserting that nothing
    /// was written.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
