//! Application state shared across handlers.

use std::sync::Arc;

use event_store::EventStore;
use tracker::PageViewTracker;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Recording pipeline; handlers hand views to it and never await it.
    pub tracker: Arc<PageViewTracker>,
    /// Row store, read directly by the stats endpoint.
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(tracker: Arc<PageViewTracker>, store: Arc<dyn EventStore>) -> Self {
        Self { tracker, store }
    }
}
