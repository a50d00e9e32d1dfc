//! HTTP surface for the visit analytics service.

pub mod extractors;
pub mod response;
pub mod routes;
pub mod state;

pub use response::{ApiError, HealthResponse, IdentitySlots, TrackResponse};
pub use routes::router;
pub use state::AppState;
