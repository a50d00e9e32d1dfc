//! Report rendering: dashboard view model and the daily HTML digest.

pub mod dashboard;
pub mod digest;
pub mod sender;

pub use dashboard::{ChartPoint, Dashboard, MapMarker};
pub use digest::{render_digest, Digest, DIGEST_MESSAGE_LIMIT};
pub use sender::{DigestSender, LogSender, WebhookSender};
