//! Recording pipeline and scheduled reporting for the analytics service.

pub mod recorder;
pub mod scheduler;

pub use recorder::{PageViewTracker, TrackInput};
pub use scheduler::{previous_day_window, until_next_run, DigestScheduler};
