//! Core types and pure logic for the festival visit-analytics pipeline.

pub mod aggregate;
pub mod bots;
pub mod error;
pub mod events;
pub mod identity;

pub use aggregate::*;
pub use bots::is_bot;
pub use error::{Error, Result};
pub use events::*;
pub use identity::*;
