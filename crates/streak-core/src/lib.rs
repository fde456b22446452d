pub mod activity;
pub mod config;
pub mod error;
pub mod io;
pub mod message;
pub mod paths;
pub mod progress;
pub mod store;
pub mod tracker;
pub mod transition;
pub mod types;

pub use error::{Result, StreakError};
pub use tracker::AdherenceTracker;
pub use transition::Transition;
pub use types::{CompletionEvent, StreakRecord, UserId};
