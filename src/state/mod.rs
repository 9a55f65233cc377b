//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunState`: Idle / Running / Completed / Failed, with progress counters
//! - `StatusTracker`: the mutex-guarded, process-wide holder of the current `RunState`

mod run_state;
mod tracker;

pub use run_state::RunState;
pub use tracker::StatusTracker;
