//! Run state definitions for tracking crawl progress
//!
//! A run moves Idle → Running → Completed | Failed. A finished run may be
//! followed by a new run, which starts again at Running.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the current state of the process-wide crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RunState {
    /// No run has been started in this process
    #[default]
    Idle,

    /// A run is in progress
    #[serde(rename_all = "camelCase")]
    Running {
        pages_requested: u32,
        pages_completed: u32,
        /// Listing pages that yielded no entries because they could not be fetched
        pages_failed: u32,
        started_at: DateTime<Utc>,
    },

    /// The last run finished every requested page
    #[serde(rename_all = "camelCase")]
    Completed {
        pages_completed: u32,
        pages_failed: u32,
        total_movies: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },

    /// The last run stopped on an unrecoverable error
    #[serde(rename_all = "camelCase")]
    Failed {
        reason: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
}

impl RunState {
    /// Creates the Running state for a freshly started run
    pub fn running(pages_requested: u32) -> Self {
        Self::Running {
            pages_requested,
            pages_completed: 0,
            pages_failed: 0,
            started_at: Utc::now(),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Returns true once a run has reached Completed or Failed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    /// Pages finished so far (or in total, for a completed run)
    pub fn pages_completed(&self) -> u32 {
        match self {
            Self::Running {
                pages_completed, ..
            }
            | Self::Completed {
                pages_completed, ..
            } => *pages_completed,
            Self::Idle | Self::Failed { .. } => 0,
        }
    }

    /// Textual form reported by the status endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running { .. } => "running",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
