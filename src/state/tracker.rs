//! Process-wide status tracker
//!
//! The tracker is the only state shared between a background run and the
//! status endpoint. Every read and write goes through one mutex and the
//! critical sections never span an await point.

use crate::state::RunState;
use crate::{Result, ScrapeError};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to the shared run state
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    inner: Arc<Mutex<RunState>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current run state
    pub fn current_state(&self) -> RunState {
        self.lock().clone()
    }

    /// Atomically moves to Running unless a run is already active
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The caller now owns the run
    /// * `Err(ScrapeError::AlreadyRunning)` - Another run is active; its state is untouched
    pub fn try_start(&self, pages_requested: u32) -> Result<()> {
        let mut state = self.lock();
        if state.is_running() {
            return Err(ScrapeError::AlreadyRunning);
        }
        *state = RunState::running(pages_requested);
        Ok(())
    }

    /// Records one finished listing page
    ///
    /// `failed` marks a page whose listing could not be fetched.
    pub fn page_completed(&self, failed: bool) {
        let mut state = self.lock();
        if let RunState::Running {
            pages_completed,
            pages_failed,
            ..
        } = &mut *state
        {
            *pages_completed += 1;
            if failed {
                *pages_failed += 1;
            }
        }
    }

    /// Running → Completed
    pub fn complete(&self, total_movies: usize) {
        let mut state = self.lock();
        if let RunState::Running {
            pages_completed,
            pages_failed,
            started_at,
            ..
        } = *state
        {
            *state = RunState::Completed {
                pages_completed,
                pages_failed,
                total_movies,
                started_at,
                finished_at: Utc::now(),
            };
        }
    }

    /// Running → Failed
    pub fn fail(&self, reason: impl Into<String>) {
        let mut state = self.lock();
        if let RunState::Running { started_at, .. } = *state {
            *state = RunState::Failed {
                reason: reason.into(),
                started_at,
                finished_at: Utc::now(),
            };
        }
    }

    // A panic while holding the lock leaves a valid RunState behind, so a
    // poisoned mutex is still usable.
    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
