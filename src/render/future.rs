//! A progress/cancellation handle shared between a render's dispatching thread and its caller.
//!
//! Mirrors the public surface of the source library's `dmnsn_future` (join/cancel/progress/wait),
//! backed by an ordinary [`Mutex`] + [`Condvar`] rather than the pthread mutex+condvar its header
//! comments describe ("Always use this rather than spinlocking") — the idiomatic Rust equivalent.
//! `pause`/`resume` additionally coordinate with every worker via a [`Barrier`], since neither is
//! part of the retrieved public header and both need a rendezvous point workers actually reach.

use std::sync::{Arc, Barrier, Condvar, Mutex};

use crate::error::RenderError;

struct FutureState {
    completed: usize,
    total: usize,
    cancelled: bool,
    done: bool,
    failure: Option<RenderError>,
    pause_barrier: Option<Arc<Barrier>>,
    paused: bool,
}

/// Handle to an in-progress (or finished) render: progress fraction, cooperative cancellation,
/// pause/resume, and blocking join.
pub struct Future {
    state: Mutex<FutureState>,
    progress_condvar: Condvar,
    pause_condvar: Condvar,
    nthreads: usize,
}

impl Future {
    /// Construct a new `Future` for a render dispatched across `nthreads` workers.
    #[must_use]
    pub fn new(nthreads: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FutureState {
                completed: 0,
                total: 0,
                cancelled: false,
                done: false,
                failure: None,
                pause_barrier: None,
                paused: false,
            }),
            progress_condvar: Condvar::new(),
            pause_condvar: Condvar::new(),
            nthreads,
        })
    }

    /// Set the total unit count (typically the canvas height) once it is known.
    pub fn set_total(&self, total: usize) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.total = total;
        self.progress_condvar.notify_all();
    }

    /// Record one completed unit of work (one rendered row), waking any thread blocked in `wait`.
    pub fn increment(&self) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.completed += 1;
        self.progress_condvar.notify_all();
    }

    /// Fraction of work completed, in `[0, 1]`. `1.0` before `set_total` is called and before any
    /// work exists to report progress against.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if state.total == 0 {
            1.0
        } else {
            (state.completed as f64 / state.total as f64).min(1.0)
        }
    }

    /// Block the calling thread until progress reaches at least `threshold`, or the render
    /// finishes (successfully, by cancellation, or by error) — whichever comes first.
    pub fn wait(&self, threshold: f64) {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _state = self
            .progress_condvar
            .wait_while(state, |s| {
                !s.done && (s.total == 0 || (s.completed as f64 / s.total as f64) < threshold)
            })
            .unwrap_or_else(std::sync::PoisonError::into_inner);
    }

    /// Request cancellation. Workers notice at their next row boundary and unwind early; already
    /// in-flight pixels on the current row still complete.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.cancelled = true;
        self.pause_condvar.notify_all();
    }

    /// Whether `cancel` has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner).cancelled
    }

    /// Quiesce every worker at its next row boundary and block until all have checked in, so the
    /// caller can read a consistent canvas snapshot. Returns once every worker is parked.
    pub fn pause(&self) {
        let barrier = Arc::new(Barrier::new(self.nthreads + 1));
        {
            let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            state.paused = true;
            state.pause_barrier = Some(barrier.clone());
        }
        barrier.wait();
    }

    /// Release every worker parked by a prior `pause`.
    pub fn resume(&self) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.paused = false;
        state.pause_barrier = None;
        self.pause_condvar.notify_all();
    }

    /// Called by a worker at a row boundary: blocks while paused, and reports cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Cancelled`] if `cancel` has been called.
    pub(super) fn checkpoint(&self) -> Result<(), RenderError> {
        if self.is_cancelled() {
            return Err(RenderError::Cancelled);
        }

        let barrier = {
            let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            state.pause_barrier.clone()
        };
        if let Some(barrier) = barrier {
            barrier.wait();
            let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            while state.paused {
                state = self.pause_condvar.wait(state).unwrap_or_else(std::sync::PoisonError::into_inner);
            }
        }

        if self.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }

    /// Called once by the dispatching thread when every worker has returned.
    pub(super) fn finish(&self, failure: Option<RenderError>) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.done = true;
        state.failure = failure;
        self.progress_condvar.notify_all();
    }

    /// Whether the render has finished (successfully, by cancellation, or by error).
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner).done
    }

    /// Block until the render finishes, returning its outcome.
    ///
    /// # Errors
    ///
    /// Returns whatever [`RenderError`] terminated the render, if any.
    pub fn join(&self) -> Result<(), RenderError> {
        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let state = self
            .progress_condvar
            .wait_while(state, |s| !s.done)
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match &state.failure {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }
}
