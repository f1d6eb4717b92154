//! Admission gate: counting limiter on in-flight work plus a join barrier for completion.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct GateState {
    outstanding: usize,
    /// Set by `wait_idle`; no acquisition is allowed afterwards.
    closed: bool,
}

/// Bounds the number of outstanding units to `capacity`.
///
/// Units are only taken through [`acquire`](Self::acquire), which returns a [`Permit`]; dropping the
/// permit releases the unit. There is no other way to change the count.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    state: Mutex<GateState>,
    changed: Condvar,
}

/// One admitted unit. Released on drop, on every exit path including unwinding.
#[derive(Debug)]
#[must_use = "dropping a permit releases it immediately"]
pub struct Permit {
    gate: Arc<AdmissionGate>,
}

impl AdmissionGate {
    /// Panics when `capacity` is 0: a gate that admits nothing would hang the pipeline.
    pub fn new(capacity: usize) -> Arc<Self> {
        assert!(capacity > 0, "non-positive pool size");
        Arc::new(Self {
            capacity,
            state: Mutex::new(GateState::default()),
            changed: Condvar::new(),
        })
    }

    // The count is only touched under the lock and never left half-updated, so a poisoned
    // lock still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until fewer than `capacity` units are outstanding, then take one.
    ///
    /// Panics if called after [`wait_idle`](Self::wait_idle) has started.
    pub fn acquire(self: &Arc<Self>) -> Permit {
        let mut state = self.lock();
        assert!(!state.closed, "acquire on a gate after wait_idle");
        while state.outstanding >= self.capacity {
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.outstanding += 1;
        Permit {
            gate: Arc::clone(self),
        }
    }

    fn release(&self) {
        let mut state = self.lock();
        debug_assert!(state.outstanding > 0);
        state.outstanding = state.outstanding.saturating_sub(1);
        drop(state);
        // Both blocked acquirers and the idle waiter sleep on the same condvar.
        self.changed.notify_all();
    }

    /// Close the gate to new acquisitions and block until every outstanding unit is released.
    ///
    /// The caller must guarantee no further `acquire` calls are made (the collector calls this
    /// only after the dispatch loop has exited).
    pub fn wait_idle(&self) {
        let mut state = self.lock();
        state.closed = true;
        while state.outstanding > 0 {
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the outstanding count. Stale as soon as it returns; for logging and tests.
    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.gate.release();
    }
}
