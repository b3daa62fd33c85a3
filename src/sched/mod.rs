// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cancelable delayed-task primitive.
//!
//! One worker thread waits on a deadline; `schedule` replaces the pending
//! payload and restarts the delay, `flush` runs the task synchronously on the
//! calling thread, `cancel` discards the pending payload. Both the timer path
//! and the flush path run the same task, so debounced persistence and
//! unload-time persistence share one routine.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

struct DebounceState<T> {
    pending: Option<T>,
    deadline: Option<Instant>,
    shutdown: bool,
}

impl<T> Default for DebounceState<T> {
    fn default() -> Self {
        Self {
            pending: None,
            deadline: None,
            shutdown: false,
        }
    }
}

struct DebouncerInner<T> {
    delay: Duration,
    state: Mutex<DebounceState<T>>,
    cv: Condvar,
    task: Mutex<Box<dyn FnMut(T) + Send>>,
}

pub struct Debouncer<T> {
    inner: Arc<DebouncerInner<T>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, task: impl FnMut(T) + Send + 'static) -> Self {
        let inner = Arc::new(DebouncerInner {
            delay,
            state: Mutex::new(DebounceState::default()),
            cv: Condvar::new(),
            task: Mutex::new(Box::new(task)),
        });

        let worker = thread::Builder::new()
            .name("galatea-debounce".to_owned())
            .spawn({
                let inner = inner.clone();
                move || Self::run_worker(inner)
            })
            .expect("spawn debounce worker thread");

        Self {
            inner,
            worker: Some(worker),
        }
    }

    /// Replaces any pending payload and restarts the delay. A burst of calls
    /// collapses into one task run at quiescence, with the last payload.
    pub fn schedule(&self, payload: T) {
        let mut state = self.inner.state.lock().expect("debounce lock poisoned");
        state.pending = Some(payload);
        state.deadline = Some(Instant::now() + self.inner.delay);
        self.inner.cv.notify_one();
    }

    pub fn cancel(&self) {
        let mut state = self.inner.state.lock().expect("debounce lock poisoned");
        state.pending = None;
        state.deadline = None;
    }

    pub fn has_pending(&self) -> bool {
        let state = self.inner.state.lock().expect("debounce lock poisoned");
        state.pending.is_some()
    }

    /// Runs the task now, on the calling thread, if a payload is pending.
    ///
    /// This is the unload/shutdown entry point: it does not wait for the
    /// deadline and it leaves nothing scheduled behind. Returns whether a
    /// payload was flushed.
    pub fn flush(&self) -> bool {
        let payload = {
            let mut state = self.inner.state.lock().expect("debounce lock poisoned");
            state.deadline = None;
            state.pending.take()
        };

        match payload {
            Some(payload) => {
                let mut task = self.inner.task.lock().expect("debounce task lock poisoned");
                (task)(payload);
                true
            }
            None => false,
        }
    }

    fn run_worker(inner: Arc<DebouncerInner<T>>) {
        loop {
            let payload = {
                let mut state = inner.state.lock().expect("debounce lock poisoned");

                loop {
                    if state.shutdown {
                        return;
                    }

                    match state.deadline {
                        Some(deadline) => {
                            let now = Instant::now();
                            if now >= deadline {
                                state.deadline = None;
                                if let Some(payload) = state.pending.take() {
                                    break payload;
                                }
                            } else {
                                let (next, _timeout) = inner
                                    .cv
                                    .wait_timeout(state, deadline - now)
                                    .expect("debounce cv poisoned");
                                state = next;
                            }
                        }
                        None => {
                            state = inner.cv.wait(state).expect("debounce cv poisoned");
                        }
                    }
                }
            };

            let mut task = inner.task.lock().expect("debounce task lock poisoned");
            (task)(payload);
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        {
            let mut state = self.inner.state.lock().expect("debounce lock poisoned");
            state.shutdown = true;
            state.pending = None;
            state.deadline = None;
        }
        self.inner.cv.notify_all();

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
