// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::sched::Debouncer;

pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// An ephemeral status message surfaced to rendering collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Default)]
struct ToastSlot {
    current: Option<Toast>,
    generation: u64,
}

/// Single-slot notifier: a new toast replaces any pending one and restarts
/// the clearance timer. Each `show` bumps a generation; the scheduled clear
/// only fires against its own generation, so a replaced toast never gets
/// wiped by the previous toast's timer, and dropping the notifier joins the
/// timer thread instead of leaving it to fire against stale state.
///
/// Clones share one slot; the aggregate and the snapshot manager hold clones
/// of the same notifier.
#[derive(Clone)]
pub struct ToastNotifier {
    slot: Arc<Mutex<ToastSlot>>,
    clear: Arc<Debouncer<u64>>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self::with_duration(TOAST_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        let slot = Arc::new(Mutex::new(ToastSlot::default()));
        let clear = Debouncer::new(duration, {
            let slot = slot.clone();
            move |generation: u64| {
                let mut slot = slot.lock().expect("toast slot poisoned");
                if slot.generation == generation {
                    slot.current = None;
                }
            }
        });

        Self {
            slot,
            clear: Arc::new(clear),
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let generation = {
            let mut slot = self.slot.lock().expect("toast slot poisoned");
            slot.generation += 1;
            slot.current = Some(Toast {
                message: message.into(),
                kind,
            });
            slot.generation
        };
        self.clear.schedule(generation);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Info);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Warning);
    }

    pub fn current(&self) -> Option<Toast> {
        self.slot.lock().expect("toast slot poisoned").current.clone()
    }

    pub fn dismiss(&self) {
        let mut slot = self.slot.lock().expect("toast slot poisoned");
        slot.current = None;
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new()
    }
}
