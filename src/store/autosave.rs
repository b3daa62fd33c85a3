// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced auto-save wiring.
//!
//! The host feeds every qualifying state change into `observe`; a burst of
//! edits collapses to one persisted write at quiescence. The page-unload
//! hook calls `flush_on_unload`, which runs the same persistence routine
//! synchronously so the final edit is not lost to the debounce delay.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::sched::Debouncer;
use crate::state::SerializableState;

use super::manager::SnapshotManager;
use super::KeyValueStore;

pub const AUTO_SAVE_DEBOUNCE: Duration = Duration::from_millis(2000);

pub struct AutoSaver<S: KeyValueStore + Send + 'static> {
    manager: Arc<Mutex<SnapshotManager<S>>>,
    debounce: Debouncer<SerializableState>,
}

impl<S: KeyValueStore + Send + 'static> AutoSaver<S> {
    pub fn new(manager: Arc<Mutex<SnapshotManager<S>>>) -> Self {
        Self::with_delay(manager, AUTO_SAVE_DEBOUNCE)
    }

    pub fn with_delay(manager: Arc<Mutex<SnapshotManager<S>>>, delay: Duration) -> Self {
        let debounce = Debouncer::new(delay, {
            let manager = manager.clone();
            move |state: SerializableState| {
                let mut manager = manager.lock().expect("snapshot manager poisoned");
                manager.write_auto_save(state);
            }
        });

        Self { manager, debounce }
    }

    pub fn manager(&self) -> &Arc<Mutex<SnapshotManager<S>>> {
        &self.manager
    }

    /// Restarts the debounce window with the latest observed state.
    /// Whether a write actually happens is decided at fire time: the
    /// manager skips disabled auto-save and value-identical states.
    pub fn observe(&self, state: SerializableState) {
        self.debounce.schedule(state);
    }

    /// Synchronous best-effort save, independent of the debounce timer.
    /// Failures surface as toasts and are not retried; after unload there
    /// is no opportunity to retry.
    pub fn flush_on_unload(&self) -> bool {
        self.debounce.flush()
    }

    pub fn cancel_pending(&self) {
        self.debounce.cancel();
    }
}
