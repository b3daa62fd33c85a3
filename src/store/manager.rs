// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! CRUD over named snapshots plus the distinguished auto-save slot.
//!
//! The manager exclusively owns the snapshot collection; the key-value
//! collaborator only stores opaque serialized copies under one key. Every
//! boundary failure (quota, clipboard, malformed import) becomes a toast,
//! never an unhandled error.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::SnapshotId;
use crate::state::{DiagramState, SerializableState, ToastNotifier};

use super::share::{build_share_url, Clipboard, ShareState};
use super::transfer::{self, ImportPayload};
use super::validate::{filter_invalid_entries, validate_state, SchemaReport};
use super::wire::{self, PersistedDocJson, SnapshotJson};
use super::{KeyValueStore, Snapshot, StorageError, SNAPSHOT_VERSION, STORAGE_KEY};

/// Fixed id of the auto-save slot. It resolves like a snapshot id but is
/// never promoted to a named snapshot automatically.
pub const AUTO_SAVE_ID: &str = "auto-save";

/// Capacity of the named-snapshot collection. Overflow silently evicts the
/// oldest snapshot by timestamp; it is never surfaced as an error.
pub const MAX_SNAPSHOTS: usize = 50;

/// Cheap list-view projection for the snapshot picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub snapshot_id: SnapshotId,
    pub name: String,
    pub saved_at_ms: u64,
    pub entity_count: usize,
}

pub struct SnapshotManager<S: KeyValueStore> {
    store: S,
    snapshots: Vec<Snapshot>,
    last_auto_save: Option<Snapshot>,
    auto_save_enabled: bool,
    toasts: ToastNotifier,
}

impl<S: KeyValueStore> SnapshotManager<S> {
    /// Loads the persisted collection from the store. A missing or
    /// unreadable document starts an empty collection; individual entries
    /// with invalid ids are dropped rather than failing the whole load.
    pub fn open(store: S, toasts: ToastNotifier) -> Self {
        let doc = store
            .get(STORAGE_KEY)
            .and_then(|raw| serde_json::from_str::<PersistedDocJson>(&raw).ok())
            .unwrap_or_default();

        let snapshots = doc
            .snapshots
            .into_iter()
            .filter_map(|json| wire::snapshot_from_json(json).ok())
            .collect();
        let last_auto_save = doc
            .last_auto_save
            .and_then(|json| wire::snapshot_from_json(json).ok());

        Self {
            store,
            snapshots,
            last_auto_save,
            auto_save_enabled: doc.auto_save_enabled,
            toasts,
        }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn last_auto_save(&self) -> Option<&Snapshot> {
        self.last_auto_save.as_ref()
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.auto_save_enabled
    }

    pub fn toasts(&self) -> &ToastNotifier {
        &self.toasts
    }

    pub fn summaries(&self) -> Vec<SnapshotSummary> {
        self.snapshots
            .iter()
            .map(|snapshot| SnapshotSummary {
                snapshot_id: snapshot.snapshot_id.clone(),
                name: snapshot.name.clone(),
                saved_at_ms: snapshot.saved_at_ms,
                entity_count: snapshot.state.selected_entities.len(),
            })
            .collect()
    }

    /// Named snapshots win; `"auto-save"` falls through to the auto-save
    /// slot only when no named snapshot carries that id.
    pub fn resolve(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.snapshot_id.as_str() == id)
            .or_else(|| {
                (id == AUTO_SAVE_ID)
                    .then(|| self.last_auto_save.as_ref())
                    .flatten()
            })
    }

    /// Captures the aggregate's state eagerly (save is synchronous with
    /// respect to current state), trims/defaults/disambiguates the name,
    /// evicts past capacity, persists, and notifies.
    pub fn save(&mut self, name: &str, aggregate: &DiagramState) -> SnapshotId {
        let now_ms = now_epoch_ms();

        let trimmed = name.trim();
        let candidate = if trimmed.is_empty() {
            default_snapshot_name(now_ms)
        } else {
            trimmed.to_owned()
        };
        let name = disambiguate_name(&candidate, &self.taken_names(None));
        let snapshot_id = generate_snapshot_id(now_ms);

        self.snapshots.push(Snapshot {
            snapshot_id: snapshot_id.clone(),
            name: name.clone(),
            saved_at_ms: now_ms,
            version: SNAPSHOT_VERSION,
            state: aggregate.serializable_state(),
        });
        self.evict_to_capacity();
        if self.persist() {
            self.toasts.success(format!("Saved snapshot \"{name}\""));
        }
        snapshot_id
    }

    /// Restores a snapshot into the aggregate. Unless `skip_validation`,
    /// schema drift degrades to a filtered partial restore plus a warning
    /// toast with skip counts; it never aborts the load.
    pub fn load(&self, id: &str, aggregate: &mut DiagramState, skip_validation: bool) -> bool {
        let Some(snapshot) = self.resolve(id) else {
            self.toasts.error("Snapshot not found");
            return false;
        };

        let name = snapshot.name.clone();
        let mut state = snapshot.state.clone();

        if skip_validation {
            aggregate.restore_state(state);
            self.toasts.success(format!("Restored snapshot \"{name}\""));
            return true;
        }

        let report = validate_state(&state, aggregate.entities());
        if report.is_valid() {
            aggregate.restore_state(state);
            self.toasts.success(format!("Restored snapshot \"{name}\""));
        } else {
            filter_invalid_entries(&mut state, aggregate.entities());
            aggregate.restore_state(state);
            self.toasts.warning(skip_summary(&name, &report));
        }
        true
    }

    /// Rejects empty-after-trim names without mutating anything; otherwise
    /// re-runs uniqueness disambiguation against the siblings.
    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            self.toasts.error("Snapshot name cannot be empty");
            return false;
        }

        let Some(index) = self
            .snapshots
            .iter()
            .position(|snapshot| snapshot.snapshot_id.as_str() == id)
        else {
            self.toasts.error("Snapshot not found");
            return false;
        };

        let name = disambiguate_name(trimmed, &self.taken_names(Some(index)));
        self.snapshots[index].name = name.clone();
        if self.persist() {
            self.toasts.success(format!("Renamed snapshot to \"{name}\""));
        }
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if let Some(index) = self
            .snapshots
            .iter()
            .position(|snapshot| snapshot.snapshot_id.as_str() == id)
        {
            let removed = self.snapshots.remove(index);
            if self.persist() {
                self.toasts
                    .success(format!("Deleted snapshot \"{}\"", removed.name));
            }
            return true;
        }

        if id == AUTO_SAVE_ID && self.last_auto_save.is_some() {
            self.last_auto_save = None;
            if self.persist() {
                self.toasts.success("Deleted auto-save");
            }
            return true;
        }

        self.toasts.error("Snapshot not found");
        false
    }

    /// Serializes one snapshot to a downloadable document; the host owns
    /// the actual file download.
    pub fn export_snapshot(&self, id: &str) -> Option<String> {
        let Some(snapshot) = self.resolve(id) else {
            self.toasts.error("Snapshot not found");
            return None;
        };

        let document =
            transfer::export_single_document(wire::snapshot_to_json(snapshot), now_epoch_ms());
        self.toasts
            .success(format!("Exported snapshot \"{}\"", snapshot.name));
        Some(document)
    }

    /// Serializes the whole collection, including the auto-save slot and
    /// the auto-save flag.
    pub fn export_all(&self) -> String {
        let document = transfer::export_bulk_document(
            self.snapshots.iter().map(wire::snapshot_to_json).collect(),
            self.last_auto_save.as_ref().map(wire::snapshot_to_json),
            self.auto_save_enabled,
            now_epoch_ms(),
        );
        self.toasts
            .success(format!("Exported {} snapshots", self.snapshots.len()));
        document
    }

    /// Imports an already-read export file. Every imported snapshot gets a
    /// fresh id (imported ids are never trusted, they may collide with
    /// local ones) and a name disambiguated against both local names and
    /// the names already taken within the same batch. Returns how many
    /// snapshots were added.
    pub fn import(&mut self, payload: &str) -> usize {
        let parsed = match transfer::parse_import(payload) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.toasts.error(err.to_string());
                return 0;
            }
        };

        let incoming: Vec<SnapshotJson> = match parsed {
            ImportPayload::Single(snapshot) => vec![snapshot],
            ImportPayload::Bulk(bulk) => {
                let mut list = bulk.snapshots;
                // A bulk file's auto-save slot is rescued as a named
                // snapshot; the local auto-save slot and flag stay untouched.
                list.extend(bulk.last_auto_save);
                list
            }
        };

        let now_ms = now_epoch_ms();
        let mut taken = self.taken_names(None);
        let mut imported = 0usize;

        for json in incoming {
            let trimmed = json.name.trim();
            let candidate = if trimmed.is_empty() {
                default_snapshot_name(now_ms)
            } else {
                trimmed.to_owned()
            };
            let name = disambiguate_name(&candidate, &taken);
            taken.insert(name.clone());

            self.snapshots.push(Snapshot {
                snapshot_id: generate_snapshot_id(now_ms),
                name,
                saved_at_ms: json.timestamp,
                version: json.version,
                state: json.state,
            });
            imported += 1;
        }

        self.evict_to_capacity();
        if self.persist() {
            self.toasts.success(format!("Imported {imported} snapshots"));
        }
        imported
    }

    /// Builds a share URL from a snapshot's minimal state and writes it to
    /// the clipboard. Sharing mutates no snapshot state, so every failure
    /// path leaves the manager unchanged.
    pub fn share(&self, id: &str, page_url: &str, clipboard: &mut dyn Clipboard) -> bool {
        let Some(snapshot) = self.resolve(id) else {
            self.toasts.error("Snapshot not found");
            return false;
        };

        let share = ShareState::from_state(&snapshot.state);
        let built = match build_share_url(page_url, &share) {
            Ok(built) => built,
            Err(err) => {
                self.toasts.error(format!("Cannot share: {err}"));
                return false;
            }
        };

        if let Err(err) = clipboard.write_text(&built.url) {
            self.toasts.error(err.to_string());
            return false;
        }

        if built.exceeds_soft_limit {
            self.toasts.warning(
                "Share link copied, but it is very long and may not work in every browser",
            );
        } else {
            self.toasts.success("Share link copied to clipboard");
        }
        true
    }

    pub fn toggle_auto_save(&mut self, enabled: bool) {
        self.auto_save_enabled = enabled;
        if self.persist() {
            self.toasts.info(if enabled {
                "Auto-save enabled"
            } else {
                "Auto-save disabled"
            });
        }
    }

    /// Writes the auto-save slot in place. Skips silently when auto-save is
    /// disabled or when the state deep-equals the previously persisted one,
    /// so state churn that nets to the same value causes no extra writes.
    pub fn write_auto_save(&mut self, state: SerializableState) -> bool {
        if !self.auto_save_enabled {
            return false;
        }
        if self
            .last_auto_save
            .as_ref()
            .is_some_and(|snapshot| snapshot.state == state)
        {
            return false;
        }

        self.last_auto_save = Some(Snapshot {
            snapshot_id: SnapshotId::new(AUTO_SAVE_ID)
                .expect("hard-coded auto-save id is valid"),
            name: "Auto-save".to_owned(),
            saved_at_ms: now_epoch_ms(),
            version: SNAPSHOT_VERSION,
            state,
        });
        self.persist();
        true
    }

    fn evict_to_capacity(&mut self) {
        while self.snapshots.len() > MAX_SNAPSHOTS {
            let Some(oldest) = oldest_snapshot_index(&self.snapshots) else {
                break;
            };
            self.snapshots.remove(oldest);
        }
    }

    fn taken_names(&self, exclude_index: Option<usize>) -> BTreeSet<String> {
        self.snapshots
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude_index)
            .map(|(_, snapshot)| snapshot.name.clone())
            .collect()
    }

    /// Writes the whole document under the one storage key. Failures are
    /// toasted here and reported back so callers do not follow up with a
    /// success toast.
    fn persist(&mut self) -> bool {
        let doc = PersistedDocJson {
            snapshots: self.snapshots.iter().map(wire::snapshot_to_json).collect(),
            last_auto_save: self.last_auto_save.as_ref().map(wire::snapshot_to_json),
            auto_save_enabled: self.auto_save_enabled,
        };
        let raw = serde_json::to_string(&doc)
            .expect("persisted document serializes without fallible map keys");

        match self.store.set(STORAGE_KEY, &raw) {
            Ok(()) => true,
            Err(StorageError::QuotaExceeded { .. }) => {
                self.toasts.error(
                    "Storage is full: delete or export snapshots to free up space",
                );
                false
            }
            Err(err) => {
                self.toasts.error(err.to_string());
                false
            }
        }
    }
}

// Extracted naming/timestamp/eviction helpers for `SnapshotManager`.
include!("manager/helpers.rs");

#[cfg(test)]
mod tests;
