// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rstest::{fixture, rstest};

use super::{SnapshotManager, AUTO_SAVE_ID, MAX_SNAPSHOTS};
use crate::model::fixtures::demo_metadata;
use crate::model::EntityName;
use crate::state::{DiagramState, SerializableState, Toast, ToastKind, ToastNotifier};
use crate::store::share::{Clipboard, ClipboardError};
use crate::store::wire::{PersistedDocJson, SnapshotJson};
use crate::store::{KeyValueStore, MemoryStore, StorageError, STORAGE_KEY};

/// Store handle that keeps the backing memory visible to the test after the
/// manager takes ownership of its half.
#[derive(Clone)]
struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.lock().unwrap().set(key, value)
    }
}

#[derive(Default)]
struct RecordingClipboard {
    writes: Vec<String>,
}

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_owned());
        Ok(())
    }
}

struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::new("permission denied"))
    }
}

struct ManagerTestCtx {
    backing: Arc<Mutex<MemoryStore>>,
    toasts: ToastNotifier,
    aggregate: DiagramState,
    manager: SnapshotManager<SharedStore>,
}

impl ManagerTestCtx {
    fn with_backing(backing: Arc<Mutex<MemoryStore>>) -> Self {
        let toasts = ToastNotifier::with_duration(Duration::from_secs(3600));
        let (entities, relationships) = demo_metadata();
        let mut aggregate = DiagramState::new(toasts.clone());
        aggregate.set_metadata(entities, relationships);

        let manager = SnapshotManager::open(
            SharedStore {
                inner: backing.clone(),
            },
            toasts.clone(),
        );

        Self {
            backing,
            toasts,
            aggregate,
            manager,
        }
    }

    fn reopen(&self) -> ManagerTestCtx {
        Self::with_backing(self.backing.clone())
    }

    fn last_toast(&self) -> Toast {
        self.toasts.current().expect("a toast should be showing")
    }
}

#[fixture]
fn ctx() -> ManagerTestCtx {
    ManagerTestCtx::with_backing(Arc::new(Mutex::new(MemoryStore::new())))
}

fn seeded_ctx(count: usize) -> ManagerTestCtx {
    let backing = Arc::new(Mutex::new(MemoryStore::new()));
    let doc = PersistedDocJson {
        snapshots: (1..=count)
            .map(|index| SnapshotJson {
                id: format!("seed-{index}"),
                name: format!("Seed {index}"),
                timestamp: index as u64,
                version: 2,
                state: SerializableState::default(),
            })
            .collect(),
        last_auto_save: None,
        auto_save_enabled: true,
    };
    backing
        .lock()
        .unwrap()
        .set(STORAGE_KEY, &serde_json::to_string(&doc).unwrap())
        .unwrap();
    ManagerTestCtx::with_backing(backing)
}

fn ename(value: &str) -> EntityName {
    EntityName::new(value).unwrap()
}

#[rstest]
fn save_then_load_restores_identical_state(mut ctx: ManagerTestCtx) {
    ctx.aggregate.select_all_entities();
    ctx.aggregate.add_field(&ename("account"), "name");
    ctx.aggregate.set_dark_mode(true);
    let saved = ctx.aggregate.serializable_state();

    let id = ctx.manager.save("Test", &ctx.aggregate);
    assert_eq!(ctx.manager.snapshots().len(), 1);
    assert_eq!(ctx.manager.snapshots()[0].name, "Test");
    assert_eq!(ctx.last_toast().kind, ToastKind::Success);

    // Mutate, then load back.
    ctx.aggregate.selection_mut().deselect_all();
    ctx.aggregate.set_dark_mode(false);
    assert!(ctx.manager.load(id.as_str(), &mut ctx.aggregate, false));
    assert_eq!(ctx.aggregate.serializable_state(), saved);
}

#[rstest]
fn save_persists_across_reopen(mut ctx: ManagerTestCtx) {
    ctx.manager.save("Durable", &ctx.aggregate);

    let reopened = ctx.reopen();
    assert_eq!(reopened.manager.snapshots().len(), 1);
    assert_eq!(reopened.manager.snapshots()[0].name, "Durable");
}

#[rstest]
fn empty_name_synthesizes_timestamp_default(mut ctx: ManagerTestCtx) {
    ctx.manager.save("   ", &ctx.aggregate);
    let name = &ctx.manager.snapshots()[0].name;
    assert!(name.starts_with("Snapshot "), "unexpected name: {name}");
}

#[rstest]
fn duplicate_names_get_distinct_suffixes(mut ctx: ManagerTestCtx) {
    ctx.manager.save("My Snap", &ctx.aggregate);
    ctx.manager.save("My Snap", &ctx.aggregate);

    let names: Vec<&str> = ctx
        .manager
        .snapshots()
        .iter()
        .map(|snapshot| snapshot.name.as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
    assert!(names.iter().all(|name| !name.is_empty()));
    assert!(names[1].contains("My Snap"));
}

#[rstest]
fn load_unresolved_id_toasts_not_found(mut ctx: ManagerTestCtx) {
    let before = ctx.aggregate.serializable_state();
    assert!(!ctx.manager.load("missing-id", &mut ctx.aggregate, false));
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);
    assert_eq!(ctx.aggregate.serializable_state(), before);
}

#[rstest]
fn auto_save_id_resolves_to_auto_save_slot(mut ctx: ManagerTestCtx) {
    ctx.aggregate.selection_mut().select_many(&[ename("account")]);
    let observed = ctx.aggregate.serializable_state();
    assert!(ctx.manager.write_auto_save(observed.clone()));

    ctx.aggregate.selection_mut().deselect_all();
    assert!(ctx.manager.load(AUTO_SAVE_ID, &mut ctx.aggregate, false));
    assert_eq!(ctx.aggregate.serializable_state(), observed);
}

#[rstest]
fn redundant_auto_save_writes_are_skipped(mut ctx: ManagerTestCtx) {
    let state = ctx.aggregate.serializable_state();
    assert!(ctx.manager.write_auto_save(state.clone()));
    let first_ts = ctx.manager.last_auto_save().unwrap().saved_at_ms;

    // Deep-equal state: no new write, timestamp untouched.
    assert!(!ctx.manager.write_auto_save(state));
    assert_eq!(ctx.manager.last_auto_save().unwrap().saved_at_ms, first_ts);
}

#[rstest]
fn drifted_snapshot_loads_filtered_with_warning_counts(mut ctx: ManagerTestCtx) {
    let mut drifted = ctx.aggregate.serializable_state();
    drifted.selected_entities = vec!["account".to_owned(), "ghost".to_owned()];
    drifted
        .positions
        .insert("ghost".to_owned(), crate::state::EntityPosition::new(1.0, 2.0));
    ctx.aggregate.restore_state(drifted);
    let id = ctx.manager.save("Drifty", &ctx.aggregate);

    assert!(ctx.manager.load(id.as_str(), &mut ctx.aggregate, false));

    let toast = ctx.last_toast();
    assert_eq!(toast.kind, ToastKind::Warning);
    assert!(toast.message.contains("1 missing entities"));

    let restored = ctx.aggregate.serializable_state();
    assert!(!restored.selected_entities.contains(&"ghost".to_owned()));
    assert!(restored.positions.is_empty());
    assert!(restored.selected_entities.contains(&"account".to_owned()));
}

#[rstest]
fn skip_validation_restores_ghosts_verbatim(mut ctx: ManagerTestCtx) {
    let mut drifted = ctx.aggregate.serializable_state();
    drifted.selected_entities = vec!["ghost".to_owned()];
    ctx.aggregate.restore_state(drifted);
    let id = ctx.manager.save("Raw", &ctx.aggregate);

    ctx.aggregate.selection_mut().deselect_all();
    assert!(ctx.manager.load(id.as_str(), &mut ctx.aggregate, true));
    assert!(ctx
        .aggregate
        .serializable_state()
        .selected_entities
        .contains(&"ghost".to_owned()));
}

#[rstest]
fn rename_rejects_empty_and_disambiguates_against_siblings(mut ctx: ManagerTestCtx) {
    let first = ctx.manager.save("Alpha", &ctx.aggregate);
    ctx.manager.save("Beta", &ctx.aggregate);

    assert!(!ctx.manager.rename(first.as_str(), "   "));
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);
    assert_eq!(ctx.manager.snapshots()[0].name, "Alpha");

    assert!(ctx.manager.rename(first.as_str(), "Beta"));
    assert_eq!(ctx.manager.snapshots()[0].name, "Beta (2)");

    // Renaming to its own current name stays stable.
    assert!(ctx.manager.rename(first.as_str(), "Beta (2)"));
    assert_eq!(ctx.manager.snapshots()[0].name, "Beta (2)");
}

#[rstest]
fn delete_removes_named_snapshot_and_auto_save_slot(mut ctx: ManagerTestCtx) {
    let id = ctx.manager.save("Doomed", &ctx.aggregate);
    let state = ctx.aggregate.serializable_state();
    ctx.manager.write_auto_save(state);

    assert!(ctx.manager.delete(id.as_str()));
    assert!(ctx.manager.snapshots().is_empty());

    assert!(ctx.manager.delete(AUTO_SAVE_ID));
    assert!(ctx.manager.last_auto_save().is_none());

    assert!(!ctx.manager.delete("missing-id"));
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);
}

#[rstest]
fn save_at_capacity_evicts_exactly_the_oldest() {
    let mut ctx = seeded_ctx(MAX_SNAPSHOTS);
    assert_eq!(ctx.manager.snapshots().len(), MAX_SNAPSHOTS);

    ctx.manager.save("Fresh", &ctx.aggregate);

    assert_eq!(ctx.manager.snapshots().len(), MAX_SNAPSHOTS);
    let names: Vec<&str> = ctx
        .manager
        .snapshots()
        .iter()
        .map(|snapshot| snapshot.name.as_str())
        .collect();
    assert!(!names.contains(&"Seed 1"), "oldest should be evicted");
    assert!(names.contains(&"Seed 2"));
    assert!(names.contains(&"Fresh"));
}

#[rstest]
fn import_assigns_fresh_id_and_dedupes_against_local_names(mut ctx: ManagerTestCtx) {
    let id = ctx.manager.save("My Snap", &ctx.aggregate);
    let exported = ctx.manager.export_snapshot(id.as_str()).unwrap();

    assert_eq!(ctx.manager.import(&exported), 1);
    assert_eq!(ctx.manager.snapshots().len(), 2);

    let imported = &ctx.manager.snapshots()[1];
    assert_ne!(imported.snapshot_id, ctx.manager.snapshots()[0].snapshot_id);
    assert_ne!(imported.name, "My Snap");
    assert!(imported.name.contains("My Snap"));
}

#[rstest]
fn importing_two_same_named_snapshots_in_one_batch_stays_distinct(mut ctx: ManagerTestCtx) {
    let doc = crate::store::transfer::export_bulk_document(
        vec![
            SnapshotJson {
                id: "a".to_owned(),
                name: "Twin".to_owned(),
                timestamp: 10,
                version: 2,
                state: SerializableState::default(),
            },
            SnapshotJson {
                id: "b".to_owned(),
                name: "Twin".to_owned(),
                timestamp: 11,
                version: 2,
                state: SerializableState::default(),
            },
        ],
        None,
        true,
        42,
    );

    assert_eq!(ctx.manager.import(&doc), 2);
    let names: Vec<&str> = ctx
        .manager
        .snapshots()
        .iter()
        .map(|snapshot| snapshot.name.as_str())
        .collect();
    assert_eq!(names, vec!["Twin", "Twin (2)"]);
}

#[rstest]
fn bulk_import_rescues_auto_save_as_named_snapshot(mut ctx: ManagerTestCtx) {
    let state = ctx.aggregate.serializable_state();
    ctx.manager.write_auto_save(state);
    ctx.manager.save("Named", &ctx.aggregate);
    let exported = ctx.manager.export_all();

    let mut fresh = ManagerTestCtx::with_backing(Arc::new(Mutex::new(MemoryStore::new())));
    assert_eq!(fresh.manager.import(&exported), 2);
    let names: Vec<&str> = fresh
        .manager
        .snapshots()
        .iter()
        .map(|snapshot| snapshot.name.as_str())
        .collect();
    assert!(names.contains(&"Named"));
    assert!(names.contains(&"Auto-save"));
    // The local auto-save slot itself stays untouched.
    assert!(fresh.manager.last_auto_save().is_none());
}

#[rstest]
fn import_of_unrecognized_payload_is_rejected_whole(mut ctx: ManagerTestCtx) {
    assert_eq!(ctx.manager.import(r#"{"snapshots": []}"#), 0);
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);

    assert_eq!(ctx.manager.import("{broken"), 0);
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);
    assert!(ctx.manager.snapshots().is_empty());
}

#[rstest]
fn import_into_full_collection_keeps_newest_across_merged_set() {
    let mut ctx = seeded_ctx(MAX_SNAPSHOTS);

    // The imported snapshot is older than everything local, so it is the
    // one evicted from the merged set.
    let doc = crate::store::transfer::export_bulk_document(
        vec![SnapshotJson {
            id: "old".to_owned(),
            name: "Ancient".to_owned(),
            timestamp: 0,
            version: 2,
            state: SerializableState::default(),
        }],
        None,
        true,
        42,
    );
    ctx.manager.import(&doc);

    assert_eq!(ctx.manager.snapshots().len(), MAX_SNAPSHOTS);
    assert!(ctx
        .manager
        .snapshots()
        .iter()
        .all(|snapshot| snapshot.name != "Ancient"));
}

#[rstest]
fn share_copies_url_to_clipboard(mut ctx: ManagerTestCtx) {
    ctx.aggregate.selection_mut().select_many(&[ename("account")]);
    let id = ctx.manager.save("Shared", &ctx.aggregate);

    let mut clipboard = RecordingClipboard::default();
    assert!(ctx
        .manager
        .share(id.as_str(), "https://crm.example/app", &mut clipboard));

    assert_eq!(clipboard.writes.len(), 1);
    assert!(clipboard.writes[0].starts_with("https://crm.example/app#erd="));
    assert_eq!(ctx.last_toast().kind, ToastKind::Success);

    let decoded = crate::store::share_state_from_url(&clipboard.writes[0]).unwrap();
    assert_eq!(decoded.selected, vec!["account"]);
}

#[rstest]
fn oversized_share_aborts_before_touching_the_clipboard(mut ctx: ManagerTestCtx) {
    let mut bulky = ctx.aggregate.serializable_state();
    bulky.selected_entities = (0..600)
        .map(|index| format!("very_long_entity_logical_name_{index}"))
        .collect();
    ctx.aggregate.restore_state(bulky);
    let id = ctx.manager.save("Bulky", &ctx.aggregate);

    let mut clipboard = RecordingClipboard::default();
    assert!(!ctx
        .manager
        .share(id.as_str(), "https://crm.example/app", &mut clipboard));
    assert!(clipboard.writes.is_empty());
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);
}

#[rstest]
fn long_but_sharable_url_warns_and_proceeds(mut ctx: ManagerTestCtx) {
    let mut longish = ctx.aggregate.serializable_state();
    longish.selected_entities = (0..80)
        .map(|index| format!("entity_name_with_padding_{index:03}"))
        .collect();
    ctx.aggregate.restore_state(longish);
    let id = ctx.manager.save("Longish", &ctx.aggregate);

    let mut clipboard = RecordingClipboard::default();
    assert!(ctx
        .manager
        .share(id.as_str(), "https://crm.example/app", &mut clipboard));
    assert_eq!(clipboard.writes.len(), 1);
    assert_eq!(ctx.last_toast().kind, ToastKind::Warning);
}

#[rstest]
fn denied_clipboard_surfaces_error_toast(mut ctx: ManagerTestCtx) {
    let id = ctx.manager.save("Unshared", &ctx.aggregate);

    assert!(!ctx
        .manager
        .share(id.as_str(), "https://crm.example/app", &mut DeniedClipboard));
    assert_eq!(ctx.last_toast().kind, ToastKind::Error);
    // Sharing mutates no snapshot state.
    assert_eq!(ctx.manager.snapshots().len(), 1);
}

#[rstest]
fn toggle_auto_save_persists_the_flag(mut ctx: ManagerTestCtx) {
    assert!(ctx.manager.auto_save_enabled());
    ctx.manager.toggle_auto_save(false);

    let reopened = ctx.reopen();
    assert!(!reopened.manager.auto_save_enabled());
}

#[rstest]
fn quota_exhaustion_becomes_an_error_toast_not_a_panic() {
    let backing = Arc::new(Mutex::new(MemoryStore::with_capacity_bytes(64)));
    let mut ctx = ManagerTestCtx::with_backing(backing);

    ctx.manager.save("Too Big", &ctx.aggregate);
    // The snapshot stays in memory; persistence reported the quota problem.
    assert_eq!(ctx.manager.snapshots().len(), 1);

    let toast = ctx.toasts.current().expect("quota toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("Storage is full"));
}

#[rstest]
fn summaries_project_the_picker_view(mut ctx: ManagerTestCtx) {
    ctx.aggregate.select_all_entities();
    ctx.manager.save("Everything", &ctx.aggregate);

    let summaries = ctx.manager.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "Everything");
    assert_eq!(summaries[0].entity_count, ctx.aggregate.entities().len());
}
