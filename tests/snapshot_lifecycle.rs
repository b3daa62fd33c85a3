// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end lifecycle over the public API: arrange, snapshot, export,
//! import into a fresh session, survive schema drift, share via URL.

use std::time::Duration;

use galatea::model::fixtures::demo_metadata;
use galatea::model::{EntityName, LayoutMode};
use galatea::state::{DiagramState, EntityPosition, ToastKind, ToastNotifier};
use galatea::store::{share_state_from_url, MemoryStore, SnapshotManager};
use galatea::store::{Clipboard, ClipboardError};

#[derive(Default)]
struct CapturingClipboard {
    last: Option<String>,
}

impl Clipboard for CapturingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.last = Some(text.to_owned());
        Ok(())
    }
}

fn ename(value: &str) -> EntityName {
    EntityName::new(value).unwrap()
}

fn booted_session() -> (DiagramState, SnapshotManager<MemoryStore>, ToastNotifier) {
    let toasts = ToastNotifier::with_duration(Duration::from_secs(3600));
    let (entities, relationships) = demo_metadata();
    let mut diagram = DiagramState::new(toasts.clone());
    diagram.set_metadata(entities, relationships);
    let manager = SnapshotManager::open(MemoryStore::new(), toasts.clone());
    (diagram, manager, toasts)
}

#[test]
fn arrange_save_export_import_share_round_trip() {
    let (mut diagram, mut manager, _toasts) = booted_session();

    // Arrange a diagram.
    diagram.select_all_entities();
    diagram.add_field(&ename("account"), "name");
    diagram.add_field(&ename("contact"), "fullname");
    diagram.set_entity_position(ename("account"), EntityPosition::new(100.0, 40.0));
    diagram.set_layout_mode(LayoutMode::Manual);
    diagram.colors_mut().set_entity_color(ename("account"), "#ef4444");
    diagram.viewport_mut().zoom_in();
    diagram.set_dark_mode(true);

    let id = manager.save("Sales overview", &diagram);
    let exported = manager.export_snapshot(id.as_str()).unwrap();

    // Import into a fresh session against the same metadata.
    let (mut fresh_diagram, mut fresh_manager, _fresh_toasts) = booted_session();
    assert_eq!(fresh_manager.import(&exported), 1);

    let imported_id = fresh_manager.snapshots()[0].snapshot_id.clone();
    assert!(fresh_manager.load(imported_id.as_str(), &mut fresh_diagram, false));

    assert_eq!(
        fresh_diagram.serializable_state(),
        diagram.serializable_state()
    );
    assert_eq!(fresh_diagram.layout_mode(), LayoutMode::Manual);
    assert_eq!(
        fresh_diagram.ordered_fields(&ename("account")),
        vec!["accountid", "name"]
    );

    // Share the snapshot and rebuild a minimal session from the URL.
    let mut clipboard = CapturingClipboard::default();
    assert!(fresh_manager.share(
        imported_id.as_str(),
        "https://crm.example/erd",
        &mut clipboard
    ));

    let url = clipboard.last.expect("share url");
    let shared = share_state_from_url(&url).unwrap();

    let (mut shared_diagram, _, _) = booted_session();
    shared_diagram.restore_state(shared.into_state());

    assert!(shared_diagram.selection().is_selected(&ename("account")));
    assert!(shared_diagram.dark_mode());
    // Positions travel with the link, so layout resolves to manual.
    assert_eq!(shared_diagram.layout_mode(), LayoutMode::Manual);
    // Bulky per-field and color data deliberately do not travel.
    assert!(shared_diagram.colors().overrides().is_empty());
    assert_eq!(
        shared_diagram.ordered_fields(&ename("account")),
        vec!["accountid"]
    );
}

#[test]
fn schema_drift_between_save_and_load_degrades_gracefully() {
    let (mut diagram, mut manager, toasts) = booted_session();

    diagram.select_all_entities();
    diagram.add_field(&ename("cr1a2_booking"), "cr1a2_name");
    let id = manager.save("Before drift", &diagram);

    // The custom entity is deleted from the org between save and load.
    let (entities, relationships) = demo_metadata();
    let survivors: Vec<_> = entities
        .into_iter()
        .filter(|entity| entity.logical_name().as_str() != "cr1a2_booking")
        .collect();
    let relationships: Vec<_> = relationships
        .into_iter()
        .filter(|rel| {
            rel.from().as_str() != "cr1a2_booking" && rel.to().as_str() != "cr1a2_booking"
        })
        .collect();
    diagram.set_metadata(survivors, relationships);

    assert!(manager.load(id.as_str(), &mut diagram, false));

    let toast = toasts.current().unwrap();
    assert_eq!(toast.kind, ToastKind::Warning);
    assert!(toast.message.contains("1 missing entities"));

    let state = diagram.serializable_state();
    assert!(!state.selected_entities.contains(&"cr1a2_booking".to_owned()));
    assert!(!state.field_selection.contains_key("cr1a2_booking"));
    assert_eq!(state.selected_entities.len(), 4);

    // Rendering views stay consistent with the filtered selection.
    assert_eq!(diagram.filtered_entities().len(), 4);
    assert!(diagram
        .filtered_relationships()
        .iter()
        .all(|rel| rel.schema_name() != "cr1a2_booking_contact"));
}
