// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Schema validation of a persisted state against live entity metadata.
//!
//! Metadata drifts between saves: entities get deleted, fields get removed.
//! Loading is maximally permissive. Validation reports what would be
//! skipped and filtering drops it, so a snapshot never fails all-or-nothing.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Entity;
use crate::state::SerializableState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub entity: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub missing_entities: Vec<String>,
    pub missing_fields: Vec<MissingField>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.missing_entities.is_empty() && self.missing_fields.is_empty()
    }

    pub fn skipped_entity_count(&self) -> usize {
        self.missing_entities.len()
    }

    pub fn skipped_field_count(&self) -> usize {
        self.missing_fields.len()
    }
}

/// Checks a state's selected entities against the live list, and its field
/// selection against live attributes.
///
/// Field validity is only checked for entities that *are* still live: a
/// missing entity is already counted once, its fields are not re-reported
/// as a second class of error.
pub fn validate_state(state: &SerializableState, entities: &[Entity]) -> SchemaReport {
    let live = live_entities(entities);

    let mut report = SchemaReport::default();
    for name in &state.selected_entities {
        if !live.contains_key(name.as_str()) {
            report.missing_entities.push(name.clone());
        }
    }

    for (entity_name, fields) in &state.field_selection {
        let Some(entity) = live.get(entity_name.as_str()) else {
            continue;
        };
        for field in fields {
            if !entity.has_attribute(field) {
                report.missing_fields.push(MissingField {
                    entity: entity_name.clone(),
                    field: field.clone(),
                });
            }
        }
    }

    report
}

/// Drops every reference to a missing entity from every per-entity
/// sub-structure (selection, collapse set, field selection, field order,
/// positions), and every missing field from the field maps of live
/// entities. After filtering, a dead entity name appears nowhere.
pub fn filter_invalid_entries(state: &mut SerializableState, entities: &[Entity]) {
    let live = live_entities(entities);
    let is_live = |name: &str| live.contains_key(name);

    state.selected_entities.retain(|name| is_live(name));
    state.collapsed_entities.retain(|name| is_live(name));
    state.positions.retain(|name, _| is_live(name));

    state.field_selection.retain(|name, _| is_live(name));
    for (entity_name, fields) in &mut state.field_selection {
        if let Some(entity) = live.get(entity_name.as_str()) {
            fields.retain(|field| entity.has_attribute(field));
        }
    }

    state.field_order.retain(|name, _| is_live(name));
    for (entity_name, order) in &mut state.field_order {
        if let Some(entity) = live.get(entity_name.as_str()) {
            order.retain(|field| entity.has_attribute(field));
        }
    }
}

fn live_entities(entities: &[Entity]) -> BTreeMap<&str, &Entity> {
    entities
        .iter()
        .map(|entity| (entity.logical_name().as_str(), entity))
        .collect()
}

/// Names referenced anywhere in a state's per-entity sub-structures.
/// Used by tests to assert that filtering left nothing dangling.
pub fn referenced_entity_names(state: &SerializableState) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    names.extend(state.selected_entities.iter().cloned());
    names.extend(state.collapsed_entities.iter().cloned());
    names.extend(state.field_selection.keys().cloned());
    names.extend(state.field_order.keys().cloned());
    names.extend(state.positions.keys().cloned());
    names
}
