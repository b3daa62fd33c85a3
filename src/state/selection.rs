// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use crate::model::{Entity, EntityName};

/// The set of entity logical names currently shown on canvas.
///
/// The known entity list is only consulted for the "select all" default; a
/// name outside the known list is not rejected (it may reference metadata
/// that is still loading, or a snapshot awaiting validation).
///
/// Bulk operations are deliberately asymmetric: the no-argument forms mean
/// "all", the slice forms mean "exactly these". Callers rely on the slice
/// forms to implement filter-scoped bulk actions, so `select_many` is
/// additive and an empty slice is a no-op rather than a clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<EntityName>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<EntityName> {
        &self.selected
    }

    pub fn is_selected(&self, name: &EntityName) -> bool {
        self.selected.contains(name)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flips membership of `name`.
    pub fn toggle(&mut self, name: &EntityName) {
        if !self.selected.remove(name) {
            self.selected.insert(name.clone());
        }
    }

    pub fn insert(&mut self, name: EntityName) {
        self.selected.insert(name);
    }

    /// Replaces the selection with every known entity name.
    pub fn select_all(&mut self, known: &[Entity]) {
        self.selected = known
            .iter()
            .map(|entity| entity.logical_name().clone())
            .collect();
    }

    /// Adds only the given names, leaving existing selections untouched.
    /// An empty slice is a no-op (it must not clear the selection).
    pub fn select_many(&mut self, names: &[EntityName]) {
        for name in names {
            self.selected.insert(name.clone());
        }
    }

    /// Empties the selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Removes only the given names; an empty slice is a no-op.
    pub fn deselect_many(&mut self, names: &[EntityName]) {
        for name in names {
            self.selected.remove(name);
        }
    }

    pub fn replace(&mut self, selected: BTreeSet<EntityName>) {
        self.selected = selected;
    }
}
