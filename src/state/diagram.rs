// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    DiagramSettings, Entity, EntityName, EntityRelationship, LayoutMode,
};
use crate::state::grouping::{normalize_color, ColorGroups, GroupFilter};
use crate::state::selection::SelectionState;
use crate::state::serial::{EdgeOffset, EntityPosition, SerializableState};
use crate::state::toast::{ToastKind, ToastNotifier};
use crate::state::viewport::ViewportState;

/// The composed diagram state surface the host shell runs against.
///
/// Owns the current metadata lists (wholesale-replaced on refresh), the
/// component states (viewport, selection, color groups), and the local
/// state for filters, field selection/order, positions, collapse, edge
/// offsets, settings, and feature flags. The serialize/restore pair on this
/// type is the canonical persistence contract consumed by the snapshot
/// manager.
pub struct DiagramState {
    entities: Vec<Entity>,
    relationships: Vec<EntityRelationship>,
    viewport: ViewportState,
    selection: SelectionState,
    colors: ColorGroups,
    search_filter: String,
    publisher_filter: String,
    solution_filter: String,
    field_selection: BTreeMap<EntityName, BTreeSet<String>>,
    field_order: BTreeMap<EntityName, Vec<String>>,
    positions: BTreeMap<EntityName, EntityPosition>,
    layout_mode: LayoutMode,
    collapsed: BTreeSet<EntityName>,
    edge_offsets: BTreeMap<String, EdgeOffset>,
    settings: DiagramSettings,
    dark_mode: bool,
    minimap_enabled: bool,
    smart_zoom_enabled: bool,
    toasts: ToastNotifier,
}

impl DiagramState {
    pub fn new(toasts: ToastNotifier) -> Self {
        Self {
            entities: Vec::new(),
            relationships: Vec::new(),
            viewport: ViewportState::new(),
            selection: SelectionState::new(),
            colors: ColorGroups::new(),
            search_filter: String::new(),
            publisher_filter: String::new(),
            solution_filter: String::new(),
            field_selection: BTreeMap::new(),
            field_order: BTreeMap::new(),
            positions: BTreeMap::new(),
            layout_mode: LayoutMode::default(),
            collapsed: BTreeSet::new(),
            edge_offsets: BTreeMap::new(),
            settings: DiagramSettings::default(),
            dark_mode: false,
            minimap_enabled: true,
            smart_zoom_enabled: false,
            toasts,
        }
    }

    /// Replaces the metadata lists wholesale. A refresh is never an
    /// incremental diff; stale names already in the selection survive until
    /// snapshot validation filters them.
    pub fn set_metadata(
        &mut self,
        entities: Vec<Entity>,
        relationships: Vec<EntityRelationship>,
    ) {
        self.entities = entities;
        self.relationships = relationships;
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[EntityRelationship] {
        &self.relationships
    }

    pub fn entity(&self, name: &EntityName) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.logical_name() == name)
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.viewport
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Replaces the selection with every entity in the current metadata.
    pub fn select_all_entities(&mut self) {
        let names: BTreeSet<EntityName> = self
            .entities
            .iter()
            .map(|entity| entity.logical_name().clone())
            .collect();
        self.selection.replace(names);
    }

    pub fn colors(&self) -> &ColorGroups {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorGroups {
        &mut self.colors
    }

    pub fn search_filter(&self) -> &str {
        &self.search_filter
    }

    pub fn set_search_filter(&mut self, filter: impl Into<String>) {
        self.search_filter = filter.into();
    }

    pub fn publisher_filter(&self) -> &str {
        &self.publisher_filter
    }

    pub fn set_publisher_filter(&mut self, filter: impl Into<String>) {
        self.publisher_filter = filter.into();
    }

    pub fn solution_filter(&self) -> &str {
        &self.solution_filter
    }

    pub fn set_solution_filter(&mut self, filter: impl Into<String>) {
        self.solution_filter = filter.into();
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn set_layout_mode(&mut self, layout_mode: LayoutMode) {
        self.layout_mode = layout_mode;
    }

    pub fn settings(&self) -> &DiagramSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, mut settings: DiagramSettings) {
        settings.normalize();
        self.settings = settings;
    }

    pub fn set_line_thickness(&mut self, thickness: f64) {
        self.settings.line_thickness = crate::model::clamp_line_thickness(thickness);
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    pub fn minimap_enabled(&self) -> bool {
        self.minimap_enabled
    }

    pub fn set_minimap_enabled(&mut self, enabled: bool) {
        self.minimap_enabled = enabled;
    }

    pub fn smart_zoom_enabled(&self) -> bool {
        self.smart_zoom_enabled
    }

    pub fn set_smart_zoom_enabled(&mut self, enabled: bool) {
        self.smart_zoom_enabled = enabled;
    }

    pub fn positions(&self) -> &BTreeMap<EntityName, EntityPosition> {
        &self.positions
    }

    pub fn set_entity_position(&mut self, name: EntityName, position: EntityPosition) {
        self.positions.insert(name, position);
    }

    pub fn clear_entity_position(&mut self, name: &EntityName) {
        self.positions.remove(name);
    }

    pub fn clear_positions(&mut self) {
        self.positions.clear();
    }

    pub fn edge_offsets(&self) -> &BTreeMap<String, EdgeOffset> {
        &self.edge_offsets
    }

    pub fn set_edge_offset(&mut self, schema_name: impl Into<String>, offset: EdgeOffset) {
        self.edge_offsets.insert(schema_name.into(), offset);
    }

    pub fn clear_edge_offset(&mut self, schema_name: &str) {
        self.edge_offsets.remove(schema_name);
    }

    pub fn toasts(&self) -> &ToastNotifier {
        &self.toasts
    }

    pub fn show_toast(&self, message: impl Into<String>, kind: ToastKind) {
        self.toasts.show(message, kind);
    }

    /// Entities restricted to the selection set, in metadata order.
    pub fn filtered_entities(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| self.selection.is_selected(entity.logical_name()))
            .collect()
    }

    /// Relationships whose *both* endpoints are selected. An edge with only
    /// one endpoint on canvas is dropped, not rendered dangling.
    pub fn filtered_relationships(&self) -> Vec<&EntityRelationship> {
        self.relationships
            .iter()
            .filter(|rel| {
                self.selection.is_selected(rel.from()) && self.selection.is_selected(rel.to())
            })
            .collect()
    }

    /// The browse-panel view of the full metadata list: search text matches
    /// logical or display name (case-insensitive), publisher filter matches
    /// the customization prefix of the logical name.
    pub fn catalog_entities(&self) -> Vec<&Entity> {
        crate::query::filter_catalog(&self.entities, &self.search_filter, &self.publisher_filter)
    }

    pub fn collapsed_entities(&self) -> &BTreeSet<EntityName> {
        &self.collapsed
    }

    pub fn is_collapsed(&self, name: &EntityName) -> bool {
        self.collapsed.contains(name)
    }

    /// Collapse state is independent of selection and field selection:
    /// collapsing only changes what [`Self::ordered_fields`] returns.
    pub fn toggle_collapse(&mut self, name: &EntityName) {
        if !self.collapsed.remove(name) {
            self.collapsed.insert(name.clone());
        }
    }

    pub fn collapse_all(&mut self) {
        self.collapsed = self
            .entities
            .iter()
            .map(|entity| entity.logical_name().clone())
            .collect();
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    pub fn selected_fields(&self, name: &EntityName) -> Option<&BTreeSet<String>> {
        self.field_selection.get(name)
    }

    pub fn field_selection(&self) -> &BTreeMap<EntityName, BTreeSet<String>> {
        &self.field_selection
    }

    pub fn field_order(&self) -> &BTreeMap<EntityName, Vec<String>> {
        &self.field_order
    }

    /// Adds a field to the selection and to the back of the order list.
    /// Adding an already-present field is idempotent and does not reorder it.
    pub fn add_field(&mut self, name: &EntityName, field: &str) {
        let selection = self.field_selection.entry(name.clone()).or_default();
        if !selection.insert(field.to_owned()) {
            return;
        }
        let order = self.field_order.entry(name.clone()).or_default();
        if !order.iter().any(|existing| existing == field) {
            order.push(field.to_owned());
        }
    }

    /// Removes a field from selection and order in lockstep. Re-adding it
    /// later sends it to the back of the display order.
    pub fn remove_field(&mut self, name: &EntityName, field: &str) {
        if let Some(selection) = self.field_selection.get_mut(name) {
            selection.remove(field);
        }
        if let Some(order) = self.field_order.get_mut(name) {
            order.retain(|existing| existing != field);
        }
    }

    /// The attribute names to display for an entity, in order.
    ///
    /// Collapsed entities show only the primary key (collapse overrides any
    /// field selection). Otherwise the primary key comes first, implicitly
    /// included even when absent from the selection map, followed by the
    /// selected fields in first-selected-first-shown order.
    pub fn ordered_fields(&self, name: &EntityName) -> Vec<String> {
        let Some(entity) = self.entity(name) else {
            return Vec::new();
        };

        let primary_key = entity.primary_key();
        if self.collapsed.contains(name) {
            return vec![primary_key.to_owned()];
        }

        let mut fields = vec![primary_key.to_owned()];
        if let Some(order) = self.field_order.get(name) {
            let selected = self.field_selection.get(name);
            for field in order {
                if field == primary_key {
                    continue;
                }
                if selected.is_some_and(|set| set.contains(field)) {
                    fields.push(field.clone());
                }
            }
        }
        fields
    }

    /// Projects the live state into its plain-data persisted form.
    pub fn serializable_state(&self) -> SerializableState {
        SerializableState {
            selected_entities: names_to_strings(self.selection.selected()),
            collapsed_entities: names_to_strings(&self.collapsed),
            field_selection: self
                .field_selection
                .iter()
                .map(|(name, fields)| {
                    (name.to_string(), fields.iter().cloned().collect::<Vec<_>>())
                })
                .collect(),
            field_order: self
                .field_order
                .iter()
                .map(|(name, order)| (name.to_string(), order.clone()))
                .collect(),
            positions: self
                .positions
                .iter()
                .map(|(name, position)| (name.to_string(), *position))
                .collect(),
            layout_mode: self.layout_mode,
            zoom: self.viewport.zoom(),
            pan: self.viewport.pan(),
            search_filter: self.search_filter.clone(),
            publisher_filter: self.publisher_filter.clone(),
            solution_filter: self.solution_filter.clone(),
            dark_mode: self.dark_mode,
            settings: self.settings.clone(),
            minimap_enabled: self.minimap_enabled,
            smart_zoom_enabled: self.smart_zoom_enabled,
            edge_offsets: self.edge_offsets.clone(),
            entity_colors: self
                .colors
                .overrides()
                .iter()
                .map(|(name, color)| (name.to_string(), color.clone()))
                .collect(),
            group_names: self.colors.group_names().clone(),
            group_filter: self.colors.filter().as_str().to_owned(),
        }
    }

    /// Rebuilds live state from a persisted projection.
    ///
    /// Re-derives the set/map structures from their list forms, applies
    /// per-field defaulting already handled by the wire types, and enforces
    /// two restore rules: any stored positions force `manual` layout, and a
    /// group filter pointing at a color with no remaining override falls
    /// back to "all" instead of carrying a dangling reference.
    pub fn restore_state(&mut self, mut state: SerializableState) {
        state.settings.normalize();

        self.selection.replace(strings_to_names(&state.selected_entities));
        self.collapsed = strings_to_names(&state.collapsed_entities);

        self.field_selection = state
            .field_selection
            .iter()
            .filter_map(|(name, fields)| {
                let name = EntityName::new(name.clone()).ok()?;
                Some((name, fields.iter().cloned().collect::<BTreeSet<_>>()))
            })
            .collect();
        self.field_order = state
            .field_order
            .iter()
            .filter_map(|(name, order)| {
                let name = EntityName::new(name.clone()).ok()?;
                Some((name, order.clone()))
            })
            .collect();

        self.positions = state
            .positions
            .iter()
            .filter_map(|(name, position)| {
                let name = EntityName::new(name.clone()).ok()?;
                Some((name, *position))
            })
            .collect();

        // Presence of manual positions always wins over the stored mode.
        self.layout_mode = if self.positions.is_empty() {
            state.layout_mode
        } else {
            LayoutMode::Manual
        };

        self.viewport.set_zoom(state.zoom);
        self.viewport.set_pan(state.pan);

        self.search_filter = state.search_filter;
        self.publisher_filter = state.publisher_filter;
        self.solution_filter = state.solution_filter;
        self.dark_mode = state.dark_mode;
        self.settings = state.settings;
        self.minimap_enabled = state.minimap_enabled;
        self.smart_zoom_enabled = state.smart_zoom_enabled;
        self.edge_offsets = state.edge_offsets;

        let overrides: BTreeMap<EntityName, String> = state
            .entity_colors
            .iter()
            .filter_map(|(name, color)| {
                let name = EntityName::new(name.clone()).ok()?;
                Some((name, normalize_color(color)))
            })
            .collect();

        let filter = match GroupFilter::parse(&state.group_filter) {
            GroupFilter::Color(color) if !overrides.values().any(|c| *c == color) => {
                GroupFilter::All
            }
            filter => filter,
        };

        self.colors.replace(overrides, state.group_names, filter);
    }
}

fn names_to_strings(names: &BTreeSet<EntityName>) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn strings_to_names(values: &[String]) -> BTreeSet<EntityName> {
    values
        .iter()
        .filter_map(|value| EntityName::new(value.clone()).ok())
        .collect()
}
