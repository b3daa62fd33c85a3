// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Plain-data projection of the diagram aggregate.
//!
//! This is the unit of persistence, sharing, and restore: no live
//! references, no set/map runtime types that JSON cannot represent
//! faithfully. Sets become sorted lists, typed ids become strings, and every
//! field carries a default so snapshots written by older builds deserialize
//! without error.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{DiagramSettings, LayoutMode};
use crate::state::grouping::GroupFilter;
use crate::state::viewport::{PanOffset, DEFAULT_ZOOM};

/// Canvas placement of one entity box. Velocity components are opaque
/// physics-layout state: persisted so a force layout resumes smoothly,
/// never interpreted by this core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vy: Option<f64>,
}

impl EntityPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            vx: None,
            vy: None,
        }
    }
}

/// Offset applied to a relationship line's label/midpoint, keyed by the
/// relationship schema name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SerializableState {
    #[serde(default)]
    pub selected_entities: Vec<String>,
    #[serde(default)]
    pub collapsed_entities: Vec<String>,
    #[serde(default)]
    pub field_selection: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub field_order: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub positions: BTreeMap<String, EntityPosition>,
    #[serde(default)]
    pub layout_mode: LayoutMode,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub pan: PanOffset,
    #[serde(default)]
    pub search_filter: String,
    #[serde(default)]
    pub publisher_filter: String,
    #[serde(default)]
    pub solution_filter: String,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub settings: DiagramSettings,
    #[serde(default = "default_minimap_enabled")]
    pub minimap_enabled: bool,
    #[serde(default)]
    pub smart_zoom_enabled: bool,
    #[serde(default)]
    pub edge_offsets: BTreeMap<String, EdgeOffset>,
    #[serde(default)]
    pub entity_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub group_names: BTreeMap<String, String>,
    #[serde(default = "default_group_filter")]
    pub group_filter: String,
}

impl Default for SerializableState {
    fn default() -> Self {
        Self {
            selected_entities: Vec::new(),
            collapsed_entities: Vec::new(),
            field_selection: BTreeMap::new(),
            field_order: BTreeMap::new(),
            positions: BTreeMap::new(),
            layout_mode: LayoutMode::default(),
            zoom: DEFAULT_ZOOM,
            pan: PanOffset::default(),
            search_filter: String::new(),
            publisher_filter: String::new(),
            solution_filter: String::new(),
            dark_mode: false,
            settings: DiagramSettings::default(),
            minimap_enabled: default_minimap_enabled(),
            smart_zoom_enabled: false,
            edge_offsets: BTreeMap::new(),
            entity_colors: BTreeMap::new(),
            group_names: BTreeMap::new(),
            group_filter: default_group_filter(),
        }
    }
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_minimap_enabled() -> bool {
    true
}

fn default_group_filter() -> String {
    GroupFilter::ALL.to_owned()
}

#[cfg(test)]
mod tests {
    use super::SerializableState;
    use crate::model::LayoutMode;

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let state: SerializableState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SerializableState::default());
        assert_eq!(state.group_filter, "all");
        assert!(state.minimap_enabled);
    }

    #[test]
    fn older_document_without_newer_fields_still_loads() {
        let state: SerializableState = serde_json::from_str(
            r#"{
                "selectedEntities": ["account"],
                "layoutMode": "manual",
                "zoom": 1.3,
                "positions": {"account": {"x": 10.0, "y": -4.5}}
            }"#,
        )
        .unwrap();

        assert_eq!(state.selected_entities, vec!["account"]);
        assert_eq!(state.layout_mode, LayoutMode::Manual);
        assert_eq!(state.zoom, 1.3);
        assert!(state.positions["account"].vx.is_none());
        assert_eq!(state.settings, Default::default());
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let mut state = SerializableState::default();
        state.selected_entities = vec!["account".to_owned(), "contact".to_owned()];
        state.entity_colors.insert("account".to_owned(), "#ef4444".to_owned());
        state.group_filter = "#ef4444".to_owned();
        state.dark_mode = true;

        let json = serde_json::to_string(&state).unwrap();
        let back: SerializableState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
