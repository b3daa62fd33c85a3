// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LINE_THICKNESS: f64 = 2.0;
pub const MIN_LINE_THICKNESS: f64 = 1.0;
pub const MAX_LINE_THICKNESS: f64 = 8.0;

/// Visual notation settings for tables and relationship lines.
///
/// Every field deserializes independently with its documented default, so a
/// settings record written by an older build (or stripped by a share link)
/// restores without error. Snapshots taken before a field existed simply get
/// the default on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSettings {
    #[serde(default = "default_custom_table_color")]
    pub custom_table_color: String,
    #[serde(default = "default_standard_table_color")]
    pub standard_table_color: String,
    #[serde(default = "default_lookup_table_color")]
    pub lookup_table_color: String,
    #[serde(default)]
    pub edge_style: EdgeStyle,
    #[serde(default)]
    pub line_notation: LineNotation,
    #[serde(default)]
    pub line_stroke: LineStroke,
    #[serde(default = "default_line_thickness")]
    pub line_thickness: f64,
    #[serde(default)]
    pub cardinality_colors_enabled: bool,
    #[serde(default = "default_many_to_one_color")]
    pub many_to_one_color: String,
    #[serde(default = "default_one_to_many_color")]
    pub one_to_many_color: String,
    #[serde(default = "default_many_to_many_color")]
    pub many_to_many_color: String,
}

impl DiagramSettings {
    /// Clamps out-of-range numeric fields in place. Applied on every restore
    /// path so imported blobs cannot smuggle unrenderable values.
    pub fn normalize(&mut self) {
        self.line_thickness = clamp_line_thickness(self.line_thickness);
    }
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            custom_table_color: default_custom_table_color(),
            standard_table_color: default_standard_table_color(),
            lookup_table_color: default_lookup_table_color(),
            edge_style: EdgeStyle::default(),
            line_notation: LineNotation::default(),
            line_stroke: LineStroke::default(),
            line_thickness: default_line_thickness(),
            cardinality_colors_enabled: false,
            many_to_one_color: default_many_to_one_color(),
            one_to_many_color: default_one_to_many_color(),
            many_to_many_color: default_many_to_many_color(),
        }
    }
}

pub fn clamp_line_thickness(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_LINE_THICKNESS;
    }
    value.clamp(MIN_LINE_THICKNESS, MAX_LINE_THICKNESS)
}

fn default_custom_table_color() -> String {
    "#8b5cf6".to_owned()
}

fn default_standard_table_color() -> String {
    "#3b82f6".to_owned()
}

fn default_lookup_table_color() -> String {
    "#10b981".to_owned()
}

fn default_line_thickness() -> f64 {
    DEFAULT_LINE_THICKNESS
}

fn default_many_to_one_color() -> String {
    "#6366f1".to_owned()
}

fn default_one_to_many_color() -> String {
    "#14b8a6".to_owned()
}

fn default_many_to_many_color() -> String {
    "#f97316".to_owned()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Curved,
    Straight,
    Orthogonal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LineNotation {
    #[default]
    Simple,
    Crowsfoot,
    Uml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LineStroke {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// How entity boxes get their canvas positions.
///
/// `Manual` wins whenever stored positions exist: a restored state that
/// carries any entity position is always treated as manually arranged,
/// regardless of what mode the snapshot claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Force,
    Grid,
    Manual,
}
