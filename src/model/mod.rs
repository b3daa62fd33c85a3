// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Consumed metadata model and configuration records.
//!
//! Entities and relationships are immutable inputs from the CRM metadata
//! client; settings records are plain data with per-field defaulting.

pub mod entity;
pub mod fixtures;
pub mod ids;
pub mod settings;

pub use entity::{
    Cardinality, Entity, EntityAttribute, EntityRelationship, ParseCardinalityError,
};
pub use ids::{EntityName, Id, IdError, SnapshotId};
pub use settings::{
    clamp_line_thickness, DiagramSettings, EdgeStyle, LayoutMode, LineNotation, LineStroke,
    DEFAULT_LINE_THICKNESS, MAX_LINE_THICKNESS, MIN_LINE_THICKNESS,
};
