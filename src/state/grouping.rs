// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use crate::model::EntityName;

/// Preset display names for the curated palette; anything else falls back to
/// the uppercase hex literal.
const PRESET_GROUP_NAMES: [(&str, &str); 10] = [
    ("#3b82f6", "Blue"),
    ("#6366f1", "Indigo"),
    ("#8b5cf6", "Violet"),
    ("#ec4899", "Pink"),
    ("#ef4444", "Red"),
    ("#f97316", "Orange"),
    ("#f59e0b", "Amber"),
    ("#84cc16", "Lime"),
    ("#10b981", "Green"),
    ("#14b8a6", "Teal"),
];

/// Lowercases a color so user-typed variants of the same hex share one key.
pub fn normalize_color(color: &str) -> String {
    color.trim().to_ascii_lowercase()
}

pub fn preset_group_name(normalized_color: &str) -> Option<&'static str> {
    PRESET_GROUP_NAMES
        .iter()
        .find(|(hex, _)| *hex == normalized_color)
        .map(|(_, name)| *name)
}

/// Which color group the canvas is currently narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupFilter {
    #[default]
    All,
    Ungrouped,
    Color(String),
}

impl GroupFilter {
    pub const ALL: &'static str = "all";
    pub const UNGROUPED: &'static str = "ungrouped";

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Ungrouped => Self::UNGROUPED,
            Self::Color(color) => color,
        }
    }

    /// Never fails: anything that is not a sentinel is a color key.
    pub fn parse(value: &str) -> Self {
        match value {
            Self::ALL => Self::All,
            Self::UNGROUPED => Self::Ungrouped,
            color => Self::Color(normalize_color(color)),
        }
    }
}

/// A read-only partition of entities by shared color override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedGroup {
    pub color: String,
    pub name: String,
    pub entity_names: Vec<EntityName>,
}

/// Per-entity color overrides, user group labels keyed by normalized color,
/// and the active group filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorGroups {
    overrides: BTreeMap<EntityName, String>,
    group_names: BTreeMap<String, String>,
    filter: GroupFilter,
}

impl ColorGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overrides(&self) -> &BTreeMap<EntityName, String> {
        &self.overrides
    }

    pub fn group_names(&self) -> &BTreeMap<String, String> {
        &self.group_names
    }

    pub fn filter(&self) -> &GroupFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: GroupFilter) {
        self.filter = filter;
    }

    pub fn entity_color(&self, name: &EntityName) -> Option<&str> {
        self.overrides.get(name).map(String::as_str)
    }

    pub fn set_entity_color(&mut self, name: EntityName, color: &str) {
        self.overrides.insert(name, normalize_color(color));
    }

    /// Removing an absent key is a no-op, never an error.
    pub fn clear_entity_color(&mut self, name: &EntityName) {
        self.overrides.remove(name);
    }

    /// Resets overrides, group names, and the group filter together. Group
    /// names and the filter are meaningless without overrides, so the three
    /// are invalidated atomically.
    pub fn clear_all(&mut self) {
        self.overrides.clear();
        self.group_names.clear();
        self.filter = GroupFilter::All;
    }

    /// Keys on the normalized color regardless of the casing passed in.
    pub fn set_group_name(&mut self, color: &str, name: impl Into<String>) {
        self.group_names.insert(normalize_color(color), name.into());
    }

    pub fn clear_group_name(&mut self, color: &str) {
        self.group_names.remove(&normalize_color(color));
    }

    /// Recomputes the full partition from current overrides + labels. Group
    /// membership is a partition, not an incrementally patchable structure,
    /// so this never patches a previous result.
    pub fn derived_groups(&self) -> Vec<DerivedGroup> {
        derive_groups(&self.overrides, &self.group_names)
    }

    pub fn replace(
        &mut self,
        overrides: BTreeMap<EntityName, String>,
        group_names: BTreeMap<String, String>,
        filter: GroupFilter,
    ) {
        self.overrides = overrides;
        self.group_names = group_names;
        self.filter = filter;
    }
}

/// Pure function of the two maps: identical inputs yield deep-equal output.
///
/// Groups partition exactly the keys of `overrides`; entity names within a
/// group are sorted ascending, and groups are sorted by resolved name.
pub fn derive_groups(
    overrides: &BTreeMap<EntityName, String>,
    group_names: &BTreeMap<String, String>,
) -> Vec<DerivedGroup> {
    let mut by_color = BTreeMap::<String, Vec<EntityName>>::new();
    for (entity, color) in overrides {
        by_color
            .entry(normalize_color(color))
            .or_default()
            .push(entity.clone());
    }

    let mut groups = by_color
        .into_iter()
        .map(|(color, entity_names)| {
            let name = group_names
                .get(&color)
                .cloned()
                .or_else(|| preset_group_name(&color).map(ToOwned::to_owned))
                .unwrap_or_else(|| color.to_uppercase());
            // BTreeMap iteration already yields entity names ascending.
            DerivedGroup {
                color,
                name,
                entity_names,
            }
        })
        .collect::<Vec<_>>();

    groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.color.cmp(&b.color)));
    groups
}
