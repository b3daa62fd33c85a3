// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use galatea::model::{Cardinality, Entity, EntityAttribute, EntityName, EntityRelationship};
use galatea::state::{DiagramState, EntityPosition, ToastNotifier};

fn ename(value: &str) -> EntityName {
    EntityName::new(value).expect("entity name")
}

/// A synthetic org: `entity_count` entities with a dozen attributes each and
/// a chain of N:1 relationships.
pub fn synthetic_metadata(entity_count: usize) -> (Vec<Entity>, Vec<EntityRelationship>) {
    let mut entities = Vec::with_capacity(entity_count);
    for index in 0..entity_count {
        let logical = format!("bench_entity_{index:04}");
        let mut entity = Entity::new(
            ename(&logical),
            format!("Bench Entity {index}"),
            format!("{logical}id"),
        );
        let mut pk = EntityAttribute::new(format!("{logical}id"), "Unique Identifier");
        pk.set_primary_key(true);
        entity.attributes_mut().push(pk);
        for field in 0..12 {
            entity
                .attributes_mut()
                .push(EntityAttribute::new(format!("field_{field:02}"), "Text"));
        }
        entities.push(entity);
    }

    let relationships = (1..entity_count)
        .map(|index| {
            EntityRelationship::new(
                ename(&format!("bench_entity_{index:04}")),
                ename(&format!("bench_entity_{:04}", index - 1)),
                Cardinality::ManyToOne,
                format!("bench_rel_{index:04}"),
            )
        })
        .collect();

    (entities, relationships)
}

/// An aggregate with everything populated: full selection, field picks,
/// positions, colors, and a group filter.
pub fn populated_state(entity_count: usize) -> DiagramState {
    let (entities, relationships) = synthetic_metadata(entity_count);
    let mut state = DiagramState::new(ToastNotifier::with_duration(Duration::from_secs(3600)));
    state.set_metadata(entities, relationships);
    state.select_all_entities();

    for index in 0..entity_count {
        let name = ename(&format!("bench_entity_{index:04}"));
        state.add_field(&name, "field_00");
        state.add_field(&name, "field_05");
        state.set_entity_position(
            name.clone(),
            EntityPosition::new(index as f64 * 180.0, (index % 7) as f64 * 120.0),
        );
        state
            .colors_mut()
            .set_entity_color(name, if index % 2 == 0 { "#3b82f6" } else { "#ef4444" });
    }
    state
        .colors_mut()
        .set_filter(galatea::state::GroupFilter::Color("#ef4444".to_owned()));
    state
}
