// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::EntityName;

/// A table-like metadata object consumed from the CRM platform.
///
/// Entities are immutable inputs for the duration of a session; a metadata
/// refresh replaces the whole list (never an incremental diff).
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    logical_name: EntityName,
    display_name: String,
    primary_key: String,
    attributes: Vec<EntityAttribute>,
}

impl Entity {
    pub fn new(
        logical_name: EntityName,
        display_name: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            logical_name,
            display_name: display_name.into(),
            primary_key: primary_key.into(),
            attributes: Vec::new(),
        }
    }

    pub fn logical_name(&self) -> &EntityName {
        &self.logical_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Name of the primary-key attribute. The primary key is always shown
    /// first and is never removable from the field selection.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn attributes(&self) -> &[EntityAttribute] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<EntityAttribute> {
        &mut self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&EntityAttribute> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// A field of an [`Entity`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAttribute {
    name: String,
    display_type: String,
    is_primary_key: bool,
    lookup_target: Option<EntityName>,
}

impl EntityAttribute {
    pub fn new(name: impl Into<String>, display_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_type: display_type.into(),
            is_primary_key: false,
            lookup_target: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_type(&self) -> &str {
        &self.display_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn set_primary_key(&mut self, is_primary_key: bool) {
        self.is_primary_key = is_primary_key;
    }

    /// Target entity for lookup-typed attributes.
    pub fn lookup_target(&self) -> Option<&EntityName> {
        self.lookup_target.as_ref()
    }

    pub fn set_lookup_target(&mut self, lookup_target: Option<EntityName>) {
        self.lookup_target = lookup_target;
    }
}

/// A directed metadata edge between two entities.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRelationship {
    from: EntityName,
    to: EntityName,
    cardinality: Cardinality,
    schema_name: String,
    referencing_attribute: Option<String>,
    referenced_attribute: Option<String>,
}

impl EntityRelationship {
    pub fn new(
        from: EntityName,
        to: EntityName,
        cardinality: Cardinality,
        schema_name: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            cardinality,
            schema_name: schema_name.into(),
            referencing_attribute: None,
            referenced_attribute: None,
        }
    }

    pub fn from(&self) -> &EntityName {
        &self.from
    }

    pub fn to(&self) -> &EntityName {
        &self.to
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Unique schema name; used as the key for per-edge state (offsets).
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn referencing_attribute(&self) -> Option<&str> {
        self.referencing_attribute.as_deref()
    }

    pub fn set_referencing_attribute(&mut self, attribute: Option<String>) {
        self.referencing_attribute = attribute;
    }

    pub fn referenced_attribute(&self) -> Option<&str> {
        self.referenced_attribute.as_deref()
    }

    pub fn set_referenced_attribute(&mut self, attribute: Option<String>) {
        self.referenced_attribute = attribute;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cardinality {
    ManyToOne,
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManyToOne => "N:1",
            Self::OneToMany => "1:N",
            Self::ManyToMany => "N:N",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCardinalityError {
    value: String,
}

impl fmt::Display for ParseCardinalityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown cardinality {:?} (expected \"N:1\", \"1:N\" or \"N:N\")",
            self.value
        )
    }
}

impl std::error::Error for ParseCardinalityError {}

impl FromStr for Cardinality {
    type Err = ParseCardinalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N:1" => Ok(Self::ManyToOne),
            "1:N" => Ok(Self::OneToMany),
            "N:N" => Ok(Self::ManyToMany),
            other => Err(ParseCardinalityError {
                value: other.to_owned(),
            }),
        }
    }
}
