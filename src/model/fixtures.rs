// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::entity::{Cardinality, Entity, EntityAttribute, EntityRelationship};
use super::ids::EntityName;

fn ename(value: &str) -> EntityName {
    EntityName::new(value).expect("entity name")
}

fn attr(name: &str, display_type: &str) -> EntityAttribute {
    EntityAttribute::new(name, display_type)
}

fn pk_attr(name: &str) -> EntityAttribute {
    let mut attribute = EntityAttribute::new(name, "Unique Identifier");
    attribute.set_primary_key(true);
    attribute
}

fn lookup_attr(name: &str, target: &str) -> EntityAttribute {
    let mut attribute = EntityAttribute::new(name, "Lookup");
    attribute.set_lookup_target(Some(ename(target)));
    attribute
}

/// A small sales-style CRM schema used by tests, benches, and hosts that
/// want to boot the widget without a live metadata client.
pub fn demo_metadata() -> (Vec<Entity>, Vec<EntityRelationship>) {
    let mut account = Entity::new(ename("account"), "Account", "accountid");
    account.attributes_mut().extend([
        pk_attr("accountid"),
        attr("name", "Text"),
        attr("revenue", "Currency"),
        attr("industrycode", "Choice"),
        lookup_attr("primarycontactid", "contact"),
        lookup_attr("ownerid", "systemuser"),
    ]);

    let mut contact = Entity::new(ename("contact"), "Contact", "contactid");
    contact.attributes_mut().extend([
        pk_attr("contactid"),
        attr("fullname", "Text"),
        attr("emailaddress1", "Email"),
        lookup_attr("parentcustomerid", "account"),
        lookup_attr("ownerid", "systemuser"),
    ]);

    let mut opportunity = Entity::new(ename("opportunity"), "Opportunity", "opportunityid");
    opportunity.attributes_mut().extend([
        pk_attr("opportunityid"),
        attr("name", "Text"),
        attr("estimatedvalue", "Currency"),
        attr("closeprobability", "Whole Number"),
        lookup_attr("customerid", "account"),
        lookup_attr("ownerid", "systemuser"),
    ]);

    let mut systemuser = Entity::new(ename("systemuser"), "User", "systemuserid");
    systemuser.attributes_mut().extend([
        pk_attr("systemuserid"),
        attr("fullname", "Text"),
        attr("internalemailaddress", "Email"),
    ]);

    let mut booking = Entity::new(ename("cr1a2_booking"), "Booking", "cr1a2_bookingid");
    booking.attributes_mut().extend([
        pk_attr("cr1a2_bookingid"),
        attr("cr1a2_name", "Text"),
        attr("cr1a2_startdate", "Date and Time"),
        lookup_attr("cr1a2_contactid", "contact"),
    ]);

    let relationships = vec![
        {
            let mut rel = EntityRelationship::new(
                ename("contact"),
                ename("account"),
                Cardinality::ManyToOne,
                "contact_customer_accounts",
            );
            rel.set_referencing_attribute(Some("parentcustomerid".to_owned()));
            rel.set_referenced_attribute(Some("accountid".to_owned()));
            rel
        },
        {
            let mut rel = EntityRelationship::new(
                ename("opportunity"),
                ename("account"),
                Cardinality::ManyToOne,
                "opportunity_customer_accounts",
            );
            rel.set_referencing_attribute(Some("customerid".to_owned()));
            rel.set_referenced_attribute(Some("accountid".to_owned()));
            rel
        },
        EntityRelationship::new(
            ename("account"),
            ename("systemuser"),
            Cardinality::ManyToOne,
            "user_accounts",
        ),
        EntityRelationship::new(
            ename("opportunity"),
            ename("systemuser"),
            Cardinality::ManyToOne,
            "user_opportunities",
        ),
        {
            let mut rel = EntityRelationship::new(
                ename("cr1a2_booking"),
                ename("contact"),
                Cardinality::ManyToOne,
                "cr1a2_booking_contact",
            );
            rel.set_referencing_attribute(Some("cr1a2_contactid".to_owned()));
            rel.set_referenced_attribute(Some("contactid".to_owned()));
            rel
        },
        EntityRelationship::new(
            ename("contact"),
            ename("opportunity"),
            Cardinality::ManyToMany,
            "opportunitycompetitors_association",
        ),
    ];

    let entities = vec![account, contact, opportunity, systemuser, booking];
    (entities, relationships)
}
