use super::common::*;
use crate::workflows::screening::domain::{
    CitizenshipStatus, HouseholdMember, RelationshipKind, StudentStatus,
};
use crate::workflows::screening::relationships::{
    apply_intents, joins_meal_group, propagate, MemberIntent, RelationshipDeclared,
    RelationshipError,
};

fn declared(member: &str, related: &str, kind: RelationshipKind) -> RelationshipDeclared {
    RelationshipDeclared {
        member_id: member_id(member),
        related_id: member_id(related),
        kind,
    }
}

fn household(related_born: chrono::NaiveDate) -> Vec<HouseholdMember> {
    vec![worker("m1", 1_000.0), person("m2", related_born)]
}

fn joins(members: &[HouseholdMember], kind: RelationshipKind) -> bool {
    propagate(members, &declared("m1", "m2", kind), as_of())
        .expect("members known")
        .contains(&MemberIntent::JoinMealGroup {
            member_id: member_id("m2"),
        })
}

#[test]
fn spouse_declarations_record_both_directions_and_join_the_meal_group() {
    let members = household(date(1988, 4, 2));
    let intents = propagate(&members, &declared("m1", "m2", RelationshipKind::Spouse), as_of())
        .expect("members known");

    assert_eq!(
        intents,
        vec![
            MemberIntent::SetRelationship {
                member_id: member_id("m1"),
                related_id: member_id("m2"),
                kind: RelationshipKind::Spouse,
            },
            MemberIntent::SetRelationship {
                member_id: member_id("m2"),
                related_id: member_id("m1"),
                kind: RelationshipKind::Spouse,
            },
            MemberIntent::JoinMealGroup {
                member_id: member_id("m2"),
            },
        ]
    );
}

#[test]
fn reciprocal_kind_is_recorded_on_the_related_member() {
    let mut members = household(date(2010, 9, 1));
    let intents = propagate(&members, &declared("m1", "m2", RelationshipKind::Child), as_of())
        .expect("members known");
    apply_intents(&mut members, &intents);

    assert_eq!(
        members[0].relationships.get(&member_id("m2")),
        Some(&RelationshipKind::Child)
    );
    assert_eq!(
        members[1].relationships.get(&member_id("m1")),
        Some(&RelationshipKind::Parent)
    );
    assert!(members[1].shares_meal);
}

#[test]
fn family_members_join_only_under_the_age_limits() {
    assert!(joins(&household(date(2004, 1, 1)), RelationshipKind::StepChild));
    assert!(!joins(&household(date(2000, 1, 1)), RelationshipKind::StepChild));
    assert!(joins(&household(date(2008, 1, 1)), RelationshipKind::Ward));
    assert!(!joins(&household(date(2005, 1, 1)), RelationshipKind::Ward));
    assert!(!joins(&household(date(2010, 1, 1)), RelationshipKind::Sibling));
}

#[test]
fn age_limits_are_exclusive_on_the_birthday() {
    let twenty_two = household(date(2003, 6, 1));
    let just_under = household(date(2003, 6, 2));
    for kind in [
        RelationshipKind::Child,
        RelationshipKind::Parent,
        RelationshipKind::AdoptedChild,
    ] {
        assert!(!joins(&twenty_two, kind), "{kind:?} aged 22");
        assert!(joins(&just_under, kind), "{kind:?} aged 21");
    }

    let eighteen = household(date(2007, 6, 1));
    let seventeen = household(date(2007, 6, 2));
    for kind in [RelationshipKind::Ward, RelationshipKind::Guardian] {
        assert!(!joins(&eighteen, kind), "{kind:?} aged 18");
        assert!(joins(&seventeen, kind), "{kind:?} aged 17");
    }
}

#[test]
fn parent_side_declarations_record_the_child_side_on_the_related_member() {
    let cases = [
        (RelationshipKind::Parent, RelationshipKind::Child),
        (RelationshipKind::StepParent, RelationshipKind::StepChild),
        (RelationshipKind::AdoptiveParent, RelationshipKind::AdoptedChild),
        (RelationshipKind::Guardian, RelationshipKind::Ward),
    ];
    for (kind, reciprocal) in cases {
        let mut members = household(date(2012, 2, 14));
        let intents = propagate(&members, &declared("m1", "m2", kind), as_of())
            .expect("members known");
        apply_intents(&mut members, &intents);

        assert_eq!(members[0].relationships.get(&member_id("m2")), Some(&kind));
        assert_eq!(
            members[1].relationships.get(&member_id("m1")),
            Some(&reciprocal),
            "{kind:?}"
        );
        assert!(members[1].shares_meal, "{kind:?} joins the meal group");
    }
}

#[test]
fn ineligible_non_citizens_are_not_pulled_into_the_meal_group() {
    let mut members = household(date(1988, 4, 2));
    members[1].citizenship = CitizenshipStatus::IneligibleNonCitizen;
    assert!(!joins(&members, RelationshipKind::Spouse));

    members[1].citizenship = CitizenshipStatus::QualifiedNonCitizen;
    assert!(joins(&members, RelationshipKind::Spouse));
}

#[test]
fn unknown_ages_never_join_by_age() {
    assert!(joins_meal_group(RelationshipKind::Spouse, None));
    assert!(!joins_meal_group(RelationshipKind::Child, None));
    assert!(!joins_meal_group(RelationshipKind::Guardian, None));
}

#[test]
fn nothing_joins_when_the_initiator_does_not_share_meals() {
    let mut members = household(date(2010, 1, 1));
    members[0].shares_meal = false;
    assert!(!joins(&members, RelationshipKind::Spouse));
}

#[test]
fn ineligible_students_are_not_pulled_into_the_meal_group() {
    let mut members = household(date(1999, 1, 1));
    members[1].student = StudentStatus::IneligibleStudent;
    assert!(!joins(&members, RelationshipKind::Spouse));
}

#[test]
fn rejects_self_and_unknown_relationships() {
    let members = household(date(1990, 1, 1));

    assert!(matches!(
        propagate(&members, &declared("m1", "m1", RelationshipKind::Spouse), as_of()),
        Err(RelationshipError::SelfRelationship(_))
    ));
    match propagate(&members, &declared("m1", "ghost", RelationshipKind::Spouse), as_of()) {
        Err(RelationshipError::UnknownMember(id)) => assert_eq!(id, member_id("ghost")),
        other => panic!("expected unknown member, got {other:?}"),
    }
}
