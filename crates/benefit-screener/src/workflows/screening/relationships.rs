use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Age, HouseholdMember, MemberId, RelationshipKind};

const FAMILY_MEAL_AGE_LIMIT: u32 = 22;
const WARD_MEAL_AGE_LIMIT: u32 = 18;

/// A member declared how another member is related to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDeclared {
    pub member_id: MemberId,
    pub related_id: MemberId,
    pub kind: RelationshipKind,
}

/// Mutation the propagation rule asks the caller to apply before re-evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum MemberIntent {
    SetRelationship {
        member_id: MemberId,
        related_id: MemberId,
        kind: RelationshipKind,
    },
    JoinMealGroup {
        member_id: MemberId,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RelationshipError {
    #[error("member {0} is not part of the household")]
    UnknownMember(MemberId),
    #[error("member {0} cannot be related to themselves")]
    SelfRelationship(MemberId),
}

/// Whether a related member of `kind` and `age` joins the declaring member's meal group.
pub fn joins_meal_group(kind: RelationshipKind, age: Option<Age>) -> bool {
    let younger_than = |limit: u32| age.map(|age| age.years < limit).unwrap_or(false);

    match kind {
        RelationshipKind::Spouse => true,
        RelationshipKind::Parent
        | RelationshipKind::Child
        | RelationshipKind::StepParent
        | RelationshipKind::StepChild
        | RelationshipKind::AdoptiveParent
        | RelationshipKind::AdoptedChild => younger_than(FAMILY_MEAL_AGE_LIMIT),
        RelationshipKind::Guardian | RelationshipKind::Ward => younger_than(WARD_MEAL_AGE_LIMIT),
        RelationshipKind::Sibling
        | RelationshipKind::Grandparent
        | RelationshipKind::Grandchild
        | RelationshipKind::Other => false,
    }
}

/// Turns a relationship declaration into the intents needed to record it.
pub fn propagate(
    members: &[HouseholdMember],
    event: &RelationshipDeclared,
    as_of: NaiveDate,
) -> Result<Vec<MemberIntent>, RelationshipError> {
    if event.member_id == event.related_id {
        return Err(RelationshipError::SelfRelationship(event.member_id.clone()));
    }

    let find = |id: &MemberId| {
        members
            .iter()
            .find(|member| &member.id == id)
            .ok_or_else(|| RelationshipError::UnknownMember(id.clone()))
    };
    let member = find(&event.member_id)?;
    let related = find(&event.related_id)?;

    let mut intents = vec![
        MemberIntent::SetRelationship {
            member_id: member.id.clone(),
            related_id: related.id.clone(),
            kind: event.kind,
        },
        MemberIntent::SetRelationship {
            member_id: related.id.clone(),
            related_id: member.id.clone(),
            kind: event.kind.reciprocal(),
        },
    ];

    let joins = member.shares_meal
        && !related.shares_meal
        && !related.is_excluded_from_meal_group()
        && joins_meal_group(event.kind, related.age_on(as_of));
    if joins {
        intents.push(MemberIntent::JoinMealGroup {
            member_id: related.id.clone(),
        });
    }

    debug!(
        member_id = %member.id,
        related_id = %related.id,
        kind = ?event.kind,
        joins_meal_group = joins,
        "relationship declared"
    );

    Ok(intents)
}

/// Applies intents in order. Intents naming unknown members are skipped.
pub fn apply_intents(members: &mut [HouseholdMember], intents: &[MemberIntent]) {
    for intent in intents {
        match intent {
            MemberIntent::SetRelationship {
                member_id,
                related_id,
                kind,
            } => {
                if let Some(member) = members.iter_mut().find(|member| &member.id == member_id) {
                    member.relationships.insert(related_id.clone(), *kind);
                }
            }
            MemberIntent::JoinMealGroup { member_id } => {
                if let Some(member) = members.iter_mut().find(|member| &member.id == member_id) {
                    member.shares_meal = true;
                }
            }
        }
    }
}
