use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    Assessments, ClientId, HouseholdMember, MemberId, Program, SnapAssessment,
};
use super::evaluation::{ScreeningConfig, ScreeningEngine};
use super::relationships::{apply_intents, propagate, RelationshipDeclared, RelationshipError};
use super::repository::{HouseholdRepository, RepositoryError};

/// Service composing the record store and the screening engine.
pub struct ScreeningService<R> {
    repository: Arc<R>,
    engine: Arc<ScreeningEngine>,
}

impl<R> ScreeningService<R>
where
    R: HouseholdRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScreeningConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(ScreeningEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &ScreeningEngine {
        &self.engine
    }

    /// Re-evaluate every program for a household and persist the verdicts.
    pub fn screen(
        &self,
        client_id: &ClientId,
        as_of: NaiveDate,
    ) -> Result<HouseholdScreening, ScreeningServiceError> {
        let client = self.repository.load_client(client_id)?;
        let members = self.repository.load_household(client_id)?;

        let evaluated = self.engine.evaluate_all(&members, &client, as_of);
        self.persist(client_id, evaluated, as_of)
    }

    /// Record a relationship, apply any meal-group changes, then re-evaluate the household.
    pub fn declare_relationship(
        &self,
        client_id: &ClientId,
        declaration: &RelationshipDeclared,
        as_of: NaiveDate,
    ) -> Result<HouseholdScreening, ScreeningServiceError> {
        let client = self.repository.load_client(client_id)?;
        let mut members = self.repository.load_household(client_id)?;

        let intents = propagate(&members, declaration, as_of)?;
        apply_intents(&mut members, &intents);

        let evaluated = self.engine.evaluate_all(&members, &client, as_of);
        self.persist(client_id, evaluated, as_of)
    }

    /// Fetch the persisted members and their last recorded assessments.
    pub fn household(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, ScreeningServiceError> {
        Ok(self.repository.load_household(client_id)?)
    }

    fn persist(
        &self,
        client_id: &ClientId,
        members: Vec<HouseholdMember>,
        as_of: NaiveDate,
    ) -> Result<HouseholdScreening, ScreeningServiceError> {
        let screening = HouseholdScreening::from_members(client_id.clone(), as_of, &members);

        if let Err(error) = self.repository.save_household(client_id, members) {
            warn!(%client_id, %error, "failed to persist screening results");
            return Err(error.into());
        }

        let snap_verdict = screening
            .snap
            .as_ref()
            .map(|snap| snap.verdict)
            .unwrap_or_default();
        info!(
            %client_id,
            members = screening.members.len(),
            snap = %snap_verdict.label(),
            "household screened"
        );

        Ok(screening)
    }
}

/// Serializable summary returned to callers after a screening pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseholdScreening {
    pub client_id: ClientId,
    pub as_of: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap: Option<SnapAssessment>,
    pub members: Vec<MemberScreeningView>,
}

impl HouseholdScreening {
    pub fn from_members(client_id: ClientId, as_of: NaiveDate, members: &[HouseholdMember]) -> Self {
        let snap = members
            .iter()
            .find(|member| member.shares_meal)
            .map(|member| member.assessments.snap.clone());

        Self {
            client_id,
            as_of,
            snap,
            members: members.iter().map(MemberScreeningView::from).collect(),
        }
    }

    pub fn member(&self, member_id: &MemberId) -> Option<&MemberScreeningView> {
        self.members
            .iter()
            .find(|member| &member.member_id == member_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberScreeningView {
    pub member_id: MemberId,
    pub name: String,
    pub shares_meal: bool,
    pub verdicts: BTreeMap<Program, String>,
    pub assessments: Assessments,
}

impl From<&HouseholdMember> for MemberScreeningView {
    fn from(member: &HouseholdMember) -> Self {
        Self {
            member_id: member.id.clone(),
            name: member.name.clone(),
            shares_meal: member.shares_meal,
            verdicts: member.assessments.verdict_labels(),
            assessments: member.assessments.clone(),
        }
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Relationship(#[from] RelationshipError),
}
