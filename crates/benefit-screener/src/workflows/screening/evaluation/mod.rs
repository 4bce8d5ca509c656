mod benefit;
mod config;
mod frequency;
mod lis;
mod msp;
mod pace;
mod ptrr;
mod resources;
mod snap;
pub mod tables;

pub use benefit::estimate_benefit;
pub use config::{
    LisRules, MspBands, MspRules, PaceBands, PaceRules, PtrrRules, ResourceLimits,
    ScreeningConfig, SnapRules,
};
pub use frequency::{normalize, to_monthly, to_yearly, Period};
pub use resources::{
    asset_total, medical_monthly_total, other_expense_total, part_b_monthly_premium,
    shelter_total, HouseholdSnapshot, IncomeRule, SpousePairs,
};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::domain::{Client, HouseholdMember, MemberId, Program, ProgramAssessment, SnapAssessment};

/// Per-program results computed against one snapshot, applied only once all are ready.
enum ProgramResults {
    Snap(BTreeMap<MemberId, SnapAssessment>),
    PerMember(Program, BTreeMap<MemberId, ProgramAssessment>),
}

/// Stateless evaluator that applies the screening rules to a household snapshot.
pub struct ScreeningEngine {
    config: ScreeningConfig,
}

impl ScreeningEngine {
    pub fn new(config: ScreeningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Runs every program against the same snapshot and returns the annotated members.
    pub fn evaluate_all(
        &self,
        members: &[HouseholdMember],
        client: &Client,
        as_of: NaiveDate,
    ) -> Vec<HouseholdMember> {
        self.evaluate_programs(&Program::ALL, members, client, as_of)
    }

    /// Runs a single program; assessments for other programs are left untouched.
    pub fn evaluate_program(
        &self,
        program: Program,
        members: &[HouseholdMember],
        client: &Client,
        as_of: NaiveDate,
    ) -> Vec<HouseholdMember> {
        self.evaluate_programs(&[program], members, client, as_of)
    }

    /// SNAP figures for the meal-sharing group without touching member records.
    pub fn assess_snap(
        &self,
        members: &[HouseholdMember],
        client: &Client,
        as_of: NaiveDate,
    ) -> Option<SnapAssessment> {
        let snapshot = HouseholdSnapshot::new(members, client, as_of);
        snap::assess_household(&snapshot, &self.config.snap)
    }

    fn evaluate_programs(
        &self,
        programs: &[Program],
        members: &[HouseholdMember],
        client: &Client,
        as_of: NaiveDate,
    ) -> Vec<HouseholdMember> {
        let snapshot = HouseholdSnapshot::new(members, client, as_of);
        debug!(
            client_id = %client.id,
            members = members.len(),
            spouse_pairs = snapshot.spouses().len(),
            %as_of,
            "evaluating household"
        );

        let results: Vec<ProgramResults> = programs
            .iter()
            .map(|program| self.run(*program, &snapshot))
            .collect();

        let mut updated = members.to_vec();
        for result in results {
            apply(&mut updated, result);
        }
        updated
    }

    fn run(&self, program: Program, snapshot: &HouseholdSnapshot<'_>) -> ProgramResults {
        match program {
            Program::Snap => ProgramResults::Snap(snap::evaluate(snapshot, &self.config.snap)),
            Program::Pace => {
                ProgramResults::PerMember(program, pace::evaluate(snapshot, &self.config.pace))
            }
            Program::Lis => {
                ProgramResults::PerMember(program, lis::evaluate(snapshot, &self.config.lis))
            }
            Program::Msp => {
                ProgramResults::PerMember(program, msp::evaluate(snapshot, &self.config.msp))
            }
            Program::Ptrr => {
                ProgramResults::PerMember(program, ptrr::evaluate(snapshot, &self.config.ptrr))
            }
        }
    }
}

impl Default for ScreeningEngine {
    fn default() -> Self {
        Self::new(ScreeningConfig::default())
    }
}

fn apply(members: &mut [HouseholdMember], result: ProgramResults) {
    match result {
        ProgramResults::Snap(mut assessments) => {
            for member in members.iter_mut() {
                if let Some(assessment) = assessments.remove(&member.id) {
                    member.assessments.snap = assessment;
                }
            }
        }
        ProgramResults::PerMember(program, mut assessments) => {
            for member in members.iter_mut() {
                let Some(assessment) = assessments.remove(&member.id) else {
                    continue;
                };
                let slot = match program {
                    Program::Pace => &mut member.assessments.pace,
                    Program::Lis => &mut member.assessments.lis,
                    Program::Msp => &mut member.assessments.msp,
                    Program::Ptrr => &mut member.assessments.ptrr,
                    Program::Snap => continue,
                };
                *slot = assessment;
            }
        }
    }
}
