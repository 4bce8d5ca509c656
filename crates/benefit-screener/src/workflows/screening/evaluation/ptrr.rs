use std::collections::BTreeMap;

use tracing::debug;

use super::super::domain::{MemberId, Program, ProgramAssessment, Verdict};
use super::config::PtrrRules;
use super::resources::HouseholdSnapshot;

pub(crate) fn evaluate(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &PtrrRules,
) -> BTreeMap<MemberId, ProgramAssessment> {
    let income = snapshot.combined(|member| rules.income.total(member));

    snapshot
        .members()
        .iter()
        .map(|member| {
            // No property tax or rent on file for last year ends the check.
            if member.prior_year_housing_costs.is_empty() {
                return (
                    member.id.clone(),
                    ProgramAssessment {
                        verdict: Verdict::NotLikelyEligible,
                        combined_income: None,
                        combined_assets: None,
                    },
                );
            }

            let combined_income = income.get(&member.id).copied().unwrap_or(0.0);
            let verdict = if member.is_enrolled_in(Program::Ptrr) {
                Verdict::NotChecked
            } else if combined_income <= rules.income_limit {
                Verdict::LikelyEligible
            } else {
                Verdict::NotLikelyEligible
            };

            debug!(member_id = %member.id, combined_income, verdict = %verdict.label(), "ptrr assessed");

            (
                member.id.clone(),
                ProgramAssessment {
                    verdict,
                    combined_income: Some(combined_income),
                    combined_assets: None,
                },
            )
        })
        .collect()
}
