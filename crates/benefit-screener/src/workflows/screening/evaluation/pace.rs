use std::collections::BTreeMap;

use tracing::debug;

use super::super::domain::{
    BenefitTier, HouseholdMember, MemberId, Program, ProgramAssessment, Verdict,
};
use super::config::{PaceBands, PaceRules};
use super::resources::{part_b_monthly_premium, HouseholdSnapshot};

/// Previous-year yearly income net of the member's own Part B premiums.
fn countable_income(member: &HouseholdMember, rules: &PaceRules) -> f64 {
    rules.income.total(member) - part_b_monthly_premium(member) * 12.0
}

/// Age gate with the "almost 65" clause: `(age >= 65 || 64 years 11 months) && !enrolled`.
pub(crate) fn passes_gate(
    snapshot: &HouseholdSnapshot<'_>,
    member: &HouseholdMember,
    rules: &PaceRules,
) -> bool {
    let old_enough = snapshot
        .age_of(member)
        .map(|age| {
            age.years >= rules.minimum_age
                || (age.years + 1 == rules.minimum_age && age.months == 11)
        })
        .unwrap_or(false);

    old_enough && !member.is_enrolled_in(Program::Pace)
}

fn tier_for(income: f64, bands: &PaceBands) -> Verdict {
    if income < bands.pace_below {
        Verdict::LikelyEligibleFor(BenefitTier::Pace)
    } else if income <= bands.pacenet_max {
        Verdict::LikelyEligibleFor(BenefitTier::Pacenet)
    } else if income <= bands.buffer_max {
        Verdict::WithinIncomeBuffer(BenefitTier::Pacenet)
    } else {
        Verdict::NotLikelyEligible
    }
}

pub(crate) fn evaluate(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &PaceRules,
) -> BTreeMap<MemberId, ProgramAssessment> {
    let combined = snapshot.combined(|member| countable_income(member, rules));

    snapshot
        .members()
        .iter()
        .map(|member| {
            let income = combined.get(&member.id).copied().unwrap_or(0.0);
            let verdict = if passes_gate(snapshot, member, rules) {
                let bands = if snapshot.has_spouse(member) {
                    &rules.married
                } else {
                    &rules.single
                };
                tier_for(income, bands)
            } else {
                Verdict::NotChecked
            };

            debug!(member_id = %member.id, income, verdict = %verdict.label(), "pace assessed");

            (
                member.id.clone(),
                ProgramAssessment {
                    verdict,
                    combined_income: Some(income),
                    combined_assets: None,
                },
            )
        })
        .collect()
}
