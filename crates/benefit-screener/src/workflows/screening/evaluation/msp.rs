use std::collections::BTreeMap;

use tracing::debug;

use super::super::domain::{
    BenefitTier, HouseholdMember, MemberId, Program, ProgramAssessment, Verdict,
};
use super::config::{MspBands, MspRules};
use super::resources::{asset_total, HouseholdSnapshot};

/// Earned lines lose the earned-income disregard and are halved; the flat general
/// disregard comes off the member's total once, in the same unit the lines are entered in.
pub(crate) fn countable_income(member: &HouseholdMember, rules: &MspRules) -> f64 {
    let lines: f64 = rules
        .income
        .incomes(member)
        .map(|income| {
            let amount = rules.income.amount_of(income);
            if income.kind.is_earned() {
                (amount - rules.earned_income_disregard).max(0.0) / 2.0
            } else {
                amount
            }
        })
        .sum();

    lines - rules.general_disregard
}

fn tier_for(income: f64, assets: f64, bands: &MspBands) -> Verdict {
    if assets > bands.assets {
        return Verdict::NotLikelyEligible;
    }

    if income <= bands.qmb {
        Verdict::LikelyEligibleFor(BenefitTier::Qmb)
    } else if income <= bands.slmb {
        Verdict::LikelyEligibleFor(BenefitTier::Slmb)
    } else if income <= bands.qi {
        Verdict::LikelyEligibleFor(BenefitTier::Qi)
    } else {
        Verdict::NotLikelyEligible
    }
}

pub(crate) fn evaluate(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &MspRules,
) -> BTreeMap<MemberId, ProgramAssessment> {
    let income = snapshot.combined(|member| countable_income(member, rules));
    let assets = snapshot.combined(asset_total);

    snapshot
        .members()
        .iter()
        .map(|member| {
            let combined_income = income.get(&member.id).copied().unwrap_or(0.0);
            let combined_assets = assets.get(&member.id).copied().unwrap_or(0.0);

            let gated = snapshot.is_at_least(member, rules.minimum_age)
                && !member.is_enrolled_in(Program::Msp);
            let verdict = if gated {
                let bands = if snapshot.has_spouse(member) {
                    &rules.married
                } else {
                    &rules.single
                };
                tier_for(combined_income, combined_assets, bands)
            } else {
                Verdict::NotChecked
            };

            debug!(member_id = %member.id, combined_income, combined_assets, verdict = %verdict.label(), "msp assessed");

            (
                member.id.clone(),
                ProgramAssessment {
                    verdict,
                    combined_income: Some(combined_income),
                    combined_assets: Some(combined_assets),
                },
            )
        })
        .collect()
}
