use std::collections::BTreeMap;

use tracing::debug;

use super::super::domain::{MemberId, Program, ProgramAssessment, Verdict};
use super::config::LisRules;
use super::resources::{asset_total, HouseholdSnapshot};

pub(crate) fn evaluate(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &LisRules,
) -> BTreeMap<MemberId, ProgramAssessment> {
    let income = snapshot.combined(|member| rules.income.total(member));
    let assets = snapshot.combined(asset_total);

    snapshot
        .members()
        .iter()
        .map(|member| {
            let combined_income = income.get(&member.id).copied().unwrap_or(0.0);
            let combined_assets = assets.get(&member.id).copied().unwrap_or(0.0);

            let gated = snapshot.is_at_least(member, rules.minimum_age)
                && !member.is_enrolled_in(Program::Lis);
            let verdict = if !gated {
                Verdict::NotChecked
            } else {
                let limits = if snapshot.has_spouse(member) {
                    &rules.married
                } else {
                    &rules.single
                };
                if combined_income <= limits.income && combined_assets <= limits.assets {
                    Verdict::LikelyEligible
                } else {
                    Verdict::NotLikelyEligible
                }
            };

            debug!(member_id = %member.id, combined_income, combined_assets, verdict = %verdict.label(), "lis assessed");

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
