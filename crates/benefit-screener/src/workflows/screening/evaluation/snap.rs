use std::collections::BTreeMap;

use tracing::debug;

use super::super::domain::{HouseholdMember, MemberId, SnapAssessment, SnapBudget, Verdict};
use super::benefit::estimate_benefit;
use super::config::SnapRules;
use super::resources::{
    asset_total, medical_monthly_total, other_expense_total, shelter_total, utility_types,
    HouseholdSnapshot,
};
use super::tables;

/// Meal-sharing group figures gathered before any threshold is applied.
struct MealGroup<'a> {
    members: Vec<&'a HouseholdMember>,
    elderly_or_disabled: bool,
}

impl<'a> MealGroup<'a> {
    fn collect(snapshot: &HouseholdSnapshot<'a>, rules: &SnapRules) -> Self {
        let members: Vec<&HouseholdMember> = snapshot
            .members()
            .iter()
            .filter(|member| member.shares_meal)
            .collect();
        let elderly_or_disabled = members
            .iter()
            .any(|member| member.disabled || snapshot.is_at_least(member, rules.elderly_age));

        Self {
            members,
            elderly_or_disabled,
        }
    }

    fn size(&self) -> usize {
        self.members.len()
    }

    fn sum<F>(&self, figure: F) -> f64
    where
        F: Fn(&HouseholdMember) -> f64,
    {
        self.members.iter().map(|member| figure(*member)).sum()
    }
}

/// Runs the SNAP chain for the meal-sharing group. Members outside the group, and every
/// member when nobody shares meals, are left `Not Checked`.
pub(crate) fn evaluate(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &SnapRules,
) -> BTreeMap<MemberId, SnapAssessment> {
    let assessment = assess_household(snapshot, rules);

    snapshot
        .members()
        .iter()
        .map(|member| {
            let result = match &assessment {
                Some(assessment) if member.shares_meal => assessment.clone(),
                _ => SnapAssessment::default(),
            };
            (member.id.clone(), result)
        })
        .collect()
}

pub(crate) fn assess_household(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &SnapRules,
) -> Option<SnapAssessment> {
    let group = MealGroup::collect(snapshot, rules);
    if group.size() == 0 {
        return None;
    }
    let size = group.size();

    let gross_income = group.sum(|member| rules.income.total(member));
    let assets = group.sum(asset_total);
    let shelter_expenses = group.sum(shelter_total);
    let utility_allowance = tables::utility_allowance(
        group
            .members
            .iter()
            .flat_map(|member| utility_types(*member)),
    );

    let (net_income, budget) = net_income(snapshot, rules, &group, utility_allowance);

    let verdict = if gross_income <= tables::gross_income_limit(size) {
        Verdict::LikelyEligible
    } else if group.elderly_or_disabled {
        if net_income <= tables::net_income_limit(size) || assets <= rules.asset_limit {
            Verdict::LikelyEligible
        } else {
            Verdict::NotLikelyEligible
        }
    } else {
        Verdict::NotLikelyEligible
    };

    let (benefit, expedited) = if verdict.is_eligible() {
        let expedited = (assets <= rules.expedited_asset_ceiling
            && gross_income < rules.expedited_gross_income_ceiling)
            || gross_income + assets < shelter_expenses + utility_allowance
            || (assets <= rules.expedited_asset_ceiling
                && snapshot.client().migrant_or_seasonal_worker);
        (
            Some(estimate_benefit(net_income, size, &verdict)),
            Some(expedited),
        )
    } else {
        (None, None)
    };

    debug!(
        household_size = size,
        gross_income,
        net_income,
        assets,
        verdict = %verdict.label(),
        "snap household assessed"
    );

    Some(SnapAssessment {
        verdict,
        household_size: size,
        gross_income,
        net_income,
        assets,
        budget,
        benefit,
        expedited,
    })
}

/// Net income once the standard, shelter, medical and monthly deductions are applied.
/// Shelter costs include the utility allowance; the excess is measured against
/// half of the income left after the standard deduction.
fn net_income(
    snapshot: &HouseholdSnapshot<'_>,
    rules: &SnapRules,
    group: &MealGroup<'_>,
    utility_allowance: f64,
) -> (f64, SnapBudget) {
    let size = group.size();
    let mut budget = SnapBudget {
        utility_allowance,
        ..SnapBudget::default()
    };

    let mut income = 0.0;
    for member in &group.members {
        for line in rules.income.incomes(member) {
            let amount = rules.income.amount_of(line);
            if line.kind.is_earned() {
                let deduction = amount * rules.earned_income_deduction_rate;
                budget.earned_income_deduction += deduction;
                income += amount - deduction;
            } else {
                income += amount;
            }
        }
    }

    budget.standard_deduction = tables::standard_deduction(size);
    income = (income - budget.standard_deduction).max(0.0);

    let shelter_costs = group.sum(shelter_total) + utility_allowance;
    let mut excess_shelter = (shelter_costs - income / 2.0).max(0.0);
    if !group.elderly_or_disabled {
        excess_shelter = excess_shelter.min(tables::EXCESS_SHELTER_CAP);
    }
    budget.excess_shelter_deduction = excess_shelter;
    income -= excess_shelter;

    budget.other_expenses = group.sum(other_expense_total);
    income -= budget.other_expenses;

    budget.medical_deduction = group
        .members
        .iter()
        .filter(|member| member.disabled || snapshot.is_at_least(member, rules.elderly_age))
        .map(|member| (medical_monthly_total(member) - tables::MEDICAL_DISREGARD).max(0.0))
        .sum();
    income -= budget.medical_deduction;

    budget.monthly_deduction = tables::monthly_deduction(size);
    income -= budget.monthly_deduction;

    (income.max(0.0), budget)
}
