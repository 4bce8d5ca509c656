use super::common::*;
use crate::workflows::screening::domain::{
    Expense, Frequency, HouseholdMember, IncomeKind, Program, UtilityType, Verdict, YearType,
};

#[test]
fn single_earner_scenario_nets_419_and_estimates_166_30() {
    let members = vec![worker("m1", 1000.0)];
    let evaluated = engine().evaluate_all(&members, &client(), as_of());
    let snap = &find(&evaluated, "m1").assessments.snap;

    assert_eq!(snap.verdict, Verdict::LikelyEligible);
    assert_eq!(snap.household_size, 1);
    assert_close(snap.gross_income, 1000.0);
    assert_close(snap.budget.earned_income_deduction, 200.0);
    assert_close(snap.budget.standard_deduction, 177.0);
    assert_close(snap.budget.monthly_deduction, 204.0);
    assert_close(snap.net_income, 419.0);
    assert_close(snap.benefit.expect("eligible households get an estimate"), 166.30);
    assert_eq!(snap.expedited, Some(false));
}

#[test]
fn gross_income_at_the_limit_is_eligible() {
    let mut member = worker("m1", 0.0);
    member.incomes.push(income(
        2510.0,
        Frequency::Monthly,
        IncomeKind::Other,
        YearType::Current,
    ));

    let snap = engine()
        .assess_snap(&[member], &client(), as_of())
        .expect("meal group present");
    assert_eq!(snap.verdict, Verdict::LikelyEligible);
}

#[test]
fn gross_income_over_the_limit_without_elderly_members_is_not_eligible() {
    let members = vec![worker("m1", 2600.0)];
    let snap = engine()
        .assess_snap(&members, &client(), as_of())
        .expect("meal group present");

    assert_eq!(snap.verdict, Verdict::NotLikelyEligible);
    assert_eq!(snap.benefit, None);
    assert_eq!(snap.expedited, None);
}

#[test]
fn elderly_households_fall_back_to_the_asset_test() {
    let mut elder = senior("m1", 70);
    elder.shares_meal = true;
    elder.incomes.push(income(
        2600.0,
        Frequency::Monthly,
        IncomeKind::Other,
        YearType::Current,
    ));
    elder.expenses.push(Expense::Medical {
        value: 100.0,
        frequency: Frequency::Monthly,
        medical_type: "Prescriptions".to_string(),
    });
    elder.assets.push(asset(3000.0));

    let snap = engine()
        .assess_snap(std::slice::from_ref(&elder), &client(), as_of())
        .expect("meal group present");
    assert_close(snap.budget.medical_deduction, 65.0);
    assert_close(snap.net_income, 2154.0);
    assert_eq!(snap.verdict, Verdict::LikelyEligible);

    elder.assets = vec![asset(5000.0)];
    let snap = engine()
        .assess_snap(&[elder], &client(), as_of())
        .expect("meal group present");
    assert_eq!(snap.verdict, Verdict::NotLikelyEligible);
}

fn high_cost_member(mut member: HouseholdMember) -> HouseholdMember {
    member.shares_meal = true;
    member.incomes.push(income(
        2600.0,
        Frequency::Monthly,
        IncomeKind::Other,
        YearType::Current,
    ));
    member.expenses.push(Expense::Shelter { value: 3000.0 });
    member
}

#[test]
fn disabled_members_lift_the_shelter_cap_and_pass_on_net_income() {
    let mut member = high_cost_member(worker("m1", 0.0));
    member.disabled = true;
    member.expenses.push(Expense::Medical {
        value: 135.0,
        frequency: Frequency::Monthly,
        medical_type: "Therapy".to_string(),
    });
    member.assets.push(asset(6000.0));

    let snap = engine()
        .assess_snap(std::slice::from_ref(&member), &client(), as_of())
        .expect("meal group present");
    assert_close(snap.budget.excess_shelter_deduction, 1788.5);
    assert_close(snap.budget.medical_deduction, 100.0);
    assert_close(snap.net_income, 330.5);
    assert_eq!(snap.verdict, Verdict::LikelyEligible);

    member.disabled = false;
    let snap = engine()
        .assess_snap(&[member], &client(), as_of())
        .expect("meal group present");
    assert_close(snap.budget.excess_shelter_deduction, 672.0);
    assert_close(snap.budget.medical_deduction, 0.0);
    assert_eq!(snap.verdict, Verdict::NotLikelyEligible);
}

#[test]
fn members_turn_elderly_on_their_sixtieth_birthday() {
    let sixty = high_cost_member(person("m1", date(1965, 6, 1)));
    let snap = engine()
        .assess_snap(&[sixty], &client(), as_of())
        .expect("meal group present");
    assert_close(snap.budget.excess_shelter_deduction, 1788.5);
    assert_eq!(snap.verdict, Verdict::LikelyEligible);

    let fifty_nine = high_cost_member(person("m1", date(1965, 6, 2)));
    let snap = engine()
        .assess_snap(&[fifty_nine], &client(), as_of())
        .expect("meal group present");
    assert_close(snap.budget.excess_shelter_deduction, 672.0);
    assert_eq!(snap.verdict, Verdict::NotLikelyEligible);
}

#[test]
fn shelter_deduction_is_capped_and_net_income_floors_at_zero() {
    let mut member = worker("m1", 1000.0);
    member.expenses.push(Expense::Shelter { value: 1200.0 });
    member.expenses.push(Expense::Utility {
        utility_type: UtilityType::HeatingCooling,
        value: 0.0,
    });

    let snap = engine()
        .assess_snap(&[member], &client(), as_of())
        .expect("meal group present");

    assert_close(snap.budget.utility_allowance, 758.0);
    assert_close(snap.budget.excess_shelter_deduction, 672.0);
    assert_close(snap.net_income, 0.0);
    assert_close(snap.benefit.expect("eligible"), 292.0);
    assert_eq!(snap.expedited, Some(true), "shelter costs exceed income");
}

#[test]
fn expedited_flags_low_income_and_migrant_households() {
    let mut member = worker("m1", 0.0);
    member.incomes.push(income(
        100.0,
        Frequency::Monthly,
        IncomeKind::Other,
        YearType::Current,
    ));
    let snap = engine()
        .assess_snap(&[member], &client(), as_of())
        .expect("meal group present");
    assert_eq!(snap.expedited, Some(true));

    let mut seasonal = worker("m1", 1000.0);
    seasonal.assets.push(asset(50.0));
    let mut migrant_client = client();
    migrant_client.migrant_or_seasonal_worker = true;
    let snap = engine()
        .assess_snap(&[seasonal], &migrant_client, as_of())
        .expect("meal group present");
    assert_eq!(snap.expedited, Some(true));
}

#[test]
fn two_earners_are_budgeted_as_one_meal_group() {
    let members = vec![worker("m1", 1000.0), worker("m2", 1000.0)];
    let snap = engine()
        .assess_snap(&members, &client(), as_of())
        .expect("meal group present");

    assert_eq!(snap.household_size, 2);
    assert_close(snap.net_income, 1219.0);
    assert_close(snap.benefit.expect("eligible"), 170.30);
}

#[test]
fn members_outside_the_meal_group_stay_not_checked() {
    let mut lodger = worker("m2", 4000.0);
    lodger.shares_meal = false;
    let members = vec![worker("m1", 1000.0), lodger];

    let evaluated = engine().evaluate_program(Program::Snap, &members, &client(), as_of());
    assert_eq!(find(&evaluated, "m1").assessments.snap.household_size, 1);
    assert_eq!(
        find(&evaluated, "m2").assessments.snap.verdict,
        Verdict::NotChecked
    );

    let mut alone = worker("m3", 500.0);
    alone.shares_meal = false;
    assert!(engine().assess_snap(&[alone], &client(), as_of()).is_none());
}

#[test]
fn weekly_income_is_normalized_to_monthly() {
    let mut member = worker("m1", 0.0);
    member.incomes.push(income(
        600.0,
        Frequency::Weekly,
        IncomeKind::Other,
        YearType::Current,
    ));
    member.incomes.push(income(
        9999.0,
        Frequency::Monthly,
        IncomeKind::Other,
        YearType::Previous,
    ));

    let snap = engine()
        .assess_snap(&[member], &client(), as_of())
        .expect("meal group present");
    assert_close(snap.gross_income, 2598.0);
    assert_eq!(snap.verdict, Verdict::NotLikelyEligible);
}

#[test]
fn evaluation_is_idempotent_on_an_unchanged_household() {
    let mut elder = senior("m2", 70);
    elder.shares_meal = true;
    let members = vec![worker("m1", 1800.0), elder];

    let first = engine().evaluate_all(&members, &client(), as_of());
    let second = engine().evaluate_all(&first, &client(), as_of());
    assert_eq!(first, second);
}

#[test]
fn verdict_and_benefit_are_monotone_in_income() {
    let mut seen_ineligible = false;
    let mut previous_benefit = f64::INFINITY;

    for step in 0..=60 {
        let monthly = step as f64 * 75.0;
        let snap = engine()
            .assess_snap(&[worker("m1", monthly)], &client(), as_of())
            .expect("meal group present");

        if seen_ineligible {
            assert_eq!(
                snap.verdict,
                Verdict::NotLikelyEligible,
                "eligibility returned at {monthly}"
            );
            continue;
        }

        match snap.benefit {
            Some(benefit) => {
                assert!(benefit <= previous_benefit, "benefit rose at {monthly}");
                previous_benefit = benefit;
            }
            None => seen_ineligible = true,
        }
    }

    assert!(seen_ineligible);
}
