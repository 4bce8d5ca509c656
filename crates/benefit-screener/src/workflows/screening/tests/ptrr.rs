use super::common::*;
use crate::workflows::screening::domain::{
    Frequency, Income, IncomeKind, Program, Verdict, YearType,
};

fn previous_income(amount: f64) -> Income {
    income(amount, Frequency::Monthly, IncomeKind::Other, YearType::Previous)
}

#[test]
fn members_without_prior_year_housing_costs_are_not_eligible() {
    let mut member = person("m1", date(1950, 1, 1));
    member.incomes.push(previous_income(1_000.0));

    let evaluated = engine().evaluate_program(Program::Ptrr, &[member], &client(), as_of());
    let ptrr = &evaluated[0].assessments.ptrr;
    assert_eq!(ptrr.verdict, Verdict::NotLikelyEligible);
    assert_eq!(ptrr.combined_income, None);
}

#[test]
fn previous_year_income_is_compared_as_entered() {
    let mut member = person("m1", date(1980, 1, 1));
    member.prior_year_housing_costs.push(property_tax(1_800.0));
    member.incomes.push(previous_income(30_000.0));
    member.incomes.push(income(
        90_000.0,
        Frequency::Yearly,
        IncomeKind::Other,
        YearType::Current,
    ));

    let evaluated = engine().evaluate_program(Program::Ptrr, &[member], &client(), as_of());
    let ptrr = &evaluated[0].assessments.ptrr;
    assert_eq!(ptrr.verdict, Verdict::LikelyEligible);
    assert_eq!(ptrr.combined_income, Some(30_000.0));
}

#[test]
fn spouse_income_counts_against_the_limit() {
    let mut a = person("a", date(1950, 1, 1));
    a.prior_year_housing_costs.push(property_tax(1_800.0));
    a.incomes.push(previous_income(30_000.0));
    let mut b = person("b", date(1952, 1, 1));
    b.incomes.push(previous_income(20_000.0));
    marry(&mut a, &mut b);

    let evaluated = engine().evaluate_program(Program::Ptrr, &[a, b], &client(), as_of());
    let a = &find(&evaluated, "a").assessments.ptrr;
    assert_eq!(a.verdict, Verdict::NotLikelyEligible);
    assert_eq!(a.combined_income, Some(50_000.0));
}

#[test]
fn members_who_already_applied_are_not_checked() {
    let mut member = person("m1", date(1950, 1, 1));
    member.prior_year_housing_costs.push(property_tax(1_800.0));
    member.enrolled_programs.insert(Program::Ptrr);

    let evaluated = engine().evaluate_program(Program::Ptrr, &[member], &client(), as_of());
    assert_eq!(evaluated[0].assessments.ptrr.verdict, Verdict::NotChecked);
}
