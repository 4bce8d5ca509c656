use super::super::domain::Verdict;
use super::tables;

/// Estimated monthly SNAP allotment for a household of `household_size` with the given net
/// income. Eligible households never receive less than the minimum benefit.
pub fn estimate_benefit(net_income: f64, household_size: usize, verdict: &Verdict) -> f64 {
    if household_size == 0 {
        return 0.0;
    }

    let raw = (tables::max_allotment(household_size) - tables::BENEFIT_REDUCTION_RATE * net_income)
        .max(0.0);
    let benefit = if verdict.is_eligible() && raw < tables::MINIMUM_BENEFIT {
        tables::MINIMUM_BENEFIT
    } else {
        raw
    };

    round_cents(benefit)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
