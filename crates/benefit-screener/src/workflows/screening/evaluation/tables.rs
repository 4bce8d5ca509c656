//! Static SNAP deduction and threshold tables, indexed by meal-sharing household size.
//!
//! Index 0 is unused. Households larger than the last row use the last row.

use std::collections::BTreeSet;

use super::super::domain::UtilityType;

pub const LARGEST_TABLED_HOUSEHOLD: usize = 15;

pub const STANDARD_DEDUCTION: [f64; 16] = [
    0.0, 177.0, 177.0, 177.0, 184.0, 215.0, 246.0, 246.0, 246.0, 246.0, 246.0, 246.0, 246.0,
    246.0, 246.0, 246.0,
];

pub const GROSS_INCOME_LIMIT: [f64; 16] = [
    0.0, 2510.0, 3407.0, 4303.0, 5200.0, 6097.0, 6993.0, 7890.0, 8787.0, 9684.0, 10581.0,
    11478.0, 12375.0, 13272.0, 14169.0, 15066.0,
];

pub const NET_INCOME_LIMIT: [f64; 16] = [
    0.0, 1255.0, 1704.0, 2152.0, 2600.0, 3049.0, 3497.0, 3945.0, 4394.0, 4843.0, 5292.0, 5741.0,
    6190.0, 6639.0, 7088.0, 7537.0,
];

pub const MAX_ALLOTMENT: [f64; 16] = [
    0.0, 292.0, 536.0, 768.0, 975.0, 1158.0, 1390.0, 1536.0, 1756.0, 1976.0, 2196.0, 2416.0,
    2636.0, 2856.0, 3076.0, 3296.0,
];

pub const EXCESS_SHELTER_CAP: f64 = 672.0;
pub const MEDICAL_DISREGARD: f64 = 35.0;
pub const HEATING_COOLING_ALLOWANCE: f64 = 758.0;
pub const BASIC_LIMITED_ALLOWANCE: f64 = 402.0;
pub const SINGLE_UTILITY_ALLOWANCE: f64 = 72.0;
pub const PHONE_ALLOWANCE: f64 = 34.0;
pub const BENEFIT_REDUCTION_RATE: f64 = 0.3;
pub const MINIMUM_BENEFIT: f64 = 23.0;

fn row(size: usize) -> usize {
    size.clamp(1, LARGEST_TABLED_HOUSEHOLD)
}

pub fn standard_deduction(size: usize) -> f64 {
    STANDARD_DEDUCTION[row(size)]
}

pub fn gross_income_limit(size: usize) -> f64 {
    GROSS_INCOME_LIMIT[row(size)]
}

pub fn net_income_limit(size: usize) -> f64 {
    NET_INCOME_LIMIT[row(size)]
}

pub fn max_allotment(size: usize) -> f64 {
    MAX_ALLOTMENT[row(size)]
}

/// Flat per-size deduction applied after the itemised deductions.
pub fn monthly_deduction(size: usize) -> f64 {
    match size {
        0..=3 => 204.0,
        4 => 217.0,
        5 => 254.0,
        _ => 291.0,
    }
}

/// Selects the utility allowance from the utility types the meal-sharing group pays for.
pub fn utility_allowance<I>(types: I) -> f64
where
    I: IntoIterator<Item = UtilityType>,
{
    let present: BTreeSet<UtilityType> = types.into_iter().collect();

    if present.contains(&UtilityType::HeatingCooling) {
        return HEATING_COOLING_ALLOWANCE;
    }

    if present.len() >= 2 {
        return BASIC_LIMITED_ALLOWANCE;
    }

    present
        .iter()
        .map(|utility| match utility {
            UtilityType::Phone => PHONE_ALLOWANCE,
            _ => SINGLE_UTILITY_ALLOWANCE,
        })
        .sum()
}
