use serde::{Deserialize, Serialize};

use super::super::domain::Frequency;

/// Period a program compares income against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Monthly,
    Yearly,
}

pub fn monthly_multiplier(frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Weekly => 4.33,
        Frequency::Biweekly => 2.17,
        Frequency::Bimonthly => 2.0,
        Frequency::Monthly => 1.0,
        Frequency::Quarterly => 1.0 / 3.0,
        Frequency::Yearly => 1.0 / 12.0,
    }
}

pub fn to_monthly(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Quarterly => amount / 3.0,
        Frequency::Yearly => amount / 12.0,
        other => amount * monthly_multiplier(other),
    }
}

pub fn to_yearly(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Yearly => amount,
        Frequency::Quarterly => amount * 4.0,
        other => to_monthly(amount, other) * 12.0,
    }
}

pub fn normalize(amount: f64, frequency: Frequency, period: Period) -> f64 {
    match period {
        Period::Monthly => to_monthly(amount, frequency),
        Period::Yearly => to_yearly(amount, frequency),
    }
}
