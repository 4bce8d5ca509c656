use std::io::Read;

use serde::{Deserialize, Serialize};

use super::super::domain::YearType;
use super::frequency::Period;
use super::resources::IncomeRule;

/// Thresholds and income rules for every screened program.
///
/// Deserializes from partial JSON; any omitted section or field keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub snap: SnapRules,
    pub pace: PaceRules,
    pub lis: LisRules,
    pub msp: MspRules,
    pub ptrr: PtrrRules,
}

impl ScreeningConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapRules {
    pub income: IncomeRule,
    pub earned_income_deduction_rate: f64,
    pub elderly_age: u32,
    pub asset_limit: f64,
    pub expedited_asset_ceiling: f64,
    pub expedited_gross_income_ceiling: f64,
}

impl Default for SnapRules {
    fn default() -> Self {
        Self {
            income: IncomeRule::new(YearType::Current, true, Period::Monthly),
            earned_income_deduction_rate: 0.2,
            elderly_age: 60,
            asset_limit: 4500.0,
            expedited_asset_ceiling: 100.0,
            expedited_gross_income_ceiling: 150.0,
        }
    }
}

/// Income bands for one filing situation; PACE is strictly below `pace_below`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceBands {
    pub pace_below: f64,
    pub pacenet_max: f64,
    pub buffer_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceRules {
    pub income: IncomeRule,
    pub minimum_age: u32,
    pub single: PaceBands,
    pub married: PaceBands,
}

impl Default for PaceRules {
    fn default() -> Self {
        Self {
            income: IncomeRule::new(YearType::Previous, true, Period::Yearly),
            minimum_age: 65,
            single: PaceBands {
                pace_below: 14_500.0,
                pacenet_max: 33_500.0,
                buffer_max: 43_500.0,
            },
            married: PaceBands {
                pace_below: 17_700.0,
                pacenet_max: 41_500.0,
                buffer_max: 51_500.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub income: f64,
    pub assets: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LisRules {
    pub income: IncomeRule,
    pub minimum_age: u32,
    pub single: ResourceLimits,
    pub married: ResourceLimits,
}

impl Default for LisRules {
    fn default() -> Self {
        Self {
            income: IncomeRule::new(YearType::Current, false, Period::Yearly),
            minimum_age: 65,
            single: ResourceLimits {
                income: 22_590.0,
                assets: 17_600.0,
            },
            married: ResourceLimits {
                income: 30_660.0,
                assets: 35_130.0,
            },
        }
    }
}

/// Ascending MSP income ceilings plus the shared asset ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MspBands {
    pub qmb: f64,
    pub slmb: f64,
    pub qi: f64,
    pub assets: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MspRules {
    pub income: IncomeRule,
    pub minimum_age: u32,
    pub earned_income_disregard: f64,
    pub general_disregard: f64,
    pub single: MspBands,
    pub married: MspBands,
}

impl Default for MspRules {
    fn default() -> Self {
        Self {
            income: IncomeRule::new(YearType::Current, false, Period::Yearly),
            minimum_age: 65,
            earned_income_disregard: 65.0,
            general_disregard: 240.0,
            single: MspBands {
                qmb: 15_900.0,
                slmb: 19_860.0,
                qi: 23_880.0,
                assets: 9_660.0,
            },
            married: MspBands {
                qmb: 21_396.0,
                slmb: 26_700.0,
                qi: 31_980.0,
                assets: 14_470.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtrrRules {
    pub income: IncomeRule,
    pub income_limit: f64,
}

impl Default for PtrrRules {
    fn default() -> Self {
        Self {
            income: IncomeRule::new(YearType::Previous, false, Period::Yearly),
            income_limit: 46_520.0,
        }
    }
}
