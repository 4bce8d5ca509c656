use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for a screened household (the client record).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a member within a household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assistance programs covered by the screening engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    Snap,
    Pace,
    Lis,
    Msp,
    Ptrr,
}

impl Program {
    pub const ALL: [Program; 5] = [
        Program::Snap,
        Program::Pace,
        Program::Lis,
        Program::Msp,
        Program::Ptrr,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Program::Snap => "SNAP",
            Program::Pace => "PACE/PACENET",
            Program::Lis => "LIS",
            Program::Msp => "MSP",
            Program::Ptrr => "PTRR",
        }
    }
}

/// Household-level fields carried on the client record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(default)]
    pub residency: ResidencyStatus,
    #[serde(default)]
    pub migrant_or_seasonal_worker: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidencyStatus {
    #[default]
    Resident,
    NonResident,
    Unknown,
}

/// Recurrence of a monetary amount. Unknown or missing labels read as monthly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Bimonthly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "biweekly" => Self::Biweekly,
            "bimonthly" => Self::Bimonthly,
            "quarterly" => Self::Quarterly,
            "yearly" => Self::Yearly,
            _ => Self::Monthly,
        }
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Frequency::from_label).unwrap_or_default())
    }
}

// Quarterly is only meaningful for medical expenses.
fn income_frequency<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Frequency::deserialize(deserializer)? {
        Frequency::Quarterly => Frequency::Monthly,
        other => other,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeKind {
    Employment,
    SelfEmployment,
    #[default]
    Other,
}

impl IncomeKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "employment" => Self::Employment,
            "self-employment" | "self employment" | "selfemployment" => Self::SelfEmployment,
            _ => Self::Other,
        }
    }

    pub const fn is_earned(self) -> bool {
        matches!(self, IncomeKind::Employment | IncomeKind::SelfEmployment)
    }
}

impl<'de> Deserialize<'de> for IncomeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(IncomeKind::from_label).unwrap_or_default())
    }
}

/// Tax year an income line belongs to, relative to the screening date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearType {
    #[default]
    #[serde(alias = "Current")]
    Current,
    #[serde(alias = "Previous")]
    Previous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub amount: f64,
    #[serde(default, deserialize_with = "income_frequency")]
    pub frequency: Frequency,
    #[serde(default)]
    pub kind: IncomeKind,
    #[serde(default)]
    pub year: YearType,
}

impl Income {
    pub fn new(amount: f64, frequency: Frequency, kind: IncomeKind, year: YearType) -> Self {
        Self {
            amount,
            frequency,
            kind,
            year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UtilityType {
    #[serde(rename = "Heating/Cooling")]
    HeatingCooling,
    Electricity,
    Gas,
    Water,
    Sewage,
    Trash,
    Phone,
}

/// Expense line recorded against a member, tagged by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Expense {
    Shelter {
        value: f64,
    },
    Utility {
        utility_type: UtilityType,
        #[serde(default)]
        value: f64,
    },
    Other {
        value: f64,
    },
    Medical {
        value: f64,
        #[serde(default)]
        frequency: Frequency,
        #[serde(default)]
        medical_type: String,
    },
}

pub const MEDICARE_PART_B: &str = "Medicare Part B";

impl Expense {
    pub fn is_part_b_premium(&self) -> bool {
        match self {
            Expense::Medical { medical_type, .. } => {
                medical_type.trim().eq_ignore_ascii_case(MEDICARE_PART_B)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingCostKind {
    PropertyTax,
    Rent,
}

/// Property tax or rent paid during the previous year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorYearHousingCost {
    pub kind: HousingCostKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Separated,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitizenshipStatus {
    #[default]
    Citizen,
    QualifiedNonCitizen,
    IneligibleNonCitizen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    NotStudent,
    EligibleStudent,
    IneligibleStudent,
}

/// What the related member is to the member holding the relationship entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Spouse,
    Parent,
    Child,
    StepParent,
    StepChild,
    AdoptiveParent,
    AdoptedChild,
    Guardian,
    Ward,
    Sibling,
    Grandparent,
    Grandchild,
    #[serde(other)]
    Other,
}

impl RelationshipKind {
    pub const fn reciprocal(self) -> Self {
        match self {
            RelationshipKind::Spouse => RelationshipKind::Spouse,
            RelationshipKind::Parent => RelationshipKind::Child,
            RelationshipKind::Child => RelationshipKind::Parent,
            RelationshipKind::StepParent => RelationshipKind::StepChild,
            RelationshipKind::StepChild => RelationshipKind::StepParent,
            RelationshipKind::AdoptiveParent => RelationshipKind::AdoptedChild,
            RelationshipKind::AdoptedChild => RelationshipKind::AdoptiveParent,
            RelationshipKind::Guardian => RelationshipKind::Ward,
            RelationshipKind::Ward => RelationshipKind::Guardian,
            RelationshipKind::Sibling => RelationshipKind::Sibling,
            RelationshipKind::Grandparent => RelationshipKind::Grandchild,
            RelationshipKind::Grandchild => RelationshipKind::Grandparent,
            RelationshipKind::Other => RelationshipKind::Other,
        }
    }
}

/// Completed years, months, and days between a birth date and a screening date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Age {
    pub fn between(born: NaiveDate, as_of: NaiveDate) -> Option<Self> {
        if as_of < born {
            return None;
        }

        let mut years = as_of.year() - born.year();
        let mut months = as_of.month() as i32 - born.month() as i32;
        let mut days = as_of.day() as i32 - born.day() as i32;

        if days < 0 {
            months -= 1;
            let previous_month_len = as_of
                .with_day(1)
                .and_then(|first| first.pred_opt())
                .map(|last| last.day() as i32)
                .unwrap_or(30);
            days += previous_month_len;
        }
        if months < 0 {
            years -= 1;
            months += 12;
        }

        Some(Self {
            years: years as u32,
            months: months as u32,
            days: days.max(0) as u32,
        })
    }
}

/// A person on the household record along with everything the engine reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdMember {
    pub id: MemberId,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub marital_status: MaritalStatus,
    pub disabled: bool,
    pub citizenship: CitizenshipStatus,
    pub student: StudentStatus,
    pub shares_meal: bool,
    pub incomes: Vec<Income>,
    pub assets: Vec<Asset>,
    pub expenses: Vec<Expense>,
    pub prior_year_housing_costs: Vec<PriorYearHousingCost>,
    /// Programs the member reports already receiving (PTRR: already applied this cycle).
    pub enrolled_programs: BTreeSet<Program>,
    pub relationships: BTreeMap<MemberId, RelationshipKind>,
    pub assessments: Assessments,
}

impl HouseholdMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id.into()),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn age_on(&self, as_of: NaiveDate) -> Option<Age> {
        self.date_of_birth
            .and_then(|born| Age::between(born, as_of))
    }

    pub fn is_enrolled_in(&self, program: Program) -> bool {
        self.enrolled_programs.contains(&program)
    }

    /// Ineligible non-citizens and ineligible students never join the meal group automatically.
    pub fn is_excluded_from_meal_group(&self) -> bool {
        self.citizenship == CitizenshipStatus::IneligibleNonCitizen
            || self.student == StudentStatus::IneligibleStudent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitTier {
    Pace,
    Pacenet,
    Qmb,
    Slmb,
    Qi,
}

impl BenefitTier {
    pub const fn label(self) -> &'static str {
        match self {
            BenefitTier::Pace => "PACE",
            BenefitTier::Pacenet => "PACENET",
            BenefitTier::Qmb => "QMB",
            BenefitTier::Slmb => "SLMB",
            BenefitTier::Qi => "QI",
        }
    }
}

/// Eligibility status written back onto a member for each program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "tier", rename_all = "snake_case")]
pub enum Verdict {
    #[default]
    NotChecked,
    LikelyEligible,
    LikelyEligibleFor(BenefitTier),
    WithinIncomeBuffer(BenefitTier),
    NotLikelyEligible,
}

impl Verdict {
    pub fn label(&self) -> String {
        match self {
            Verdict::NotChecked => "Not Checked".to_string(),
            Verdict::LikelyEligible => "Likely Eligible".to_string(),
            Verdict::LikelyEligibleFor(tier) => format!("Likely Eligible for {}", tier.label()),
            Verdict::WithinIncomeBuffer(tier) => {
                format!("Not Likely Eligible (within {} buffer)", tier.label())
            }
            Verdict::NotLikelyEligible => "Not Likely Eligible".to_string(),
        }
    }

    pub const fn is_eligible(&self) -> bool {
        matches!(self, Verdict::LikelyEligible | Verdict::LikelyEligibleFor(_))
    }
}

/// Derived figures and verdict for a program evaluated per member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramAssessment {
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_assets: Option<f64>,
}

/// Deductions applied on the way from gross to net SNAP income.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapBudget {
    pub earned_income_deduction: f64,
    pub standard_deduction: f64,
    pub utility_allowance: f64,
    pub excess_shelter_deduction: f64,
    pub other_expenses: f64,
    pub medical_deduction: f64,
    pub monthly_deduction: f64,
}

/// SNAP result for the meal-sharing group, stamped on each participating member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapAssessment {
    pub verdict: Verdict,
    pub household_size: usize,
    pub gross_income: f64,
    pub net_income: f64,
    pub assets: f64,
    pub budget: SnapBudget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expedited: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assessments {
    pub snap: SnapAssessment,
    pub pace: ProgramAssessment,
    pub lis: ProgramAssessment,
    pub msp: ProgramAssessment,
    pub ptrr: ProgramAssessment,
}

impl Assessments {
    pub fn verdict(&self, program: Program) -> Verdict {
        match program {
            Program::Snap => self.snap.verdict,
            Program::Pace => self.pace.verdict,
            Program::Lis => self.lis.verdict,
            Program::Msp => self.msp.verdict,
            Program::Ptrr => self.ptrr.verdict,
        }
    }

    pub fn verdict_labels(&self) -> BTreeMap<Program, String> {
        Program::ALL
            .iter()
            .map(|program| (*program, self.verdict(*program).label()))
            .collect()
    }
}
