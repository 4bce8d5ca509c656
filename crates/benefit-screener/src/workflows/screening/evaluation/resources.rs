use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{
    Age, Client, Expense, HouseholdMember, Income, MemberId, RelationshipKind, UtilityType,
    YearType,
};
use super::frequency::{normalize, to_monthly, Period};

/// How a program selects and scales income lines before summing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRule {
    pub year: YearType,
    /// When false, `amount` is summed as entered regardless of frequency.
    pub normalize_income: bool,
    pub period: Period,
}

impl IncomeRule {
    pub const fn new(year: YearType, normalize_income: bool, period: Period) -> Self {
        Self {
            year,
            normalize_income,
            period,
        }
    }

    pub fn amount_of(&self, income: &Income) -> f64 {
        if self.normalize_income {
            normalize(income.amount, income.frequency, self.period)
        } else {
            income.amount
        }
    }

    pub fn incomes<'m>(&self, member: &'m HouseholdMember) -> impl Iterator<Item = &'m Income> {
        let year = self.year;
        member
            .incomes
            .iter()
            .filter(move |income| income.year == year)
    }

    pub fn total(&self, member: &HouseholdMember) -> f64 {
        self.incomes(member)
            .map(|income| self.amount_of(income))
            .sum()
    }
}

pub fn asset_total(member: &HouseholdMember) -> f64 {
    member.assets.iter().map(|asset| asset.value).sum()
}

pub fn shelter_total(member: &HouseholdMember) -> f64 {
    member
        .expenses
        .iter()
        .map(|expense| match expense {
            Expense::Shelter { value } => *value,
            _ => 0.0,
        })
        .sum()
}

pub fn other_expense_total(member: &HouseholdMember) -> f64 {
    member
        .expenses
        .iter()
        .map(|expense| match expense {
            Expense::Other { value } => *value,
            _ => 0.0,
        })
        .sum()
}

pub fn medical_monthly_total(member: &HouseholdMember) -> f64 {
    member
        .expenses
        .iter()
        .map(|expense| match expense {
            Expense::Medical {
                value, frequency, ..
            } => to_monthly(*value, *frequency),
            _ => 0.0,
        })
        .sum()
}

pub fn part_b_monthly_premium(member: &HouseholdMember) -> f64 {
    member
        .expenses
        .iter()
        .filter(|expense| expense.is_part_b_premium())
        .map(|expense| match expense {
            Expense::Medical {
                value, frequency, ..
            } => to_monthly(*value, *frequency),
            _ => 0.0,
        })
        .sum()
}

pub fn utility_types(member: &HouseholdMember) -> impl Iterator<Item = UtilityType> + '_ {
    member.expenses.iter().filter_map(|expense| match expense {
        Expense::Utility { utility_type, .. } => Some(*utility_type),
        _ => None,
    })
}

/// Mutually declared spouse pairs, resolved once per evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpousePairs {
    pairs: BTreeMap<MemberId, MemberId>,
}

impl SpousePairs {
    /// Pairs each member with the first related member (in id order) that declares them a
    /// spouse in return. A member already paired is never paired again.
    pub fn from_members(members: &[HouseholdMember]) -> Self {
        let by_id: BTreeMap<&MemberId, &HouseholdMember> =
            members.iter().map(|member| (&member.id, member)).collect();
        let mut pairs: BTreeMap<MemberId, MemberId> = BTreeMap::new();

        for member in members {
            if pairs.contains_key(&member.id) {
                continue;
            }

            let spouse = member
                .relationships
                .iter()
                .filter(|(_, kind)| **kind == RelationshipKind::Spouse)
                .map(|(related_id, _)| related_id)
                .find(|related_id| {
                    **related_id != member.id
                        && !pairs.contains_key(*related_id)
                        && by_id
                            .get(related_id)
                            .and_then(|related| related.relationships.get(&member.id))
                            == Some(&RelationshipKind::Spouse)
                });

            if let Some(spouse) = spouse {
                pairs.insert(member.id.clone(), spouse.clone());
                pairs.insert(spouse.clone(), member.id.clone());
            }
        }

        Self { pairs }
    }

    pub fn spouse_of(&self, member_id: &MemberId) -> Option<&MemberId> {
        self.pairs.get(member_id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Read-only view of a household shared by every evaluator in a pass.
pub struct HouseholdSnapshot<'a> {
    members: &'a [HouseholdMember],
    client: &'a Client,
    as_of: NaiveDate,
    spouses: SpousePairs,
}

impl<'a> HouseholdSnapshot<'a> {
    pub fn new(members: &'a [HouseholdMember], client: &'a Client, as_of: NaiveDate) -> Self {
        Self {
            members,
            client,
            as_of,
            spouses: SpousePairs::from_members(members),
        }
    }

    pub fn members(&self) -> &'a [HouseholdMember] {
        self.members
    }

    pub fn client(&self) -> &'a Client {
        self.client
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn spouses(&self) -> &SpousePairs {
        &self.spouses
    }

    pub fn age_of(&self, member: &HouseholdMember) -> Option<Age> {
        member.age_on(self.as_of)
    }

    pub fn is_at_least(&self, member: &HouseholdMember, years: u32) -> bool {
        self.age_of(member)
            .map(|age| age.years >= years)
            .unwrap_or(false)
    }

    pub fn has_spouse(&self, member: &HouseholdMember) -> bool {
        self.spouses.spouse_of(&member.id).is_some()
    }

    /// Computes `figure` for every member and adds the spouse's figure where a pair exists.
    /// Both spouses receive the same combined value.
    pub fn combined<F>(&self, figure: F) -> BTreeMap<MemberId, f64>
    where
        F: Fn(&HouseholdMember) -> f64,
    {
        let own: BTreeMap<&MemberId, f64> = self
            .members
            .iter()
            .map(|member| (&member.id, figure(member)))
            .collect();
        let mut combined = BTreeMap::new();

        for member in self.members {
            if combined.contains_key(&member.id) {
                continue;
            }

            let mut total = own.get(&member.id).copied().unwrap_or(0.0);
            if let Some(spouse) = self.spouses.spouse_of(&member.id) {
                total += own.get(spouse).copied().unwrap_or(0.0);
                combined.insert(spouse.clone(), total);
            }
            combined.insert(member.id.clone(), total);
        }

        combined
    }
}
