//! Household screening for SNAP, PACE/PACENET, LIS, MSP, and PTRR.
//!
//! Member records are loaded through [`HouseholdRepository`], evaluated as one snapshot by the
//! [`ScreeningEngine`], and written back with a verdict per program. Relationship declarations
//! pass through the propagation rule before the household is re-evaluated.

pub mod domain;
pub mod evaluation;
pub mod relationships;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Age, Assessments, Asset, BenefitTier, CitizenshipStatus, Client, ClientId, Expense,
    Frequency, HousingCostKind, HouseholdMember, Income, IncomeKind, MaritalStatus, MemberId,
    PriorYearHousingCost, Program, ProgramAssessment, RelationshipKind, ResidencyStatus,
    SnapAssessment, SnapBudget, StudentStatus, UtilityType, Verdict, YearType,
};
pub use evaluation::{estimate_benefit, ScreeningConfig, ScreeningEngine};
pub use relationships::{MemberIntent, RelationshipDeclared, RelationshipError};
pub use repository::{HouseholdRecord, HouseholdRepository, RecordError, RepositoryError};
pub use router::screening_router;
pub use service::{HouseholdScreening, MemberScreeningView, ScreeningService, ScreeningServiceError};
