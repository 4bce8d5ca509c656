use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::screening::domain::{
    Asset, Client, ClientId, Expense, Frequency, HousingCostKind, HouseholdMember, Income,
    IncomeKind, MemberId, PriorYearHousingCost, RelationshipKind, YearType,
};
use crate::workflows::screening::repository::{
    HouseholdRecord, HouseholdRepository, RepositoryError,
};
use crate::workflows::screening::{screening_router, ScreeningConfig, ScreeningEngine, ScreeningService};

pub(super) const CLIENT: &str = "client-100";

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn client_id() -> ClientId {
    ClientId(CLIENT.to_string())
}

pub(super) fn client() -> Client {
    Client {
        id: client_id(),
        ..Client::default()
    }
}

pub(super) fn member_id(id: &str) -> MemberId {
    MemberId(id.to_string())
}

pub(super) fn engine() -> ScreeningEngine {
    ScreeningEngine::new(ScreeningConfig::default())
}

/// Working-age adult who shares meals and earns `monthly` from employment.
pub(super) fn worker(id: &str, monthly: f64) -> HouseholdMember {
    let mut member = HouseholdMember::new(id, format!("Worker {id}"));
    member.date_of_birth = Some(date(1990, 1, 15));
    member.shares_meal = true;
    if monthly > 0.0 {
        member.incomes.push(Income::new(
            monthly,
            Frequency::Monthly,
            IncomeKind::Employment,
            YearType::Current,
        ));
    }
    member
}

/// Member born on `born` with no income lines.
pub(super) fn person(id: &str, born: NaiveDate) -> HouseholdMember {
    let mut member = HouseholdMember::new(id, format!("Member {id}"));
    member.date_of_birth = Some(born);
    member
}

/// Member aged `years` (and a few months) on [`as_of`].
pub(super) fn senior(id: &str, years: i32) -> HouseholdMember {
    person(id, date(2025 - years, 3, 1))
}

pub(super) fn income(amount: f64, frequency: Frequency, kind: IncomeKind, year: YearType) -> Income {
    Income::new(amount, frequency, kind, year)
}

pub(super) fn asset(value: f64) -> Asset {
    Asset {
        value,
        description: None,
    }
}

pub(super) fn part_b_premium(monthly: f64) -> Expense {
    Expense::Medical {
        value: monthly,
        frequency: Frequency::Monthly,
        medical_type: "Medicare Part B".to_string(),
    }
}

pub(super) fn property_tax(value: f64) -> PriorYearHousingCost {
    PriorYearHousingCost {
        kind: HousingCostKind::PropertyTax,
        value,
    }
}

pub(super) fn marry(a: &mut HouseholdMember, b: &mut HouseholdMember) {
    a.relationships.insert(b.id.clone(), RelationshipKind::Spouse);
    b.relationships.insert(a.id.clone(), RelationshipKind::Spouse);
}

pub(super) fn find<'a>(members: &'a [HouseholdMember], id: &str) -> &'a HouseholdMember {
    members
        .iter()
        .find(|member| member.id.0 == id)
        .expect("member present")
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn seeded_repository(members: Vec<HouseholdMember>) -> Arc<MemoryRepository> {
    let repository = MemoryRepository::default();
    repository.insert(HouseholdRecord::new(client(), members));
    Arc::new(repository)
}

pub(super) fn build_service(
    members: Vec<HouseholdMember>,
) -> (ScreeningService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = seeded_repository(members);
    let service = ScreeningService::new(repository.clone(), ScreeningConfig::default());
    (service, repository)
}

pub(super) fn router_with_service(service: ScreeningService<MemoryRepository>) -> axum::Router {
    screening_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ClientId, HouseholdRecord>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn insert(&self, record: HouseholdRecord) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.client.id.clone(), record);
    }

    pub(super) fn stored(&self, client_id: &ClientId) -> Option<HouseholdRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(client_id)
            .cloned()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("save counter poisoned")
    }
}

impl HouseholdRepository for MemoryRepository {
    fn load_client(&self, client_id: &ClientId) -> Result<Client, RepositoryError> {
        self.stored(client_id)
            .map(|record| record.client)
            .ok_or_else(|| RepositoryError::NotFound(client_id.clone()))
    }

    fn load_household(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        self.stored(client_id)
            .map(|record| record.members)
            .ok_or_else(|| RepositoryError::NotFound(client_id.clone()))
    }

    fn save_household(
        &self,
        client_id: &ClientId,
        members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .get_mut(client_id)
            .ok_or_else(|| RepositoryError::NotFound(client_id.clone()))?;
        record.members = members;
        *self.saves.lock().expect("save counter poisoned") += 1;
        Ok(())
    }
}

/// Reads succeed but every write fails.
pub(super) struct ReadOnlyRepository {
    pub(super) inner: MemoryRepository,
}

impl HouseholdRepository for ReadOnlyRepository {
    fn load_client(&self, client_id: &ClientId) -> Result<Client, RepositoryError> {
        self.inner.load_client(client_id)
    }

    fn load_household(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        self.inner.load_household(client_id)
    }

    fn save_household(
        &self,
        _client_id: &ClientId,
        _members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("record store offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl HouseholdRepository for UnavailableRepository {
    fn load_client(&self, _client_id: &ClientId) -> Result<Client, RepositoryError> {
        Err(RepositoryError::Unavailable("record store offline".to_string()))
    }

    fn load_household(
        &self,
        _client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        Err(RepositoryError::Unavailable("record store offline".to_string()))
    }

    fn save_household(
        &self,
        _client_id: &ClientId,
        _members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("record store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
