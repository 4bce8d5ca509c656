use benefit_screener::workflows::screening::{
    Client, ClientId, HouseholdMember, HouseholdRecord, HouseholdRepository, RepositoryError,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local household records, used when no data directory is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryHouseholdRepository {
    records: Arc<Mutex<HashMap<ClientId, HouseholdRecord>>>,
}

impl InMemoryHouseholdRepository {
    pub(crate) fn insert(&self, record: HouseholdRecord) -> Result<(), RepositoryError> {
        self.lock()?.insert(record.client.id.clone(), record);
        Ok(())
    }

    pub(crate) fn record(&self, client_id: &ClientId) -> Result<HouseholdRecord, RepositoryError> {
        self.lock()?
            .get(client_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(client_id.clone()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ClientId, HouseholdRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("household store lock poisoned".to_string()))
    }
}

impl HouseholdRepository for InMemoryHouseholdRepository {
    fn load_client(&self, client_id: &ClientId) -> Result<Client, RepositoryError> {
        Ok(self.record(client_id)?.client)
    }

    fn load_household(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        Ok(self.record(client_id)?.members)
    }

    fn save_household(
        &self,
        client_id: &ClientId,
        members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard
            .get_mut(client_id)
            .ok_or_else(|| RepositoryError::NotFound(client_id.clone()))?;
        record.members = members;
        Ok(())
    }
}

/// One `<client_id>.json` household record per client under `root`.
#[derive(Debug, Clone)]
pub(crate) struct FileHouseholdRepository {
    root: PathBuf,
}

impl FileHouseholdRepository {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, client_id: &ClientId) -> Result<PathBuf, RepositoryError> {
        let id = client_id.0.trim();
        let unsafe_id = id.is_empty()
            || id.starts_with('.')
            || id.contains(|c: char| c == '/' || c == '\\');
        if unsafe_id {
            return Err(RepositoryError::NotFound(client_id.clone()));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    fn read(&self, client_id: &ClientId) -> Result<HouseholdRecord, RepositoryError> {
        let path = self.path_for(client_id)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(client_id.clone()))
            }
            Err(err) => return Err(unavailable(&path, err)),
        };
        Ok(HouseholdRecord::from_reader(BufReader::new(file))?)
    }

    pub(crate) fn write(&self, record: &HouseholdRecord) -> Result<(), RepositoryError> {
        let path = self.path_for(&record.client.id)?;
        fs::create_dir_all(&self.root).map_err(|err| unavailable(&self.root, err))?;

        write_record(&path, record)?;

        debug!(client_id = %record.client.id, path = %path.display(), "household record written");
        Ok(())
    }
}

/// Serialises `record` into a staging file next to `path` and renames it into place.
/// The existing file is left untouched and the staging file removed when any step fails.
pub(crate) fn write_record(path: &Path, record: &HouseholdRecord) -> Result<(), RepositoryError> {
    let staging = path.with_extension("json.tmp");
    let result = stage_record(&staging, record)
        .and_then(|()| fs::rename(&staging, path).map_err(|err| unavailable(path, err)));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

fn stage_record(staging: &Path, record: &HouseholdRecord) -> Result<(), RepositoryError> {
    let file = File::create(staging).map_err(|err| unavailable(staging, err))?;
    let mut writer = BufWriter::new(file);
    record.to_writer(&mut writer)?;
    writer.flush().map_err(|err| unavailable(staging, err))
}

fn unavailable(path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}

impl HouseholdRepository for FileHouseholdRepository {
    fn load_client(&self, client_id: &ClientId) -> Result<Client, RepositoryError> {
        Ok(self.read(client_id)?.client)
    }

    fn load_household(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        Ok(self.read(client_id)?.members)
    }

    fn save_household(
        &self,
        client_id: &ClientId,
        members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError> {
        let mut record = self.read(client_id)?;
        record.members = members;
        self.write(&record)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
