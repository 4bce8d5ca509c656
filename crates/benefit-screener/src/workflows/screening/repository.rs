use std::collections::BTreeSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::domain::{Client, ClientId, HouseholdMember, MemberId};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Persisted household document: the client plus every member record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    pub schema_version: u32,
    pub client: Client,
    #[serde(default)]
    pub members: Vec<HouseholdMember>,
}

impl HouseholdRecord {
    pub fn new(client: Client, members: Vec<HouseholdMember>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            client,
            members,
        }
    }

    /// Parses and validates a record; malformed numbers fail here rather than downstream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RecordError> {
        let record: HouseholdRecord = serde_json::from_reader(reader)?;
        record.validate()?;
        Ok(record)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, RecordError> {
        let record: HouseholdRecord = serde_json::from_slice(bytes)?;
        record.validate()?;
        Ok(record)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), RecordError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(RecordError::UnsupportedSchema {
                found: self.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        if self.client.id.0.trim().is_empty() {
            return Err(RecordError::MissingClientId);
        }

        let mut ids: BTreeSet<&MemberId> = BTreeSet::new();
        for member in &self.members {
            if member.id.0.trim().is_empty() {
                return Err(RecordError::MissingMemberId);
            }
            if !ids.insert(&member.id) {
                return Err(RecordError::DuplicateMember(member.id.clone()));
            }
        }

        for member in &self.members {
            if let Some(related) = member
                .relationships
                .keys()
                .find(|related| !ids.contains(related))
            {
                return Err(RecordError::UnknownRelative {
                    member: member.id.clone(),
                    related: related.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Validation errors raised at the record boundary.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("household record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("household record schema version {found} is not supported (expected {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("household record is missing a client id")]
    MissingClientId,
    #[error("household member is missing an id")]
    MissingMemberId,
    #[error("household member {0} appears more than once")]
    DuplicateMember(MemberId),
    #[error("member {member} declares a relationship to unknown member {related}")]
    UnknownRelative { member: MemberId, related: MemberId },
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait HouseholdRepository: Send + Sync {
    fn load_client(&self, client_id: &ClientId) -> Result<Client, RepositoryError>;
    fn load_household(&self, client_id: &ClientId)
        -> Result<Vec<HouseholdMember>, RepositoryError>;
    /// Replaces the stored member list wholesale.
    fn save_household(
        &self,
        client_id: &ClientId,
        members: Vec<HouseholdMember>,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("client {0} not found")]
    NotFound(ClientId),
    #[error("stored household is invalid: {0}")]
    Invalid(#[from] RecordError),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
