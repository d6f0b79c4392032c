use crate::domain::model::{HospitalPatch, HospitalRecord, SaveOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What `save` does when the key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Reject with `DuplicateKey`.
    #[default]
    InsertOnly,
    /// Replace the stored fields.
    Upsert,
}

/// Persistence boundary for hospital records, keyed by hospital name.
/// Each call is one unit of work.
#[async_trait]
pub trait HospitalStore: Send + Sync {
    async fn save(&self, record: &HospitalRecord, mode: SaveMode) -> Result<SaveOutcome>;
    async fn find_by_name(&self, name: &str) -> Result<HospitalRecord>;
    /// Ordered by hospital name.
    async fn list_all(&self) -> Result<Vec<HospitalRecord>>;
    async fn update(&self, record: &HospitalRecord) -> Result<()>;
    /// Applies a partial update as one unit of work and returns the stored record.
    async fn patch(&self, name: &str, patch: HospitalPatch) -> Result<HospitalRecord>;
    async fn delete_by_name(&self, name: &str) -> Result<()>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
