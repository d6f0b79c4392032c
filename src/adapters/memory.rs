use crate::domain::model::{HospitalPatch, HospitalRecord, SaveOutcome};
use crate::domain::ports::{HospitalStore, SaveMode};
use crate::utils::error::{HospitalError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<BTreeMap<String, HospitalRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HospitalStore for MemoryStore {
    async fn save(&self, record: &HospitalRecord, mode: SaveMode) -> Result<SaveOutcome> {
        let mut records = self.records.write().await;
        let exists = records.contains_key(record.name());

        match (exists, mode) {
            (true, SaveMode::InsertOnly) => Err(HospitalError::DuplicateKey {
                name: record.name().to_string(),
            }),
            (true, SaveMode::Upsert) => {
                records.insert(record.name().to_string(), record.clone());
                Ok(SaveOutcome::Updated)
            }
            (false, _) => {
                records.insert(record.name().to_string(), record.clone());
                Ok(SaveOutcome::Inserted)
            }
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<HospitalRecord> {
        self.records
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| HospitalError::not_found(name))
    }

    async fn list_all(&self) -> Result<Vec<HospitalRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn update(&self, record: &HospitalRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(record.name()) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(HospitalError::not_found(record.name())),
        }
    }

    async fn patch(&self, name: &str, patch: HospitalPatch) -> Result<HospitalRecord> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(name)
            .ok_or_else(|| HospitalError::not_found(name))?;

        let patched = stored.apply(patch)?;
        *stored = patched.clone();
        Ok(patched)
    }

    async fn delete_by_name(&self, name: &str) -> Result<()> {
        self.records
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| HospitalError::not_found(name))
    }
}
