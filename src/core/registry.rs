use crate::core::transfer::{decode_records, encode_records, TransferFormat};
use crate::core::{HospitalPatch, HospitalRecord, HospitalStore, SaveMode, SaveOutcome, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Entry point for callers. Wraps a store handle and the configured save mode.
pub struct HospitalRegistry<S: HospitalStore> {
    store: S,
    save_mode: SaveMode,
}

impl<S: HospitalStore> HospitalRegistry<S> {
    pub fn new(store: S, save_mode: SaveMode) -> Self {
        Self { store, save_mode }
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create(&self, record: &HospitalRecord) -> Result<SaveOutcome> {
        let outcome = self.store.save(record, self.save_mode).await?;
        tracing::info!("Saved hospital '{}' ({:?})", record.name(), outcome);
        Ok(outcome)
    }

    pub async fn get(&self, name: &str) -> Result<HospitalRecord> {
        tracing::debug!("Looking up hospital '{}'", name);
        self.store.find_by_name(name).await
    }

    pub async fn list(&self) -> Result<Vec<HospitalRecord>> {
        let records = self.store.list_all().await?;
        tracing::debug!("Listed {} hospitals", records.len());
        Ok(records)
    }

    /// Applies a partial update to an existing hospital and returns the stored result.
    /// The read and the write happen in the store as one step, so concurrent
    /// patches to different fields both survive.
    pub async fn update(&self, name: &str, patch: HospitalPatch) -> Result<HospitalRecord> {
        if patch.is_empty() {
            tracing::debug!("Empty patch for hospital '{}', nothing to update", name);
            return self.store.find_by_name(name).await;
        }

        let updated = self.store.patch(name, patch).await?;
        tracing::info!("Updated hospital '{}'", name);
        Ok(updated)
    }

    /// Replaces every non-key field of an existing hospital.
    pub async fn replace(&self, record: &HospitalRecord) -> Result<()> {
        self.store.update(record).await?;
        tracing::info!("Replaced hospital '{}'", record.name());
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.store.delete_by_name(name).await?;
        tracing::info!("Deleted hospital '{}'", name);
        Ok(())
    }

    /// Writes all hospitals to `path` and returns how many were written.
    pub async fn export<T: Storage>(
        &self,
        storage: &T,
        path: &str,
        format: TransferFormat,
    ) -> Result<usize> {
        validate_path("output", path)?;
        let records = self.store.list_all().await?;
        let data = encode_records(&records, format)?;
        storage.write_file(path, &data).await?;

        tracing::info!("Exported {} hospitals to {} ({:?})", records.len(), path, format);
        Ok(records.len())
    }

    /// Reads a JSON array of hospitals from `path` and saves each with the
    /// configured mode. Nothing is written if any entry fails validation.
    pub async fn import<T: Storage>(&self, storage: &T, path: &str) -> Result<ImportSummary> {
        validate_path("input", path)?;
        let data = storage.read_file(path).await?;
        let records = decode_records(&data)?;
        tracing::debug!("Decoded {} hospitals from {}", records.len(), path);

        let mut summary = ImportSummary::default();
        for record in &records {
            match self.store.save(record, self.save_mode).await? {
                SaveOutcome::Inserted => summary.inserted += 1,
                SaveOutcome::Updated => summary.updated += 1,
            }
        }

        tracing::info!(
            "Imported {} hospitals from {} ({} inserted, {} updated)",
            records.len(),
            path,
            summary.inserted,
            summary.updated
        );
        Ok(summary)
    }
}
