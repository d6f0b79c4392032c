use crate::config::DatabaseConfig;
use crate::domain::model::{HospitalPatch, HospitalRecord, SaveOutcome};
use crate::domain::ports::{HospitalStore, SaveMode};
use crate::utils::error::{HospitalError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS hospital (
    hospitalName        VARCHAR(100) NOT NULL PRIMARY KEY
                        CHECK (length(hospitalName) <= 100),
    hospitalContact     VARCHAR(15)  NOT NULL
                        CHECK (length(hospitalContact) <= 15),
    hospitalCoordinates VARCHAR(50)  NOT NULL
                        CHECK (length(hospitalCoordinates) <= 50),
    hospitalDescription VARCHAR(200)
                        CHECK (hospitalDescription IS NULL OR length(hospitalDescription) <= 200)
)
"#;

const SELECT_COLUMNS: &str =
    "SELECT hospitalName, hospitalContact, hospitalCoordinates, hospitalDescription FROM hospital";

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct HospitalRow {
    hospital_name: String,
    hospital_contact: String,
    hospital_coordinates: String,
    hospital_description: Option<String>,
}

impl TryFrom<HospitalRow> for HospitalRecord {
    type Error = HospitalError;

    fn try_from(row: HospitalRow) -> Result<Self> {
        HospitalRecord::new(
            row.hospital_name,
            row.hospital_contact,
            row.hospital_coordinates,
            row.hospital_description,
        )
    }
}

/// Relational store backed by SQLite. Every operation is a single statement,
/// so each one commits on its own and concurrent writers queue on the
/// database lock for up to `BUSY_TIMEOUT`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Insert/update rounds an upsert tries when a concurrent delete keeps
/// removing the row between the two statements.
const UPSERT_ATTEMPTS: usize = 3;

/// `sqlite::memory:`, `sqlite://:memory:` and URIs carrying `mode=memory`.
fn is_in_memory_url(url: &str) -> bool {
    let rest = url.trim_start_matches("sqlite:").trim_start_matches("//");
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    path == ":memory:" || query.split('&').any(|param| param == "mode=memory")
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `config.url` and creates the table if needed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(config.create_if_missing)
            .busy_timeout(BUSY_TIMEOUT);

        // Each connection to an in-memory database sees its own database.
        let pool = if is_in_memory_url(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await?
        };

        tracing::info!("Connected to database: {}", config.url);

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            create_if_missing: true,
        })
        .await
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        tracing::debug!("Schema for table `hospital` is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn insert(&self, record: &HospitalRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO hospital (hospitalName, hospitalContact, hospitalCoordinates, \
             hospitalDescription) VALUES (?, ?, ?, ?)",
        )
        .bind(record.name())
        .bind(record.contact())
        .bind(record.coordinates())
        .bind(record.description())
        .execute(&self.pool)
        .await
        .map_err(|e| HospitalError::from_sqlx(e, record.name()))?;
        Ok(())
    }

    /// Returns the number of rows changed (0 or 1).
    async fn overwrite(&self, record: &HospitalRecord) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE hospital SET hospitalContact = ?, hospitalCoordinates = ?, \
             hospitalDescription = ? WHERE hospitalName = ?",
        )
        .bind(record.contact())
        .bind(record.coordinates())
        .bind(record.description())
        .bind(record.name())
        .execute(&self.pool)
        .await
        .map_err(|e| HospitalError::from_sqlx(e, record.name()))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl HospitalStore for SqliteStore {
    async fn save(&self, record: &HospitalRecord, mode: SaveMode) -> Result<SaveOutcome> {
        if mode == SaveMode::InsertOnly {
            self.insert(record).await?;
            return Ok(SaveOutcome::Inserted);
        }

        for _ in 0..UPSERT_ATTEMPTS {
            match self.insert(record).await {
                Ok(()) => return Ok(SaveOutcome::Inserted),
                Err(HospitalError::DuplicateKey { .. }) => {}
                Err(e) => return Err(e),
            }
            if self.overwrite(record).await? > 0 {
                return Ok(SaveOutcome::Updated);
            }
            tracing::debug!("Hospital '{}' vanished during upsert, retrying", record.name());
        }

        Err(HospitalError::Constraint {
            message: format!(
                "upsert of '{}' kept racing with concurrent deletes",
                record.name()
            ),
        })
    }

    async fn find_by_name(&self, name: &str) -> Result<HospitalRecord> {
        let row: Option<HospitalRow> =
            sqlx::query_as(&format!("{} WHERE hospitalName = ?", SELECT_COLUMNS))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| HospitalError::not_found(name))?
            .try_into()
    }

    async fn list_all(&self) -> Result<Vec<HospitalRecord>> {
        let rows: Vec<HospitalRow> =
            sqlx::query_as(&format!("{} ORDER BY hospitalName", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(HospitalRecord::try_from).collect()
    }

    async fn update(&self, record: &HospitalRecord) -> Result<()> {
        if self.overwrite(record).await? == 0 {
            return Err(HospitalError::not_found(record.name()));
        }
        Ok(())
    }

    async fn patch(&self, name: &str, patch: HospitalPatch) -> Result<HospitalRecord> {
        patch.validate()?;

        let clear_or_set_description = patch.description.is_some();
        let row: Option<HospitalRow> = sqlx::query_as(
            "UPDATE hospital SET \
                 hospitalContact = COALESCE(?, hospitalContact), \
                 hospitalCoordinates = COALESCE(?, hospitalCoordinates), \
                 hospitalDescription = CASE WHEN ? THEN ? ELSE hospitalDescription END \
             WHERE hospitalName = ? \
             RETURNING hospitalName, hospitalContact, hospitalCoordinates, hospitalDescription",
        )
        .bind(patch.contact)
        .bind(patch.coordinates)
        .bind(clear_or_set_description)
        .bind(patch.description.flatten())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HospitalError::from_sqlx(e, name))?;

        row.ok_or_else(|| HospitalError::not_found(name))?
            .try_into()
    }

    async fn delete_by_name(&self, name: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM hospital WHERE hospitalName = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(HospitalError::not_found(name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_url_detection() {
        assert!(is_in_memory_url("sqlite::memory:"));
        assert!(is_in_memory_url("sqlite://:memory:"));
        assert!(is_in_memory_url("sqlite://file:shared?mode=memory&cache=shared"));
        assert!(!is_in_memory_url("sqlite://hospitals.db"));
        assert!(!is_in_memory_url("sqlite://hospitals.db?mode=rwc"));
    }

    #[tokio::test]
    async fn test_patch_can_clear_description_and_keep_other_fields() {
        let store = SqliteStore::in_memory().await.unwrap();
        let record = HospitalRecord::new("General", "555", "1,2", Some("Old wing".to_string()))
            .unwrap();
        store.save(&record, SaveMode::InsertOnly).await.unwrap();

        let patched = store
            .patch(
                "General",
                HospitalPatch {
                    contact: Some("556".to_string()),
                    description: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.contact(), "556");
        assert_eq!(patched.coordinates(), "1,2");
        assert_eq!(patched.description(), None);

        let moved = store
            .patch(
                "General",
                HospitalPatch {
                    coordinates: Some("3,4".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.contact(), "556");
        assert_eq!(moved.description(), None);
        assert_eq!(store.find_by_name("General").await.unwrap(), moved);
    }

    #[tokio::test]
    async fn test_patch_rejects_invalid_fields_and_missing_names() {
        let store = SqliteStore::in_memory().await.unwrap();
        let record = HospitalRecord::new("General", "555", "1,2", None).unwrap();
        store.save(&record, SaveMode::InsertOnly).await.unwrap();

        let blank = HospitalPatch {
            contact: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.patch("General", blank).await,
            Err(HospitalError::Validation { .. })
        ));
        assert_eq!(store.find_by_name("General").await.unwrap(), record);

        assert!(matches!(
            store.patch("Nowhere", HospitalPatch::default()).await,
            Err(HospitalError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_column_maps_to_constraint_error() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = sqlx::query(
            "INSERT INTO hospital (hospitalName, hospitalContact, hospitalCoordinates) \
             VALUES ('General', '0123456789012345', '1,2')",
        )
        .execute(store.pool())
        .await
        .unwrap_err();

        let err = HospitalError::from_sqlx(err, "General");
        assert!(matches!(err, HospitalError::Constraint { .. }));
    }

    #[tokio::test]
    async fn test_null_required_column_maps_to_constraint_error() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = sqlx::query(
            "INSERT INTO hospital (hospitalName, hospitalContact, hospitalCoordinates) \
             VALUES ('General', NULL, '1,2')",
        )
        .execute(store.pool())
        .await
        .unwrap_err();

        let err = HospitalError::from_sqlx(err, "General");
        assert!(matches!(err, HospitalError::Constraint { .. }));
    }

    #[tokio::test]
    async fn test_primary_key_collision_maps_to_duplicate_key() {
        let store = SqliteStore::in_memory().await.unwrap();
        let insert = "INSERT INTO hospital (hospitalName, hospitalContact, hospitalCoordinates) \
                      VALUES ('General', '555', '1,2')";
        sqlx::query(insert).execute(store.pool()).await.unwrap();
        let err = sqlx::query(insert).execute(store.pool()).await.unwrap_err();

        match HospitalError::from_sqlx(err, "General") {
            HospitalError::DuplicateKey { name } => assert_eq!(name, "General"),
            other => panic!("expected duplicate key, got {other:?}"),
        }
    }
}
