use hospital_registry::config::DatabaseConfig;
use hospital_registry::{
    HospitalError, HospitalPatch, HospitalRecord, HospitalStore, MemoryStore, SaveMode,
    SaveOutcome, SqliteStore,
};
use tempfile::TempDir;

fn city_hospital() -> HospitalRecord {
    HospitalRecord::new("City Hospital", "555-1234", "12.34,56.78", None).unwrap()
}

fn described(name: &str, contact: &str) -> HospitalRecord {
    HospitalRecord::new(
        name,
        contact,
        "40.71,-74.00",
        Some("Teaching hospital".to_string()),
    )
    .unwrap()
}

async fn assert_save_then_find_round_trip<S: HospitalStore>(store: &S) {
    for record in [city_hospital(), described("Mercy", "555-0001")] {
        let outcome = store.save(&record, SaveMode::InsertOnly).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Inserted);

        let fetched = store.find_by_name(record.name()).await.unwrap();
        assert_eq!(fetched.to_transport_object(), record.to_transport_object());
    }
}

async fn assert_insert_only_rejects_duplicates<S: HospitalStore>(store: &S) {
    store.save(&city_hospital(), SaveMode::InsertOnly).await.unwrap();

    let replacement =
        HospitalRecord::new("City Hospital", "555-9999", "0,0", None).unwrap();
    match store.save(&replacement, SaveMode::InsertOnly).await {
        Err(HospitalError::DuplicateKey { name }) => assert_eq!(name, "City Hospital"),
        other => panic!("expected duplicate key, got {other:?}"),
    }

    assert_eq!(store.list_all().await.unwrap(), vec![city_hospital()]);
}

async fn assert_upsert_updates_in_place<S: HospitalStore>(store: &S) {
    store.save(&city_hospital(), SaveMode::Upsert).await.unwrap();

    let replacement = described("City Hospital", "555-9999");
    let outcome = store.save(&replacement, SaveMode::Upsert).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Updated);

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], replacement);
}

async fn assert_update_and_delete<S: HospitalStore>(store: &S) {
    store.save(&city_hospital(), SaveMode::InsertOnly).await.unwrap();

    let changed = described("City Hospital", "555-7777");
    store.update(&changed).await.unwrap();
    assert_eq!(store.find_by_name("City Hospital").await.unwrap(), changed);

    store.delete_by_name("City Hospital").await.unwrap();
    assert!(matches!(
        store.find_by_name("City Hospital").await,
        Err(HospitalError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete_by_name("City Hospital").await,
        Err(HospitalError::NotFound { .. })
    ));
    assert!(matches!(
        store.update(&changed).await,
        Err(HospitalError::NotFound { .. })
    ));
}

async fn assert_patch_touches_only_given_fields<S: HospitalStore>(store: &S) {
    store
        .save(&described("Mercy", "555-0001"), SaveMode::InsertOnly)
        .await
        .unwrap();

    let patched = store
        .patch(
            "Mercy",
            HospitalPatch {
                contact: Some("555-0002".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.coordinates(), "40.71,-74.00");
    assert_eq!(patched.description(), Some("Teaching hospital"));
    assert_eq!(store.find_by_name("Mercy").await.unwrap(), patched);

    let cleared = store
        .patch(
            "Mercy",
            HospitalPatch {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.contact(), "555-0002");
    assert_eq!(cleared.description(), None);

    assert!(matches!(
        store.patch("Nowhere", HospitalPatch::default()).await,
        Err(HospitalError::NotFound { .. })
    ));
}

async fn assert_list_is_sorted<S: HospitalStore>(store: &S) {
    for name in ["St. Luke", "Alder Hey", "Mercy"] {
        store
            .save(&described(name, "555-0000"), SaveMode::InsertOnly)
            .await
            .unwrap();
    }
    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name().to_string())
        .collect();
    assert_eq!(names, vec!["Alder Hey", "Mercy", "St. Luke"]);
}

#[tokio::test]
async fn test_memory_store_contract() {
    assert_save_then_find_round_trip(&MemoryStore::new()).await;
    assert_insert_only_rejects_duplicates(&MemoryStore::new()).await;
    assert_upsert_updates_in_place(&MemoryStore::new()).await;
    assert_update_and_delete(&MemoryStore::new()).await;
    assert_patch_touches_only_given_fields(&MemoryStore::new()).await;
    assert_list_is_sorted(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    assert_save_then_find_round_trip(&SqliteStore::in_memory().await.unwrap()).await;
    assert_insert_only_rejects_duplicates(&SqliteStore::in_memory().await.unwrap()).await;
    assert_upsert_updates_in_place(&SqliteStore::in_memory().await.unwrap()).await;
    assert_update_and_delete(&SqliteStore::in_memory().await.unwrap()).await;
    assert_patch_touches_only_given_fields(&SqliteStore::in_memory().await.unwrap()).await;
    assert_list_is_sorted(&SqliteStore::in_memory().await.unwrap()).await;
}

#[tokio::test]
async fn test_sqlite_file_survives_reconnect() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("hospitals.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
        max_connections: 2,
        create_if_missing: true,
    };

    let store = SqliteStore::connect(&config).await.unwrap();
    store
        .save(&described("Mercy", "555-0001"), SaveMode::InsertOnly)
        .await
        .unwrap();
    store.close().await;
    assert!(db_path.exists());

    let reopened = SqliteStore::connect(&config).await.unwrap();
    let fetched = reopened.find_by_name("Mercy").await.unwrap();
    assert_eq!(fetched.description(), Some("Teaching hospital"));
    reopened.close().await;
}

#[tokio::test]
async fn test_sqlite_preserves_null_description() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.save(&city_hospital(), SaveMode::InsertOnly).await.unwrap();

    let transport = store
        .find_by_name("City Hospital")
        .await
        .unwrap()
        .to_transport_object();
    let value = serde_json::to_value(transport).unwrap();
    assert!(value["hospitalDescription"].is_null());
}
