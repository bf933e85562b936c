use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrips_and_overwrites_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_item("electrolearn_theme").await.unwrap(), None);

    repo.set_item("electrolearn_theme", "dark").await.unwrap();
    repo.set_item("electrolearn_theme", "light").await.unwrap();
    assert_eq!(
        repo.get_item("electrolearn_theme").await.unwrap().as_deref(),
        Some("light")
    );

    repo.set_item("electrolearn_user", r#"{"name":"Ada","email":"ada@example.fr"}"#)
        .await
        .unwrap();
    assert_eq!(
        repo.keys().await.unwrap(),
        vec!["electrolearn_theme", "electrolearn_user"]
    );

    repo.remove_item("electrolearn_user").await.unwrap();
    repo.remove_item("electrolearn_user").await.unwrap();
    assert_eq!(repo.get_item("electrolearn_user").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set_item("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get_item("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_exposes_trait_object() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.local.set_item("a", "1").await.unwrap();
    assert_eq!(storage.local.get_item("a").await.unwrap().as_deref(), Some("1"));
}
