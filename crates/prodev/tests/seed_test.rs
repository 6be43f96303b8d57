use futures::TryStreamExt;
use prodev::config::DatabaseConfig;
use prodev::seed::seed;
use prodev::store::{Backend, BackendPreference, Store};
use prodev::stream::{average_age, lazy_pagination};
use prodev::{Page, ProdevError, read_users};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE_CSV: &str = "\
user_id,name,email,age
00234e50-34eb-4ce2-94ec-26e3fa749796,Dan Altenwerth Jr.,Molly59@gmail.com,67
006bfede-724d-4cdd-a2a6-59700f40d0da,Glenda Wisozk,Miriam21@gmail.com,119
006e1f7f-90c2-45ad-8c1d-1275d594cc88,Daniel Fahey IV,Delia.Lesch11@hotmail.com,49
00af05c9-0a86-419e-8c2d-5fb7e899ae1c,Ronnie Bechtelar,Sandra19@yahoo.com,22
,Generated Id,generated@example.com,35.0
bad-age,Someone,someone@example.com,unknown
missing-email,Nobody,,40
";

fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("user_data.csv");
    std::fs::write(&path, contents).expect("Failed to write csv");
    path
}

async fn sqlite_store(dir: &Path) -> Store {
    let config = DatabaseConfig {
        sqlite_path: dir.join("ALX_prodev.sqlite"),
        ..DatabaseConfig::default()
    };
    Store::connect(&config, BackendPreference::Sqlite)
        .await
        .expect("Failed to open sqlite store")
}

#[tokio::test]
async fn test_seed_sqlite_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir, SAMPLE_CSV);
    let store = sqlite_store(dir.path()).await;

    let report = seed(&store, &csv).await.unwrap();
    assert_eq!(report.backend, Backend::Sqlite);
    assert!(report.csv_found);
    assert_eq!(report.parsed, 5);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.inserted, 5);

    let repo = store.repository();
    assert_eq!(repo.count().await.unwrap(), 5);

    let pages: Vec<Page> = lazy_pagination(repo.as_ref(), 2)
        .try_collect()
        .await
        .unwrap();
    let total: usize = pages.iter().map(Page::len).sum();
    assert_eq!(total, 5);

    let average = average_age(repo.as_ref()).await.unwrap().unwrap();
    assert!((average - 58.4).abs() < 1e-9);
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir, SAMPLE_CSV);
    let store = sqlite_store(dir.path()).await;

    seed(&store, &csv).await.unwrap();
    let second = seed(&store, &csv).await.unwrap();

    // The generated id is new on every run
    assert_eq!(second.inserted, 1);
    assert_eq!(store.repository().count().await.unwrap(), 6);
}

#[tokio::test]
async fn test_seed_without_csv_creates_table_only() {
    let dir = tempfile::tempdir().unwrap();
    let store = sqlite_store(dir.path()).await;

    let report = seed(&store, &dir.path().join("missing.csv")).await.unwrap();
    assert!(!report.csv_found);
    assert_eq!(report.inserted, 0);
    assert_eq!(store.repository().count().await.unwrap(), 0);
}

#[test]
fn test_read_users_missing_file() {
    let err = read_users(Path::new("/definitely/not/here.csv")).unwrap_err();
    assert!(matches!(err, ProdevError::CsvNotFound(_)));
}

#[test]
fn test_read_users_extra_columns_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        &dir,
        "age,country,email,name,user_id\n 41 ,NZ, a@example.com , Alice ,a-1\n",
    );

    let import = read_users(&csv).unwrap();
    assert_eq!(import.skipped, 0);
    let user = &import.users[0];
    assert_eq!(user.user_id.as_str(), "a-1");
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "a@example.com");
    assert_eq!(user.age, 41);
}
