use futures::TryStreamExt;
use prodev::config::DatabaseConfig;
use prodev::store::connect_sqlite;
use prodev::user::{SqliteUserRepository, User, UserError, UserId, UserRepository};
use tempfile::TempDir;

async fn setup_test_db() -> (TempDir, SqliteUserRepository) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ALX_prodev.sqlite");

    let pool = connect_sqlite(&path, &DatabaseConfig::default())
        .await
        .expect("Failed to open sqlite database");

    let repo = SqliteUserRepository::new(pool);
    repo.create_schema().await.expect("Failed to create schema");
    (dir, repo)
}

fn create_test_user(id: &str, age: u32) -> User {
    User::with_id(
        UserId::from_string(id),
        format!("Test {}", id),
        format!("{}@example.com", id),
        age,
    )
}

#[tokio::test]
async fn test_create_and_get() {
    let (_dir, repo) = setup_test_db().await;

    let user = create_test_user("test_create_get", 33);
    let created = repo.create(user.clone()).await.unwrap();
    assert_eq!(created, user);

    let retrieved = repo.get(&user.user_id).await.unwrap();
    assert_eq!(retrieved, user);
}

#[tokio::test]
async fn test_create_duplicate() {
    let (_dir, repo) = setup_test_db().await;

    let user = create_test_user("test_duplicate", 20);
    repo.create(user.clone()).await.unwrap();

    let result = repo.create(user).await;
    assert!(matches!(result, Err(UserError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_get_missing() {
    let (_dir, repo) = setup_test_db().await;

    let result = repo.get(&UserId::from_string("nobody")).await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}

#[tokio::test]
async fn test_schema_is_idempotent() {
    let (_dir, repo) = setup_test_db().await;
    repo.create_schema().await.unwrap();
    repo.create_schema().await.unwrap();
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_insert_many_ignores_duplicates() {
    let (_dir, repo) = setup_test_db().await;

    let users: Vec<User> = (0..450)
        .map(|i| create_test_user(&format!("bulk-{:04}", i), 18 + i % 60))
        .collect();

    let inserted = repo.insert_many(&users).await.unwrap();
    assert_eq!(inserted, 450);

    let again = repo.insert_many(&users[..10]).await.unwrap();
    assert_eq!(again, 0);
    assert_eq!(repo.count().await.unwrap(), 450);
}

#[tokio::test]
async fn test_fetch_page_is_ordered_by_id() {
    let (_dir, repo) = setup_test_db().await;
    repo.insert_many(&[
        create_test_user("c", 30),
        create_test_user("a", 40),
        create_test_user("b", 50),
    ])
    .await
    .unwrap();

    let first = repo.fetch_page(2, 0).await.unwrap();
    let ids: Vec<&str> = first.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let second = repo.fetch_page(2, 2).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].user_id.as_str(), "c");

    assert!(repo.fetch_page(2, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_older_than() {
    let (_dir, repo) = setup_test_db().await;
    repo.insert_many(&[
        create_test_user("young", 25),
        create_test_user("old", 26),
    ])
    .await
    .unwrap();

    let older = repo.list_older_than(25).await.unwrap();
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].user_id.as_str(), "old");
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_streams() {
    let (_dir, repo) = setup_test_db().await;
    repo.insert_many(&[create_test_user("x", 10), create_test_user("y", 20)])
        .await
        .unwrap();

    let users: Vec<User> = repo.stream_all().try_collect().await.unwrap();
    assert_eq!(users.len(), 2);

    let mut ages: Vec<u32> = repo.stream_ages().try_collect().await.unwrap();
    ages.sort_unstable();
    assert_eq!(ages, vec![10, 20]);
}
