use claims::{assert_matches, assert_ok};
use pretty_assertions::assert_eq;
use signup::{
    configuration::{get_configuration, DatabaseSettings},
    domain::SignupRecord,
    store::{CreateError, PostgresRecordStore, RecordStore},
};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

/// Create a fresh, migrated database to run a test against.
async fn configure_database() -> PgPool {
    let mut config: DatabaseSettings = get_configuration()
        .expect("Failed to read configuration")
        .database
        .expect("No database configured");
    // Generate a unique name for each DB.
    config.database_name = Uuid::new_v4().to_string();

    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let db_pool = PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to Postgres");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to migrate the database");

    db_pool
}

fn record(email: &str, name: &str) -> SignupRecord {
    [("email", email), ("name", name)].into_iter().collect()
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn create_persists_the_signup() {
    let store = PostgresRecordStore::new(configure_database().await, "email");

    assert_ok!(store.create(&record("a@b.com", "Ann")).await);

    let saved = store.find("a@b.com").await.expect("Failed to fetch signup");
    assert_eq!(saved, Some(record("a@b.com", "Ann")));
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn second_create_with_the_same_key_is_rejected_and_keeps_the_first() {
    let store = PostgresRecordStore::new(configure_database().await, "email");
    store.create(&record("a@b.com", "Ann")).await.unwrap();

    let result = store.create(&record("a@b.com", "Bob")).await;

    assert_matches!(result, Err(CreateError::DuplicateKey(_)));
    let saved = store.find("a@b.com").await.expect("Failed to fetch signup");
    assert_eq!(saved, Some(record("a@b.com", "Ann")));
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn signup_without_key_attribute_is_not_written() {
    let pool = configure_database().await;
    let store = PostgresRecordStore::new(pool.clone(), "email");
    let record: SignupRecord = [("name", "Ann")].into_iter().collect();

    let result = store.create(&record).await;

    assert_matches!(result, Err(CreateError::Backend(_)));
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM signups")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
