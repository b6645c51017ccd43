//! Integration tests for the PostgreSQL record store using testcontainers
//!
//! These need a Docker daemon and are ignored by default:
//!
//! ```text
//! cargo test -p roster-storage --test postgres_store_tests -- --ignored
//! ```


use roster_core::{reconcile, Lookup, RecordStore, RosterError, User, UserFilter, UserId};
use roster_storage::{PoolSettings, PostgresRecordStore};
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use test_helpers::*;

struct TestPostgres {
    store: PostgresRecordStore,
    _container: ContainerAsync<GenericImage>,
}

impl TestPostgres {
    async fn start() -> Self {
        let container = GenericImage::new("postgres", "16-alpine")
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_PASSWORD", "postgres")
            .start()
            .await
            .expect("Failed to start postgres container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .expect("Failed to get port");
        let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

        // The init server logs "ready" before the real one starts listening on TCP
        let mut attempts = 0;
        let pool = loop {
            match roster_storage::create_postgres_pool(&url, &PoolSettings::default()).await {
                Ok(pool) => break pool,
                Err(e) if attempts < 30 => {
                    attempts += 1;
                    eprintln!("Postgres not ready yet ({e}), retrying");
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
                Err(e) => panic!("Failed to connect to postgres: {e}"),
            }
        };

        let store = PostgresRecordStore::new(pool);
        store.ensure_schema().await.expect("Failed to ensure schema");

        Self {
            store,
            _container: container,
        }
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_postgres_insert_find_update() {
    let pg = TestPostgres::start().await;

    assert_eq!(
        pg.store.find_one(&UserFilter::name("Mary")).await.unwrap(),
        Lookup::NotFound
    );

    let mary = create_test_user(&pg.store, "Mary", 17).await;
    assert!(mary.id.as_i64() > 0);
    assert_eq!(mary.created_at, fixed_created_at());

    let older = User { age: 18, ..mary.clone() };
    pg.store.update(&older).await.unwrap();

    let found = pg.store.find_one(&UserFilter::name("Mary")).await.unwrap();
    assert_eq!(found, Lookup::Found(older));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_postgres_update_missing_id_is_not_found() {
    let pg = TestPostgres::start().await;
    let ghost = roster_core::NewUser::new("Ghost", 1).with_id(UserId::new(4242));

    let err = pg.store.update(&ghost).await.unwrap_err();

    assert!(matches!(err, RosterError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_postgres_reconcile_round_trip() {
    let pg = TestPostgres::start().await;

    let first = reconcile(&pg.store, "Mary", 17).await.unwrap();
    let second = reconcile(&pg.store, "Mary", 99).await.unwrap();

    assert_eq!(first.age, 18);
    assert_eq!(second.age, 19);
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);

    pg.store.ensure_schema().await.expect("Schema creation is idempotent");
    let stored = pg.store.find_one(&UserFilter::Id(first.id)).await.unwrap();
    assert_eq!(stored, Lookup::Found(second));
}
