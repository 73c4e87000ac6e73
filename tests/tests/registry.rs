use pretty_assertions::assert_eq;
use quarry::{
    db::{Config, SchemaConfig},
    Column, Db, Entity, Query, Type,
};
use quarry_driver_sqlite::Sqlite;
use std::sync::{atomic::Ordering, Arc};
use tests::{init_tracing, LoggingDriver, TestDb};

#[tokio::test]
async fn concurrent_first_use_opens_one_pool() {
    init_tracing();

    let driver = LoggingDriver::new(Sqlite::in_memory("default"));
    let connects = driver.connects_handle();
    let db = Db::builder().driver("default", driver).build().unwrap();

    let handles = (0..8)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { db.instance("default").await.unwrap() })
        })
        .collect::<Vec<_>>();

    let mut pools = vec![];
    for handle in handles {
        pools.push(handle.await.unwrap());
    }

    assert_eq!(connects.load(Ordering::SeqCst), 1);
    assert!(pools.iter().all(|pool| Arc::ptr_eq(pool, &pools[0])));
    assert!(db.is_open("default").await);
}

#[tokio::test]
async fn close_and_reopen() {
    let test = TestDb::setup(Db::builder(), &[]).await;
    let db = &test.db;

    let first = db.instance("default").await.unwrap();
    assert_eq!(test.log().connects(), 1);

    assert!(db.close("default").await);
    assert!(first.is_closed());
    assert!(!db.is_open("default").await);
    assert!(!db.close("default").await);

    let second = db.instance("default").await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(test.log().connects(), 2);

    db.close_all().await;
    assert!(second.is_closed());
    assert!(!db.is_open("default").await);
}

#[tokio::test]
async fn unknown_schema() {
    init_tracing();
    let db = Db::builder().build().unwrap();

    let err = db.instance("reporting").await.unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "configuration error for schema `reporting`: schema is not configured"
    );

    // Not cached: the schema is still unopened
    assert!(!db.is_open("reporting").await);
}

#[tokio::test]
async fn unsupported_driver() {
    init_tracing();

    let config = Config::from_toml(
        r#"
        [schemas.sales]
        driver = "oracle"
        hostname = "ora.internal"
        dbname = "sales"
        "#,
    )
    .unwrap();

    let db = Db::builder().config(config).build().unwrap();
    let err = db.instance("sales").await.unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "configuration error for schema `sales` (host: ora.internal): unsupported driver `oracle`"
    );
}

#[tokio::test]
async fn unreachable_database() {
    init_tracing();

    let mut builder = Db::builder();
    builder.schema_config(
        "archive",
        SchemaConfig::sqlite("/nonexistent/quarry/archive.db"),
    );
    let db = builder.build().unwrap();

    let err = db.instance("archive").await.unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("host: /nonexistent/quarry/archive.db"));
}

#[tokio::test]
async fn schemas_from_toml() {
    init_tracing();

    let config = Config::from_toml(
        r#"
        [schemas.default]
        driver = "sqlite"
        dbname = ":memory:"

        [schemas.audit]
        driver = "sqlite"
        dbname = ":memory:"
        connect_timeout_ms = 500
        "#,
    )
    .unwrap();

    let event = Entity::builder("Event")
        .table("events")
        .schema("audit")
        .column(Column::new("id", Type::I64).auto())
        .column(Column::new("kind", Type::String))
        .build_arc();

    let db = Db::builder()
        .config(config)
        .register(event.clone())
        .build()
        .unwrap();

    let ddl = quarry::QuerySql::new("CREATE TABLE events (id INTEGER PRIMARY KEY, kind TEXT)");
    quarry::Executor::execute(&db, "audit", ddl, Default::default())
        .await
        .unwrap();

    Query::insert_into("events")
        .schema("audit")
        .set([("kind", "login")])
        .insert(&db)
        .await
        .unwrap();

    // Entity queries run on the entity's schema
    assert_eq!(Query::entity(&event).count(&db).await.unwrap(), 1);
    assert!(db.is_open("audit").await);
    assert!(!db.is_open("default").await);

    // The default schema is a different database
    let err = Query::entity(&event)
        .schema("default")
        .count(&db)
        .await
        .unwrap_err();
    assert!(err.is_prepare());
}

#[tokio::test]
async fn prepare_and_execute_failures_are_distinct() {
    let test = TestDb::setup(
        Db::builder(),
        &["CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE)"],
    )
    .await;

    let err = Query::select_all()
        .from("missing")
        .rows(&test.db)
        .await
        .unwrap_err();
    assert!(err.is_prepare());
    assert!(!err.is_execute());
    assert_eq!(err.failed_sql(), Some("SELECT * FROM `missing`"));

    Query::insert_into("tags")
        .set([("name", "rust")])
        .insert(&test.db)
        .await
        .unwrap();

    let err = Query::insert_into("tags")
        .set([("name", "rust")])
        .insert(&test.db)
        .await
        .unwrap_err();
    assert!(err.is_execute());
    assert!(err.to_string().contains("schema `default` (host: :memory:)"));

    // The failed statements are still logged, without a response
    let failed = test.log().count(|query| query.sql.contains("`missing`"));
    assert_eq!(failed, 1);
}
