use pretty_assertions::assert_eq;
use quarry::{Column, Condition, Db, Entity, Query, Record, Status, Type, Value};
use std::sync::Arc;
use tests::TestDb;

const DDL: &[&str] = &[
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        team_id INTEGER
    )",
    "CREATE TABLE posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL
    )",
];

fn user() -> Arc<Entity> {
    Entity::builder("User")
        .table("users")
        .column(Column::new("id", Type::I64).auto())
        .column(Column::new("name", Type::String).required())
        .column(Column::new("email", Type::String))
        .column(Column::new("team_id", Type::I64))
        .build_arc()
}

async fn setup() -> TestDb {
    let mut builder = Db::builder();
    builder.register(user());
    TestDb::setup(builder, DDL).await
}

/// Inserts one user per name, with ids assigned 1, 2, ...
async fn seed(test: &TestDb, users: &[(&str, Option<&str>, i64)]) {
    for (name, email, team_id) in users {
        Query::insert_into("users")
            .value("name", *name)
            .value("email", email.map(Value::from).unwrap_or_default())
            .value("team_id", *team_id)
            .insert(&test.db)
            .await
            .unwrap();
    }
    test.log().clear();
}

#[tokio::test]
async fn insert_then_select() {
    let test = setup().await;

    let result = Query::insert_into("users")
        .set([("name", "ada"), ("email", "ada@example.com")])
        .insert(&test.db)
        .await
        .unwrap();
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.last_insert_id().unwrap(), 1);

    let users = Query::entity(&user()).all(&test.db).await.unwrap();
    assert_eq!(users.count(), 1);

    let ada = users.get(&Value::I64(1)).unwrap();
    assert_eq!(ada.status(), Status::Saved);
    assert_eq!(ada.get_as::<String>("email").unwrap(), "ada@example.com");
    assert!(ada.get("team_id").unwrap().is_null());

    assert_eq!(
        test.log().sql(),
        [
            "INSERT INTO `users` (`name`, `email`) VALUES (:p1, :p2)",
            "SELECT `users`.`id`, `users`.`name`, `users`.`email`, `users`.`team_id` FROM `users`",
        ]
    );
}

#[tokio::test]
async fn multi_row_insert() {
    let test = setup().await;

    let result = Query::insert_into("users")
        .set([("name", "ada")])
        .row([("name", "bob")])
        .row([("name", "cy")])
        .insert(&test.db)
        .await
        .unwrap();
    assert_eq!(result.row_count(), 3);

    let count = Query::entity(&user()).count(&test.db).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() {
    let test = setup().await;
    seed(&test, &[("ada", None, 1), ("bob", None, 1), ("cy", None, 2)]).await;

    let updated = Query::update_table("users")
        .set([("team_id", 3)])
        .eq("team_id", 1)
        .update(&test.db)
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let deleted = Query::delete_from("users")
        .eq("id", 3)
        .delete(&test.db)
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = Query::entity(&user()).eq("team_id", 3).count(&test.db).await.unwrap();
    assert_eq!(remaining, 2);
    assert!(!Query::entity(&user()).eq("id", 3).exists(&test.db).await.unwrap());
}

#[tokio::test]
async fn unconditional_update_is_rejected_before_dispatch() {
    let test = setup().await;
    seed(&test, &[("ada", None, 1)]).await;

    let err = Query::update_table("users")
        .set([("team_id", 9)])
        .update(&test.db)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(test.log().is_empty());

    let updated = Query::update_table("users")
        .set([("team_id", 9)])
        .allow_unconditional()
        .update(&test.db)
        .await
        .unwrap();
    assert_eq!(updated, 1);
}

#[tokio::test]
async fn record_save_writes_only_changes() {
    let test = setup().await;
    let user = user();

    let mut record = Record::new(&user);
    record.set("name", "ada").unwrap();
    record.set("email", "ada@example.com").unwrap();
    assert!(record.save(&test.db).await.unwrap());
    assert_eq!(record.primary_key(), &Value::I64(1));

    record.set("name", "grace").unwrap();
    assert_eq!(record.original("name"), Some(&Value::from("ada")));
    assert!(record.save(&test.db).await.unwrap());

    // Nothing left to write
    assert!(!record.save(&test.db).await.unwrap());

    let (insert, _) = test.log().pop().unwrap();
    assert!(insert.sql.starts_with("INSERT INTO `users`"));

    let (update, response) = test.log().pop().unwrap();
    assert_eq!(
        update.sql,
        "UPDATE `users` SET `name` = :p1 WHERE (`users`.`id` = :p2)"
    );
    assert_eq!(response.unwrap().row_count(), 1);
    assert!(test.log().is_empty());

    let loaded = Query::entity(&user)
        .eq("id", 1)
        .first_or_fail(&test.db)
        .await
        .unwrap();
    assert_eq!(loaded.get_as::<String>("name").unwrap(), "grace");
    assert_eq!(loaded.get_as::<String>("email").unwrap(), "ada@example.com");
}

#[tokio::test]
async fn record_remove() {
    let test = setup().await;
    seed(&test, &[("ada", None, 1)]).await;

    let mut record = Query::entity(&user())
        .eq("name", "ada")
        .first_or_fail(&test.db)
        .await
        .unwrap();
    record.remove(&test.db).await.unwrap();
    assert!(record.is_deleted());

    let err = Query::entity(&user())
        .eq("name", "ada")
        .first_or_fail(&test.db)
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
}

#[tokio::test]
async fn filter_operators() {
    let test = setup().await;
    seed(
        &test,
        &[
            ("ada", Some("ada@example.com"), 1),
            ("bob", Some("bob@example.com"), 1),
            ("cy", None, 2),
            ("dee", Some("dee@example.com"), 2),
        ],
    )
    .await;

    let names = |users: quarry::Collection| {
        users
            .pluck("name")
            .into_iter()
            .map(|name| name.to::<String>().unwrap())
            .collect::<Vec<_>>()
    };

    let users = Query::entity(&user()).is_in("name", ["ada", "cy"]).all(&test.db).await.unwrap();
    assert_eq!(names(users), ["ada", "cy"]);

    let users = Query::entity(&user()).not_in("id", [1, 2]).all(&test.db).await.unwrap();
    assert_eq!(names(users), ["cy", "dee"]);

    let users = Query::entity(&user()).like("name", "%e%").all(&test.db).await.unwrap();
    assert_eq!(names(users), ["dee"]);

    let users = Query::entity(&user()).between("id", 2, 3).all(&test.db).await.unwrap();
    assert_eq!(names(users), ["bob", "cy"]);

    let users = Query::entity(&user()).is_null("email").all(&test.db).await.unwrap();
    assert_eq!(names(users), ["cy"]);

    let users = Query::entity(&user())
        .eq("team_id", 1)
        .eq("name", "ada")
        .or()
        .eq("name", "dee")
        .all(&test.db)
        .await
        .unwrap();
    assert_eq!(names(users), ["ada", "dee"]);

    let users = Query::entity(&user())
        .not(Condition::eq("team_id", 1))
        .raw("length(`users`.`name`) > :len", [("len", 2)])
        .all(&test.db)
        .await
        .unwrap();
    assert_eq!(names(users), ["dee"]);
}

#[tokio::test]
async fn raw_condition_with_mismatched_token_is_rejected() {
    let test = setup().await;
    seed(&test, &[("ada", None, 1), ("bob", None, 2)]).await;

    let err = Query::entity(&user())
        .raw("`users`.`team_id` > :mni", [("min", 0)])
        .all(&test.db)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn emulated_params_inline_literals() {
    let test = setup().await;
    seed(&test, &[("O'Brien", None, 1)]).await;

    let found = Query::entity(&user())
        .eq("name", "O'Brien")
        .emulate_params()
        .one(&test.db)
        .await
        .unwrap();
    assert!(found.is_some());

    let (query, _) = test.log().pop().unwrap();
    assert!(query.sql.contains("'O''Brien'"));
    assert!(query.params.is_empty());
}

#[tokio::test]
async fn join_and_grouping() {
    let test = setup().await;
    seed(&test, &[("ada", None, 1), ("bob", None, 1), ("cy", None, 2)]).await;

    test.exec_raw("INSERT INTO posts (user_id, title) VALUES (1, 'intro'), (1, 'notes'), (3, 'hello')")
        .await;

    let rows = Query::select(["users.name", "p.title"])
        .from("users")
        .inner_join("posts", "p", "`p`.`user_id` = `users`.`id`")
        .eq("p.title", "notes")
        .rows(&test.db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("ada")));

    let teams = Query::select(["team_id"])
        .from("users")
        .group_by("team_id")
        .having(Condition::raw("COUNT(1) > :n", [("n", 1)]))
        .rows(&test.db)
        .await
        .unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].get_as::<i64>("team_id").unwrap(), 1);
}

#[tokio::test]
async fn aggregates() {
    let test = setup().await;

    let query = Query::entity(&user());
    assert_eq!(query.max("id", &test.db).await.unwrap(), Value::Null);

    seed(&test, &[("ada", None, 4), ("bob", None, 7)]).await;
    assert_eq!(query.max("team_id", &test.db).await.unwrap(), Value::I64(7));
    assert_eq!(query.min("team_id", &test.db).await.unwrap(), Value::I64(4));
    assert_eq!(query.count(&test.db).await.unwrap(), 2);
}
