use pretty_assertions::assert_eq;
use quarry::{Column, Db, Entity, Query, Record, Related, Type, Value};
use std::sync::Arc;
use tests::TestDb;

const DDL: &[&str] = &[
    "CREATE TABLE teams (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
    "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, team_id INTEGER)",
    "CREATE TABLE posts (id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER NOT NULL, title TEXT NOT NULL, published INTEGER NOT NULL DEFAULT 0)",
];

async fn setup() -> TestDb {
    let mut builder = Db::builder();
    builder
        .register(
            Entity::builder("Team")
                .table("teams")
                .column(Column::new("id", Type::I64).auto())
                .column(Column::new("name", Type::String).required())
                .has_many("members", "User", "team_id")
                .build(),
        )
        .register(
            Entity::builder("User")
                .table("users")
                .column(Column::new("id", Type::I64).auto())
                .column(Column::new("name", Type::String).required())
                .column(Column::new("team_id", Type::I64))
                .belongs_to("team", "Team", "team_id")
                .has_many("posts", "Post", "user_id")
                .build(),
        )
        .register(
            Entity::builder("Post")
                .table("posts")
                .column(Column::new("id", Type::I64).auto())
                .column(Column::new("user_id", Type::I64).required())
                .column(Column::new("title", Type::String).required())
                .column(Column::new("published", Type::Bool))
                .belongs_to("author", "User", "user_id")
                .build(),
        );

    let test = TestDb::setup(builder, DDL).await;

    for sql in [
        "INSERT INTO teams (name) VALUES ('core'), ('docs')",
        "INSERT INTO users (name, team_id) VALUES ('ada', 1), ('bob', 1), ('cy', NULL)",
        "INSERT INTO posts (user_id, title, published) VALUES (1, 'intro', 1), (1, 'draft', 0), (2, 'hello', 1)",
    ] {
        test.exec_raw(sql).await;
    }

    test.log().clear();
    test
}

fn entity(test: &TestDb, name: &str) -> Arc<Entity> {
    test.db.entity(name).unwrap().clone()
}

async fn find_user(test: &TestDb, name: &str) -> Record {
    let record = Query::entity(&entity(test, "User"))
        .eq("name", name)
        .first_or_fail(&test.db)
        .await
        .unwrap();
    test.log().clear();
    record
}

#[tokio::test]
async fn belongs_to() {
    let test = setup().await;
    let mut ada = find_user(&test, "ada").await;

    let team = ada.related("team", &test.db).await.unwrap();
    let team = team.as_one().unwrap();
    assert_eq!(team.get_as::<String>("name").unwrap(), "core");

    // Cached on the record
    ada.related("team", &test.db).await.unwrap();
    assert_eq!(test.log().len(), 1);
}

#[tokio::test]
async fn belongs_to_with_null_key() {
    let test = setup().await;
    let mut cy = find_user(&test, "cy").await;

    assert!(matches!(
        cy.related("team", &test.db).await.unwrap(),
        Related::One(None)
    ));
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn has_many() {
    let test = setup().await;
    let mut ada = find_user(&test, "ada").await;

    let posts = ada.related("posts", &test.db).await.unwrap().as_many().unwrap();
    assert_eq!(posts.count(), 2);
    assert!(posts.contains(&Value::I64(1)));
    assert!(posts.contains(&Value::I64(2)));

    // Stored values are coerced to the declared column type
    let intro = posts.get(&Value::I64(1)).unwrap();
    assert_eq!(intro.get("published").unwrap(), &Value::Bool(true));
}

#[tokio::test]
async fn has_many_indexed_by_title() {
    let test = setup().await;
    let mut ada = find_user(&test, "ada").await;

    let posts = ada
        .related_indexed_by("posts", "title", &test.db)
        .await
        .unwrap();
    let titles = posts.keys().cloned().collect::<Vec<_>>();
    assert_eq!(titles, [Value::from("intro"), Value::from("draft")]);
}

#[tokio::test]
async fn has_many_of_unsaved_record_is_empty() {
    let test = setup().await;
    let mut record = Record::new(&entity(&test, "User"));

    let posts = record.related("posts", &test.db).await.unwrap();
    assert!(posts.as_many().unwrap().is_empty());
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn collection_filtering() {
    let test = setup().await;
    let mut core = Query::entity(&entity(&test, "Team"))
        .eq("name", "core")
        .first_or_fail(&test.db)
        .await
        .unwrap();

    let members = core.related("members", &test.db).await.unwrap();
    let mut members = members.as_many().unwrap().clone();
    assert_eq!(members.count(), 2);

    members.filter(|user| user.get("name").unwrap() == &Value::from("bob"));
    assert_eq!(members.count(), 1);
    assert_eq!(members.total(), 2);
    assert_eq!(members.pluck("name"), [Value::from("bob")]);

    members.reset();
    assert_eq!(members.count(), 2);
}

#[tokio::test]
async fn changing_foreign_key_reloads_target() {
    let test = setup().await;
    let mut ada = find_user(&test, "ada").await;

    ada.related("team", &test.db).await.unwrap();
    ada.set("team_id", 2).unwrap();
    ada.save(&test.db).await.unwrap();

    let team = ada.related("team", &test.db).await.unwrap();
    assert_eq!(team.as_one().unwrap().get_as::<String>("name").unwrap(), "docs");
    assert_eq!(test.log().count_verb("SELECT"), 2);
    assert_eq!(test.log().count_verb("UPDATE"), 1);
}
