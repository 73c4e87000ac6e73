use pretty_assertions::assert_eq;
use quarry::{Column, CursorDirection, Db, Direction, Entity, Query, Type, Value};
use std::sync::Arc;
use tests::TestDb;

fn item() -> Arc<Entity> {
    Entity::builder("Item")
        .table("items")
        .column(Column::new("id", Type::I64).auto())
        .column(Column::new("rank", Type::I64))
        .build_arc()
}

/// Ten items with ids 1..=10 and ranks descending from 10.
async fn setup() -> TestDb {
    let mut builder = Db::builder();
    builder.register(item());

    let test = TestDb::setup(
        builder,
        &["CREATE TABLE items (id INTEGER PRIMARY KEY, rank INTEGER NOT NULL)"],
    )
    .await;

    let mut insert = Query::insert_into("items").set([("id", 1), ("rank", 10)]);
    for id in 2..=10 {
        insert = insert.row([("id", id), ("rank", 11 - id)]);
    }
    insert.insert(&test.db).await.unwrap();

    test.log().clear();
    test
}

async fn ids(test: &TestDb, query: Query) -> Vec<i64> {
    query
        .rows(&test.db)
        .await
        .unwrap()
        .iter()
        .map(|row| row.get_as::<i64>("id").unwrap())
        .collect()
}

#[tokio::test]
async fn cursor_next_page() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item()).paginate_by_id(5, CursorDirection::Next, 3),
    )
    .await;
    assert_eq!(page, [6, 7, 8]);

    assert_eq!(
        test.log().sql(),
        ["SELECT `items`.`id`, `items`.`rank` FROM `items` WHERE (`items`.`id` > :p1) ORDER BY `items`.`id` ASC LIMIT 3"]
    );
}

#[tokio::test]
async fn cursor_prev_page_in_ascending_order() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item())
            .paginate_by_id(5, CursorDirection::Prev, 3)
            .order_by("id", Direction::Asc),
    )
    .await;
    assert_eq!(page, [2, 3, 4]);

    // Without an explicit ordering the page still comes back ascending
    let page = ids(
        &test,
        Query::entity(&item()).paginate_by_id(5, CursorDirection::Prev, 3),
    )
    .await;
    assert_eq!(page, [2, 3, 4]);
}

#[tokio::test]
async fn cursor_page_with_business_ordering() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item())
            .paginate_by_id(3, CursorDirection::Next, 4)
            .order_by("rank", Direction::Asc),
    )
    .await;

    // Scanned by id (4, 5, 6, 7), then ordered by rank
    assert_eq!(page, [7, 6, 5, 4]);
}

#[tokio::test]
async fn cursor_boundary_applies_to_every_or_group() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item())
            .eq("rank", 9)
            .or()
            .eq("rank", 1)
            .paginate_by_id(2, CursorDirection::Next, 5),
    )
    .await;

    // rank 9 is id 2, which sits on the boundary
    assert_eq!(page, [10]);
}

#[tokio::test]
async fn cursor_past_the_end() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item()).paginate_by_id(10, CursorDirection::Next, 3),
    )
    .await;
    assert!(page.is_empty());
}

#[tokio::test]
async fn cursor_on_another_column() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item())
            .cursor_column("rank")
            .paginate_by_id(Value::I64(4), CursorDirection::Next, 2),
    )
    .await;

    // ranks 5 and 6
    assert_eq!(page, [6, 5]);
}

#[tokio::test]
async fn offset_pages_are_zero_based() {
    let test = setup().await;

    let first = ids(&test, Query::entity(&item()).order_by("id", Direction::Asc).paginate(0, 4)).await;
    assert_eq!(first, [1, 2, 3, 4]);

    let last = ids(&test, Query::entity(&item()).order_by("id", Direction::Asc).paginate(2, 4)).await;
    assert_eq!(last, [9, 10]);

    assert_eq!(
        test.log().sql()[1],
        "SELECT `items`.`id`, `items`.`rank` FROM `items` ORDER BY `items`.`id` ASC LIMIT 4 OFFSET 8"
    );
}

#[tokio::test]
async fn limit_and_offset() {
    let test = setup().await;

    let page = ids(
        &test,
        Query::entity(&item())
            .order_by("id", Direction::Desc)
            .limit(2)
            .offset(1),
    )
    .await;
    assert_eq!(page, [9, 8]);

    let count = Query::entity(&item()).paginate(0, 3).count(&test.db).await.unwrap();
    assert_eq!(count, 10);
}
