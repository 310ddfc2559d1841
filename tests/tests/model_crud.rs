use joinery::{
    Attribute, Db, DefineOptions, Direction, FindOptions, ModelDef, ModelHandle, Options, Record,
    SyncOptions, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{prelude::*, tests, Setup};

async fn tasks(setup: &impl Setup) -> ModelHandle {
    let mut builder = Db::builder();
    builder
        .options(Options::default().define(DefineOptions::default().timestamps(false)))
        .define(
            ModelDef::new("Task")
                .attribute(Attribute::text("title").not_null())
                .attribute(Attribute::integer("priority")),
        );

    let db = setup.setup(builder).await;
    db.sync(SyncOptions::force()).await.unwrap();
    db.model("Task").unwrap()
}

async fn create_assigns_generated_keys(setup: &impl Setup) {
    let tasks = tasks(setup).await;

    let first = tasks
        .create(Record::new().with("title", "write").with("priority", 2))
        .await
        .unwrap();
    let second = tasks
        .create(Record::new().with("title", "review"))
        .await
        .unwrap();

    assert_eq!(
        json!({"id": 1, "title": "write", "priority": 2}),
        first.to_json()
    );
    assert_eq!(
        json!({"id": 2, "title": "review", "priority": null}),
        second.to_json()
    );
    assert_eq!(Some(&Value::I64(2)), second.primary_key());

    let found = assert_some!(tasks.find_by_pk(1).await.unwrap());
    assert_eq!(first.to_json(), found.to_json());
    assert_none!(tasks.find_by_pk(3).await.unwrap());
}

async fn create_rejects_invalid_records(setup: &impl Setup) {
    let tasks = tasks(setup).await;

    let err = assert_err!(tasks.create(Record::new().with("priority", 1)).await);
    assert!(err.is_validation());
    assert_eq!("`Task.title` cannot be null", err.to_string());

    let err = assert_err!(
        tasks
            .create(Record::new().with("title", "x").with("owner", "me"))
            .await
    );
    assert!(err.is_validation());

    let err = assert_err!(tasks.create(Record::new().with("title", 7)).await);
    assert!(err.is_type_conversion());

    assert_eq!(0, tasks.count(FindOptions::new()).await.unwrap());
}

async fn find_all_filters_orders_and_limits(setup: &impl Setup) {
    let tasks = tasks(setup).await;

    tasks
        .bulk_create(vec![
            Record::new().with("title", "a").with("priority", 1),
            Record::new().with("title", "b").with("priority", 2),
            Record::new().with("title", "c").with("priority", 1),
            Record::new().with("title", "d").with("priority", 3),
        ])
        .await
        .unwrap();

    let titles = |rows: Vec<joinery::Instance>| {
        rows.iter()
            .map(|row| row.get("title").and_then(Value::as_str).unwrap_or("").to_string())
            .collect::<Vec<_>>()
    };

    let rows = tasks
        .find_all(FindOptions::new().order("priority", Direction::Desc).order("id", Direction::Asc))
        .await
        .unwrap();
    assert_eq!(vec!["d", "b", "a", "c"], titles(rows));

    let rows = tasks
        .find_all(
            FindOptions::new()
                .where_eq("priority", 1)
                .order("id", Direction::Desc),
        )
        .await
        .unwrap();
    assert_eq!(vec!["c", "a"], titles(rows));

    let rows = tasks
        .find_all(FindOptions::new().order("id", Direction::Asc).limit(2))
        .await
        .unwrap();
    assert_eq!(vec!["a", "b"], titles(rows));

    assert_eq!(
        2,
        tasks
            .count(FindOptions::new().where_eq("priority", 1))
            .await
            .unwrap()
    );

    let err = assert_err!(
        tasks
            .find_all(FindOptions::new().order("due", Direction::Asc))
            .await
    );
    assert!(err.is_validation());
}

async fn destroy_reports_deleted_rows(setup: &impl Setup) {
    let tasks = tasks(setup).await;

    for title in ["a", "b", "c"] {
        tasks
            .create(Record::new().with("title", title).with("priority", 1))
            .await
            .unwrap();
    }

    assert_eq!(
        1,
        tasks
            .destroy(FindOptions::new().where_eq("title", "b"))
            .await
            .unwrap()
    );
    assert_eq!(0, tasks.destroy(FindOptions::new().where_eq("title", "b")).await.unwrap());
    assert_eq!(2, tasks.destroy(FindOptions::new()).await.unwrap());
    assert_eq!(0, tasks.count(FindOptions::new()).await.unwrap());
}

async fn bulk_create_is_atomic(setup: &impl Setup) {
    let tasks = tasks(setup).await;

    // The duplicate key fails the second insert; the first is rolled back.
    let err = assert_err!(
        tasks
            .bulk_create(vec![
                Record::new().with("id", 10).with("title", "a"),
                Record::new().with("id", 10).with("title", "b"),
            ])
            .await
    );
    assert!(err.is_driver_operation_failed());
    assert_eq!(0, tasks.count(FindOptions::new()).await.unwrap());

    // The connection is usable again afterwards.
    assert_ok!(tasks.create(Record::new().with("title", "c")).await);
    assert!(assert_ok!(tasks.bulk_create(vec![]).await).is_empty());
}

tests!(
    create_assigns_generated_keys,
    create_rejects_invalid_records,
    find_all_filters_orders_and_limits,
    destroy_reports_deleted_rows,
    bulk_create_is_atomic,
);
