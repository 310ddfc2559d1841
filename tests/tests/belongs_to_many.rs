use joinery::{
    db::Builder, AddOptions, Attribute, BelongsToManyOptions, Db, DefineOptions, Direction,
    FindOptions, ModelDef, Options, Record, SyncOptions, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{assert_empty, assert_err, sscce, tests, Setup};

fn builder() -> Builder {
    let mut builder = Db::builder();
    builder.options(Options::default().define(DefineOptions::default().timestamps(false)));
    builder
}

async fn scenario_db(setup: &impl Setup) -> Db {
    let mut builder = builder();
    sscce::define_models(&mut builder);

    let db = setup.setup(builder).await;
    db.sync(SyncOptions::force()).await.unwrap();
    db
}

/// Through rows of `model` ordered by `order_by`, as JSON.
async fn rows(db: &Db, model: &str, order_by: &str) -> Vec<serde_json::Value> {
    db.model(model)
        .unwrap()
        .find_all(FindOptions::new().order(order_by, Direction::Asc))
        .await
        .unwrap()
        .iter()
        .map(|row| row.to_json())
        .collect()
}

fn restriction(id: i64) -> AddOptions {
    AddOptions::through(Record::new().with("restrictionId", id))
}

async fn same_pair_same_attribute_appends(setup: &impl Setup) {
    let db = scenario_db(setup).await;
    let foo = db
        .model("Foo")
        .unwrap()
        .create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    let bar = db
        .model("Bar")
        .unwrap()
        .create(Record::new().with("barName", "TS bar"))
        .await
        .unwrap();

    let foo_bars = db.model("Foo").unwrap().belongs_to_many("Bar").unwrap();
    foo_bars.add(&foo, [&bar], restriction(1)).await.unwrap();
    foo_bars.add(&foo, [&bar], restriction(1)).await.unwrap();

    assert_eq!(
        vec![
            json!({"id": 1, "fooName": "TS foo", "barName": "TS bar", "restrictionId": 1}),
            json!({"id": 2, "fooName": "TS foo", "barName": "TS bar", "restrictionId": 1}),
        ],
        rows(&db, "FooBarAttachment", "id").await
    );

    assert!(foo_bars.has(&foo, &bar).await.unwrap());
    assert_eq!(1, foo_bars.count(&foo).await.unwrap());
}

async fn add_several_targets_at_once(setup: &impl Setup) {
    let db = scenario_db(setup).await;
    let foo = db
        .model("Foo")
        .unwrap()
        .create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    let bars = db
        .model("Bar")
        .unwrap()
        .bulk_create(vec![
            Record::new().with("barName", "TS bar"),
            Record::new().with("barName", "TS anotherBar"),
        ])
        .await
        .unwrap();

    let foo_bars = db.model("Foo").unwrap().belongs_to_many("Bar").unwrap();
    let written = foo_bars.add(&foo, &bars, restriction(7)).await.unwrap();

    assert_eq!(2, written.len());
    assert_eq!(Some(&Value::I64(1)), written[0].get("id"));
    assert_eq!(Some(&Value::I64(2)), written[1].get("id"));
    assert_eq!(
        vec![
            json!({"id": 1, "fooName": "TS foo", "barName": "TS bar", "restrictionId": 7}),
            json!({"id": 2, "fooName": "TS foo", "barName": "TS anotherBar", "restrictionId": 7}),
        ],
        rows(&db, "FooBarAttachment", "id").await
    );
}

async fn pair_keyed_through_updates(setup: &impl Setup) {
    let mut builder = builder();
    builder
        .define(ModelDef::new("User").attribute(Attribute::text("login").primary_key()))
        .define(ModelDef::new("Group").attribute(Attribute::text("title").primary_key()))
        .define(ModelDef::new("Membership").attribute(Attribute::integer("restrictionId")))
        .belongs_to_many(
            "User",
            "Group",
            BelongsToManyOptions::through("Membership")
                .foreign_key("login")
                .other_key("title"),
        );

    let db = setup.setup(builder).await;
    db.sync(SyncOptions::force()).await.unwrap();

    let user = db
        .model("User")
        .unwrap()
        .create(Record::new().with("login", "carl"))
        .await
        .unwrap();
    let group = db
        .model("Group")
        .unwrap()
        .create(Record::new().with("title", "admins"))
        .await
        .unwrap();

    let groups = db.model("User").unwrap().belongs_to_many("Group").unwrap();
    assert!(groups.association().unique);

    groups.add(&user, [&group], restriction(1)).await.unwrap();
    let updated = groups.add(&user, [&group], restriction(2)).await.unwrap();

    assert_eq!(Some(&Value::I64(2)), updated[0].get("restrictionId"));
    assert_eq!(
        vec![json!({"restrictionId": 2, "login": "carl", "title": "admins"})],
        rows(&db, "Membership", "login").await
    );
}

async fn get_has_and_remove(setup: &impl Setup) {
    let db = scenario_db(setup).await;
    let foos = db.model("Foo").unwrap();
    let bars = db.model("Bar").unwrap();

    let foo = foos
        .create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    let other_foo = foos
        .create(Record::new().with("fooName", "TS otherFoo"))
        .await
        .unwrap();
    let bar = bars
        .create(Record::new().with("barName", "TS bar"))
        .await
        .unwrap();
    let another_bar = bars
        .create(Record::new().with("barName", "TS anotherBar"))
        .await
        .unwrap();

    let foo_bars = foos.belongs_to_many("Bar").unwrap();
    assert_empty!(foo_bars.get(&foo).await.unwrap());
    assert!(!foo_bars.has(&foo, &bar).await.unwrap());

    foo_bars.add(&foo, [&another_bar], restriction(1)).await.unwrap();
    foo_bars.add(&foo, [&bar], restriction(2)).await.unwrap();
    foo_bars.add(&foo, [&another_bar], restriction(3)).await.unwrap();
    foo_bars.add(&other_foo, [&bar], restriction(4)).await.unwrap();

    let linked = foo_bars.get(&foo).await.unwrap();
    assert_eq!(
        vec![json!({"barName": "TS anotherBar"}), json!({"barName": "TS bar"})],
        linked.iter().map(|bar| bar.to_json()).collect::<Vec<_>>()
    );

    // Both rows of the pair go; other sources keep their links.
    assert_eq!(2, foo_bars.remove(&foo, [&another_bar]).await.unwrap());
    assert!(!foo_bars.has(&foo, &another_bar).await.unwrap());
    assert!(foo_bars.has(&foo, &bar).await.unwrap());
    assert!(foo_bars.has(&other_foo, &bar).await.unwrap());
    assert_eq!(1, foo_bars.count(&foo).await.unwrap());

    assert_eq!(0, foo_bars.remove(&foo, std::iter::empty()).await.unwrap());
}

async fn add_validates_input(setup: &impl Setup) {
    let db = scenario_db(setup).await;
    let foo = db
        .model("Foo")
        .unwrap()
        .create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    let bar = db
        .model("Bar")
        .unwrap()
        .create(Record::new().with("barName", "TS bar"))
        .await
        .unwrap();

    let foo_bars = db.model("Foo").unwrap().belongs_to_many("Bar").unwrap();

    // Only the declaring side gets a handle.
    let err = assert_err!(db.model("Bar").unwrap().belongs_to_many("Foo"));
    assert!(err.is_invalid_schema());

    // Instances of the wrong model are rejected.
    let err = assert_err!(foo_bars.add(&bar, [&foo], restriction(1)).await);
    assert!(
        err.to_string().contains("expects a `Foo` instance, got `Bar`"),
        "{err}"
    );

    let err = assert_err!(
        foo_bars
            .add(
                &foo,
                [&bar],
                AddOptions::through(Record::new().with("color", "red"))
            )
            .await
    );
    assert!(err.is_validation());

    let err = assert_err!(
        foo_bars
            .add(
                &foo,
                [&bar],
                AddOptions::through(Record::new().with("restrictionId", "one"))
            )
            .await
    );
    assert!(err.is_type_conversion());

    assert_empty!(rows(&db, "FooBarAttachment", "id").await);
}

async fn failed_batch_writes_nothing(setup: &impl Setup) {
    let db = scenario_db(setup).await;
    let foo = db
        .model("Foo")
        .unwrap()
        .create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    let bar = db
        .model("Bar")
        .unwrap()
        .create(Record::new().with("barName", "TS bar"))
        .await
        .unwrap();

    // Never stored, so its link violates the foreign key.
    let ghost = db
        .model("Bar")
        .unwrap()
        .create(Record::new().with("barName", "TS ghost"))
        .await
        .unwrap();
    db.model("Bar")
        .unwrap()
        .destroy(FindOptions::new().where_eq("barName", "TS ghost"))
        .await
        .unwrap();

    let foo_bars = db.model("Foo").unwrap().belongs_to_many("Bar").unwrap();
    assert_err!(foo_bars.add(&foo, [&bar, &ghost], restriction(1)).await);

    assert_empty!(rows(&db, "FooBarAttachment", "id").await);
}

async fn pair_keyed_get_follows_target_keys(setup: &impl Setup) {
    let mut builder = builder();
    builder
        .define(ModelDef::new("User").attribute(Attribute::text("login").primary_key()))
        .define(ModelDef::new("Group").attribute(Attribute::text("title").primary_key()))
        .define(ModelDef::new("Membership").attribute(Attribute::integer("restrictionId")))
        .belongs_to_many(
            "User",
            "Group",
            BelongsToManyOptions::through("Membership")
                .foreign_key("login")
                .other_key("title"),
        );

    let db = setup.setup(builder).await;
    db.sync(SyncOptions::force()).await.unwrap();

    let user = db
        .model("User")
        .unwrap()
        .create(Record::new().with("login", "carl"))
        .await
        .unwrap();
    let groups = db
        .model("Group")
        .unwrap()
        .bulk_create(vec![
            Record::new().with("title", "zeta"),
            Record::new().with("title", "alpha"),
        ])
        .await
        .unwrap();

    let user_groups = db.model("User").unwrap().belongs_to_many("Group").unwrap();
    user_groups.add(&user, [&groups[0]], restriction(1)).await.unwrap();
    user_groups.add(&user, [&groups[1]], restriction(2)).await.unwrap();

    assert_eq!(
        vec![json!({"title": "alpha"}), json!({"title": "zeta"})],
        user_groups
            .get(&user)
            .await
            .unwrap()
            .iter()
            .map(|group| group.to_json())
            .collect::<Vec<_>>()
    );
}

tests!(
    same_pair_same_attribute_appends,
    add_several_targets_at_once,
    pair_keyed_through_updates,
    pair_keyed_get_follows_target_keys,
    get_has_and_remove,
    add_validates_input,
    failed_batch_writes_nothing,
);
