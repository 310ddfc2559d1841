//! Repeated belongs-to-many `add` calls between the same pair, each with a
//! different `restrictionId` on the through row.

use crate::Setup;

use joinery::{
    db::Builder, AddOptions, Attribute, BelongsToManyOptions, Db, DefineOptions, Dialect,
    Direction, Error, FindOptions, Instance, ModelDef, Options, Record, Result, SyncOptions,
};
use serde_json::{json, Value as Json};
use std_util::slice::SliceUtil;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Dialects the scenario is expected to pass on.
pub const TESTING_ON_DIALECTS: &[Dialect] = &[
    Dialect::Mssql,
    Dialect::Sqlite,
    Dialect::Mysql,
    Dialect::Mariadb,
    Dialect::Postgres,
    Dialect::PostgresNative,
];

/// Runs the scenario on `setup`, skipping dialects it does not target.
pub async fn run(setup: &dyn Setup) -> Result<()> {
    let dialect = setup.dialect();
    if !TESTING_ON_DIALECTS.contains(&dialect) {
        log::info!("skipping scenario; dialect={dialect}");
        return Ok(());
    }

    run_scenario(setup).await.map(drop)
}

/// Runs the scenario and returns the session so callers can inspect the
/// final state.
pub async fn run_scenario(setup: &dyn Setup) -> Result<Db> {
    let db = connect(setup).await?;
    run_on(&db).await?;
    Ok(db)
}

/// Opens a session with the scenario's options and models.
pub async fn connect(setup: &dyn Setup) -> Result<Db> {
    let mut builder = Db::builder();
    builder.options(
        Options::default()
            .log_query_parameters(true)
            .benchmark(true)
            .define(DefineOptions::default().timestamps(false)),
    );
    define_models(&mut builder);

    setup.connect(builder).await
}

/// Runs the scenario on an open session, starting with a forced sync.
pub async fn run_on(db: &Db) -> Result<()> {
    let synced = Arc::new(AtomicUsize::new(0));
    db.after_bulk_sync({
        let synced = synced.clone();
        move |_| {
            synced.fetch_add(1, Ordering::SeqCst);
        }
    });

    db.sync(SyncOptions::force()).await?;

    if synced.load(Ordering::SeqCst) == 0 {
        return Err(Error::from_args(format_args!(
            "after_bulk_sync hook did not run"
        )));
    }

    let foos = db.model("Foo")?;
    let bars = db.model("Bar")?;
    let attachments = db.model("FooBarAttachment")?;

    let (foo, bar, another_bar) = tokio::try_join!(
        foos.create(Record::new().with("fooName", "TS foo")),
        bars.create(Record::new().with("barName", "TS bar")),
        bars.create(Record::new().with("barName", "TS anotherBar")),
    )?;

    let foo_bars = foos.belongs_to_many("Bar")?;
    let steps = [
        ("First test failed", &bar, 1),
        ("Second test failed", &another_bar, 2),
        ("Third test failed", &bar, 3),
    ];

    let mut expected = vec![];

    for (index, (label, target, restriction_id)) in steps.into_iter().enumerate() {
        foo_bars
            .add(
                &foo,
                [target],
                AddOptions::through(Record::new().with("restrictionId", restriction_id)),
            )
            .await?;

        expected.push(json!({
            "id": index + 1,
            "fooName": "TS foo",
            "barName": target.get("barName").map(|name| name.to_json()),
            "restrictionId": restriction_id,
        }));

        let rows = attachments
            .find_all(FindOptions::new().order("id", Direction::Asc))
            .await?;
        expect_includes(label, &rows, &expected)?;
    }

    Ok(())
}

/// `Foo` and `Bar` keyed by name, linked through `FooBarAttachment` rows that
/// have their own auto-increment key.
pub fn define_models(builder: &mut Builder) {
    builder
        .define(ModelDef::new("Foo").attribute(Attribute::text("fooName").primary_key()))
        .define(ModelDef::new("Bar").attribute(Attribute::text("barName").primary_key()))
        .define(
            ModelDef::new("FooBarAttachment")
                .attribute(Attribute::integer("id").primary_key().auto_increment())
                .attribute(Attribute::text("fooName"))
                .attribute(Attribute::text("barName"))
                .attribute(Attribute::integer("restrictionId")),
        )
        .belongs_to_many(
            "Foo",
            "Bar",
            BelongsToManyOptions::through("FooBarAttachment")
                .foreign_key("fooName")
                .other_key("barName"),
        );
}

/// Fails with `label` unless every expected row is among `rows`.
fn expect_includes(label: &str, rows: &[Instance], expected: &[Json]) -> Result<()> {
    let actual = rows.iter().map(Instance::to_json).collect::<Vec<_>>();
    let missing = actual.missing_members(expected);

    if missing.is_empty() {
        return Ok(());
    }

    Err(Error::from_args(format_args!(
        "{label}; missing={}; actual={}",
        Json::from(missing.into_iter().cloned().collect::<Vec<_>>()),
        Json::from(actual),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dialect_is_targeted() {
        for dialect in Dialect::ALL {
            assert!(TESTING_ON_DIALECTS.contains(&dialect), "{dialect}");
        }
    }

    #[test]
    fn models_resolve() {
        let mut builder = Db::builder();
        define_models(&mut builder);

        let schema = builder.build_schema().unwrap();
        let foo = schema.model_by_name("Foo").unwrap();
        let assoc = schema.belongs_to_many(foo.id, "Bar").unwrap();
        assert!(!assoc.unique);
    }
}
