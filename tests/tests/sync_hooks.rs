use joinery::{Db, FindOptions, Record, SyncOptions};
use std::sync::{Arc, Mutex};
use tests::{sscce, tests, Setup};

async fn db(setup: &impl Setup) -> Db {
    let mut builder = Db::builder();
    sscce::define_models(&mut builder);
    setup.setup(builder).await
}

async fn hooks_run_in_order_once_per_sync(setup: &impl Setup) {
    let db = db(setup).await;
    let events = Arc::new(Mutex::new(vec![]));

    for (name, after) in [("before", false), ("after 1", true), ("after 2", true)] {
        let events = events.clone();
        let hook = move |options: &SyncOptions| {
            events.lock().unwrap().push(format!("{name}; force={}", options.force));
        };

        if after {
            db.after_bulk_sync(hook);
        } else {
            db.before_bulk_sync(hook);
        }
    }

    db.sync(SyncOptions::force()).await.unwrap();
    db.sync(SyncOptions::default()).await.unwrap();

    assert_eq!(
        vec![
            "before; force=true",
            "after 1; force=true",
            "after 2; force=true",
            "before; force=false",
            "after 1; force=false",
            "after 2; force=false",
        ],
        *events.lock().unwrap()
    );
}

async fn plain_sync_keeps_rows(setup: &impl Setup) {
    let db = db(setup).await;
    db.sync(SyncOptions::force()).await.unwrap();

    let foos = db.model("Foo").unwrap();
    foos.create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();

    db.sync(SyncOptions::default()).await.unwrap();
    assert_eq!(1, foos.count(FindOptions::new()).await.unwrap());

    db.sync(SyncOptions::force()).await.unwrap();
    assert_eq!(0, foos.count(FindOptions::new()).await.unwrap());
}

tests!(
    hooks_run_in_order_once_per_sync,
    plain_sync_keeps_rows,
);

#[cfg(feature = "sqlite")]
#[test]
fn after_hooks_skip_failed_sync() {
    use joinery::{Attribute, ModelDef};
    use tests::{assert_err, db::sqlite::SetupSqlite, JoineryTest};

    let mut test = JoineryTest::new(SetupSqlite);
    test.run_test(|setup| async move {
        // SQLite reserves the `sqlite_` prefix, so creating the table fails.
        let mut builder = Db::builder();
        builder.define(
            ModelDef::new("Reserved")
                .table_name("sqlite_reserved")
                .attribute(Attribute::text("name").primary_key()),
        );
        let db = setup.setup(builder).await;

        let calls = Arc::new(Mutex::new(vec![]));
        for name in ["before", "after"] {
            let calls = calls.clone();
            let hook = move |_: &SyncOptions| calls.lock().unwrap().push(name);
            if name == "before" {
                db.before_bulk_sync(hook);
            } else {
                db.after_bulk_sync(hook);
            }
        }

        assert_err!(db.sync(SyncOptions::default()).await);
        assert_eq!(vec!["before"], *calls.lock().unwrap());

        setup
    });
}
