#![cfg(feature = "sqlite")]

use joinery::{Db, DefineOptions, FindOptions, Options, Record, SyncOptions};
use tests::sscce;

async fn connect(url: &str) -> Db {
    let mut builder = Db::builder();
    builder.options(Options::default().define(DefineOptions::default().timestamps(false)));
    sscce::define_models(&mut builder);

    let db = builder.connect(url).await.unwrap();
    db.sync(SyncOptions::force()).await.unwrap();
    db
}

#[tokio::test]
async fn reset_discards_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joinery.db");
    let db = connect(&format!("sqlite:{}", path.display())).await;

    let foos = db.model("Foo").unwrap();
    foos.create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    assert!(path.exists());

    db.reset_db().await.unwrap();
    assert!(!path.exists());

    // Pooled connections were closed, so this sees a fresh empty file.
    db.sync(SyncOptions::default()).await.unwrap();
    assert!(path.exists());
    assert_eq!(0, foos.count(FindOptions::new()).await.unwrap());

    foos.create(Record::new().with("fooName", "TS foo"))
        .await
        .unwrap();
    assert_eq!(1, foos.count(FindOptions::new()).await.unwrap());
}

#[tokio::test]
async fn reset_discards_in_memory_database() {
    let db = connect("sqlite::memory:").await;
    let bars = db.model("Bar").unwrap();

    bars.create(Record::new().with("barName", "TS bar"))
        .await
        .unwrap();

    db.reset_db().await.unwrap();

    // The tables went with the connection.
    assert!(bars.count(FindOptions::new()).await.is_err());

    db.sync(SyncOptions::default()).await.unwrap();
    assert_eq!(0, bars.count(FindOptions::new()).await.unwrap());
}
