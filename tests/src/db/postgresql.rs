use joinery::{db, Db, Dialect};
use joinery_driver_postgresql::PostgreSQL;

use crate::{isolation::TestIsolation, Setup};

const DEFAULT_URL: &str = "postgresql://localhost:5432/joinery_test";

pub struct SetupPostgreSQL {
    isolation: TestIsolation,
    native: bool,
}

impl SetupPostgreSQL {
    pub fn new() -> Self {
        Self {
            isolation: TestIsolation::new(),
            native: false,
        }
    }

    /// Same server, reported as the `postgres-native` dialect.
    pub fn native() -> Self {
        Self {
            native: true,
            ..Self::new()
        }
    }
}

impl Default for SetupPostgreSQL {
    fn default() -> Self {
        Self::new()
    }
}

fn url() -> String {
    std::env::var("JOINERY_TEST_POSTGRES_URL").unwrap_or_else(|_| DEFAULT_URL.to_string())
}

#[async_trait::async_trait]
impl Setup for SetupPostgreSQL {
    async fn connect(&self, mut builder: db::Builder) -> joinery::Result<Db> {
        let prefix = self.isolation.table_prefix();

        let mut driver = PostgreSQL::new(url())?;
        if self.native {
            driver = driver.native();
        }

        builder.table_name_prefix(&prefix).build(driver).await
    }

    fn dialect(&self) -> Dialect {
        if self.native {
            Dialect::PostgresNative
        } else {
            Dialect::Postgres
        }
    }

    async fn cleanup_my_tables(&self) -> joinery::Result<()> {
        cleanup_postgresql_tables(&self.isolation)
            .await
            .map_err(joinery::Error::driver_operation_failed)
    }
}

async fn cleanup_postgresql_tables(isolation: &TestIsolation) -> Result<(), tokio_postgres::Error> {
    use tokio_postgres::NoTls;

    let (client, connection) = tokio_postgres::connect(&url(), NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("PostgreSQL connection error during cleanup: {e}");
        }
    });

    let my_prefix = isolation.table_prefix();

    let rows = client
        .query(
            "SELECT table_name FROM information_schema.tables
         WHERE table_schema = 'public' AND table_name LIKE $1",
            &[&format!("{my_prefix}%")],
        )
        .await?;

    for row in rows {
        let table_name: String = row.get(0);
        if !isolation.owns_table(&table_name) {
            continue;
        }

        let query = format!("DROP TABLE IF EXISTS \"{table_name}\" CASCADE");
        // Ignore individual table drop errors
        let _ = client.execute(&query, &[]).await;
    }

    Ok(())
}
