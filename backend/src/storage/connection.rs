use std::fmt::Display;

use sqlx::{
    migrate::MigrateDatabase,
    query::Query,
    sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow},
    Execute, Sqlite, SqlitePool,
};
use tracing::{debug, error, info};

use crate::error::{InternalError, StorageResult};

/// A parameterized statement ready to run against the store
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Metadata returned by a write statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
    /// Rowid of the last inserted row (meaningless for UPDATE/DELETE)
    pub inserted_id: i64,
}

/// DbConnection is the only component that talks to SQLite.
///
/// It holds a single shared handle; clones are cheap and point at the same pool.
#[derive(Clone)]
pub struct DbConnection {
    pool: SqlitePool,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and bootstrap the schema
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database for a single test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self, sqlx::Error> {
        let test_id = uuid::Uuid::new_v4().simple().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS doctors (
                doctor_id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                speciality TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // ref_doctor is a plain column: the link to doctors is not enforced
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                patient_id INTEGER PRIMARY KEY AUTOINCREMENT,
                lastname TEXT NOT NULL,
                firstname TEXT NOT NULL,
                birthdate TEXT NOT NULL,
                niss TEXT NOT NULL,
                ref_doctor INTEGER NOT NULL,
                street_name TEXT NOT NULL,
                street_number TEXT NOT NULL,
                zip_code TEXT NOT NULL,
                city TEXT NOT NULL,
                country TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_patients_niss ON patients(niss);")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a read and collect every row
    pub async fn fetch_all<'q>(&self, query: SqliteQuery<'q>) -> StorageResult<Vec<SqliteRow>> {
        let sql = query.sql();
        debug!("fetch_all: {}", sql);
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal_error(sql, e))
    }

    /// Run a point read
    pub async fn fetch_optional<'q>(
        &self,
        query: SqliteQuery<'q>,
    ) -> StorageResult<Option<SqliteRow>> {
        let sql = query.sql();
        debug!("fetch_optional: {}", sql);
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal_error(sql, e))
    }

    /// Run an INSERT, UPDATE or DELETE
    pub async fn execute<'q>(&self, query: SqliteQuery<'q>) -> StorageResult<WriteOutcome> {
        let sql = query.sql();
        debug!("execute: {}", sql);
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| internal_error(sql, e))?;

        Ok(WriteOutcome {
            rows_affected: result.rows_affected(),
            inserted_id: result.last_insert_rowid(),
        })
    }
}

/// Log a storage fault in full and return the detail-free signal
pub fn internal_error(context: &str, err: impl Display) -> InternalError {
    error!("Storage failure ({}): {}", context.trim(), err);
    InternalError
}
