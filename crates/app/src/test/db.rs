//! Database test utilities and shared infrastructure

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

const USER: &str = "bazaar_test";
const PASSWORD: &str = "bazaar_test_password";

/// Validates a database name before it is spliced into DDL
///
/// Database names must:
/// - Be 1-63 characters long
/// - Start with a letter or underscore
/// - Contain only letters, digits, underscores, and dollar signs
/// - Not be a PostgreSQL reserved word
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("Database name must be 1-63 characters long".to_string());
    }

    if !name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    {
        return Err("Database name must start with a letter or underscore".to_string());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(
            "Database name can only contain letters, digits, underscores, and dollar signs"
                .to_string(),
        );
    }

    let reserved_words = [
        "user", "table", "select", "insert", "update", "delete", "drop", "create", "alter",
        "index", "database", "schema", "role", "grant", "revoke", "order",
    ];

    if reserved_words
        .iter()
        .any(|&word| name.eq_ignore_ascii_case(word))
    {
        return Err(format!("Database name '{name}' is a reserved word"));
    }

    Ok(())
}

fn host() -> String {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
}

fn database_url(port: u16, db_name: &str) -> String {
    format!("postgresql://{USER}:{PASSWORD}@{}:{port}/{db_name}", host())
}

/// Shared PostgreSQL container initialization
async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_tag("16-alpine")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

/// Started once and shared by every test in the binary
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            if let Err(err) = cleanup_database(&db_name).await {
                eprintln!("Failed to cleanup database '{db_name}': {err}");
            }
        }
    });

    sender
}

/// Drop a test database by name.
async fn cleanup_database(db_name: &str) -> Result<(), sqlx::Error> {
    validate_database_name(db_name).map_err(sqlx::Error::Protocol)?;

    if let Some(container) = POSTGRES_CONTAINER.get()
        && let Ok(port) = container.get_host_port_ipv4(5432).await
    {
        let mut conn = PgConnection::connect(&database_url(port, "postgres")).await?;

        sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
            .execute(&mut conn)
            .await?;

        conn.close().await?;
    }

    Ok(())
}

/// Test database
///
/// Every `TestDb` is a freshly migrated database inside the shared container.
/// Services commit their own transactions, so isolation comes from each test
/// owning its database rather than from rollback. The database is dropped in
/// the background once the `TestDb` goes out of scope.
#[derive(Debug, Clone)]
pub(crate) struct TestDb {
    /// PostgreSQL connection pool
    pub(crate) pool: PgPool,

    /// PostgreSQL database name
    pub(crate) name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    /// Create an isolated test database with a unique generated name.
    pub(crate) async fn new() -> Self {
        Self::new_with_db_name(&format!("bazaar_test_{}", Uuid::now_v7().simple())).await
    }

    /// Create an isolated test database with the given name.
    pub(crate) async fn new_with_db_name(db_name: &str) -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        if let Err(error) = validate_database_name(db_name) {
            panic!("Invalid database name '{db_name}': {error}");
        }

        let container = POSTGRES_CONTAINER
            .get_or_init(init_postgres_container)
            .await;

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get container port");

        let mut conn = PgConnection::connect(&database_url(port, "postgres"))
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&database_url(port, db_name))
            .await
            .expect("Failed to create pool for database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            pool,
            name: db_name.to_string(),
        }
    }

    /// Begin a transaction that rolls back when dropped.
    pub(crate) async fn begin_test_transaction(&self) -> Transaction<'_, Postgres> {
        self.pool
            .begin()
            .await
            .expect("Failed to start test transaction")
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_database_name_success() {
        assert!(validate_database_name("valid_name").is_ok());
        assert!(validate_database_name("_underscore_start").is_ok());
        assert!(validate_database_name("db$with$dollar").is_ok());
        assert!(validate_database_name("bazaar_test_0190a1b2c3d47e8f9a0b1c2d3e4f5a6b").is_ok());
    }

    #[test]
    fn test_validate_database_name_rejects_bad_lengths() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_validate_database_name_rejects_bad_characters() {
        assert!(validate_database_name("123invalid").is_err());
        assert!(validate_database_name("$invalid").is_err());
        assert!(validate_database_name("invalid-hyphen").is_err());
        assert!(validate_database_name("invalid\"quote").is_err());
    }

    #[test]
    fn test_validate_database_name_reserved_words() {
        assert!(validate_database_name("user").is_err());
        assert!(validate_database_name("ORDER").is_err());
    }

    #[tokio::test]
    async fn test_migrated_database_has_every_table() {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM information_schema.tables \
             WHERE table_schema = 'public' \
               AND table_name IN ('users', 'api_tokens', 'products', 'promotions', 'carts', 'orders')",
        )
        .fetch_one(test_db.pool())
        .await
        .expect("Failed to count tables");

        assert_eq!(tables, 6);
    }

    #[tokio::test]
    async fn test_transaction_isolation() {
        let test_db = TestDb::new().await;

        let mut tx1 = test_db.begin_test_transaction().await;

        sqlx::query("CREATE TABLE test_isolation (id INTEGER)")
            .execute(&mut *tx1)
            .await
            .expect("Failed to create table in tx1");

        let mut tx2 = test_db.begin_test_transaction().await;

        let result = sqlx::query("SELECT COUNT(*) FROM test_isolation")
            .fetch_one(&mut *tx2)
            .await;

        assert!(result.is_err());
    }
}
