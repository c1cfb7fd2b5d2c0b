//! Database Test Utilities
//!
//! Starts PostgreSQL in a test container and applies the workspace
//! migrations, so repository tests run against the real schema.

use infra_db::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tracing::info;

const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "testgrid";
const POSTGRES_PASSWORD: &str = "testgrid";
const POSTGRES_DB: &str = "testgrid_test";
const POSTGRES_PORT: u16 = 5432;

/// Tables truncated by [`TestDatabase::clear_data`]
const TABLES: &[&str] = &["infra_result"];

pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Connection settings of a test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: POSTGRES_PORT,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }

    /// Pool settings sized for tests
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.connection_url())
            .max_connections(5)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(30))
    }
}

/// A PostgreSQL test container with the schema applied
///
/// The container is stopped when the value is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<Postgres>,
    pub config: TestDatabaseConfig,
    pub pool: DatabasePool,
}

impl TestDatabase {
    /// Starts a new PostgreSQL container and runs the migrations
    ///
    /// # Errors
    ///
    /// Returns an error if Docker is unavailable, the container fails to
    /// start, or a migration fails
    pub async fn new() -> TestResult<Self> {
        let container = Postgres::default()
            .with_user(POSTGRES_USER)
            .with_password(POSTGRES_PASSWORD)
            .with_db_name(POSTGRES_DB)
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        let config = TestDatabaseConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(POSTGRES_PORT).await?,
            ..TestDatabaseConfig::default()
        };
        info!(port = config.port, "Started PostgreSQL test container");

        let pool = create_pool(config.pool_config()).await?;

        run_migrations(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Clears all rows while preserving the schema
    pub async fn clear_data(&self) -> TestResult<()> {
        for table in TABLES {
            sqlx::query(&format!("TRUNCATE TABLE {} CASCADE", table))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

/// Creates an isolated test database for a single test
pub async fn create_isolated_test_database() -> TestResult<TestDatabase> {
    TestDatabase::new().await
}

/// Declares an ignored-by-default test that receives a fresh database pool
///
/// ```rust,ignore
/// db_test!(stores_result, |pool| async move {
///     let repo = InfraResultRepository::new(pool.clone());
///     // ...
/// });
/// ```
#[macro_export]
macro_rules! db_test {
    ($name:ident, $body:expr) => {
        #[tokio::test]
        #[ignore = "requires a Docker daemon"]
        async fn $name() {
            $crate::logging::init_test_tracing();
            let db = $crate::database::create_isolated_test_database()
                .await
                .expect("Failed to create test database");
            let body = $body;
            body(db.pool().clone()).await;
        }
    };
}

/// Helper trait for test assertions on raw query results
pub trait DatabaseTestAssertions {
    fn assert_rows_affected(&self, expected: u64);
}

impl DatabaseTestAssertions for sqlx::postgres::PgQueryResult {
    fn assert_rows_affected(&self, expected: u64) {
        assert_eq!(
            self.rows_affected(),
            expected,
            "Expected {} rows affected, got {}",
            expected,
            self.rows_affected()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let config = TestDatabaseConfig::default();
        let url = config.connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.ends_with(POSTGRES_DB));
    }

    #[test]
    fn test_pool_config_uses_connection_url() {
        let config = TestDatabaseConfig {
            port: 55432,
            ..TestDatabaseConfig::default()
        };
        let pool = config.pool_config();
        assert_eq!(pool.url, config.connection_url());
        assert_eq!(pool.max_connections, 5);
    }
}
