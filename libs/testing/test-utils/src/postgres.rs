//! PostgreSQL test infrastructure
//!
//! Provides a `TestDatabase` helper that starts a PostgreSQL container and applies
//! the SQL files from `manifests/migrations/projects/`.

use database::postgres::{PgConnectionProvider, PostgresConfig};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::path::PathBuf;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// Test database wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
pub struct TestDatabase {
    #[allow(dead_code)]
    container: ContainerAsync<Postgres>,
    /// Admin connection for fixtures; repositories should go through `provider()`
    pub connection: DatabaseConnection,
    pub host_port: u16,
}

impl TestDatabase {
    /// Create a new test database with the schema applied
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// // Use db.provider() to create your repository
    /// # }
    /// ```
    pub async fn new() -> Self {
        let postgres = Postgres::default().with_tag("18-alpine");

        let container = postgres
            .start()
            .await
            .expect("Failed to start Postgres container");

        let host_port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get host port");

        let config = Self::config_for_port(host_port);
        let connection = Database::connect(config.url())
            .await
            .expect("Failed to connect to test database");

        Self::run_migrations(&connection).await;

        tracing::info!(port = host_port, "Test database ready (Postgres 18)");

        Self {
            container,
            connection,
            host_port,
        }
    }

    fn config_for_port(port: u16) -> PostgresConfig {
        PostgresConfig::new("127.0.0.1", port, "postgres", "postgres", "postgres")
            .with_connect_timeout(5)
    }

    /// Connection settings pointing at the container
    pub fn config(&self) -> PostgresConfig {
        Self::config_for_port(self.host_port)
    }

    /// A per-request connection provider pointing at the container
    pub fn provider(&self) -> PgConnectionProvider {
        PgConnectionProvider::new(self.config())
    }

    /// Run an ad-hoc fixture statement (schema tweaks, dependent rows)
    pub async fn execute(&self, sql: &str) {
        self.connection
            .execute_unprepared(sql)
            .await
            .unwrap_or_else(|e| panic!("Fixture statement failed: {}\n{}", e, sql));
    }

    /// Find the workspace root by looking for Cargo.toml with [workspace]
    fn find_workspace_root() -> PathBuf {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest_dir
            .ancestors()
            .find(|p| {
                std::fs::read_to_string(p.join("Cargo.toml"))
                    .map(|c| c.contains("[workspace]"))
                    .unwrap_or(false)
            })
            .unwrap_or(&manifest_dir)
            .to_path_buf()
    }

    /// Apply SQL files from manifests/migrations/projects/ in file name order
    async fn run_migrations(connection: &DatabaseConnection) {
        let migrations_dir = Self::find_workspace_root().join("manifests/migrations/projects");

        let mut migrations: Vec<_> = std::fs::read_dir(&migrations_dir)
            .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", migrations_dir, e))
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "sql").unwrap_or(false))
            .collect();

        migrations.sort();

        for path in migrations {
            let sql = std::fs::read_to_string(&path)
                .unwrap_or_else(|_| panic!("Failed to read migration: {:?}", path));

            tracing::debug!("Running migration: {:?}", path.file_name());

            for statement in split_sql_statements(&sql) {
                let is_comment_only = statement.lines().all(|line| {
                    let trimmed = line.trim();
                    trimmed.is_empty() || trimmed.starts_with("--")
                });
                if !is_comment_only {
                    connection
                        .execute_unprepared(&statement)
                        .await
                        .unwrap_or_else(|e| panic!("Migration {:?} failed: {}", path, e));
                }
            }
        }

        tracing::info!("Migrations complete");
    }
}

/// Split SQL into statements, respecting dollar-quoted strings
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_dollar_quote = false;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if c == '$' && chars.peek() == Some(&'$') {
            chars.next();
            current.push('$');
            in_dollar_quote = !in_dollar_quote;
        } else if c == ';' && !in_dollar_quote {
            let stmt = current.trim().to_string();
            if !stmt.is_empty() {
                statements.push(stmt);
            }
            current = String::new();
        }
    }

    let stmt = current.trim().to_string();
    if !stmt.is_empty() {
        statements.push(stmt);
    }

    statements
}

// Container is automatically cleaned up when TestDatabase is dropped
impl Drop for TestDatabase {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test database container");
    }
}
