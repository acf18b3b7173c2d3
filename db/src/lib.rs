use color_eyre::{eyre::Context, Result};
use sqlx::postgres::PgPoolOptions;

pub mod candidates;
pub mod schema;
pub mod voters;
pub mod votes;

#[cfg(test)]
pub(crate) mod test_utils;

pub use sqlx;
pub use sqlx::PgPool;

/// Connection parameters for the election database. Built once at startup
/// and passed by reference to whichever stage needs a pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub port: u16,
    pub database: String,
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("DB_PASSWORD").unwrap_or_default(),
            port: std::env::var("DB_PORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()
                .wrap_err("DB_PORT is not a valid port number")?,
            database: std::env::var("DB_NAME").unwrap_or_else(|_| "vote".to_string()),
        })
    }

    pub fn url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL for the maintenance database, used before the target database
    /// is known to exist.
    pub fn maintenance_url(&self) -> String {
        self.url_for("postgres")
    }

    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.user, self.password, self.host, self.port
        )
    }
}

/// Ensures the target database exists, then returns a pool connected to it
/// with the schema applied. Idempotent across runs.
#[tracing::instrument(skip(config), fields(database = %config.database), err)]
pub async fn setup_db_pool(config: &DbConfig) -> Result<PgPool> {
    schema::ensure_database(config).await?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.url())
        .await
        .wrap_err_with(|| format!("Couldn't connect to database {}", config.database))?;

    schema::ensure_schema(&pool).await?;

    Ok(pool)
}
