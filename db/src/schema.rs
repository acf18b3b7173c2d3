use color_eyre::{eyre::Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::DbConfig;

const CREATE_CANDIDATES: &str = r"
    CREATE TABLE IF NOT EXISTS candidates (
        candidate_id TEXT PRIMARY KEY,
        candidate_name TEXT NOT NULL,
        party_affiliation TEXT NOT NULL,
        biography TEXT NOT NULL,
        campaign_platform TEXT NOT NULL,
        photo_url TEXT NOT NULL
    )
";

const CREATE_VOTERS: &str = r"
    CREATE TABLE IF NOT EXISTS voters (
        voter_id TEXT PRIMARY KEY,
        voter_name TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        gender TEXT NOT NULL,
        nationality TEXT NOT NULL,
        registration_number TEXT NOT NULL,
        address_street TEXT NOT NULL,
        address_city TEXT NOT NULL,
        address_state TEXT NOT NULL,
        address_country TEXT NOT NULL,
        address_postcode TEXT NOT NULL,
        email TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        cell_number TEXT NOT NULL,
        picture TEXT NOT NULL,
        registered_age INT NOT NULL
    )
";

// Never written by this repo. The UNIQUE constraint on voter_id encodes the
// one-vote-per-voter rule for downstream writers.
const CREATE_VOTES: &str = r"
    CREATE TABLE IF NOT EXISTS votes (
        voter_id TEXT UNIQUE,
        candidate_id TEXT,
        voting_time TIMESTAMPTZ,
        vote INT DEFAULT 1,
        PRIMARY KEY (voter_id, candidate_id)
    )
";

/// Creates the target database when it is missing. Postgres has no
/// `CREATE DATABASE IF NOT EXISTS`, so we check `pg_database` first from a
/// short-lived connection to the maintenance database.
#[tracing::instrument(skip(config), fields(database = %config.database), err)]
pub async fn ensure_database(config: &DbConfig) -> Result<()> {
    let maintenance_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.maintenance_url())
        .await
        .wrap_err("Couldn't connect to the maintenance database")?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&config.database)
            .fetch_one(&maintenance_pool)
            .await?;

    if exists {
        tracing::debug!("Database already exists");
    } else {
        sqlx::query(&format!("CREATE DATABASE \"{}\"", config.database))
            .execute(&maintenance_pool)
            .await
            .wrap_err_with(|| format!("Couldn't create database {}", config.database))?;
        tracing::info!("Created database");
    }

    maintenance_pool.close().await;

    Ok(())
}

/// Applies the three table definitions. Safe to run on every startup.
#[tracing::instrument(skip(pool), err)]
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for ddl in [CREATE_CANDIDATES, CREATE_VOTERS, CREATE_VOTES] {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Tables are ready");

    Ok(())
}
