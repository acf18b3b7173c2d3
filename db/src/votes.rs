use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A cast vote. This repo only creates the table; rows are written by the
/// voting service downstream of the seeded topics.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub voter_id: String,
    pub candidate_id: String,
    pub voting_time: chrono::DateTime<chrono::Utc>,
    pub vote: i32,
}

pub async fn count(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
