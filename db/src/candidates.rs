use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    pub candidate_id: String,
    pub candidate_name: String,
    pub party_affiliation: String,
    pub biography: String,
    pub campaign_platform: String,
    pub photo_url: String,
}

pub async fn count(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn all(pool: &PgPool) -> Result<Vec<Candidate>> {
    let candidates = sqlx::query_as::<_, Candidate>(
        r"
        SELECT candidate_id, candidate_name, party_affiliation,
               biography, campaign_platform, photo_url
        FROM candidates
        ORDER BY candidate_id
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(candidates)
}

/// Inserts the whole batch as one multi-row statement inside a single
/// transaction. Either every row lands or none do.
#[tracing::instrument(skip_all, fields(batch_size = candidates.len()), err)]
pub async fn insert_many(pool: &PgPool, candidates: &[Candidate]) -> Result<u64> {
    if candidates.is_empty() {
        return Ok(0);
    }

    let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "INSERT INTO candidates (
            candidate_id, candidate_name, party_affiliation,
            biography, campaign_platform, photo_url
        ) ",
    );
    query.push_values(candidates, |mut row, candidate| {
        row.push_bind(&candidate.candidate_id)
            .push_bind(&candidate.candidate_name)
            .push_bind(&candidate.party_affiliation)
            .push_bind(&candidate.biography)
            .push_bind(&candidate.campaign_platform)
            .push_bind(&candidate.photo_url);
    });

    let mut tx = pool.begin().await?;
    let inserted = query.build().execute(&mut *tx).await?.rows_affected();
    tx.commit().await?;

    tracing::info!(inserted, "Loaded candidates");

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_pool;

    fn sample(id: &str) -> Candidate {
        Candidate {
            candidate_id: id.to_string(),
            candidate_name: format!("Candidate {id}"),
            party_affiliation: "BJP".to_string(),
            biography: "A brief biography.".to_string(),
            campaign_platform: "A platform.".to_string(),
            photo_url: "https://example.com/photo.jpg".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres, set TEST_DATABASE_URL"]
    async fn batch_insert_then_read_back() {
        let pool = test_pool().await;

        let batch = vec![sample("1"), sample("2"), sample("3")];
        let inserted = insert_many(&pool, &batch).await.unwrap();
        assert_eq!(inserted, 3);

        let stored = all(&pool).await.unwrap();
        assert_eq!(stored, batch);
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres, set TEST_DATABASE_URL"]
    async fn duplicate_ids_roll_the_whole_batch_back() {
        let pool = test_pool().await;

        let batch = vec![sample("1"), sample("1")];
        assert!(insert_many(&pool, &batch).await.is_err());
        assert_eq!(count(&pool).await.unwrap(), 0);
    }
}
