use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Voter {
    pub voter_id: String,
    pub voter_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: String,
    pub registration_number: String,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_country: String,
    pub address_postcode: String,
    pub email: String,
    pub phone_number: String,
    pub cell_number: String,
    pub picture: String,
    pub registered_age: i32,
}

pub async fn count(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM voters")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn all(pool: &PgPool) -> Result<Vec<Voter>> {
    let voters = sqlx::query_as::<_, Voter>(
        r"
        SELECT voter_id, voter_name, date_of_birth, gender, nationality,
               registration_number, address_street, address_city,
               address_state, address_country, address_postcode,
               email, phone_number, cell_number, picture, registered_age
        FROM voters
        ORDER BY voter_id
        ",
    )
    .fetch_all(pool)
    .await?;

    Ok(voters)
}

/// Single multi-row insert inside one transaction, same contract as
/// [`crate::candidates::insert_many`].
#[tracing::instrument(skip_all, fields(batch_size = voters.len()), err)]
pub async fn insert_many(pool: &PgPool, voters: &[Voter]) -> Result<u64> {
    if voters.is_empty() {
        return Ok(0);
    }

    let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "INSERT INTO voters (
            voter_id, voter_name, date_of_birth, gender, nationality,
            registration_number, address_street, address_city,
            address_state, address_country, address_postcode,
            email, phone_number, cell_number, picture, registered_age
        ) ",
    );
    query.push_values(voters, |mut row, voter| {
        row.push_bind(&voter.voter_id)
            .push_bind(&voter.voter_name)
            .push_bind(&voter.date_of_birth)
            .push_bind(&voter.gender)
            .push_bind(&voter.nationality)
            .push_bind(&voter.registration_number)
            .push_bind(&voter.address_street)
            .push_bind(&voter.address_city)
            .push_bind(&voter.address_state)
            .push_bind(&voter.address_country)
            .push_bind(&voter.address_postcode)
            .push_bind(&voter.email)
            .push_bind(&voter.phone_number)
            .push_bind(&voter.cell_number)
            .push_bind(&voter.picture)
            .push_bind(voter.registered_age);
    });

    let mut tx = pool.begin().await?;
    let inserted = query.build().execute(&mut *tx).await?.rows_affected();
    tx.commit().await?;

    tracing::info!(inserted, "Loaded voters");

    Ok(inserted)
}
