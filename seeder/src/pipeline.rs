use color_eyre::Result;
use db::PgPool;

use crate::config::AppConfig;
use crate::publish::Publisher;
use crate::randomuser;
use crate::transform::Transformer;

pub(crate) struct SeedOpts {
    pub seed: u64,
    pub candidates: usize,
    pub voters: usize,
    pub skip_publish: bool,
}

/// Runs the whole pipeline once: candidates, then voters. The pool and the
/// publisher are created here and closed here, nothing outlives the run.
#[tracing::instrument(skip_all, err)]
pub(crate) async fn run(config: &AppConfig, opts: &SeedOpts) -> Result<()> {
    let pool = db::setup_db_pool(&config.db).await?;
    let client = reqwest::Client::new();
    let mut transformer = Transformer::new(opts.seed);

    let mut publisher = if opts.skip_publish {
        None
    } else {
        config.kafka.as_ref().map(Publisher::new).transpose()?
    };

    // A stage failure must not short-circuit past the publisher: sends
    // already enqueued for an earlier stage have to be settled before the
    // producer is dropped, or they are lost.
    let mut stages = seed_candidates(
        &pool,
        &client,
        config,
        &mut transformer,
        publisher.as_mut(),
        opts.candidates,
    )
    .await;
    if stages.is_ok() {
        stages = seed_voters(
            &pool,
            &client,
            config,
            &mut transformer,
            publisher.as_mut(),
            opts.voters,
        )
        .await;
    }

    let published = match publisher {
        Some(publisher) => publisher.finish().await,
        None => Ok(()),
    };

    pool.close().await;

    conclude(stages, published)
}

/// The stage error is the root cause when both went wrong, so it wins.
fn conclude(stages: Result<()>, published: Result<()>) -> Result<()> {
    stages?;
    published
}

#[tracing::instrument(skip_all, err)]
async fn seed_candidates(
    pool: &PgPool,
    client: &reqwest::Client,
    config: &AppConfig,
    transformer: &mut Transformer,
    publisher: Option<&mut Publisher>,
    batch: usize,
) -> Result<()> {
    let existing = db::candidates::count(pool).await?;
    if existing > 0 {
        tracing::info!(existing, "Candidates already seeded, skipping");
        return Ok(());
    }

    let people = randomuser::fetch_people(client, &config.randomuser, batch).await?;
    if people.is_empty() {
        tracing::warn!("Nothing fetched, no candidates loaded");
        return Ok(());
    }

    let candidates = transformer.candidates(&people);
    db::candidates::insert_many(pool, &candidates).await?;

    if let Some(publisher) = publisher {
        for candidate in &candidates {
            publisher.publish_candidate(candidate)?;
        }
    }

    Ok(())
}

#[tracing::instrument(skip_all, err)]
async fn seed_voters(
    pool: &PgPool,
    client: &reqwest::Client,
    config: &AppConfig,
    transformer: &mut Transformer,
    publisher: Option<&mut Publisher>,
    batch: usize,
) -> Result<()> {
    let existing = db::voters::count(pool).await?;
    if existing > 0 {
        tracing::info!(existing, "Voters already seeded, skipping");
        return Ok(());
    }

    let people = randomuser::fetch_people(client, &config.randomuser, batch).await?;
    if people.is_empty() {
        tracing::warn!("Nothing fetched, no voters loaded");
        return Ok(());
    }

    let voters = transformer.voters(&people);
    db::voters::insert_many(pool, &voters).await?;

    if let Some(publisher) = publisher {
        for voter in &voters {
            publisher.publish_voter(voter)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::eyre;

    #[test]
    fn a_stage_error_wins_over_a_publish_error() {
        let result = conclude(Err(eyre!("insert failed")), Err(eyre!("2 messages lost")));

        assert!(result.unwrap_err().to_string().contains("insert failed"));
    }

    #[test]
    fn a_publish_error_surfaces_when_the_stages_succeeded() {
        let result = conclude(Ok(()), Err(eyre!("2 messages lost")));

        assert!(result.unwrap_err().to_string().contains("messages"));
    }

    #[test]
    fn a_clean_run_concludes_ok() {
        assert!(conclude(Ok(()), Ok(())).is_ok());
    }
}
