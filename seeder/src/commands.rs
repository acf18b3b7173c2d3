use clap::{Args, Subcommand};
use color_eyre::Result;

use crate::config::AppConfig;
use crate::pipeline::{self, SeedOpts};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_CANDIDATES: usize = 3;
const DEFAULT_VOTERS: usize = 10;

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch people from randomuser.me, load candidates and voters, and
    /// optionally publish each record to Kafka
    Seed(SeedArgs),
    /// Create the database and tables, then exit
    InitSchema,
}

impl Default for Command {
    fn default() -> Self {
        Self::Seed(SeedArgs::default())
    }
}

#[derive(Args)]
pub(crate) struct SeedArgs {
    /// Seed for the pseudo-random generator behind party draws and
    /// voter/registration numbers
    #[clap(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// How many candidates to fetch and load
    #[clap(long, default_value_t = DEFAULT_CANDIDATES)]
    candidates: usize,

    /// How many voters to fetch and load
    #[clap(long, default_value_t = DEFAULT_VOTERS)]
    voters: usize,

    /// Load the database but skip the Kafka mirror even when brokers are
    /// configured
    #[clap(long)]
    skip_publish: bool,
}

impl Default for SeedArgs {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            candidates: DEFAULT_CANDIDATES,
            voters: DEFAULT_VOTERS,
            skip_publish: false,
        }
    }
}

impl Command {
    pub(crate) async fn run(&self) -> Result<()> {
        match self {
            Command::Seed(args) => args.run().await,
            Command::InitSchema => init_schema().await,
        }
    }
}

impl SeedArgs {
    async fn run(&self) -> Result<()> {
        let config = AppConfig::from_env()?;

        let opts = SeedOpts {
            seed: self.seed,
            candidates: self.candidates,
            voters: self.voters,
            skip_publish: self.skip_publish,
        };

        pipeline::run(&config, &opts).await
    }
}

async fn init_schema() -> Result<()> {
    let config = AppConfig::from_env()?;

    let pool = db::setup_db_pool(&config.db).await?;
    pool.close().await;

    Ok(())
}
