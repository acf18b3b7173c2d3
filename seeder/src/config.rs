use color_eyre::Result;
use db::DbConfig;

use crate::publish::KafkaConfig;

/// Everything the pipeline needs, resolved once in the entry point and
/// passed down by reference. No stage reads the environment itself.
#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub db: DbConfig,
    pub randomuser: RandomUserConfig,
    pub kafka: Option<KafkaConfig>,
}

impl AppConfig {
    pub(crate) fn from_env() -> Result<Self> {
        Ok(Self {
            db: DbConfig::from_env()?,
            randomuser: RandomUserConfig::from_env(),
            kafka: KafkaConfig::from_env(),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RandomUserConfig {
    pub base_url: String,
    pub nationality: String,
}

impl RandomUserConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            base_url: std::env::var("RANDOMUSER_URL")
                .unwrap_or_else(|_| "https://randomuser.me/api".to_string()),
            nationality: std::env::var("RANDOMUSER_NAT").unwrap_or_else(|_| "in".to_string()),
        }
    }
}
