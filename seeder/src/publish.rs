use color_eyre::{eyre::eyre, Result};
use db::candidates::Candidate;
use db::voters::Voter;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord};
use serde::Serialize;

#[derive(Debug, Clone)]
pub(crate) struct KafkaConfig {
    pub brokers: String,
    pub candidates_topic: String,
    pub voters_topic: String,
}

impl KafkaConfig {
    /// `None` when no broker is configured, in which case the pipeline
    /// runs without publishing.
    pub(crate) fn from_env() -> Option<Self> {
        let brokers = std::env::var("KAFKA_BROKERS").ok()?;

        Some(Self {
            brokers,
            candidates_topic: std::env::var("KAFKA_CANDIDATES_TOPIC")
                .unwrap_or_else(|_| "candidates_topic".to_string()),
            voters_topic: std::env::var("KAFKA_VOTERS_TOPIC")
                .unwrap_or_else(|_| "voters_topic".to_string()),
        })
    }
}

/// Mirrors each loaded record onto its topic, keyed by entity id. Sends are
/// enqueued without blocking; [`Publisher::finish`] awaits every retained
/// delivery before the process exits, so nothing is silently dropped.
pub(crate) struct Publisher {
    producer: FutureProducer,
    config: KafkaConfig,
    deliveries: Vec<(String, DeliveryFuture)>,
}

impl Publisher {
    pub(crate) fn new(config: &KafkaConfig) -> Result<Self> {
        Self::with_message_timeout(config, "5000")
    }

    fn with_message_timeout(config: &KafkaConfig, message_timeout_ms: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.as_str())
            .set("message.timeout.ms", message_timeout_ms)
            .create()?;

        Ok(Self {
            producer,
            config: config.clone(),
            deliveries: Vec::new(),
        })
    }

    pub(crate) fn publish_candidate(&mut self, candidate: &Candidate) -> Result<()> {
        Self::enqueue(
            &self.producer,
            &mut self.deliveries,
            &self.config.candidates_topic,
            &candidate.candidate_id,
            candidate,
        )
    }

    pub(crate) fn publish_voter(&mut self, voter: &Voter) -> Result<()> {
        Self::enqueue(
            &self.producer,
            &mut self.deliveries,
            &self.config.voters_topic,
            &voter.voter_id,
            voter,
        )
    }

    fn enqueue<T: Serialize>(
        producer: &FutureProducer,
        deliveries: &mut Vec<(String, DeliveryFuture)>,
        topic: &str,
        key: &str,
        record: &T,
    ) -> Result<()> {
        let payload = serde_json::to_string(record)?;

        match producer.send_result(FutureRecord::to(topic).key(key).payload(&payload)) {
            Ok(delivery) => {
                deliveries.push((key.to_string(), delivery));
                Ok(())
            }
            Err((error, _record)) => Err(error.into()),
        }
    }

    /// Awaits every outstanding delivery. Individual failures are logged
    /// and rolled up into one error so the entry point can decide what a
    /// partially published run means.
    #[tracing::instrument(skip(self), fields(outstanding = self.deliveries.len()), err)]
    pub(crate) async fn finish(mut self) -> Result<()> {
        let mut failed = 0_usize;

        for (key, delivery) in self.deliveries.drain(..) {
            match delivery.await {
                Ok(Ok(delivery)) => {
                    tracing::debug!(key = %key, ?delivery, "Delivered");
                }
                Ok(Err((error, _message))) => {
                    failed += 1;
                    tracing::error!(key = %key, %error, "Delivery failed");
                }
                Err(_cancelled) => {
                    failed += 1;
                    tracing::error!(key = %key, "Producer dropped the message before acknowledgement");
                }
            }
        }

        if failed > 0 {
            return Err(eyre!("{failed} messages were not delivered"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A port nothing listens on, so enqueued sends can only time out. The
    // producer itself comes up fine; librdkafka connects lazily.
    fn unreachable_config() -> KafkaConfig {
        KafkaConfig {
            brokers: "127.0.0.1:1".to_string(),
            candidates_topic: "candidates_topic".to_string(),
            voters_topic: "voters_topic".to_string(),
        }
    }

    fn sample_candidate() -> Candidate {
        Candidate {
            candidate_id: "1".to_string(),
            candidate_name: "Asha Rao".to_string(),
            party_affiliation: "BJP".to_string(),
            biography: "A brief biography.".to_string(),
            campaign_platform: "A platform.".to_string(),
            photo_url: "https://example.com/photo.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn finish_settles_every_enqueued_delivery_and_reports_the_failures() {
        let mut publisher =
            Publisher::with_message_timeout(&unreachable_config(), "300").unwrap();
        publisher.publish_candidate(&sample_candidate()).unwrap();
        publisher.publish_candidate(&sample_candidate()).unwrap();

        let result = publisher.finish().await;

        let message = result.unwrap_err().to_string();
        assert!(message.contains("2 messages"), "got: {message}");
    }

    #[tokio::test]
    async fn finish_with_nothing_outstanding_is_ok() {
        let publisher = Publisher::with_message_timeout(&unreachable_config(), "300").unwrap();

        assert!(publisher.finish().await.is_ok());
    }
}
