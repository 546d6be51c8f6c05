//! HttpStrategy - POSTs messages to the message server
//!
//! A failed POST is recovered by appending the message envelope to the
//! recovery file, when one is configured. The outcome is `ok/success` either
//! way; the failure travels in [`Delivery::error`].

use contracts::{
    ContractError, Delivery, DeliveryStrategy, Destination, HttpTransport, Message, Outcome,
    TopicTemplate,
};
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use super::persist;
use crate::policy::HttpRoute;
use crate::sinks::FileSink;

pub struct HttpStrategy<T> {
    route: HttpRoute,
    transport: T,
    file_sink: FileSink,
}

impl<T> HttpStrategy<T> {
    pub fn new(route: HttpRoute, transport: T, file_sink: FileSink) -> Self {
        Self {
            route,
            transport,
            file_sink,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: HttpTransport + Sync> HttpStrategy<T> {
    async fn post(&self, url: &str, message: &Message) -> (Outcome, Option<ContractError>) {
        let outcome = Outcome::ok(Destination::Http, "success");
        match self.transport.post_json(url, message).await {
            Ok(reply) if reply.status == 200 => {
                debug!(url, "Message posted");
                let info = json!({ "statusCode": reply.status, "body": reply.body });
                (outcome.with_info(info), None)
            }
            Ok(reply) => {
                warn!(url, status = reply.status, "Message server rejected message");
                let info = json!({ "statusCode": reply.status, "body": reply.body });
                let err = ContractError::UnexpectedStatus {
                    url: url.to_string(),
                    status: reply.status,
                };
                (outcome.with_info(info), Some(err))
            }
            Err(e) => {
                warn!(url, error = %e, "Message server unreachable");
                let info = json!({ "error": e.to_string() });
                (outcome.with_info(info), Some(e))
            }
        }
    }

    async fn recover(&self, recovery: Option<&TopicTemplate>, topic: &str, message: &Message) {
        let Some(template) = recovery else {
            info!(topic, "Not saving to recovery file, no recoveryFiles config");
            return;
        };

        let path = template.expand(topic);
        match persist(&self.file_sink, &path, topic, message).await {
            Ok(()) => {
                observability::record_recovery_write(topic);
                debug!(topic, path = %path, "Message saved to recovery file");
            }
            Err(e) => error!(topic, path = %path, error = %e, "Saving to recovery file failed"),
        }
    }
}

impl<T: HttpTransport + Sync> DeliveryStrategy for HttpStrategy<T> {
    fn destination(&self) -> Destination {
        Destination::Http
    }

    #[instrument(name = "http_strategy_submit", skip(self, message))]
    async fn submit(&self, topic: &str, message: &Message) -> Delivery {
        let HttpRoute::Post { url, recovery } = &self.route else {
            return Delivery::skipped();
        };

        let url = url.expand(topic);
        let (outcome, err) = self.post(&url, message).await;

        match err {
            None => Delivery::reported(outcome),
            Some(err) => {
                self.recover(recovery.as_ref(), topic, message).await;
                Delivery::reported(outcome).with_error(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::StreamRegistry;
    use crate::test_support::{MockReply, MockTransport};
    use contracts::{DeploymentType, FileRecord, OutcomeStatus, ReportingConfig};
    use tempfile::tempdir;

    fn openshift_config(recovery: Option<&str>) -> ReportingConfig {
        let config = ReportingConfig::new("h1", "c1")
            .with_deployment(DeploymentType::OpenShift)
            .with_real_time_logging(true)
            .with_log_message_url("http://x/TOPIC");
        match recovery {
            Some(path) => config.with_recovery_file(path),
            None => config,
        }
    }

    fn build(
        config: &ReportingConfig,
        reply: MockReply,
    ) -> (HttpStrategy<MockTransport>, MockTransport) {
        let transport = MockTransport::new(reply);
        let route = crate::policy::DeliveryPolicy::from_config(config).http;
        let sink = FileSink::new(config, StreamRegistry::new());
        (HttpStrategy::new(route, transport.clone(), sink), transport)
    }

    fn message() -> Message {
        json!({ "a": 1 }).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_posts_to_expanded_url() {
        let config = openshift_config(None);
        let (strategy, transport) = build(&config, MockReply::Status(200));

        let delivery = strategy.submit("events", &message()).await;
        assert!(delivery.error.is_none());
        let outcome = delivery.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Ok);
        assert_eq!(outcome.reason, "success");
        assert_eq!(outcome.info["statusCode"], 200);

        let posts = transport.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "http://x/events");
        assert_eq!(posts[0].1["a"], 1);
    }

    #[tokio::test]
    async fn test_non_openshift_never_posts() {
        let config = ReportingConfig::new("h1", "c1")
            .with_real_time_logging(true)
            .with_log_message_url("http://x/TOPIC");
        let (strategy, transport) = build(&config, MockReply::Status(200));

        let delivery = strategy.submit("events", &message()).await;
        assert!(delivery.outcome.is_none());
        assert_eq!(transport.post_count(), 0);
    }

    #[tokio::test]
    async fn test_realtime_disabled_never_posts() {
        let config = openshift_config(None).with_real_time_logging(false);
        let (strategy, transport) = build(&config, MockReply::Status(200));

        assert!(strategy.submit("events", &message()).await.outcome.is_none());
        assert_eq!(transport.post_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_writes_recovery_file() {
        let dir = tempdir().unwrap();
        let template = format!("{}/r-TOPIC.log", dir.path().display());
        let config = openshift_config(Some(&template));
        let (strategy, _) = build(&config, MockReply::Unreachable);

        let delivery = strategy.submit("events", &message()).await;
        assert!(matches!(delivery.error, Some(ContractError::Transport { .. })));

        // Failure is only visible through the error value
        let outcome = delivery.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Ok);
        assert_eq!(outcome.reason, "success");

        let content = std::fs::read_to_string(dir.path().join("r-events.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: FileRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record.topic, "events");
        assert_eq!(record.message["a"], 1);
        assert_eq!(
            record.hash,
            crate::identity::content_hash(&record.message).unwrap()
        );
    }

    #[tokio::test]
    async fn test_bad_status_is_error_and_recovers() {
        let dir = tempdir().unwrap();
        let template = format!("{}/r-TOPIC.log", dir.path().display());
        let config = openshift_config(Some(&template));
        let (strategy, _) = build(&config, MockReply::Status(503));

        let delivery = strategy.submit("events", &message()).await;
        assert!(matches!(
            delivery.error,
            Some(ContractError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(delivery.outcome.unwrap().info["statusCode"], 503);
        assert!(dir.path().join("r-events.log").exists());
    }

    #[tokio::test]
    async fn test_failure_without_recovery_config_writes_nothing() {
        let config = openshift_config(None);
        let (strategy, transport) = build(&config, MockReply::Unreachable);

        let delivery = strategy.submit("events", &message()).await;
        assert!(delivery.error.is_some());
        assert_eq!(transport.post_count(), 1);
        assert!(strategy.file_sink.registry().is_empty());
    }
}
