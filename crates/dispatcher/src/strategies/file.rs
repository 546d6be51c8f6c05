//! FileStrategy - appends messages to the local backup file

use contracts::{Delivery, DeliveryStrategy, Destination, Message, Outcome};
use tracing::{error, instrument};

use super::persist;
use crate::policy::FileRoute;
use crate::sinks::FileSink;

pub struct FileStrategy {
    route: FileRoute,
    file_sink: FileSink,
}

impl FileStrategy {
    pub fn new(route: FileRoute, file_sink: FileSink) -> Self {
        Self { route, file_sink }
    }
}

impl DeliveryStrategy for FileStrategy {
    fn destination(&self) -> Destination {
        Destination::File
    }

    #[instrument(name = "file_strategy_submit", skip(self, message))]
    async fn submit(&self, topic: &str, message: &Message) -> Delivery {
        let FileRoute::Append { template } = &self.route else {
            return Delivery::reported(Outcome::fail(Destination::File, "no config"));
        };

        let path = template.expand(topic);
        // Write failures do not change the outcome
        if let Err(e) = persist(&self.file_sink, &path, topic, message).await {
            error!(topic, path = %path, error = %e, "Backup write failed");
        }
        Delivery::reported(Outcome::ok(Destination::File, "success"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DeliveryPolicy;
    use crate::sinks::StreamRegistry;
    use contracts::{FileRecord, OutcomeStatus, ReportingConfig};
    use serde_json::json;
    use tempfile::tempdir;

    fn build(config: &ReportingConfig) -> FileStrategy {
        let route = DeliveryPolicy::from_config(config).file;
        FileStrategy::new(route, FileSink::new(config, StreamRegistry::new()))
    }

    #[tokio::test]
    async fn test_no_backup_config_is_fail_outcome() {
        let strategy = build(&ReportingConfig::new("h", "c"));

        let delivery = strategy.submit("audit", &Message::new()).await;
        let outcome = delivery.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Fail);
        assert_eq!(outcome.reason, "no config");
        assert_eq!(outcome.handler, "logMessageToFile");
        assert!(delivery.error.is_none());
    }

    #[tokio::test]
    async fn test_appends_envelope_to_expanded_path() {
        let dir = tempdir().unwrap();
        let template = format!("{}/backup-TOPIC.log", dir.path().display());
        let strategy = build(&ReportingConfig::new("h", "c").with_backup_file(&template));

        let message = json!({ "a": 1 }).as_object().cloned().unwrap();
        let outcome = strategy.submit("audit", &message).await.outcome.unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Ok);
        assert_eq!(outcome.reason, "success");

        let content = std::fs::read_to_string(dir.path().join("backup-audit.log")).unwrap();
        let record: FileRecord = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(record.topic, "audit");
        assert_eq!(record.message, message);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_success_outcome() {
        let dir = tempdir().unwrap();
        let template = format!("{}/missing/TOPIC.log", dir.path().display());
        let strategy = build(&ReportingConfig::new("h", "c").with_backup_file(&template));

        let delivery = strategy.submit("audit", &Message::new()).await;
        assert_eq!(delivery.outcome.unwrap().reason, "success");
        assert!(delivery.error.is_none());
    }
}
