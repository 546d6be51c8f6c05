//! Reporting - stamps messages and fans them out to every destination

use std::time::Instant;

use chrono::Utc;
use contracts::{
    BatchCollaborator, ContractError, Delivery, DeliveryStrategy, Destination, HttpTransport,
    Identity, Message, Outcome, ReportingConfig, FIELD_CLUSTER, FIELD_HOST, FIELD_SEQUENCE,
    FIELD_TIMESTAMP,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::collaborator::LogCollaborator;
use crate::error::DispatcherError;
use crate::identity::SequenceGenerator;
use crate::metrics::{DestinationMetrics, MetricsSnapshot};
use crate::policy::DeliveryPolicy;
use crate::sinks::{FileSink, StreamRegistry};
use crate::strategies::{BatchingStrategy, FileStrategy, HttpStrategy};
use crate::transport::{HttpClient, HttpClientConfig};

/// Result of one [`Reporting::log_message`] call
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// First error, in destination order
    pub error: Option<ContractError>,
    /// Outcome per destination in [`Destination::ALL`] order; `None` where the
    /// destination did not apply
    pub results: [Option<Outcome>; 3],
    /// Destinations that reported an error
    pub failed: Vec<Destination>,
}

impl DispatchReport {
    fn collect(deliveries: [(Destination, Delivery); 3]) -> Self {
        let mut report = Self::default();
        for (slot, (destination, delivery)) in deliveries.into_iter().enumerate() {
            if let Some(error) = delivery.error {
                report.failed.push(destination);
                report.error.get_or_insert(error);
            }
            report.results[slot] = delivery.outcome;
        }
        report
    }

    pub fn outcome(&self, destination: Destination) -> Option<&Outcome> {
        Destination::ALL
            .iter()
            .position(|d| *d == destination)
            .and_then(|slot| self.results[slot].as_ref())
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// `{"error": ..., "results": [...], "failed": [...]}`
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.error.as_ref().map(ToString::to_string),
            "results": self.results,
            "failed": self.failed.iter().map(Destination::as_str).collect::<Vec<_>>(),
        })
    }
}

/// Builder for creating a Reporting
pub struct ReportingBuilder<C, T> {
    config: ReportingConfig,
    collaborator: C,
    transport: T,
    registry: Option<StreamRegistry>,
    sequence: Option<SequenceGenerator>,
}

impl<C, T> ReportingBuilder<C, T> {
    /// Create a new ReportingBuilder
    pub fn new(config: ReportingConfig, collaborator: C, transport: T) -> Self {
        Self {
            config,
            collaborator,
            transport,
            registry: None,
            sequence: None,
        }
    }

    /// Share role streams with other Reporting instances
    pub fn registry(mut self, registry: StreamRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn sequence(mut self, sequence: SequenceGenerator) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Validate the config and assemble the strategies
    ///
    /// Fails when `host` or `cluster` is missing; nothing else is checked here.
    #[instrument(name = "reporting_builder_build", skip(self))]
    pub fn build(self) -> Result<Reporting<C, T>, DispatcherError> {
        let identity = self.config.identity().map_err(DispatcherError::Config)?;
        let policy = DeliveryPolicy::from_config(&self.config);
        let file_sink = FileSink::new(&self.config, self.registry.unwrap_or_default());

        info!(
            host = %identity.host,
            cluster = %identity.cluster,
            batching = %policy.batching,
            http = %policy.http,
            file = %policy.file,
            "Reporting created"
        );

        Ok(Reporting {
            batching: BatchingStrategy::new(policy.batching, self.collaborator),
            http: HttpStrategy::new(policy.http, self.transport, file_sink.clone()),
            file: FileStrategy::new(policy.file, file_sink.clone()),
            sequence: self.sequence.unwrap_or_default(),
            metrics: DestinationMetrics::default(),
            identity,
            file_sink,
        })
    }
}

/// Fan-out of messages to the batching collaborator, the HTTP message server
/// and the backup file
pub struct Reporting<C, T> {
    identity: Identity,
    sequence: SequenceGenerator,
    batching: BatchingStrategy<C>,
    http: HttpStrategy<T>,
    file: FileStrategy,
    file_sink: FileSink,
    metrics: DestinationMetrics,
}

impl<C, T> Reporting<C, T> {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn sequence_prefix(&self) -> &str {
        self.sequence.prefix()
    }

    pub fn collaborator(&self) -> &C {
        self.batching.collaborator()
    }

    pub fn transport(&self) -> &T {
        self.http.transport()
    }

    pub fn registry(&self) -> &StreamRegistry {
        self.file_sink.registry()
    }

    /// Get metrics for all destinations
    pub fn metrics(&self) -> Vec<(Destination, MetricsSnapshot)> {
        self.metrics.snapshot()
    }

    /// Wait until every queued role-stream line has reached its file
    pub async fn flush_files(&self) -> Result<(), ContractError> {
        self.file_sink.flush().await
    }

    /// Overwrite the reserved fields of `message`
    fn stamp(&self, message: &mut Message) {
        message.insert(
            FIELD_TIMESTAMP.to_string(),
            Value::from(Utc::now().timestamp_millis()),
        );
        message.insert(
            FIELD_SEQUENCE.to_string(),
            Value::from(self.sequence.next_id()),
        );
        message.insert(
            FIELD_HOST.to_string(),
            Value::from(self.identity.host.as_str()),
        );
        message.insert(
            FIELD_CLUSTER.to_string(),
            Value::from(self.identity.cluster.as_str()),
        );
    }
}

impl<C: BatchCollaborator + Sync, T: HttpTransport + Sync> Reporting<C, T> {
    /// Stamp `message` and deliver it to every destination concurrently
    ///
    /// Always produces a report. The caller's message keeps the stamped
    /// `_ts`, `_mn`, `_ho` and `_cl` fields.
    #[instrument(name = "reporting_log_message", skip(self, message))]
    pub async fn log_message(&self, topic: &str, message: &mut Message) -> DispatchReport {
        let started = Instant::now();
        self.stamp(message);
        observability::record_message_dispatched(topic);

        let message: &Message = message;
        let (batching, http, file) = tokio::join!(
            self.batching.submit(topic, message),
            self.http.submit(topic, message),
            self.file.submit(topic, message),
        );

        let report = DispatchReport::collect([
            (self.batching.destination(), batching),
            (self.http.destination(), http),
            (self.file.destination(), file),
        ]);
        self.record(&report);

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_dispatch_latency_ms(latency_ms);
        debug!(
            latency_ms,
            failed = report.failed.len(),
            "Message dispatched"
        );
        report
    }

    /// Ask the collaborator to send its current batch
    pub fn flush_reports(&self) {
        self.batching.collaborator().flush_batch();
    }

    fn record(&self, report: &DispatchReport) {
        for (slot, destination) in Destination::ALL.iter().enumerate() {
            let outcome = report.results[slot].as_ref();
            let failed = report.failed.contains(destination);
            self.metrics.get(*destination).record(outcome, failed);
            observability::record_delivery(*destination, outcome, failed);
        }
    }
}

/// Convenience function to create a Reporting with the logging collaborator
/// and a reqwest transport
#[instrument(name = "reporting_create", skip(config))]
pub fn create_reporting(
    config: ReportingConfig,
) -> Result<Reporting<LogCollaborator, HttpClient>, DispatcherError> {
    let transport = HttpClient::new(HttpClientConfig::default())?;
    ReportingBuilder::new(config, LogCollaborator::new("batch"), transport).build()
}
