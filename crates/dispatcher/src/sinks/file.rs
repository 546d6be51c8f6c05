//! FileSink - appends NDJSON records to backup / recovery files

use std::io;
use std::path::Path;

use contracts::{ContractError, FileRecord, ReportingConfig, TopicTemplate};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument};

use crate::sinks::registry::StreamRegistry;
use crate::sinks::stream::{open_append, FileRole};

/// Sink that writes file records, one JSON object per line
///
/// A path equal to the configured backup or recovery template (before topic
/// expansion) goes through that role's long-lived stream. Any other path is
/// opened, written once and closed.
#[derive(Debug, Clone)]
pub struct FileSink {
    name: String,
    backup: Option<TopicTemplate>,
    recovery: Option<TopicTemplate>,
    registry: StreamRegistry,
}

impl FileSink {
    /// Create a new FileSink using the role templates of `config`
    pub fn new(config: &ReportingConfig, registry: StreamRegistry) -> Self {
        Self {
            name: "file".to_string(),
            backup: config.backup_template().cloned(),
            recovery: config.recovery_template().cloned(),
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &StreamRegistry {
        &self.registry
    }

    /// Role whose template is textually equal to `path`
    pub fn role_for(&self, path: &str) -> Option<FileRole> {
        let matches = |template: &Option<TopicTemplate>| {
            template.as_ref().is_some_and(|t| t.as_str() == path)
        };
        if matches(&self.backup) {
            Some(FileRole::Backup)
        } else if matches(&self.recovery) {
            Some(FileRole::Recovery)
        } else {
            None
        }
    }

    /// Append `record` to `path`
    ///
    /// For role streams this returns once the line is queued; write failures
    /// show up in logs, metrics and [`flush`](Self::flush) only.
    #[instrument(
        name = "file_sink_write",
        skip(self, record),
        fields(sink = %self.name, topic = %record.topic)
    )]
    pub async fn write(&self, path: &str, record: &FileRecord) -> Result<(), ContractError> {
        let line = Self::serialize_line(record)?;

        let stream = self
            .role_for(path)
            .and_then(|role| self.registry.stream_for(role, Path::new(path)));

        match stream {
            Some(stream) => stream.append(line).await,
            None => self.write_once(path, &line).await,
        }
    }

    /// Wait for every queued line of every role stream
    #[instrument(name = "file_sink_flush", skip(self))]
    pub async fn flush(&self) -> Result<(), ContractError> {
        self.registry.flush_all().await
    }

    fn serialize_line(record: &FileRecord) -> Result<String, ContractError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        Ok(line)
    }

    async fn write_once(&self, path: &str, line: &str) -> Result<(), ContractError> {
        debug!(sink = %self.name, path, "Writing through short-lived stream");
        append_once(Path::new(path), line).await.map_err(|e| {
            observability::record_file_write_failure("adhoc");
            error!(sink = %self.name, path, error = %e, "Write failed");
            ContractError::sink_write(&self.name, format!("{path}: {e}"))
        })
    }
}

async fn append_once(path: &Path, line: &str) -> io::Result<()> {
    let mut file = open_append(path).await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}
