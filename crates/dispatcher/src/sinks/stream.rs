//! StreamHandle - one long-lived append stream with its own write queue
//!
//! A worker task owns the file handle and applies queued commands in order,
//! so writers sharing a handle never interleave partial lines.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contracts::ContractError;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, instrument, warn};

use crate::metrics::DeliveryMetrics;

/// Default number of queued lines per stream
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Logical file destination sharing one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// Local backup copy of every message
    Backup,
    /// Messages the HTTP server did not accept
    Recovery,
}

impl FileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Recovery => "recovery",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum StreamCommand {
    /// Append one complete line
    Append(String),
    /// Flush the file and report the first error since the last flush
    Flush(oneshot::Sender<io::Result<()>>),
}

/// Handle to a running stream worker
pub struct StreamHandle {
    role: FileRole,
    path: PathBuf,
    tx: mpsc::Sender<StreamCommand>,
    metrics: Arc<DeliveryMetrics>,
}

impl StreamHandle {
    /// Create a new StreamHandle and spawn the worker task
    ///
    /// The file is opened by the worker, in append mode, on first use.
    pub fn spawn(role: FileRole, path: impl Into<PathBuf>, queue_capacity: usize) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(DeliveryMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_path = path.clone();

        tokio::spawn(async move {
            stream_worker(role, worker_path, rx, worker_metrics).await;
        });

        Self {
            role,
            path,
            tx,
            metrics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metrics(&self) -> &Arc<DeliveryMetrics> {
        &self.metrics
    }

    /// Queue a line for appending
    ///
    /// Returns once the line is queued, not once it is written. Write
    /// failures are logged and counted by the worker and reported by the next
    /// [`flush`](Self::flush).
    pub async fn append(&self, line: String) -> Result<(), ContractError> {
        self.tx
            .send(StreamCommand::Append(line))
            .await
            .map_err(|_| self.closed_error())
    }

    /// Wait until every queued line is written and flushed
    pub async fn flush(&self) -> Result<(), ContractError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(StreamCommand::Flush(ack_tx))
            .await
            .map_err(|_| self.closed_error())?;

        match ack_rx.await {
            Ok(result) => result.map_err(|e| {
                ContractError::sink_write(self.sink_name(), format!("{}: {e}", self.path.display()))
            }),
            Err(_) => Err(self.closed_error()),
        }
    }

    fn sink_name(&self) -> String {
        format!("{}-file", self.role)
    }

    fn closed_error(&self) -> ContractError {
        ContractError::sink_write(self.sink_name(), "stream worker closed unexpectedly")
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("role", &self.role)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Worker task that owns the file and applies queued commands
#[instrument(
    name = "file_stream_worker",
    skip(rx, metrics),
    fields(role = %role, path = %path.display())
)]
async fn stream_worker(
    role: FileRole,
    path: PathBuf,
    mut rx: mpsc::Receiver<StreamCommand>,
    metrics: Arc<DeliveryMetrics>,
) {
    debug!("File stream worker started");

    let mut file: Option<File> = None;
    let mut pending_error: Option<io::Error> = None;

    while let Some(command) = rx.recv().await {
        match command {
            StreamCommand::Append(line) => match append_line(&mut file, &path, &line).await {
                Ok(()) => metrics.inc_delivered_count(),
                Err(e) => {
                    metrics.inc_failure_count();
                    observability::record_file_write_failure(role.as_str());
                    error!(error = %e, "Append failed");
                    pending_error.get_or_insert(e);
                }
            },
            StreamCommand::Flush(ack) => {
                let result = match pending_error.take() {
                    Some(e) => Err(e),
                    None => flush_file(&mut file).await,
                };
                if ack.send(result).is_err() {
                    warn!("Flush requester went away");
                }
            }
        }
    }

    // Cleanup
    if let Err(e) = flush_file(&mut file).await {
        error!(error = %e, "Flush failed on shutdown");
    }

    debug!("File stream worker stopped");
}

async fn append_line(file: &mut Option<File>, path: &Path, line: &str) -> io::Result<()> {
    if file.is_none() {
        *file = Some(open_append(path).await?);
    }
    match file.as_mut() {
        Some(f) => f.write_all(line.as_bytes()).await,
        None => Err(io::Error::other("file not open")),
    }
}

async fn flush_file(file: &mut Option<File>) -> io::Result<()> {
    match file.as_mut() {
        Some(f) => f.flush().await,
        None => Ok(()),
    }
}

/// Open `path` for appending, creating it if needed
pub(crate) async fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stream_appends_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.log");
        let handle = StreamHandle::spawn(FileRole::Backup, &path, 4);

        for i in 0..10 {
            handle.append(format!("line {i}\n")).await.unwrap();
        }
        handle.flush().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "line 0");
        assert_eq!(lines[9], "line 9");
        assert_eq!(handle.metrics().delivered_count(), 10);
    }

    #[tokio::test]
    async fn test_stream_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recovery.log");
        std::fs::write(&path, "existing\n").unwrap();

        let handle = StreamHandle::spawn(FileRole::Recovery, &path, 4);
        handle.append("new\n".to_string()).await.unwrap();
        handle.flush().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing\nnew\n");
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_on_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("backup.log");
        let handle = StreamHandle::spawn(FileRole::Backup, &path, 4);

        // Queueing succeeds even though the write will not
        handle.append("lost\n".to_string()).await.unwrap();
        let err = handle.flush().await.unwrap_err();
        assert!(err.to_string().contains("backup-file"), "got: {err}");
        assert_eq!(handle.metrics().failure_count(), 1);

        // Error is reported once
        handle.flush().await.unwrap();
    }
}
