//! LogCollaborator - batching collaborator that only logs via tracing

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{BatchCollaborator, ContractError, Message, FIELD_SEQUENCE};
use tracing::{debug, info, instrument};

/// Collaborator that logs accepted messages
///
/// Stands in for a real batching service when none is wired, e.g. in the CLI.
/// Every message is accepted.
#[derive(Debug)]
pub struct LogCollaborator {
    name: String,
    accepted: AtomicU64,
}

impl LogCollaborator {
    /// Create a new LogCollaborator with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepted: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages accepted so far
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }
}

impl BatchCollaborator for LogCollaborator {
    #[instrument(
        name = "log_collaborator_accept",
        skip(self, message),
        fields(collaborator = %self.name)
    )]
    async fn accept_message(&self, topic: &str, message: &Message) -> Result<(), ContractError> {
        let total = self.accepted.fetch_add(1, Ordering::Relaxed) + 1;
        let message_id = message
            .get(FIELD_SEQUENCE)
            .and_then(serde_json::Value::as_str);
        info!(
            topic,
            message_id = ?message_id,
            fields = message.len(),
            total,
            "Message accepted"
        );
        Ok(())
    }

    fn flush_batch(&self) {
        debug!(collaborator = %self.name, accepted = self.accepted(), "Flush requested");
    }
}
