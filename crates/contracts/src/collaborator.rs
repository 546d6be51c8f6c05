//! BatchCollaborator trait - external batching/delivery service
//!
//! The collaborator owns batching, retry and flushing. This workspace only
//! hands messages over and asks for flushes.

use crate::{ContractError, Message};

/// Batching service interface
#[trait_variant::make(BatchCollaborator: Send)]
pub trait LocalBatchCollaborator {
    /// Accept a message for batched delivery
    ///
    /// # Errors
    /// Returns an error when the message could not be delivered right away.
    /// The collaborator keeps such messages for its own retry.
    async fn accept_message(&self, topic: &str, message: &Message) -> Result<(), ContractError>;

    /// Ask the collaborator to flush its current batch (fire-and-forget)
    fn flush_batch(&self);
}
