//! In-memory collaborator and transport doubles for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use contracts::{BatchCollaborator, ContractError, HttpReply, HttpTransport, Message};

/// Collaborator that records accepted messages
#[derive(Clone, Default)]
pub struct MockCollaborator {
    pub accepted: Arc<Mutex<Vec<(String, Message)>>>,
    pub flushes: Arc<AtomicUsize>,
    pub should_fail: bool,
}

impl MockCollaborator {
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.lock().unwrap().len()
    }
}

impl BatchCollaborator for MockCollaborator {
    async fn accept_message(&self, topic: &str, message: &Message) -> Result<(), ContractError> {
        self.accepted
            .lock()
            .unwrap()
            .push((topic.to_string(), message.clone()));
        if self.should_fail {
            return Err(ContractError::collaborator("mock failure"));
        }
        Ok(())
    }

    fn flush_batch(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Canned transport behaviour
#[derive(Clone, Copy, Debug)]
pub enum MockReply {
    Status(u16),
    Unreachable,
}

/// Transport that records posts and answers with a canned reply
#[derive(Clone)]
pub struct MockTransport {
    pub posts: Arc<Mutex<Vec<(String, Message)>>>,
    pub reply: MockReply,
}

impl MockTransport {
    pub fn new(reply: MockReply) -> Self {
        Self {
            posts: Arc::new(Mutex::new(Vec::new())),
            reply,
        }
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

impl HttpTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &Message) -> Result<HttpReply, ContractError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        match self.reply {
            MockReply::Status(status) => Ok(HttpReply {
                status,
                body: format!("status {status}"),
            }),
            MockReply::Unreachable => Err(ContractError::transport(url, "connection refused")),
        }
    }
}
