//! StreamRegistry - role-keyed set of long-lived file streams
//!
//! Holds at most one stream per [`FileRole`], however many topics or
//! `Reporting` instances write through it. Clones share the same streams;
//! build every `Reporting` of a process from one registry to cap open file
//! handles at two.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use contracts::ContractError;
use tracing::{debug, warn};

use crate::sinks::stream::{FileRole, StreamHandle, DEFAULT_QUEUE_CAPACITY};

#[derive(Clone)]
pub struct StreamRegistry {
    streams: Arc<Mutex<HashMap<FileRole, Arc<StreamHandle>>>>,
    queue_capacity: usize,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a registry whose streams queue up to `queue_capacity` lines
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            streams: Arc::new(Mutex::new(HashMap::new())),
            queue_capacity,
        }
    }

    /// Get or lazily create the stream for `role`
    ///
    /// Returns `None` when the role's stream is already bound to a different
    /// path; callers then write to `path` without a long-lived stream.
    pub fn stream_for(&self, role: FileRole, path: &Path) -> Option<Arc<StreamHandle>> {
        let mut streams = self.streams.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = streams.get(&role) {
            if existing.path() == path {
                return Some(Arc::clone(existing));
            }
            warn!(
                role = %role,
                bound = %existing.path().display(),
                requested = %path.display(),
                "Role stream already bound to another file"
            );
            return None;
        }

        debug!(role = %role, path = %path.display(), "Opening role stream");
        let handle = Arc::new(StreamHandle::spawn(role, path, self.queue_capacity));
        streams.insert(role, Arc::clone(&handle));
        Some(handle)
    }

    /// Currently open streams
    pub fn streams(&self) -> Vec<Arc<StreamHandle>> {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of open streams
    pub fn len(&self) -> usize {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush every open stream, returning the first error
    pub async fn flush_all(&self) -> Result<(), ContractError> {
        let mut first_error = None;
        for stream in self.streams() {
            if let Err(e) = stream.flush().await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Flush and forget every stream
    ///
    /// Workers exit once the last handle is dropped.
    pub async fn shutdown(&self) -> Result<(), ContractError> {
        let result = self.flush_all().await;
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        result
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StreamRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRegistry")
            .field("streams", &self.len())
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}
