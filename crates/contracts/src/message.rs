//! Message - caller payload and the on-disk record wrapping it

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended message payload
pub type Message = Map<String, Value>;

/// Timestamp (epoch milliseconds)
pub const FIELD_TIMESTAMP: &str = "_ts";
/// Sequence id
pub const FIELD_SEQUENCE: &str = "_mn";
/// Host
pub const FIELD_HOST: &str = "_ho";
/// Cluster
pub const FIELD_CLUSTER: &str = "_cl";

/// One NDJSON line in a backup or recovery file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// MD5 of the serialized message
    pub hash: String,
    pub message: Message,
    pub topic: String,
}
