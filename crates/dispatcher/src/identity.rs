//! Message identity helpers: sequence ids, content hashes, day buckets
//!
//! Hashes are MD5 over the serde_json serialization of the value. Object keys
//! serialize in sorted order, so equal messages always hash the same. None of
//! this is meant for security.

use chrono::{DateTime, Utc};
use contracts::{FileRecord, Message, FIELD_TIMESTAMP};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generator for `<prefix>_<counter>` message numbers
///
/// The prefix is the MD5 of a random value picked at construction. Two
/// generators, in this process or another, may collide: ids are unique per
/// generator only.
#[derive(Debug)]
pub struct SequenceGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceGenerator {
    /// Create a generator with a random prefix
    pub fn new() -> Self {
        let seed: f64 = rand::random();
        Self::with_prefix(md5_hex(seed.to_string().as_bytes()))
    }

    /// Create a generator with a fixed prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Next id; the counter starts at 0
    pub fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}", self.prefix, n)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase hex MD5 of raw bytes
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// MD5 of the serialized value
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let serialized = serde_json::to_vec(value)?;
    Ok(md5_hex(&serialized))
}

/// `YYYYMMDD` (UTC) of the message's `_ts`, or of the epoch when absent
pub fn date_bucket(message: &Message) -> String {
    let ts = message
        .get(FIELD_TIMESTAMP)
        .and_then(Value::as_f64)
        .map(|ts| ts as i64)
        .unwrap_or(0);

    DateTime::<Utc>::from_timestamp_millis(ts)
        .unwrap_or_default()
        .format("%Y%m%d")
        .to_string()
}

/// `<content hash>_<date bucket>`
pub fn record_id(message: &Message) -> Result<String, serde_json::Error> {
    Ok(format!("{}_{}", content_hash(message)?, date_bucket(message)))
}

/// Wrap a message into its on-disk record
pub fn file_record(message: &Message, topic: &str) -> Result<FileRecord, serde_json::Error> {
    Ok(FileRecord {
        hash: content_hash(message)?,
        message: message.clone(),
        topic: topic.to_string(),
    })
}
