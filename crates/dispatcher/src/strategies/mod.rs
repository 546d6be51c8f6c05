//! Delivery strategies, one per destination
//!
//! Contains BatchingStrategy, HttpStrategy and FileStrategy.

mod batching;
mod file;
mod http;

pub use self::batching::BatchingStrategy;
pub use self::file::FileStrategy;
pub use self::http::HttpStrategy;

use contracts::{ContractError, Message};

use crate::identity;
use crate::sinks::FileSink;

/// Wrap `message` into a file record and hand it to the sink
async fn persist(
    sink: &FileSink,
    path: &str,
    topic: &str,
    message: &Message,
) -> Result<(), ContractError> {
    let record = identity::file_record(message, topic)?;
    sink.write(path, &record).await
}
