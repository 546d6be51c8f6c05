//! File sink implementation
//!
//! Contains FileSink, the role-keyed StreamRegistry and the StreamHandle
//! workers behind it.

mod file;
mod registry;
mod stream;

pub use self::file::FileSink;
pub use self::registry::StreamRegistry;
pub use self::stream::{FileRole, StreamHandle, DEFAULT_QUEUE_CAPACITY};
