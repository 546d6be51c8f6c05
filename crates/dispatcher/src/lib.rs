//! # Dispatcher
//!
//! 消息分发模块。
//!
//! 负责：
//! - 为消息打上 `_ts` / `_mn` / `_ho` / `_cl` 标记
//! - 并发投递到批处理协作者、HTTP 消息服务、本地备份文件
//! - HTTP 失败时写入恢复文件
//! - 按角色复用长期文件流，限制打开的文件句柄数

pub mod collaborator;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod policy;
pub mod reporting;
pub mod sinks;
pub mod strategies;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use collaborator::LogCollaborator;
pub use contracts::{BatchCollaborator, DeliveryStrategy, HttpTransport, Message};
pub use error::DispatcherError;
pub use identity::SequenceGenerator;
pub use metrics::{DeliveryMetrics, DestinationMetrics, MetricsSnapshot};
pub use policy::{BatchingRoute, DeliveryPolicy, FileRoute, HttpRoute};
pub use reporting::{create_reporting, DispatchReport, Reporting, ReportingBuilder};
pub use sinks::{FileRole, FileSink, StreamRegistry};
pub use transport::{HttpClient, HttpClientConfig};
