//! 投递指标记录模块
//!
//! 通过 `metrics` facade 记录消息分发、各目的地投递结果与文件写入情况。
//! 未安装 recorder 时所有调用均为空操作。

use contracts::{Destination, Outcome, OutcomeStatus};
use metrics::{counter, histogram};

/// 记录一次 log_message 调用
pub fn record_message_dispatched(topic: &str) {
    counter!("reporting_messages_total", "topic" => topic.to_string()).increment(1);
}

/// 记录单个目的地的投递结果
///
/// `outcome` 为 None 表示该目的地未参与本次投递；`failed` 取自错误信号而非 outcome 状态。
pub fn record_delivery(destination: Destination, outcome: Option<&Outcome>, failed: bool) {
    let status = match (outcome, failed) {
        (_, true) => "error",
        (None, false) => "skipped",
        (Some(o), false) if o.status == OutcomeStatus::Ok => "ok",
        (Some(_), false) => "fail",
    };
    counter!(
        "reporting_deliveries_total",
        "destination" => destination.as_str(),
        "status" => status
    )
    .increment(1);
}

/// 记录写入恢复文件的消息
pub fn record_recovery_write(topic: &str) {
    counter!("reporting_recovery_writes_total", "topic" => topic.to_string()).increment(1);
}

/// 记录文件写入失败
pub fn record_file_write_failure(role: &str) {
    counter!("reporting_file_write_failures_total", "role" => role.to_string()).increment(1);
}

/// 记录一次分发的总耗时
pub fn record_dispatch_latency_ms(latency_ms: f64) {
    histogram!("reporting_dispatch_latency_ms").record(latency_ms);
}
