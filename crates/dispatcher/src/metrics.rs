//! Delivery metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{Destination, Outcome};

/// Counters for a single destination or file stream
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Deliveries reported ok with no error
    delivered_count: AtomicU64,
    /// Deliveries with a `fail` outcome or an error
    failure_count: AtomicU64,
    /// Dispatches where the destination did not apply
    skipped_count: AtomicU64,
}

impl DeliveryMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn inc_skipped_count(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one dispatch result
    pub fn record(&self, outcome: Option<&Outcome>, failed: bool) {
        match outcome {
            _ if failed => self.inc_failure_count(),
            None => self.inc_skipped_count(),
            Some(o) if o.is_ok() => self.inc_delivered_count(),
            Some(_) => self.inc_failure_count(),
        }
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered_count: self.delivered_count(),
            failure_count: self.failure_count(),
            skipped_count: self.skipped_count(),
        }
    }
}

/// Snapshot of delivery metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub delivered_count: u64,
    pub failure_count: u64,
    pub skipped_count: u64,
}

/// One [`DeliveryMetrics`] per destination
#[derive(Debug, Default)]
pub struct DestinationMetrics {
    batching: DeliveryMetrics,
    http: DeliveryMetrics,
    file: DeliveryMetrics,
}

impl DestinationMetrics {
    pub fn get(&self, destination: Destination) -> &DeliveryMetrics {
        match destination {
            Destination::Batching => &self.batching,
            Destination::Http => &self.http,
            Destination::File => &self.file,
        }
    }

    pub fn snapshot(&self) -> Vec<(Destination, MetricsSnapshot)> {
        Destination::ALL
            .iter()
            .map(|d| (*d, self.get(*d).snapshot()))
            .collect()
    }
}
