//! Outcome - per-destination delivery result
//!
//! A strategy reports two independent signals: an optional [`Outcome`] and an
//! optional error. The outcome describes what the strategy did; only the
//! error tells whether delivery failed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::ContractError;

/// Delivery destinations, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// External batching collaborator
    Batching,
    /// HTTP message server
    Http,
    /// Local backup file
    File,
}

impl Destination {
    pub const ALL: [Destination; 3] = [Self::Batching, Self::Http, Self::File];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batching => "batching",
            Self::Http => "http",
            Self::File => "file",
        }
    }

    /// Handler name used in outcomes and logs
    pub fn handler(&self) -> &'static str {
        match self {
            Self::Batching => "logMessageToMBaaS",
            Self::Http => "logMessageToHTTP",
            Self::File => "logMessageToFile",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Fail,
}

/// Structured result `{status, reason, info}` of one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub handler: String,
    pub status: OutcomeStatus,
    pub reason: String,
    #[serde(default)]
    pub info: Value,
}

impl Outcome {
    pub fn ok(destination: Destination, reason: impl Into<String>) -> Self {
        Self::new(destination, OutcomeStatus::Ok, reason)
    }

    pub fn fail(destination: Destination, reason: impl Into<String>) -> Self {
        Self::new(destination, OutcomeStatus::Fail, reason)
    }

    fn new(destination: Destination, status: OutcomeStatus, reason: impl Into<String>) -> Self {
        Self {
            handler: destination.handler().to_string(),
            status,
            reason: reason.into(),
            info: Value::Object(Default::default()),
        }
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = info;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }
}

/// What a strategy hands back to the dispatcher
#[derive(Debug, Default)]
pub struct Delivery {
    /// `None` when the strategy did not apply
    pub outcome: Option<Outcome>,
    /// Set when delivery failed, regardless of `outcome`
    pub error: Option<ContractError>,
}

impl Delivery {
    /// Strategy did nothing
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn reported(outcome: Outcome) -> Self {
        Self {
            outcome: Some(outcome),
            error: None,
        }
    }

    pub fn with_error(mut self, error: ContractError) -> Self {
        self.error = Some(error);
        self
    }
}
