//! DeliveryPolicy - which destinations a config enables, and how
//!
//! The routing rules depend only on the config shape, so they are resolved
//! once when a `Reporting` is built.
//!
//! | destination | openshift | real-time | section present    | route              |
//! |-------------|-----------|-----------|--------------------|--------------------|
//! | batching    | yes       | -         | -                  | skipped            |
//! | batching    | no        | no        | -                  | disabled           |
//! | batching    | no        | yes       | -                  | enabled            |
//! | http        | no        | -         | -                  | skipped            |
//! | http        | yes       | no        | -                  | skipped            |
//! | http        | yes       | yes       | no `logMessageURL` | skipped            |
//! | http        | yes       | yes       | `logMessageURL`    | post               |
//! | file        | -         | -         | no `backupFiles`   | no config          |
//! | file        | -         | -         | `backupFiles`      | append             |

use contracts::{Destination, ReportingConfig, TopicTemplate};
use std::fmt;

/// Route for the batching collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchingRoute {
    /// OpenShift deployments do not use the collaborator
    Skipped,
    /// Real-time logging disabled
    Disabled,
    /// Hand messages to the collaborator
    Enabled,
}

/// Route for the HTTP message server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpRoute {
    NotOpenShift,
    RealTimeDisabled,
    NoUrl,
    Post {
        url: TopicTemplate,
        recovery: Option<TopicTemplate>,
    },
}

/// Route for the local backup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRoute {
    NoConfig,
    Append { template: TopicTemplate },
}

/// Resolved routes for all three destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub batching: BatchingRoute,
    pub http: HttpRoute,
    pub file: FileRoute,
}

impl DeliveryPolicy {
    pub fn from_config(config: &ReportingConfig) -> Self {
        Self {
            batching: Self::batching_route(config),
            http: Self::http_route(config),
            file: Self::file_route(config),
        }
    }

    fn batching_route(config: &ReportingConfig) -> BatchingRoute {
        if config.is_openshift() {
            BatchingRoute::Skipped
        } else if !config.real_time_logging_enabled {
            BatchingRoute::Disabled
        } else {
            BatchingRoute::Enabled
        }
    }

    fn http_route(config: &ReportingConfig) -> HttpRoute {
        if !config.is_openshift() {
            return HttpRoute::NotOpenShift;
        }
        if !config.real_time_logging_enabled {
            return HttpRoute::RealTimeDisabled;
        }
        match config.log_message_url() {
            Some(url) => HttpRoute::Post {
                url: url.clone(),
                recovery: config.recovery_template().cloned(),
            },
            None => HttpRoute::NoUrl,
        }
    }

    fn file_route(config: &ReportingConfig) -> FileRoute {
        match config.backup_template() {
            Some(template) => FileRoute::Append {
                template: template.clone(),
            },
            None => FileRoute::NoConfig,
        }
    }

    /// Human readable route per destination, in dispatch order
    pub fn describe(&self) -> Vec<(Destination, String)> {
        vec![
            (Destination::Batching, self.batching.to_string()),
            (Destination::Http, self.http.to_string()),
            (Destination::File, self.file.to_string()),
        ]
    }
}

impl fmt::Display for BatchingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped (openshift deployment)"),
            Self::Disabled => f.write_str("disabled (real-time logging off)"),
            Self::Enabled => f.write_str("enabled"),
        }
    }
}

impl fmt::Display for HttpRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpenShift => f.write_str("skipped (not an openshift deployment)"),
            Self::RealTimeDisabled => f.write_str("skipped (real-time logging off)"),
            Self::NoUrl => f.write_str("skipped (no msgServer.logMessageURL)"),
            Self::Post {
                url,
                recovery: Some(recovery),
            } => write!(f, "POST {url}, recovery file {recovery}"),
            Self::Post {
                url,
                recovery: None,
            } => write!(f, "POST {url}, no recovery file"),
        }
    }
}

impl fmt::Display for FileRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfig => f.write_str("no config (no backupFiles.fileName)"),
            Self::Append { template } => write!(f, "append to {template}"),
        }
    }
}
