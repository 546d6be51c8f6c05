//! ReportingConfig - shape of the reporting configuration
//!
//! Field names on the wire keep the camelCase spelling of the JSON configs
//! that deployments already ship (`mbaasType`, `msgServer.logMessageURL`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Placeholder replaced by the topic in every template
pub const TOPIC_PLACEHOLDER: &str = "TOPIC";

/// Deployment type (`mbaasType`)
///
/// Only `openshift` changes routing; every other value behaves the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentType {
    /// Messages go straight to the HTTP message server
    OpenShift,
    /// Messages go through the batching collaborator
    Other(String),
}

impl DeploymentType {
    pub fn is_openshift(&self) -> bool {
        matches!(self, Self::OpenShift)
    }
}

impl Default for DeploymentType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for DeploymentType {
    fn from(value: String) -> Self {
        if value == "openshift" {
            Self::OpenShift
        } else {
            Self::Other(value)
        }
    }
}

impl From<DeploymentType> for String {
    fn from(value: DeploymentType) -> Self {
        match value {
            DeploymentType::OpenShift => "openshift".to_string(),
            DeploymentType::Other(other) => other,
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenShift => f.write_str("openshift"),
            Self::Other(other) if other.is_empty() => f.write_str("<unset>"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// A path or URL template containing the `TOPIC` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicTemplate(String);

impl TopicTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Replace every occurrence of `TOPIC` with `topic`
    pub fn expand(&self, topic: &str) -> String {
        self.0.replace(TOPIC_PLACEHOLDER, topic)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TopicTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `msgServer` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgServerConfig {
    /// URL template for the HTTP logging endpoint
    #[serde(rename = "logMessageURL", default)]
    pub log_message_url: Option<TopicTemplate>,
}

/// `backupFiles` / `recoveryFiles` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTemplateConfig {
    #[serde(rename = "fileName", default)]
    pub file_name: Option<TopicTemplate>,
}

/// Complete reporting configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingConfig {
    /// Host name stamped into every message (`_ho`)
    #[serde(default)]
    pub host: Option<String>,

    /// Cluster name stamped into every message (`_cl`)
    #[serde(default)]
    pub cluster: Option<String>,

    #[serde(default)]
    pub mbaas_type: DeploymentType,

    /// Gate shared by both remote destinations
    #[serde(default)]
    pub real_time_logging_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_server: Option<MsgServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_files: Option<FileTemplateConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_files: Option<FileTemplateConfig>,
}

/// Validated identity fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub host: String,
    pub cluster: String,
}

impl ReportingConfig {
    /// Create a config with only the required identity fields
    pub fn new(host: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            cluster: Some(cluster.into()),
            ..Default::default()
        }
    }

    pub fn with_deployment(mut self, mbaas_type: DeploymentType) -> Self {
        self.mbaas_type = mbaas_type;
        self
    }

    pub fn with_real_time_logging(mut self, enabled: bool) -> Self {
        self.real_time_logging_enabled = enabled;
        self
    }

    pub fn with_log_message_url(mut self, url: impl Into<String>) -> Self {
        self.msg_server = Some(MsgServerConfig {
            log_message_url: Some(TopicTemplate::new(url)),
        });
        self
    }

    pub fn with_backup_file(mut self, file_name: impl Into<String>) -> Self {
        self.backup_files = Some(FileTemplateConfig {
            file_name: Some(TopicTemplate::new(file_name)),
        });
        self
    }

    pub fn with_recovery_file(mut self, file_name: impl Into<String>) -> Self {
        self.recovery_files = Some(FileTemplateConfig {
            file_name: Some(TopicTemplate::new(file_name)),
        });
        self
    }

    /// Extract host and cluster, failing if either is missing or empty
    pub fn identity(&self) -> Result<Identity, ContractError> {
        let host = required(self.host.as_deref(), "host")?;
        let cluster = required(self.cluster.as_deref(), "cluster")?;
        Ok(Identity {
            host: host.to_string(),
            cluster: cluster.to_string(),
        })
    }

    pub fn is_openshift(&self) -> bool {
        self.mbaas_type.is_openshift()
    }

    /// Configured HTTP URL template, if any
    pub fn log_message_url(&self) -> Option<&TopicTemplate> {
        self.msg_server
            .as_ref()
            .and_then(|s| s.log_message_url.as_ref())
            .filter(|t| !t.is_empty())
    }

    /// Configured backup file template, if any
    pub fn backup_template(&self) -> Option<&TopicTemplate> {
        file_template(self.backup_files.as_ref())
    }

    /// Configured recovery file template, if any
    pub fn recovery_template(&self) -> Option<&TopicTemplate> {
        file_template(self.recovery_files.as_ref())
    }
}

fn file_template(section: Option<&FileTemplateConfig>) -> Option<&TopicTemplate> {
    section
        .and_then(|s| s.file_name.as_ref())
        .filter(|t| !t.is_empty())
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ContractError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ContractError::config_validation(
            field,
            format!("Invalid config: no {field}"),
        )),
    }
}
