//! Instance model shared by the scanner and the deployment engine

use std::collections::HashMap;
use thiserror::Error;

/// A lifecycle state name the fleet scanner does not recognize.
///
/// Surfaced as an error rather than skipped: a new state name means the
/// decision table no longer covers the API's behavior.
#[derive(Debug, Error)]
#[error("unrecognized instance lifecycle state '{0}'")]
pub struct UnknownStateError(pub String);

/// EC2 instance lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
}

impl InstanceState {
    /// Parse the API's state name (e.g. `"shutting-down"`).
    pub fn parse(name: &str) -> Result<Self, UnknownStateError> {
        match name {
            "pending" => Ok(InstanceState::Pending),
            "running" => Ok(InstanceState::Running),
            "shutting-down" => Ok(InstanceState::ShuttingDown),
            "terminated" => Ok(InstanceState::Terminated),
            "stopping" => Ok(InstanceState::Stopping),
            "stopped" => Ok(InstanceState::Stopped),
            other => Err(UnknownStateError(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceState::Pending => "pending",
            InstanceState::Running => "running",
            InstanceState::ShuttingDown => "shutting-down",
            InstanceState::Terminated => "terminated",
            InstanceState::Stopping => "stopping",
            InstanceState::Stopped => "stopped",
        }
    }
}

/// Bootstrap platform of an instance. Anything the API does not flag as
/// Windows is treated as Linux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
}

/// Snapshot of an EC2 instance as seen by one reconciliation pass.
#[derive(Debug, Clone)]
pub struct Ec2Instance {
    pub id: String,
    pub region: String,
    pub state: InstanceState,
    pub platform: Platform,
    pub tags: HashMap<String, String>,
    /// Key-pair name the instance was launched with, if any.
    pub key_name: Option<String>,
    /// Public DNS name; populated only while the instance is running.
    pub public_dns: Option<String>,
}

impl Ec2Instance {
    /// Canonical inventory node name: `aws.<region>.<instance-id>`.
    pub fn node_name(&self) -> String {
        format!("aws.{}.{}", self.region, self.id)
    }

    /// Look up a tag value by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
