use std::collections::HashMap;

use facet::Facet;
use serde::Deserialize;

use super::{Affinity, Constraint, NetworkResource, RestartPolicy, Service, nullable};
use crate::{duration::Duration, value::Untyped};

/// A single unit of work run by a driver.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Task {
    #[facet(label)]
    pub name: String,
    #[facet(attribute, optional)]
    pub driver: String,
    #[facet(attribute, optional)]
    pub user: String,
    #[facet(block)]
    pub lifecycle: Option<TaskLifecycle>,
    /// Driver configuration; its shape is up to the driver.
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub config: HashMap<String, Untyped>,
    #[serde(rename = "Constraints", deserialize_with = "nullable")]
    #[facet(block)]
    pub constraint: Vec<Constraint>,
    #[serde(rename = "Affinities", deserialize_with = "nullable")]
    #[facet(block)]
    pub affinity: Vec<Affinity>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub env: HashMap<String, String>,
    #[serde(rename = "Services", deserialize_with = "nullable")]
    #[facet(block)]
    pub service: Vec<Service>,
    #[facet(block)]
    pub resources: Option<Resources>,
    #[serde(rename = "RestartPolicy")]
    #[facet(block)]
    pub restart: Option<RestartPolicy>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub meta: HashMap<String, String>,
    #[facet(attribute, optional)]
    pub kill_timeout: Option<Duration>,
    #[serde(rename = "LogConfig")]
    #[facet(block)]
    pub logs: Option<LogConfig>,
    #[serde(rename = "Artifacts", deserialize_with = "nullable")]
    #[facet(block)]
    pub artifact: Vec<TaskArtifact>,
    #[facet(block)]
    pub vault: Option<Vault>,
    #[serde(rename = "Templates", deserialize_with = "nullable")]
    #[facet(block)]
    pub template: Vec<Template>,
    #[facet(block)]
    pub dispatch_payload: Option<DispatchPayloadConfig>,
    #[serde(rename = "VolumeMounts", deserialize_with = "nullable")]
    #[facet(block)]
    pub volume_mount: Vec<VolumeMount>,
    #[facet(attribute, optional)]
    pub leader: bool,
    #[facet(attribute, optional)]
    pub shutdown_delay: Duration,
    #[facet(attribute, optional)]
    pub kill_signal: String,
    #[facet(attribute, optional)]
    pub kind: String,
}

/// Compute the task reserves on its node.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Resources {
    #[serde(rename = "CPU")]
    #[facet(attribute, optional)]
    pub cpu: Option<i64>,
    #[serde(rename = "MemoryMB")]
    #[facet(attribute, optional)]
    pub memory: Option<i64>,
    #[serde(rename = "DiskMB")]
    #[facet(attribute, optional)]
    pub disk: Option<i64>,
    #[serde(rename = "Networks", deserialize_with = "nullable")]
    #[facet(block)]
    pub network: Vec<NetworkResource>,
    #[serde(rename = "Devices", deserialize_with = "nullable")]
    #[facet(block)]
    pub device: Vec<RequestedDevice>,
    #[serde(rename = "IOPS")]
    #[facet(attribute, optional)]
    pub iops: Option<i64>,
}

/// A device such as a GPU, matched by name.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct RequestedDevice {
    #[facet(label)]
    pub name: String,
    #[facet(attribute, optional)]
    pub count: Option<u64>,
    #[serde(rename = "Constraints", deserialize_with = "nullable")]
    #[facet(block)]
    pub constraint: Vec<Constraint>,
    #[serde(rename = "Affinities", deserialize_with = "nullable")]
    #[facet(block)]
    pub affinity: Vec<Affinity>,
}

/// A file fetched into the task directory before the task starts.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TaskArtifact {
    #[serde(rename = "GetterSource")]
    #[facet(attribute, optional)]
    pub source: Option<String>,
    #[serde(rename = "GetterOptions", deserialize_with = "nullable")]
    #[facet(block)]
    pub options: HashMap<String, String>,
    #[serde(rename = "GetterHeaders", deserialize_with = "nullable")]
    #[facet(block)]
    pub headers: HashMap<String, String>,
    #[serde(rename = "GetterMode")]
    #[facet(attribute, optional)]
    pub mode: Option<String>,
    #[serde(rename = "RelativeDest")]
    #[facet(attribute, optional)]
    pub destination: Option<String>,
}

/// A file rendered by consul-template.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "SourcePath")]
    #[facet(attribute, optional)]
    pub source: Option<String>,
    #[serde(rename = "DestPath")]
    #[facet(attribute, optional)]
    pub destination: Option<String>,
    #[serde(rename = "EmbeddedTmpl")]
    #[facet(attribute, optional)]
    pub data: Option<String>,
    #[facet(attribute, optional)]
    pub change_mode: Option<String>,
    #[facet(attribute, optional)]
    pub change_signal: Option<String>,
    #[facet(attribute, optional)]
    pub splay: Option<Duration>,
    #[facet(attribute, optional)]
    pub perms: Option<String>,
    #[serde(rename = "LeftDelim")]
    #[facet(attribute, optional)]
    pub left_delimiter: Option<String>,
    #[serde(rename = "RightDelim")]
    #[facet(attribute, optional)]
    pub right_delimiter: Option<String>,
    #[serde(rename = "Envvars")]
    #[facet(attribute, optional)]
    pub env: Option<bool>,
    #[facet(attribute, optional)]
    pub vault_grace: Option<Duration>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct LogConfig {
    #[facet(attribute, optional)]
    pub max_files: Option<i64>,
    #[serde(rename = "MaxFileSizeMB")]
    #[facet(attribute, optional)]
    pub max_file_size: Option<i64>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Vault {
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub policies: Vec<String>,
    #[facet(attribute, optional)]
    pub namespace: Option<String>,
    #[facet(attribute, optional)]
    pub env: Option<bool>,
    #[facet(attribute, optional)]
    pub change_mode: Option<String>,
    #[facet(attribute, optional)]
    pub change_signal: Option<String>,
}

/// Runs the task as a hook around the main tasks of its group.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct TaskLifecycle {
    #[facet(attribute, optional)]
    pub hook: String,
    #[facet(attribute, optional)]
    pub sidecar: bool,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct DispatchPayloadConfig {
    #[facet(attribute, optional)]
    pub file: String,
}

/// Mounts one of the group's volumes into the task.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct VolumeMount {
    #[facet(attribute, optional)]
    pub volume: Option<String>,
    #[facet(attribute, optional)]
    pub destination: Option<String>,
    #[facet(attribute, optional)]
    pub read_only: Option<bool>,
    #[facet(attribute, optional)]
    pub propagation_mode: Option<String>,
}
