use std::collections::HashMap;

use facet::Facet;
use serde::Deserialize;

use super::{
    Affinity, Constraint, MigrateStrategy, ReschedulePolicy, Service, Spread, Task,
    UpdateStrategy, nullable,
};
use crate::duration::Duration;

/// A set of tasks that are always placed on the same node.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct TaskGroup {
    #[facet(label)]
    pub name: Option<String>,
    #[facet(attribute, optional)]
    pub count: Option<i64>,
    #[serde(rename = "Constraints", deserialize_with = "nullable")]
    #[facet(block)]
    pub constraint: Vec<Constraint>,
    #[serde(rename = "Affinities", deserialize_with = "nullable")]
    #[facet(block)]
    pub affinity: Vec<Affinity>,
    #[serde(rename = "Tasks", deserialize_with = "nullable")]
    #[facet(block)]
    pub task: Vec<Task>,
    #[serde(rename = "Spreads", deserialize_with = "nullable")]
    #[facet(block)]
    pub spread: Vec<Spread>,
    #[serde(rename = "Volumes", deserialize_with = "nullable")]
    #[facet(block)]
    pub volume: HashMap<String, VolumeRequest>,
    #[serde(rename = "RestartPolicy")]
    #[facet(block)]
    pub restart: Option<RestartPolicy>,
    #[serde(rename = "ReschedulePolicy")]
    #[facet(block)]
    pub reschedule: Option<ReschedulePolicy>,
    #[facet(block)]
    pub ephemeral_disk: Option<EphemeralDisk>,
    #[facet(block)]
    pub update: Option<UpdateStrategy>,
    #[facet(block)]
    pub migrate: Option<MigrateStrategy>,
    #[serde(rename = "Networks", deserialize_with = "nullable")]
    #[facet(block)]
    pub network: Vec<NetworkResource>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub meta: HashMap<String, String>,
    #[serde(rename = "Services", deserialize_with = "nullable")]
    #[facet(block)]
    pub service: Vec<Service>,
    #[facet(attribute, optional)]
    pub shutdown_delay: Option<Duration>,
    #[facet(attribute, optional)]
    pub stop_after_client_disconnect: Option<Duration>,
}

/// What a client does when a task fails.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct RestartPolicy {
    #[facet(attribute, optional)]
    pub interval: Option<Duration>,
    #[facet(attribute, optional)]
    pub attempts: Option<i64>,
    #[facet(attribute, optional)]
    pub delay: Option<Duration>,
    #[facet(attribute, optional)]
    pub mode: Option<String>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct EphemeralDisk {
    #[facet(attribute, optional)]
    pub sticky: Option<bool>,
    #[facet(attribute, optional)]
    pub migrate: Option<bool>,
    #[serde(rename = "SizeMB")]
    #[facet(attribute, optional)]
    pub size: Option<i64>,
}

/// A volume the group asks the client to provide.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct VolumeRequest {
    #[facet(attribute, optional)]
    pub name: String,
    #[facet(attribute, optional)]
    pub r#type: String,
    #[facet(attribute, optional)]
    pub source: String,
    #[facet(attribute, optional)]
    pub read_only: bool,
}

/// Network requirements of a group or task.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkResource {
    #[facet(attribute, optional)]
    pub mode: String,
    #[facet(attribute, optional)]
    pub device: String,
    #[serde(rename = "CIDR")]
    #[facet(attribute, optional)]
    pub cidr: String,
    #[serde(rename = "IP")]
    #[facet(attribute, optional)]
    pub ip: String,
    #[serde(rename = "DNS")]
    #[facet(block)]
    pub dns: Option<DnsConfig>,
    #[serde(rename = "ReservedPorts", deserialize_with = "nullable")]
    #[facet(block)]
    pub reserved_ports: Vec<Port>,
    #[serde(rename = "DynamicPorts", deserialize_with = "nullable")]
    #[facet(block)]
    pub port: Vec<Port>,
    #[serde(rename = "MBits")]
    #[facet(attribute, optional)]
    pub mbits: Option<i64>,
}

/// A port; static when `static` is set, dynamically assigned otherwise.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Port {
    #[facet(label)]
    pub label: String,
    #[serde(rename = "Value")]
    #[facet(attribute, optional)]
    pub r#static: i64,
    #[facet(attribute, optional)]
    pub to: i64,
    #[facet(attribute, optional)]
    pub host_network: String,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct DnsConfig {
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub servers: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub searches: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub options: Vec<String>,
}
