//! Consul service registrations and Connect service mesh settings.

use std::collections::HashMap;

use facet::Facet;
use serde::Deserialize;

use super::{LogConfig, Resources, nullable};
use crate::{duration::Duration, value::Untyped};

/// A service registered in Consul for a group or task.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Service {
    #[serde(rename = "Id")]
    #[facet(attribute, optional)]
    pub id: String,
    #[facet(attribute, optional)]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub canary_tags: Vec<String>,
    #[facet(attribute, optional)]
    pub enable_tag_override: bool,
    #[serde(rename = "PortLabel")]
    #[facet(attribute, optional)]
    pub port: String,
    #[facet(attribute, optional)]
    pub address_mode: String,
    #[serde(rename = "Checks", deserialize_with = "nullable")]
    #[facet(block)]
    pub check: Vec<ServiceCheck>,
    #[facet(block)]
    pub check_restart: Option<CheckRestart>,
    #[facet(block)]
    pub connect: Option<ConsulConnect>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub meta: HashMap<String, String>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub canary_meta: HashMap<String, String>,
    #[serde(rename = "TaskName")]
    #[facet(attribute, optional)]
    pub task: String,
}

/// A health check attached to a service.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceCheck {
    #[serde(rename = "Id")]
    #[facet(attribute, optional)]
    pub id: String,
    #[facet(attribute, optional)]
    pub name: String,
    #[facet(attribute, optional)]
    pub r#type: String,
    #[facet(attribute, optional)]
    pub command: String,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub args: Vec<String>,
    #[facet(attribute, optional)]
    pub path: String,
    #[facet(attribute, optional)]
    pub protocol: String,
    #[serde(rename = "PortLabel")]
    #[facet(attribute, optional)]
    pub port: String,
    #[facet(attribute, optional)]
    pub expose: bool,
    #[facet(attribute, optional)]
    pub address_mode: String,
    #[facet(attribute, optional)]
    pub interval: Duration,
    #[facet(attribute, optional)]
    pub timeout: Duration,
    #[facet(attribute, optional)]
    pub initial_status: String,
    #[serde(rename = "TLSSkipVerify")]
    #[facet(attribute, optional)]
    pub tls_skip_verify: bool,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub header: HashMap<String, Vec<String>>,
    #[facet(attribute, optional)]
    pub method: String,
    #[facet(block)]
    pub check_restart: Option<CheckRestart>,
    #[serde(rename = "GRPCService")]
    #[facet(attribute, optional)]
    pub grpc_service: String,
    #[serde(rename = "GRPCUseTLS")]
    #[facet(attribute, optional)]
    pub grpc_use_tls: bool,
    #[serde(rename = "TaskName")]
    #[facet(attribute, optional)]
    pub task: String,
    #[facet(attribute, optional)]
    pub success_before_passing: i64,
    #[facet(attribute, optional)]
    pub failures_before_critical: i64,
}

/// Restarts a task whose checks stay unhealthy.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct CheckRestart {
    #[facet(attribute, optional)]
    pub limit: i64,
    #[facet(attribute, optional)]
    pub grace: Option<Duration>,
    #[facet(attribute, optional)]
    pub ignore_warnings: bool,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulConnect {
    #[facet(attribute, optional)]
    pub native: bool,
    #[facet(block)]
    pub gateway: Option<ConsulGateway>,
    #[facet(block)]
    pub sidecar_service: Option<ConsulSidecarService>,
    #[facet(block)]
    pub sidecar_task: Option<SidecarTask>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulSidecarService {
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub tags: Vec<String>,
    #[facet(attribute, optional)]
    pub port: String,
    #[facet(block)]
    pub proxy: Option<ConsulProxy>,
    #[serde(rename = "DisableDefaultTCPCheck")]
    #[facet(attribute, optional)]
    pub disable_default_tcp_check: bool,
}

/// Overrides for the task Nomad injects to run the sidecar proxy.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct SidecarTask {
    #[facet(attribute, optional)]
    pub name: String,
    #[facet(attribute, optional)]
    pub driver: String,
    #[facet(attribute, optional)]
    pub user: String,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub config: HashMap<String, Untyped>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub env: HashMap<String, String>,
    #[facet(block)]
    pub resources: Option<Resources>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub meta: HashMap<String, String>,
    #[facet(attribute, optional)]
    pub kill_timeout: Option<Duration>,
    #[serde(rename = "LogConfig")]
    #[facet(block)]
    pub logs: Option<LogConfig>,
    #[facet(attribute, optional)]
    pub shutdown_delay: Option<Duration>,
    #[facet(attribute, optional)]
    pub kill_signal: String,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulProxy {
    #[facet(attribute, optional)]
    pub local_service_address: String,
    #[facet(attribute, optional)]
    pub local_service_port: i64,
    #[serde(rename = "ExposeConfig")]
    #[facet(block)]
    pub expose: Option<ConsulExposeConfig>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub upstreams: Vec<ConsulUpstream>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub config: HashMap<String, Untyped>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulUpstream {
    #[facet(attribute, optional)]
    pub destination_name: String,
    #[facet(attribute, optional)]
    pub local_bind_port: i64,
    #[facet(attribute, optional)]
    pub datacenter: String,
    #[facet(attribute, optional)]
    pub local_bind_address: String,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulExposeConfig {
    #[serde(rename = "Path", deserialize_with = "nullable")]
    #[facet(block)]
    pub path: Vec<ConsulExposePath>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulExposePath {
    #[facet(attribute, optional)]
    pub path: String,
    #[facet(attribute, optional)]
    pub protocol: String,
    #[facet(attribute, optional)]
    pub local_path_port: i64,
    #[facet(attribute, optional)]
    pub listener_port: String,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulGateway {
    #[facet(block)]
    pub proxy: Option<ConsulGatewayProxy>,
    #[facet(block)]
    pub ingress: Option<ConsulIngressConfigEntry>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulGatewayProxy {
    #[facet(attribute, optional)]
    pub connect_timeout: Option<Duration>,
    #[facet(attribute, optional)]
    pub envoy_gateway_bind_tagged_addresses: bool,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub envoy_gateway_bind_addresses: HashMap<String, ConsulGatewayBindAddress>,
    #[facet(attribute, optional)]
    pub envoy_gateway_no_default_bind: bool,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub config: HashMap<String, Untyped>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulGatewayBindAddress {
    #[facet(attribute, optional)]
    pub address: String,
    #[facet(attribute, optional)]
    pub port: i64,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulIngressConfigEntry {
    #[serde(rename = "Listeners", deserialize_with = "nullable")]
    #[facet(block)]
    pub listener: Vec<ConsulIngressListener>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulIngressListener {
    #[facet(attribute, optional)]
    pub port: i64,
    #[facet(attribute, optional)]
    pub protocol: String,
    #[serde(rename = "Services", deserialize_with = "nullable")]
    #[facet(block)]
    pub service: Vec<ConsulIngressService>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConsulIngressService {
    #[facet(attribute, optional)]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub hosts: Vec<String>,
}
