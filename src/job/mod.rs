//! Typed model of a Nomad job, as returned by Nomad's JSON API.
//!
//! Field names are the HCL keys of the job specification; `#[serde]`
//! attributes map them to the API's JSON names and `#[facet]` attributes
//! say how each field is written. Fields without a `#[facet]` role are set
//! by the server and never written.

#![allow(missing_docs)]

use std::collections::HashMap;

use facet::Facet;
use serde::{Deserialize, Deserializer};

use crate::{duration::Duration, error::Result};

mod export;
mod group;
mod placement;
mod service;
mod task;

pub use export::RenderedExport;
pub use group::{
    DnsConfig, EphemeralDisk, NetworkResource, Port, RestartPolicy, TaskGroup, VolumeRequest,
};
pub use placement::{Affinity, Constraint, Spread, SpreadTarget};
pub use service::{
    CheckRestart, ConsulConnect, ConsulExposeConfig, ConsulExposePath, ConsulGateway,
    ConsulGatewayBindAddress, ConsulGatewayProxy, ConsulIngressConfigEntry,
    ConsulIngressListener, ConsulIngressService, ConsulProxy, ConsulSidecarService,
    ConsulUpstream, Service, ServiceCheck, SidecarTask,
};
pub use task::{
    DispatchPayloadConfig, LogConfig, RequestedDevice, Resources, Task, TaskArtifact,
    TaskLifecycle, Template, Vault, VolumeMount,
};

/// The `{"Job": {...}}` envelope Nomad uses for job documents.
#[derive(Facet, Deserialize, Clone, Debug, PartialEq)]
pub struct JobWrapper {
    /// The wrapped job.
    #[serde(rename = "Job")]
    pub job: Job,
}

impl JobWrapper {
    /// Decodes a job document.
    pub fn from_json(input: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(input)?)
    }
}

/// A job: the unit Nomad schedules.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Job {
    #[facet(attribute, optional)]
    pub region: Option<String>,
    #[facet(attribute, optional)]
    pub namespace: Option<String>,
    #[serde(rename = "ID")]
    #[facet(attribute, optional)]
    pub id: Option<String>,
    #[facet(attribute, optional)]
    pub name: Option<String>,
    #[facet(attribute, optional)]
    pub r#type: Option<String>,
    #[facet(attribute, optional)]
    pub priority: Option<i64>,
    #[facet(attribute, optional)]
    pub all_at_once: Option<bool>,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub datacenters: Vec<String>,
    #[serde(rename = "Constraints", deserialize_with = "nullable")]
    #[facet(block)]
    pub constraint: Vec<Constraint>,
    #[serde(rename = "Affinities", deserialize_with = "nullable")]
    #[facet(block)]
    pub affinity: Vec<Affinity>,
    #[serde(rename = "TaskGroups", deserialize_with = "nullable")]
    #[facet(block)]
    pub group: Vec<TaskGroup>,
    #[facet(block)]
    pub update: Option<UpdateStrategy>,
    #[serde(rename = "Spreads", deserialize_with = "nullable")]
    #[facet(block)]
    pub spread: Vec<Spread>,
    #[facet(block)]
    pub periodic: Option<PeriodicConfig>,
    #[serde(rename = "ParameterizedJob")]
    #[facet(block)]
    pub parameterized: Option<ParameterizedJobConfig>,
    #[facet(block)]
    pub reschedule: Option<ReschedulePolicy>,
    #[facet(block)]
    pub migrate: Option<MigrateStrategy>,
    #[serde(deserialize_with = "nullable")]
    #[facet(block)]
    pub meta: HashMap<String, String>,
    #[facet(attribute, optional)]
    pub consul_token: Option<String>,
    #[facet(attribute, optional)]
    pub vault_token: Option<String>,

    // Set by the servers, never part of a job specification.
    pub stop: Option<bool>,
    #[serde(rename = "ParentID")]
    pub parent_id: Option<String>,
    pub status: Option<String>,
    pub version: Option<u64>,
    pub submit_time: Option<i64>,
}

/// Rolling update settings, for a job or one of its groups.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct UpdateStrategy {
    #[facet(attribute, optional)]
    pub stagger: Option<Duration>,
    #[facet(attribute, optional)]
    pub max_parallel: Option<i64>,
    #[facet(attribute, optional)]
    pub health_check: Option<String>,
    #[facet(attribute, optional)]
    pub min_healthy_time: Option<Duration>,
    #[facet(attribute, optional)]
    pub healthy_deadline: Option<Duration>,
    #[facet(attribute, optional)]
    pub progress_deadline: Option<Duration>,
    #[facet(attribute, optional)]
    pub canary: Option<i64>,
    #[facet(attribute, optional)]
    pub auto_revert: Option<bool>,
    #[facet(attribute, optional)]
    pub auto_promote: Option<bool>,
}

/// How allocations move off draining nodes.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct MigrateStrategy {
    #[facet(attribute, optional)]
    pub max_parallel: Option<i64>,
    #[facet(attribute, optional)]
    pub health_check: Option<String>,
    #[facet(attribute, optional)]
    pub min_healthy_time: Option<Duration>,
    #[facet(attribute, optional)]
    pub healthy_deadline: Option<Duration>,
}

/// How failed allocations are placed again.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ReschedulePolicy {
    #[facet(attribute, optional)]
    pub attempts: Option<i64>,
    #[facet(attribute, optional)]
    pub interval: Option<Duration>,
    #[facet(attribute, optional)]
    pub delay: Option<Duration>,
    #[facet(attribute, optional)]
    pub delay_function: Option<String>,
    #[facet(attribute, optional)]
    pub max_delay: Option<Duration>,
    #[facet(attribute, optional)]
    pub unlimited: Option<bool>,
}

/// Cron-style launching of a batch job.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct PeriodicConfig {
    #[facet(attribute, optional)]
    pub enabled: Option<bool>,
    #[serde(rename = "Spec")]
    #[facet(attribute, optional)]
    pub cron: Option<String>,
    #[facet(attribute, optional)]
    pub prohibit_overlap: Option<bool>,
    #[facet(attribute, optional)]
    pub time_zone: Option<String>,
}

/// Makes a job a template that is dispatched with a payload.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ParameterizedJobConfig {
    #[facet(attribute, optional)]
    pub payload: String,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub meta_required: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    #[facet(attribute, optional)]
    pub meta_optional: Vec<String>,
}

/// Reads a collection Nomad may send as `null`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
