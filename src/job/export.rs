use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::{Job, JobWrapper, nullable};
use crate::error::{HclErrorKind, Result};

/// Jobs rendered from a configuration tree, as exported to JSON.
///
/// The document is `{"Rendered": {namespace: {job: {"Job": {...}}}}}`.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RenderedExport {
    /// Job envelopes by namespace, then by job name.
    #[serde(rename = "Rendered", default, deserialize_with = "nullable")]
    pub rendered: HashMap<String, HashMap<String, JobWrapper>>,
}

impl RenderedExport {
    /// Decodes an export document.
    pub fn from_json(input: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(input)?)
    }

    /// Looks up one job.
    ///
    /// A missing namespace or a missing job are recoverable errors; the
    /// caller asked for something the export does not contain.
    pub fn job(&self, namespace: &str, job: &str) -> Result<&Job> {
        let Some(jobs) = self.rendered.get(namespace) else {
            return Err(HclErrorKind::MissingNamespace {
                namespace: namespace.to_string(),
            }
            .into());
        };

        match jobs.get(job) {
            Some(wrapper) => Ok(&wrapper.job),
            None => Err(HclErrorKind::MissingJob {
                namespace: namespace.to_string(),
                job: job.to_string(),
            }
            .into()),
        }
    }

    /// Namespaces in the export, sorted.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.rendered.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }

    /// `(namespace, job)` pairs in the export, sorted.
    pub fn jobs(&self) -> Vec<(&str, &str)> {
        let sorted: BTreeMap<&str, &HashMap<String, JobWrapper>> = self
            .rendered
            .iter()
            .map(|(namespace, jobs)| (namespace.as_str(), jobs))
            .collect();

        let mut out = Vec::new();
        for (namespace, jobs) in sorted {
            let mut names: Vec<&str> = jobs.keys().map(String::as_str).collect();
            names.sort_unstable();
            out.extend(names.into_iter().map(|job| (namespace, job)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
      "Rendered": {
        "default": {
          "redis": {"Job": {"Name": "redis", "Type": "service"}},
          "batch": {"Job": {"Name": "batch"}}
        },
        "ops": {}
      }
    }"#;

    #[test]
    fn finds_jobs_by_namespace_and_name() {
        let export = RenderedExport::from_json(EXPORT.as_bytes()).unwrap();
        let job = export.job("default", "redis").unwrap();

        assert_eq!(job.name.as_deref(), Some("redis"));
        assert_eq!(job.r#type.as_deref(), Some("service"));
    }

    #[test]
    fn missing_entries_are_recoverable() {
        let export = RenderedExport::from_json(EXPORT.as_bytes()).unwrap();

        let err = export.job("prod", "redis").unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Missing namespace prod");

        let err = export.job("ops", "redis").unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Missing job redis in namespace ops");
    }

    #[test]
    fn listings_are_sorted() {
        let export = RenderedExport::from_json(EXPORT.as_bytes()).unwrap();

        assert_eq!(export.namespaces(), ["default", "ops"]);
        assert_eq!(
            export.jobs(),
            [("default", "batch"), ("default", "redis")]
        );
    }

    #[test]
    fn a_null_export_is_empty() {
        let export = RenderedExport::from_json(br#"{"Rendered": null}"#).unwrap();
        assert!(export.namespaces().is_empty());
    }
}
