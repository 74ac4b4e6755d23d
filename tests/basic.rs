use std::collections::HashMap;

use facet::Facet;
use indoc::indoc;

/// Optional fields holding their zero value are left out; required ones stay.
#[test]
fn optional_zero_values_are_omitted() {
    #[derive(Facet)]
    struct Settings {
        #[facet(attribute, optional)]
        region: String,
        #[facet(attribute, optional)]
        priority: i64,
        #[facet(attribute, optional)]
        all_at_once: bool,
        #[facet(attribute, optional)]
        datacenters: Vec<String>,
        #[facet(attribute)]
        count: i64,
    }

    let settings = Settings {
        region: String::new(),
        priority: 0,
        all_at_once: false,
        datacenters: vec![],
        count: 0,
    };

    assert_eq!(
        facet_hcl::to_string("settings", &settings).unwrap(),
        indoc! {"
            settings {
              count = 0
            }
        "}
    );
}

/// `optional` alone marks an attribute.
#[test]
fn optional_alone_implies_attribute() {
    #[derive(Facet)]
    struct Lifecycle {
        #[facet(optional)]
        hook: String,
        #[facet(optional)]
        sidecar: bool,
    }

    let lifecycle = Lifecycle {
        hook: "prestart".to_string(),
        sidecar: true,
    };

    assert_eq!(
        facet_hcl::to_string("lifecycle", &lifecycle).unwrap(),
        indoc! {r#"
            lifecycle {
              hook    = "prestart"
              sidecar = true
            }
        "#}
    );
}

/// Fields without a role are not part of the document.
#[test]
fn fields_without_role_are_skipped() {
    #[derive(Facet)]
    struct Job {
        #[facet(attribute, optional)]
        region: String,
        status: String,
    }

    let job = Job {
        region: "global".to_string(),
        status: "running".to_string(),
    };

    assert_eq!(
        facet_hcl::to_string("spec", &job).unwrap(),
        "spec {\n  region = \"global\"\n}\n"
    );
}

#[derive(Facet)]
struct Job {
    #[facet(attribute, optional)]
    region: Option<String>,
    #[facet(attribute, optional)]
    name: Option<String>,
    #[facet(attribute, optional)]
    datacenters: Vec<String>,
}

fn example_job() -> Job {
    Job {
        region: Some("global".to_string()),
        name: Some("example".to_string()),
        datacenters: vec!["dc1".to_string()],
    }
}

/// The root `job` block is labelled by its `name` field.
#[test]
fn root_job_is_labelled_by_name() {
    assert_eq!(
        facet_hcl::to_string("job", &example_job()).unwrap(),
        indoc! {r#"
            job "example" {
              region      = "global"
              datacenters = ["dc1"]
            }
        "#}
    );
}

/// Each job of a root sequence is labelled by its own `name`.
#[test]
fn every_root_job_in_a_sequence_is_labelled() {
    let other = Job {
        region: None,
        name: Some("other".to_string()),
        datacenters: vec![],
    };

    assert_eq!(
        facet_hcl::to_string("job", &vec![example_job(), other]).unwrap(),
        indoc! {r#"
            job "example" {
              region      = "global"
              datacenters = ["dc1"]
            }

            job "other" {
            }
        "#}
    );
}

/// Blocks nested in a root job are not roots.
#[test]
fn nested_jobs_keep_name_as_attribute() {
    #[derive(Facet)]
    struct Parent {
        #[facet(attribute, optional)]
        name: String,
        #[facet(block)]
        job: Vec<Job>,
    }

    let parent = Parent {
        name: "outer".to_string(),
        job: vec![example_job()],
    };

    assert_eq!(
        facet_hcl::to_string("job", &parent).unwrap(),
        indoc! {r#"
            job "outer" {
              job {
                region      = "global"
                name        = "example"
                datacenters = ["dc1"]
              }
            }
        "#}
    );
}

/// Only the root `job` block gets the fallback label.
#[test]
fn other_roots_keep_name_as_attribute() {
    assert_eq!(
        facet_hcl::to_string("group", &example_job()).unwrap(),
        indoc! {r#"
            group {
              region      = "global"
              name        = "example"
              datacenters = ["dc1"]
            }
        "#}
    );
}

/// An unnamed job gets no label, and no `name` attribute either.
#[test]
fn unnamed_job_has_no_label() {
    let job = Job {
        name: None,
        ..example_job()
    };

    assert_eq!(
        facet_hcl::to_string("job", &job).unwrap(),
        indoc! {r#"
            job {
              region      = "global"
              datacenters = ["dc1"]
            }
        "#}
    );
}

#[derive(Facet)]
struct Group {
    #[facet(label)]
    name: String,
    #[facet(attribute, optional)]
    count: i64,
    #[facet(block)]
    restart: Option<Restart>,
}

#[derive(Facet)]
struct Restart {
    #[facet(attribute, optional)]
    attempts: i64,
    #[facet(attribute, optional)]
    mode: String,
}

/// A block is preceded by a blank line when its parent already has content.
#[test]
fn nested_blocks_are_separated_from_preceding_content() {
    let group = Group {
        name: "cache".to_string(),
        count: 1,
        restart: Some(Restart {
            attempts: 2,
            mode: "fail".to_string(),
        }),
    };

    assert_eq!(
        facet_hcl::to_string("group", &group).unwrap(),
        indoc! {r#"
            group "cache" {
              count = 1

              restart {
                attempts = 2
                mode     = "fail"
              }
            }
        "#}
    );
}

#[test]
fn first_block_in_an_empty_body_has_no_blank_line() {
    let group = Group {
        name: "cache".to_string(),
        count: 0,
        restart: Some(Restart {
            attempts: 2,
            mode: String::new(),
        }),
    };

    assert_eq!(
        facet_hcl::to_string("group", &group).unwrap(),
        indoc! {r#"
            group "cache" {
              restart {
                attempts = 2
              }
            }
        "#}
    );
}

/// An empty key writes the fields at the top level of the document.
#[test]
fn empty_key_writes_fields_at_top_level() {
    let restart = Restart {
        attempts: 3,
        mode: "delay".to_string(),
    };

    assert_eq!(
        facet_hcl::to_string("", &restart).unwrap(),
        indoc! {r#"
            attempts = 3
            mode     = "delay"
        "#}
    );
}

/// Encoding the same value twice gives the same text.
#[test]
fn output_is_deterministic() {
    #[derive(Facet)]
    struct Task {
        #[facet(label)]
        name: String,
        #[facet(block)]
        env: HashMap<String, String>,
    }

    let env = (0..32)
        .map(|i| (format!("VAR_{i:02}"), i.to_string()))
        .collect();
    let task = Task {
        name: "server".to_string(),
        env,
    };

    let first = facet_hcl::to_string("task", &task).unwrap();
    let second = facet_hcl::to_string("task", &task).unwrap();
    assert_eq!(first, second);
    assert!(first.find("VAR_00").unwrap() < first.find("VAR_31").unwrap());
}

/// The document tree can be inspected before rendering.
#[test]
fn body_exposes_blocks_and_attributes() {
    let body = facet_hcl::to_body("job", &example_job()).unwrap();

    let job = body.blocks().next().unwrap();
    assert_eq!(job.ident, "job");
    assert_eq!(job.labels, vec!["example".to_string()]);

    let keys: Vec<&str> = job.body.attributes().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, ["region", "datacenters"]);
}

#[test]
fn to_writer_writes_the_rendered_text() {
    let mut out = Vec::new();
    facet_hcl::to_writer(&mut out, "job", &example_job()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        facet_hcl::to_string("job", &example_job()).unwrap()
    );
}
