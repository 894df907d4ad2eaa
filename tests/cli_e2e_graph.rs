//! End-to-end tests for the `graph` command.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_graph_tree_shows_visible_nodes() {
    let fixture = TestFixture::new().with_config(configs::DEFAULTS);

    fixture
        .command()
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("unitTestRuntime"))
        .stdout(predicate::str::contains("integrationTestRuntime"))
        .stdout(predicate::str::contains("sharedLibraryJenkinsPluginHpis (hidden"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_graph_node_effective_classpath() {
    let fixture = TestFixture::new().with_config(configs::WITH_PLUGINS);

    fixture
        .command()
        .args(["graph", "--node", "integrationTestRuntime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Effective classpath"))
        .stdout(predicate::str::contains(
            "com.cloudbees.jenkins.plugins:cloudbees-folder:6.1.2@hpi",
        ))
        .stdout(predicate::str::contains(
            "com.cloudbees.jenkins.plugins:cloudbees-folder:6.1.2@jar",
        ));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_graph_unit_test_runtime_has_no_plugin_binaries() {
    let fixture = TestFixture::new().with_config(configs::DEFAULTS);

    fixture
        .command()
        .args(["graph", "--node", "unitTestRuntime", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"effectiveClasspath\""))
        .stdout(predicate::str::contains("@hpi").not());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_graph_json_lists_every_node() {
    let fixture = TestFixture::new().with_config(configs::DEFAULTS);

    let output = fixture.command().args(["graph", "--json"]).output().unwrap();
    assert!(output.status.success());
    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 10);
    assert!(names.contains(&"integrationTestCompile"));
    assert!(names.contains(&"sharedLibraryTestLibraries"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_graph_unknown_node_fails() {
    let fixture = TestFixture::new().with_config(configs::DEFAULTS);

    fixture
        .command()
        .args(["graph", "--node", "testCompile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown classpath node 'testCompile'"));
}
