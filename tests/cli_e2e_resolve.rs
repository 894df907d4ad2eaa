//! End-to-end tests for the `resolve` command.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_defaults() {
    let fixture = TestFixture::new().with_config(configs::DEFAULTS);

    fixture
        .command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plugins (11):"))
        .stdout(predicate::str::contains(
            "org.jenkins-ci.plugins.workflow:workflow-cps:2.36",
        ))
        .stdout(predicate::str::contains("org.jenkins-ci.plugins:git:3.3.0"))
        .stdout(predicate::str::contains("org.codehaus.groovy:groovy-all:2.4.11"))
        .stdout(predicate::str::contains("com.lesfurets:jenkins-pipeline-unit:1.1"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_declared_plugins_come_first() {
    let fixture = TestFixture::new().with_config(configs::WITH_PLUGINS);

    let output = fixture.command().arg("resolve").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let folder = stdout
        .find("com.cloudbees.jenkins.plugins:cloudbees-folder:6.1.2")
        .unwrap();
    let custom = stdout.find("org.example:custom-steps:0.9").unwrap();
    let api = stdout
        .find("org.jenkins-ci.plugins.workflow:workflow-api:")
        .unwrap();
    assert!(folder < custom);
    assert!(custom < api);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_without_pipeline_unit() {
    let fixture = TestFixture::new().with_config(configs::WITHOUT_PIPELINE_UNIT);

    fixture
        .command()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test libraries (1):"))
        .stdout(predicate::str::contains("jenkins-pipeline-unit").not());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_resolve_json() {
    let fixture = TestFixture::new().with_config(configs::WITH_PLUGINS);

    let output = fixture.command().args(["resolve", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["plugins"].as_array().unwrap().len(), 14);
    assert_eq!(
        value["core_libraries"][1],
        "org.jenkins-ci.main:jenkins-core:2.89.1"
    );
}
