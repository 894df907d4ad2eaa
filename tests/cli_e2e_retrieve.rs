//! End-to-end tests for the `retrieve` command.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_retrieve_copies_library_files_only() {
    let library = TestFixture::new().with_library_sources();
    let workspace = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("pipeline-lib-build");
    cmd.arg("retrieve")
        .arg("--from")
        .arg(library.path())
        .arg("--to")
        .arg(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copying library from local path"))
        .stdout(predicate::str::contains("Copied 4 files"));

    workspace
        .child("src/org/example/Helper.groovy")
        .assert(predicate::path::is_file());
    workspace
        .child("vars/deploy.txt")
        .assert(predicate::path::is_file());
    workspace
        .child("resources/org/example/template.json")
        .assert(predicate::path::is_file());
    workspace.child("README.md").assert(predicate::path::missing());
    workspace.child("test").assert(predicate::path::missing());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_retrieve_missing_source_fails() {
    let workspace = TempDir::new().unwrap();
    let missing = workspace.path().join("no-such-library");

    let mut cmd = cargo_bin_cmd!("pipeline-lib-build");
    cmd.arg("retrieve")
        .arg("--from")
        .arg(&missing)
        .arg("--to")
        .arg(workspace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-library"));
}
