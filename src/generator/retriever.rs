//! Class model of the local library retriever
//!
//! The generated class plugs into the test harness in place of the
//! source-control retriever. Both retrieve entry points, with and without the
//! changelog flag, delegate to one private copy method that logs a single
//! line and copies the library file set into the job workspace.

use super::template::{string_literal, ClassModel, FieldModel, MethodModel};
use super::TemplateInputs;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "Generated by pipeline-lib-build. Do not edit.";

/// Build the class model for `class_name` in `package_name`.
pub fn retriever_model(
    class_name: &str,
    package_name: &str,
    inputs: &TemplateInputs,
) -> ClassModel {
    let file_set = string_literal(&inputs.library_globs.join(","));

    let retrieve_with_changelog = MethodModel::method(&["public"], "void", "retrieve")
        .annotated("Override")
        .param("String", "name")
        .param("String", "version")
        .param("boolean", "changelog")
        .param("FilePath", "target")
        .param("Run<?, ?>", "run")
        .param("TaskListener", "listener")
        .throws("Exception")
        .line("doRetrieve(target, listener);");

    let retrieve = MethodModel::method(&["public"], "void", "retrieve")
        .annotated("Override")
        .param("String", "name")
        .param("String", "version")
        .param("FilePath", "target")
        .param("Run<?, ?>", "run")
        .param("TaskListener", "listener")
        .throws("Exception")
        .line("doRetrieve(target, listener);");

    let do_retrieve = MethodModel::method(&["private"], "void", "doRetrieve")
        .param("FilePath", "target")
        .param("TaskListener", "listener")
        .throws("IOException")
        .throws("InterruptedException")
        .line(format!(
            "listener.getLogger().println({} + localPath + {} + target);",
            string_literal("Copying library from local path "),
            string_literal(" to workspace path ")
        ))
        .line("localPath.copyRecursiveTo(LIBRARY_FILES, null, target);");

    ClassModel {
        header: vec![GENERATED_HEADER.to_string()],
        package: package_name.to_string(),
        imports: [
            "hudson.FilePath",
            "hudson.model.Run",
            "hudson.model.TaskListener",
            "java.io.IOException",
            "java.nio.file.Path",
            "java.nio.file.Paths",
            "java.util.Objects",
            "org.jenkinsci.plugins.workflow.libs.LibraryRetriever",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        doc: vec![
            "Retrieves a shared library from a local directory instead of source control."
                .to_string(),
            String::new(),
            "Defaults to the working directory of the test process.".to_string(),
        ],
        modifiers: vec!["public".to_string()],
        name: class_name.to_string(),
        superclass: Some("LibraryRetriever".to_string()),
        fields: vec![
            FieldModel {
                modifiers: vec!["private".to_string(), "static".to_string(), "final".to_string()],
                ty: "String".to_string(),
                name: "LIBRARY_FILES".to_string(),
                initializer: Some(file_set),
            },
            FieldModel {
                modifiers: vec!["private".to_string(), "final".to_string()],
                ty: "FilePath".to_string(),
                name: "localPath".to_string(),
                initializer: None,
            },
        ],
        constructors: vec![
            MethodModel::constructor(&["public"], class_name)
                .line("this(Paths.get(System.getProperty(\"user.dir\")));"),
            MethodModel::constructor(&["public"], class_name)
                .param("Path", "path")
                .line("this.localPath = new FilePath(Objects.requireNonNull(path).toFile());"),
        ],
        methods: vec![retrieve_with_changelog, retrieve, do_retrieve],
    }
}
