//! # Graph Command Implementation
//!
//! Displays the classpath graph. Without `--node`, every visible node is shown
//! as a tree of the nodes it extends. With `--node`, only that node is shown,
//! followed by its effective classpath.
//!
//! Hidden nodes appear as leaves that list the coordinates they hold.

use anyhow::{anyhow, Result};
use clap::Args;
use ptree::{print_tree, TreeItem};
use serde::Serialize;

use pipeline_lib_build::classpath::{Artifact, ClasspathGraph, ClasspathNode};

use super::ProjectContext;

/// Show the classpath graph
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Only show this node (for example `integrationTestRuntime`).
    #[arg(long, value_name = "NAME")]
    pub node: Option<String>,

    /// Output JSON instead of a tree.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeClasspath {
    node: String,
    extends: Vec<String>,
    effective_classpath: Vec<String>,
}

/// Execute the `graph` command.
pub fn execute(args: GraphArgs, context: &ProjectContext) -> Result<()> {
    let build = context.compose()?;
    let graph = build.graph();

    match (&args.node, args.json) {
        (None, true) => println!("{}", serde_json::to_string_pretty(&graph.summaries())?),
        (None, false) => {
            for node in graph.nodes().filter(|n| n.is_visible()) {
                print_tree(&tree_for(graph, node)?)
                    .map_err(|e| anyhow!("Failed to display tree: {}", e))?;
            }
        }
        (Some(name), json) => {
            let node = graph
                .node(name)
                .ok_or_else(|| anyhow!("Unknown classpath node '{}'", name))?;
            let artifacts = graph.effective_artifacts(name)?;
            if json {
                let view = NodeClasspath {
                    node: node.name().to_string(),
                    extends: graph
                        .ancestors(name)?
                        .iter()
                        .map(|n| n.name().to_string())
                        .collect(),
                    effective_classpath: artifacts.iter().map(Artifact::to_string).collect(),
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_tree(&tree_for(graph, node)?)
                    .map_err(|e| anyhow!("Failed to display tree: {}", e))?;
                println!("\nEffective classpath ({}):", artifacts.len());
                for artifact in &artifacts {
                    println!("  {}", artifact);
                }
            }
        }
    }

    Ok(())
}

fn tree_for(graph: &ClasspathGraph, node: &ClasspathNode) -> Result<TreeNode> {
    let mut children = Vec::new();
    for parent in graph.parents(node.name())? {
        children.push(tree_for(graph, parent)?);
    }
    if node.is_hidden() {
        children.extend(node.coordinates().iter().map(|c| TreeNode {
            label: format!("{}@{}", c, node.packaging().extension()),
            children: Vec::new(),
        }));
    }

    let label = if node.is_hidden() {
        format!("{} (hidden, {} coordinates)", node.name(), node.coordinates().len())
    } else {
        node.name().to_string()
    };
    Ok(TreeNode { label, children })
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline_lib_build::project::SharedLibraryProject;

    #[test]
    fn test_tree_for_runtime_reaches_hidden_nodes() {
        let build = SharedLibraryProject::new("/work/lib").compose().unwrap();
        let graph = build.graph();
        let node = graph.node("integrationTestRuntime").unwrap();
        let tree = tree_for(graph, node).unwrap();

        assert_eq!(tree.label, "integrationTestRuntime");
        let labels: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels[0], "integrationTestCompile");
        assert!(labels[1].starts_with("sharedLibraryJenkinsPluginHpis (hidden"));
        assert!(tree.children[1]
            .children
            .iter()
            .all(|leaf| leaf.label.ends_with("@hpi")));
    }

    #[test]
    fn test_execute_unknown_node() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join(".pipeline-library.yaml"), "{}\n").unwrap();
        let context = ProjectContext::new(temp.path().to_path_buf(), None);
        let err = execute(
            GraphArgs {
                node: Some("nope".to_string()),
                json: false,
            },
            &context,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown classpath node 'nope'"));
    }
}
