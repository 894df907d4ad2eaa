//! # Classpath Graph
//!
//! Builds the inheritance graph of classpath nodes for the three source roots
//! plus four hidden nodes that carry the resolved artifacts.
//!
//! ## Shape
//!
//! ```text
//! sharedLibraryCoreLibraries ─┐
//! sharedLibraryJenkinsPluginLibraries ─┴─> compile ──> runtime
//!                                        │
//! sharedLibraryTestLibraries ──> unitTestCompile ──> unitTestRuntime
//!                          │             │
//!                          └──> integrationTestCompile <── compile
//!                                        │
//! sharedLibraryJenkinsPluginHpis ──> integrationTestRuntime
//! ```
//!
//! ## Invariants
//!
//! - An edge can only point at a node created earlier than its source, so the
//!   extends-relation is acyclic by construction. Edges are never removed.
//! - Hidden nodes are created non-resolvable and not visible to consumers. They
//!   receive coordinates only through [`ClasspathGraphBuilder::populate`], which
//!   runs once, after [`ClasspathGraphBuilder::build`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::{debug, info};
use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};
use crate::layout::{SourceRoot, SourceRootName};
use crate::resolver::ResolvedDependencies;

/// Index of a node inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Whether a node feeds compilation or execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,
    Runtime,
}

/// Packaging requested for the artifacts of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    /// Installable plugin archive, loaded by the simulated host at runtime.
    Hpi,
    Jar,
}

impl Packaging {
    pub fn extension(self) -> &'static str {
        match self {
            Packaging::Hpi => "hpi",
            Packaging::Jar => "jar",
        }
    }
}

/// The four nodes that do not belong to a source root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenNode {
    PluginBinaries,
    PluginLibraries,
    CoreLibraries,
    TestLibraries,
}

impl HiddenNode {
    pub const ALL: [HiddenNode; 4] = [
        HiddenNode::PluginBinaries,
        HiddenNode::PluginLibraries,
        HiddenNode::CoreLibraries,
        HiddenNode::TestLibraries,
    ];

    pub fn node_name(self) -> &'static str {
        match self {
            HiddenNode::PluginBinaries => "sharedLibraryJenkinsPluginHpis",
            HiddenNode::PluginLibraries => "sharedLibraryJenkinsPluginLibraries",
            HiddenNode::CoreLibraries => "sharedLibraryCoreLibraries",
            HiddenNode::TestLibraries => "sharedLibraryTestLibraries",
        }
    }

    fn description(self) -> &'static str {
        match self {
            HiddenNode::PluginBinaries => "Plugin archives installed into the test host",
            HiddenNode::PluginLibraries => "Plugin classes visible to library code",
            HiddenNode::CoreLibraries => "Groovy runtime and host core",
            HiddenNode::TestLibraries => "Test harness and pipeline unit helpers",
        }
    }

    fn packaging(self) -> Packaging {
        match self {
            HiddenNode::PluginBinaries => Packaging::Hpi,
            _ => Packaging::Jar,
        }
    }
}

/// Name of the compile-scope node of a root.
pub fn compile_node_name(root: SourceRootName) -> String {
    scoped_name(root, "compile")
}

/// Name of the runtime-scope node of a root.
pub fn runtime_node_name(root: SourceRootName) -> String {
    scoped_name(root, "runtime")
}

fn scoped_name(root: SourceRootName, scope: &str) -> String {
    let prefix = root.node_prefix();
    if prefix.is_empty() {
        scope.to_string()
    } else {
        let mut chars = scope.chars();
        let capitalized: String = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();
        format!("{}{}", prefix, capitalized)
    }
}

/// A coordinate together with the packaging it is requested in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Artifact {
    pub coordinate: Coordinate,
    pub packaging: Packaging,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.coordinate, self.packaging.extension())
    }
}

/// A named bucket of coordinates.
#[derive(Debug, Clone)]
pub struct ClasspathNode {
    name: String,
    description: String,
    root: Option<SourceRootName>,
    scope: Option<Scope>,
    resolvable: bool,
    visible: bool,
    packaging: Packaging,
    extends: Vec<NodeId>,
    coordinates: Vec<Coordinate>,
}

impl ClasspathNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn root(&self) -> Option<SourceRootName> {
        self.root
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    pub fn is_resolvable(&self) -> bool {
        self.resolvable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hidden nodes belong to no source root.
    pub fn is_hidden(&self) -> bool {
        self.root.is_none()
    }

    pub fn packaging(&self) -> Packaging {
        self.packaging
    }

    /// Coordinates declared directly on this node.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }
}

/// Serializable view of a node, with parents by name.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub root: Option<SourceRootName>,
    pub scope: Option<Scope>,
    pub resolvable: bool,
    pub visible: bool,
    pub extends: Vec<String>,
    pub coordinates: Vec<Coordinate>,
}

/// Read-only classpath graph.
#[derive(Debug, Clone, Default)]
pub struct ClasspathGraph {
    nodes: Vec<ClasspathNode>,
    index: BTreeMap<String, NodeId>,
    populated: bool,
}

impl ClasspathGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the hidden nodes have received the resolved coordinates.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &ClasspathNode> {
        self.nodes.iter()
    }

    pub fn node(&self, name: &str) -> Option<&ClasspathNode> {
        self.index.get(name).map(|id| &self.nodes[id.0])
    }

    /// Direct parents of `name`.
    pub fn parents(&self, name: &str) -> Result<Vec<&ClasspathNode>> {
        let id = self.lookup(name)?;
        Ok(self.nodes[id.0]
            .extends
            .iter()
            .map(|p| &self.nodes[p.0])
            .collect())
    }

    /// All transitive parents of `name`, depth-first, each listed once.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&ClasspathNode>> {
        let id = self.lookup(name)?;
        Ok(self
            .walk(id)
            .into_iter()
            .skip(1)
            .map(|id| &self.nodes[id.0])
            .collect())
    }

    /// Whether `name` transitively extends `ancestor`.
    pub fn extends(&self, name: &str, ancestor: &str) -> Result<bool> {
        let target = self.lookup(ancestor)?;
        let id = self.lookup(name)?;
        Ok(self.walk(id).into_iter().skip(1).any(|n| n == target))
    }

    /// Flattened coordinates of `name` and everything it extends.
    ///
    /// Order is depth-first (own coordinates, then each parent in edge order);
    /// repeated coordinates keep their first position.
    pub fn effective_coordinates(&self, name: &str) -> Result<Vec<Coordinate>> {
        let mut seen = HashSet::new();
        Ok(self
            .effective_artifacts(name)?
            .into_iter()
            .map(|a| a.coordinate)
            .filter(|c| seen.insert(c.clone()))
            .collect())
    }

    /// Like [`effective_coordinates`](Self::effective_coordinates), keeping
    /// the packaging each coordinate is requested in.
    pub fn effective_artifacts(&self, name: &str) -> Result<Vec<Artifact>> {
        let id = self.lookup(name)?;
        let mut seen = HashSet::new();
        let mut artifacts = Vec::new();
        for node_id in self.walk(id) {
            let node = &self.nodes[node_id.0];
            for coordinate in &node.coordinates {
                let artifact = Artifact {
                    coordinate: coordinate.clone(),
                    packaging: node.packaging,
                };
                if seen.insert(artifact.clone()) {
                    artifacts.push(artifact);
                }
            }
        }
        Ok(artifacts)
    }

    /// Serializable summaries of every node, in creation order.
    pub fn summaries(&self) -> Vec<NodeSummary> {
        self.nodes
            .iter()
            .map(|n| NodeSummary {
                name: n.name.clone(),
                root: n.root,
                scope: n.scope,
                resolvable: n.resolvable,
                visible: n.visible,
                extends: n
                    .extends
                    .iter()
                    .map(|p| self.nodes[p.0].name.clone())
                    .collect(),
                coordinates: n.coordinates.clone(),
            })
            .collect()
    }

    fn lookup(&self, name: &str) -> Result<NodeId> {
        self.index.get(name).copied().ok_or_else(|| Error::Configuration {
            message: format!("unknown classpath node '{}'", name),
            hint: Some(format!(
                "Known nodes: {}",
                self.nodes
                    .iter()
                    .map(|n| n.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        })
    }

    /// Depth-first pre-order from `start`, each node once, `start` first.
    fn walk(&self, start: NodeId) -> Vec<NodeId> {
        fn visit(
            graph: &ClasspathGraph,
            id: NodeId,
            seen: &mut HashSet<NodeId>,
            out: &mut Vec<NodeId>,
        ) {
            if !seen.insert(id) {
                return;
            }
            out.push(id);
            for parent in &graph.nodes[id.0].extends {
                visit(graph, *parent, seen, out);
            }
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        visit(self, start, &mut seen, &mut out);
        out
    }

    fn add_node(&mut self, node: ClasspathNode) -> Result<NodeId> {
        if self.index.contains_key(&node.name) {
            return Err(Error::configuration(format!(
                "classpath node '{}' already exists",
                node.name
            )));
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        Ok(id)
    }

    fn add_edge(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        if parent.0 >= child.0 {
            return Err(Error::configuration(format!(
                "classpath node '{}' cannot extend '{}', which was not created before it",
                self.nodes[child.0].name, self.nodes[parent.0].name
            )));
        }
        let edges = &mut self.nodes[child.0].extends;
        if !edges.contains(&parent) {
            edges.push(parent);
        }
        Ok(())
    }

    fn hidden_id(&self, hidden: HiddenNode) -> Result<NodeId> {
        self.lookup(hidden.node_name())
    }
}

/// Builds the graph once and populates its hidden nodes once.
#[derive(Debug, Default)]
pub struct ClasspathGraphBuilder {
    graph: Option<ClasspathGraph>,
}

impl ClasspathGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the nodes and edges for `roots`.
    ///
    /// `roots` must contain each of `main`, `unitTest` and `integrationTest`
    /// exactly once.
    pub fn build(&mut self, roots: &[SourceRoot]) -> Result<&ClasspathGraph> {
        if self.graph.is_some() {
            return Err(Error::configuration("classpath graph has already been built"));
        }
        for name in SourceRootName::ALL {
            let count = roots.iter().filter(|r| r.name == name).count();
            if count != 1 {
                return Err(Error::configuration(format!(
                    "expected exactly one '{}' source root, found {}",
                    name, count
                )));
            }
        }

        let mut graph = ClasspathGraph::default();
        for hidden in HiddenNode::ALL {
            graph.add_node(ClasspathNode {
                name: hidden.node_name().to_string(),
                description: hidden.description().to_string(),
                root: None,
                scope: None,
                resolvable: false,
                visible: false,
                packaging: hidden.packaging(),
                extends: Vec::new(),
                coordinates: Vec::new(),
            })?;
        }

        let mut compile_ids = BTreeMap::new();
        for root in SourceRootName::ALL {
            let compile = graph.add_node(root_node(root, Scope::Compile))?;
            let runtime = graph.add_node(root_node(root, Scope::Runtime))?;
            graph.add_edge(runtime, compile)?;
            compile_ids.insert(root, compile);

            match root {
                SourceRootName::Main => {
                    graph.add_edge(compile, graph.hidden_id(HiddenNode::CoreLibraries)?)?;
                    graph.add_edge(compile, graph.hidden_id(HiddenNode::PluginLibraries)?)?;
                }
                SourceRootName::UnitTest => {
                    graph.add_edge(compile, compile_ids[&SourceRootName::Main])?;
                    graph.add_edge(compile, graph.hidden_id(HiddenNode::TestLibraries)?)?;
                }
                SourceRootName::IntegrationTest => {
                    graph.add_edge(compile, compile_ids[&SourceRootName::Main])?;
                    graph.add_edge(compile, compile_ids[&SourceRootName::UnitTest])?;
                    graph.add_edge(compile, graph.hidden_id(HiddenNode::TestLibraries)?)?;
                    graph.add_edge(runtime, graph.hidden_id(HiddenNode::PluginBinaries)?)?;
                }
            }
        }

        debug!("Built classpath graph with {} nodes", graph.len());
        Ok(self.graph.insert(graph))
    }

    /// Fill the hidden nodes from the resolver output.
    pub fn populate(&mut self, resolved: &ResolvedDependencies) -> Result<()> {
        let graph = self.graph.as_mut().ok_or_else(|| {
            Error::configuration("classpath graph populated before it was built")
        })?;
        if graph.populated {
            return Err(Error::configuration(
                "classpath graph hidden nodes have already been populated",
            ));
        }

        for hidden in HiddenNode::ALL {
            let coordinates = match hidden {
                HiddenNode::PluginBinaries | HiddenNode::PluginLibraries => resolved.plugins(),
                HiddenNode::CoreLibraries => resolved.core_libraries(),
                HiddenNode::TestLibraries => resolved.test_libraries(),
            };
            let id = graph.hidden_id(hidden)?;
            graph.nodes[id.0].coordinates = coordinates.to_vec();
        }
        graph.populated = true;
        info!(
            "Populated hidden classpath nodes with {} coordinates",
            resolved.all().count()
        );
        Ok(())
    }

    /// The graph, once built.
    pub fn graph(&self) -> Option<&ClasspathGraph> {
        self.graph.as_ref()
    }

    /// Give up the builder and keep the graph.
    pub fn into_graph(self) -> Result<ClasspathGraph> {
        self.graph
            .ok_or_else(|| Error::configuration("classpath graph has not been built"))
    }
}

fn root_node(root: SourceRootName, scope: Scope) -> ClasspathNode {
    let (name, description) = match scope {
        Scope::Compile => (
            compile_node_name(root),
            format!("Compile classpath for the {} source root", root),
        ),
        Scope::Runtime => (
            runtime_node_name(root),
            format!("Runtime classpath for the {} source root", root),
        ),
    };
    ClasspathNode {
        name,
        description,
        root: Some(root),
        scope: Some(scope),
        resolvable: true,
        visible: true,
        packaging: Packaging::Jar,
        extends: Vec::new(),
        coordinates: Vec::new(),
    }
}
