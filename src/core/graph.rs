use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    Cluster,
    Registry,
    Service,
    TargetGroup,
    LoadBalancer,
    Listener,
    TaskDefinition,
    BuildProject,
    DeploymentGroup,
    Pipeline,
    Output,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::Cluster => "cluster",
            ResourceKind::Registry => "registry",
            ResourceKind::Service => "service",
            ResourceKind::TargetGroup => "target_group",
            ResourceKind::LoadBalancer => "load_balancer",
            ResourceKind::Listener => "listener",
            ResourceKind::TaskDefinition => "task_definition",
            ResourceKind::BuildProject => "build_project",
            ResourceKind::DeploymentGroup => "deployment_group",
            ResourceKind::Pipeline => "pipeline",
            ResourceKind::Output => "output",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    pub id: String,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

/// The declared resource graph behind a composed topology.
///
/// Declaration is append-only and order-checked: a resource may only
/// depend on resources that are already in the graph. That makes the
/// required construction order a checked invariant instead of an
/// accident of statement ordering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(
        &mut self,
        kind: ResourceKind,
        id: impl Into<String>,
        depends_on: &[&str],
    ) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(Error::topology_duplicate_resource(id));
        }

        for dep in depends_on {
            if !self.index.contains_key(*dep) {
                return Err(Error::topology_unknown_dependency(id, *dep));
            }
        }

        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(ResourceNode {
            id,
            kind,
            depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
        });
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ResourceNode> {
        self.index.get(id).map(|idx| &self.nodes[*idx])
    }

    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resources in construction order.
    ///
    /// Declaration is append-only and every dependency must already be
    /// present, so declaration order is a topological order by
    /// construction; there is nothing to re-sort and a cycle is
    /// unrepresentable.
    pub fn construction_order(&self) -> Vec<&ResourceNode> {
        self.nodes.iter().collect()
    }

    /// Check that `id` was declared before `other`. Used to assert the
    /// required construction order of composed topologies.
    pub fn declared_before(&self, id: &str, other: &str) -> bool {
        match (self.index.get(id), self.index.get(other)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(ids: &[(&str, &[&str])]) -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        for (id, deps) in ids {
            graph.declare(ResourceKind::Network, *id, deps).unwrap();
        }
        graph
    }

    #[test]
    fn declare_records_nodes_in_order() {
        let graph = graph_with(&[("a", &[]), ("b", &["a"]), ("c", &["a", "b"])]);
        let order: Vec<&str> = graph
            .construction_order()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_dependency_rejected() {
        let mut graph = ResourceGraph::new();
        let err = graph
            .declare(ResourceKind::Cluster, "cluster", &["network"])
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::TopologyUnknownDependency);
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_declaration_rejected() {
        let mut graph = ResourceGraph::new();
        graph.declare(ResourceKind::Network, "net", &[]).unwrap();
        let err = graph
            .declare(ResourceKind::Network, "net", &[])
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::TopologyDuplicateResource);
    }

    #[test]
    fn declared_before_tracks_declaration_order() {
        let graph = graph_with(&[("first", &[]), ("second", &["first"])]);
        assert!(graph.declared_before("first", "second"));
        assert!(!graph.declared_before("second", "first"));
        assert!(!graph.declared_before("first", "missing"));
    }

    #[test]
    fn get_returns_declared_node() {
        let graph = graph_with(&[("net", &[])]);
        let node = graph.get("net").unwrap();
        assert_eq!(node.id, "net");
        assert!(node.depends_on.is_empty());
        assert!(graph.get("other").is_none());
    }
}
