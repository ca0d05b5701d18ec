use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::spec::TopologySpec;

/// Isolated virtual network for the whole topology.
///
/// Zone count stays low (default 1) so a throwaway environment does not
/// exhaust per-zone resource quotas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkBoundary {
    pub logical_id: String,
    pub zones: u8,
}

impl NetworkBoundary {
    pub fn declare(graph: &mut ResourceGraph, spec: &TopologySpec) -> Result<Self> {
        let logical_id = naming::logical_id(&[&spec.name, "network"]);
        graph.declare(ResourceKind::Network, logical_id.clone(), &[])?;

        Ok(Self {
            logical_id,
            zones: spec.zones,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Targets are registered by IP address; required for services whose
    /// tasks get their own network interface.
    Ip,
    Instance,
}

/// Named set of routable backends behind a load-balancer listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
    pub logical_id: String,
    pub name: String,
    pub target_type: TargetType,
    pub port: u16,
    pub network: String,
}

impl TargetGroup {
    /// Declare a standalone target group in the given network. The
    /// service's primary target group uses this too, via its own path.
    pub fn declare(
        graph: &mut ResourceGraph,
        path: &[&str],
        name: &str,
        port: u16,
        network: &NetworkBoundary,
    ) -> Result<Self> {
        naming::validate_target_group_name("targetGroup.name", name)?;

        let logical_id = naming::logical_id(path);
        graph.declare(
            ResourceKind::TargetGroup,
            logical_id.clone(),
            &[network.logical_id.as_str()],
        )?;

        Ok(Self {
            logical_id,
            name: name.to_string(),
            target_type: TargetType::Ip,
            port,
            network: network.logical_id.clone(),
        })
    }
}

/// Listener created alongside the service's load balancer. The
/// deployment group flips it between the blue and green target groups
/// during cutover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub logical_id: String,
    pub port: u16,
    pub default_target_group: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_declares_with_no_dependencies() {
        let mut graph = ResourceGraph::new();
        let network = NetworkBoundary::declare(&mut graph, &TopologySpec::default()).unwrap();

        assert_eq!(network.zones, 1);
        let node = graph.get(&network.logical_id).unwrap();
        assert!(node.depends_on.is_empty());
    }

    #[test]
    fn target_group_depends_on_network() {
        let mut graph = ResourceGraph::new();
        let spec = TopologySpec::default();
        let network = NetworkBoundary::declare(&mut graph, &spec).unwrap();
        let tg = TargetGroup::declare(
            &mut graph,
            &[&spec.name, "green-target-group"],
            &spec.green_target_group_name,
            spec.container_port,
            &network,
        )
        .unwrap();

        assert_eq!(tg.target_type, TargetType::Ip);
        assert_eq!(tg.network, network.logical_id);
        let node = graph.get(&tg.logical_id).unwrap();
        assert_eq!(node.depends_on, vec![network.logical_id]);
    }

    #[test]
    fn target_group_rejects_invalid_name() {
        let mut graph = ResourceGraph::new();
        let spec = TopologySpec::default();
        let network = NetworkBoundary::declare(&mut graph, &spec).unwrap();

        let err = TargetGroup::declare(&mut graph, &["x", "tg"], "bad_name", 80, &network)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NamingInvalidName);
    }
}
