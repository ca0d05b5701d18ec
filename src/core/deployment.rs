use serde::{Deserialize, Serialize};

use crate::compute::LoadBalancedService;
use crate::error::{Error, Result};
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::network::TargetGroup;
use crate::spec::TopologySpec;

/// Binds the service to its blue/green target-group pair and the
/// listener that switches between them.
///
/// Blue is always the target group the service itself produced; green
/// must be a separately declared group. The external deployment service
/// shifts the listener between the two during cutover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentGroup {
    pub logical_id: String,
    pub service: String,
    pub blue_target_group: String,
    pub green_target_group: String,
    pub listener: String,
}

impl DeploymentGroup {
    pub fn declare(
        graph: &mut ResourceGraph,
        spec: &TopologySpec,
        service: &LoadBalancedService,
        green: &TargetGroup,
    ) -> Result<Self> {
        let blue = &service.target_group;
        if green.logical_id == blue.logical_id {
            return Err(Error::deployment_target_group_conflict(
                blue.logical_id.clone(),
                green.logical_id.clone(),
            ));
        }
        if service.listener.default_target_group != blue.logical_id {
            return Err(Error::deployment_missing_listener(
                service.logical_id.clone(),
            ));
        }

        let logical_id = naming::logical_id(&[&spec.name, "blue-green-group"]);
        graph.declare(
            ResourceKind::DeploymentGroup,
            logical_id.clone(),
            &[
                service.logical_id.as_str(),
                blue.logical_id.as_str(),
                green.logical_id.as_str(),
                service.listener.logical_id.as_str(),
            ],
        )?;

        Ok(Self {
            logical_id,
            service: service.logical_id.clone(),
            blue_target_group: blue.logical_id.clone(),
            green_target_group: green.logical_id.clone(),
            listener: service.listener.logical_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Cluster;
    use crate::env::SynthEnvironment;
    use crate::network::NetworkBoundary;
    use crate::registry::ImageRegistry;

    struct Composed {
        graph: ResourceGraph,
        spec: TopologySpec,
        network: NetworkBoundary,
        service: LoadBalancedService,
    }

    fn compose() -> Composed {
        let spec = TopologySpec::default();
        let env = SynthEnvironment::default();
        let mut graph = ResourceGraph::new();
        let network = NetworkBoundary::declare(&mut graph, &spec).unwrap();
        let cluster = Cluster::declare(&mut graph, &spec, &network).unwrap();
        let registry = ImageRegistry::declare(&mut graph, &spec, &env).unwrap();
        let service =
            LoadBalancedService::declare(&mut graph, &spec, &env, &network, &cluster, &registry)
                .unwrap();
        Composed {
            graph,
            spec,
            network,
            service,
        }
    }

    #[test]
    fn binds_blue_to_service_target_group_and_green_to_secondary() {
        let mut c = compose();
        let green = TargetGroup::declare(
            &mut c.graph,
            &[&c.spec.name, "green-target-group"],
            &c.spec.green_target_group_name,
            c.spec.container_port,
            &c.network,
        )
        .unwrap();

        let group = DeploymentGroup::declare(&mut c.graph, &c.spec, &c.service, &green).unwrap();

        assert_eq!(group.blue_target_group, c.service.target_group.logical_id);
        assert_eq!(group.green_target_group, green.logical_id);
        assert_ne!(group.blue_target_group, group.green_target_group);
        assert_eq!(group.listener, c.service.listener.logical_id);
    }

    #[test]
    fn same_target_group_for_blue_and_green_rejected() {
        let mut c = compose();
        let blue_copy = c.service.target_group.clone();

        let err =
            DeploymentGroup::declare(&mut c.graph, &c.spec, &c.service, &blue_copy).unwrap_err();
        assert_eq!(
            err.code,
            crate::error::ErrorCode::DeploymentTargetGroupConflict
        );
    }
}
