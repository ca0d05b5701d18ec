use serde::{Deserialize, Serialize};

use crate::build_project::BuildProject;
use crate::compute::{Cluster, LoadBalancedService};
use crate::deployment::DeploymentGroup;
use crate::env::SynthEnvironment;
use crate::error::Result;
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::network::{NetworkBoundary, TargetGroup};
use crate::pipeline::Pipeline;
use crate::registry::ImageRegistry;
use crate::spec::TopologySpec;

pub const PUBLIC_ENDPOINT_OUTPUT: &str = "publicEndpoint";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputValue {
    pub name: String,
    pub value: String,
}

/// A fully composed topology: every resource, the declared graph, the
/// warnings collected along the way, and the published outputs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    pub name: String,
    pub network: NetworkBoundary,
    pub cluster: Cluster,
    pub registry: ImageRegistry,
    pub service: LoadBalancedService,
    pub green_target_group: TargetGroup,
    pub build_project: BuildProject,
    pub deployment_group: DeploymentGroup,
    pub pipeline: Pipeline,
    pub outputs: Vec<OutputValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub graph: ResourceGraph,
}

/// Single composition pass over the spec.
///
/// The wiring runs in strict dependency order: network, cluster,
/// registry, service (which brings its load balancer, blue target
/// group, listener, and task definition), green target group, build
/// project, deployment group, pipeline, output. Each step takes the
/// resources it reads by reference, and the graph re-checks every edge,
/// so an out-of-order rearrangement cannot compose.
pub fn compose(spec: &TopologySpec, env: &SynthEnvironment) -> Result<Topology> {
    spec.validate()?;

    let mut graph = ResourceGraph::new();
    let mut warnings = Vec::new();

    let network = NetworkBoundary::declare(&mut graph, spec)?;
    let cluster = Cluster::declare(&mut graph, spec, &network)?;
    let registry = ImageRegistry::declare(&mut graph, spec, env)?;
    let service =
        LoadBalancedService::declare(&mut graph, spec, env, &network, &cluster, &registry)?;

    let green_target_group = TargetGroup::declare(
        &mut graph,
        &[&spec.name, "green-target-group"],
        &spec.green_target_group_name,
        spec.container_port,
        &network,
    )?;

    let build_project = BuildProject::declare(&mut graph, spec, env, &registry, &service)?;
    let deployment_group = DeploymentGroup::declare(&mut graph, spec, &service, &green_target_group)?;
    let pipeline = Pipeline::release(&mut graph, spec, &build_project, &deployment_group)?;

    if let Some(warning) = spec.source_mismatch_warning() {
        warnings.push(warning);
    }

    let output = OutputValue {
        name: PUBLIC_ENDPOINT_OUTPUT.to_string(),
        value: service.public_endpoint(),
    };
    graph.declare(
        ResourceKind::Output,
        naming::logical_id(&[&spec.name, "public-endpoint"]),
        &[service.logical_id.as_str()],
    )?;

    Ok(Topology {
        name: spec.name.clone(),
        network,
        cluster,
        registry,
        service,
        green_target_group,
        build_project,
        deployment_group,
        pipeline,
        outputs: vec![output],
        warnings,
        graph,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_project::REQUIRED_ENV_KEYS;

    fn env() -> SynthEnvironment {
        SynthEnvironment::new(Some("123456789012".into()), Some("us-east-1".into()))
    }

    #[test]
    fn compose_builds_the_full_graph_in_order() {
        let topology = compose(&TopologySpec::default(), &env()).unwrap();
        let graph = &topology.graph;

        let order: Vec<&str> = graph
            .construction_order()
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        // Network first, service after cluster and registry, build
        // project after the service, pipeline last before the output.
        assert_eq!(order.first(), Some(&topology.network.logical_id.as_str()));
        assert!(graph.declared_before(&topology.cluster.logical_id, &topology.service.logical_id));
        assert!(graph.declared_before(&topology.registry.logical_id, &topology.service.logical_id));
        assert!(graph.declared_before(
            &topology.service.logical_id,
            &topology.build_project.logical_id
        ));
        assert!(graph.declared_before(
            &topology.deployment_group.logical_id,
            &topology.pipeline.logical_id
        ));
    }

    #[test]
    fn blue_is_the_service_target_group_and_green_is_independent() {
        let topology = compose(&TopologySpec::default(), &env()).unwrap();
        assert_eq!(
            topology.deployment_group.blue_target_group,
            topology.service.target_group.logical_id
        );
        assert_eq!(
            topology.deployment_group.green_target_group,
            topology.green_target_group.logical_id
        );
        assert_ne!(
            topology.deployment_group.blue_target_group,
            topology.deployment_group.green_target_group
        );
    }

    #[test]
    fn build_environment_is_complete_after_composition() {
        let topology = compose(&TopologySpec::default(), &env()).unwrap();
        for key in REQUIRED_ENV_KEYS {
            assert!(topology.build_project.env_value(key).is_some());
        }
    }

    #[test]
    fn public_endpoint_is_http_plus_dns_exactly() {
        let topology = compose(&TopologySpec::default(), &env()).unwrap();
        assert_eq!(topology.outputs.len(), 1);
        let output = &topology.outputs[0];
        assert_eq!(output.name, PUBLIC_ENDPOINT_OUTPUT);
        assert_eq!(
            output.value,
            format!("http://{}", topology.service.load_balancer.dns_name)
        );
    }

    #[test]
    fn missing_environment_composes_with_empty_strings() {
        let topology = compose(&TopologySpec::default(), &SynthEnvironment::default()).unwrap();
        assert_eq!(topology.build_project.env_value("AWS_ACCOUNT_ID"), Some(""));
        assert_eq!(topology.build_project.env_value("REGION"), Some(""));
    }

    #[test]
    fn default_spec_warns_about_source_mismatch() {
        let topology = compose(&TopologySpec::default(), &env()).unwrap();
        assert_eq!(topology.warnings.len(), 1);
    }

    #[test]
    fn aligned_sources_compose_without_warnings() {
        let mut spec = TopologySpec::default();
        spec.pipeline_source = spec.build_source.clone();
        let topology = compose(&spec, &env()).unwrap();
        assert!(topology.warnings.is_empty());
    }

    #[test]
    fn composition_is_deterministic() {
        let a = compose(&TopologySpec::default(), &env()).unwrap();
        let b = compose(&TopologySpec::default(), &env()).unwrap();
        assert_eq!(
            serde_json::to_string(&a.outputs).unwrap(),
            serde_json::to_string(&b.outputs).unwrap()
        );
        assert_eq!(
            a.service.load_balancer.dns_name,
            b.service.load_balancer.dns_name
        );
    }
}
