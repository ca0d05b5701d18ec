use serde::{Deserialize, Serialize};

use crate::env::SynthEnvironment;
use crate::error::Result;
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::network::{Listener, NetworkBoundary, TargetGroup};
use crate::registry::ImageRegistry;
use crate::spec::TopologySpec;

/// Container orchestration cluster bound to the network boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub logical_id: String,
    pub network: String,
}

impl Cluster {
    pub fn declare(
        graph: &mut ResourceGraph,
        spec: &TopologySpec,
        network: &NetworkBoundary,
    ) -> Result<Self> {
        let logical_id = naming::logical_id(&[&spec.name, "cluster"]);
        graph.declare(
            ResourceKind::Cluster,
            logical_id.clone(),
            &[network.logical_id.as_str()],
        )?;

        Ok(Self {
            logical_id,
            network: network.logical_id.clone(),
        })
    }
}

/// How service revisions are rolled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentController {
    /// Traffic-shifting blue/green cutover driven by the external
    /// deployment service instead of the orchestrator's rolling update.
    BlueGreen,
    Rolling,
}

/// Task definition synthesized alongside the service. The role
/// identifiers here are what the build stage needs to render new task
/// definition revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub logical_id: String,
    pub family: String,
    pub arn: String,
    pub task_role_arn: String,
    pub execution_role_arn: String,
}

impl TaskDefinition {
    fn synthesize(path: &[&str], env: &SynthEnvironment) -> Self {
        let logical_id = naming::logical_id(path);
        let family = format!("{}-{}", path.join("-"), naming::unique_suffix(path));

        Self {
            logical_id,
            arn: format!(
                "arn:aws:ecs:{}:{}:task-definition/{}",
                env.region, env.account, family
            ),
            task_role_arn: format!("arn:aws:iam::{}:role/{}-task", env.account, family),
            execution_role_arn: format!("arn:aws:iam::{}:role/{}-execution", env.account, family),
            family,
        }
    }
}

/// Load balancer fronting the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub logical_id: String,
    pub name: String,
    pub dns_name: String,
}

impl LoadBalancer {
    fn synthesize(path: &[&str], env: &SynthEnvironment) -> Self {
        let logical_id = naming::logical_id(path);
        let name = format!("{}-{}", path.join("-"), naming::unique_suffix(path));
        let region_segment = if env.region.is_empty() {
            String::new()
        } else {
            format!("{}.", env.region)
        };

        Self {
            logical_id,
            dns_name: format!("{}.{}elb.amazonaws.com", name, region_segment),
            name,
        }
    }
}

/// Load-balanced container service.
///
/// Construction mirrors the managed pattern it describes: creating the
/// service also creates its load balancer, the primary ("blue") target
/// group, the listener, and the task definition, and records all of them
/// in the graph. The deployment controller is blue/green; the
/// orchestrator's native rolling update stays disabled so the external
/// deployment group owns cutover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancedService {
    pub logical_id: String,
    pub cluster: String,
    pub deployment_controller: DeploymentController,
    pub container_port: u16,
    pub image: String,
    pub task_definition: TaskDefinition,
    pub load_balancer: LoadBalancer,
    pub target_group: TargetGroup,
    pub listener: Listener,
}

impl LoadBalancedService {
    pub fn declare(
        graph: &mut ResourceGraph,
        spec: &TopologySpec,
        env: &SynthEnvironment,
        network: &NetworkBoundary,
        cluster: &Cluster,
        registry: &ImageRegistry,
    ) -> Result<Self> {
        let service_path = [spec.name.as_str(), "service"];
        let logical_id = naming::logical_id(&service_path);

        // Side-effect resources, declared before the service so the
        // service node can reference them.
        let blue_name = format!(
            "{}-blue-{}",
            truncate_for_name(&spec.name, 18),
            naming::unique_suffix(&service_path)
        );
        let target_group = TargetGroup::declare(
            graph,
            &[&spec.name, "service", "blue-target-group"],
            &blue_name,
            spec.container_port,
            network,
        )?;

        let task_definition =
            TaskDefinition::synthesize(&[&spec.name, "service", "task-definition"], env);
        graph.declare(
            ResourceKind::TaskDefinition,
            task_definition.logical_id.clone(),
            &[],
        )?;

        let load_balancer =
            LoadBalancer::synthesize(&[&spec.name, "service", "load-balancer"], env);
        graph.declare(
            ResourceKind::LoadBalancer,
            load_balancer.logical_id.clone(),
            &[network.logical_id.as_str()],
        )?;

        let listener = Listener {
            logical_id: naming::logical_id(&[&spec.name, "service", "listener"]),
            port: 80,
            default_target_group: target_group.logical_id.clone(),
        };
        graph.declare(
            ResourceKind::Listener,
            listener.logical_id.clone(),
            &[
                load_balancer.logical_id.as_str(),
                target_group.logical_id.as_str(),
            ],
        )?;

        graph.declare(
            ResourceKind::Service,
            logical_id.clone(),
            &[
                cluster.logical_id.as_str(),
                registry.logical_id.as_str(),
                task_definition.logical_id.as_str(),
                target_group.logical_id.as_str(),
                listener.logical_id.as_str(),
            ],
        )?;

        Ok(Self {
            logical_id,
            cluster: cluster.logical_id.clone(),
            deployment_controller: DeploymentController::BlueGreen,
            container_port: spec.container_port,
            image: registry.image_ref(&spec.image_tag),
            task_definition,
            load_balancer,
            target_group,
            listener,
        })
    }

    /// The externally reachable address, published as the stack output.
    pub fn public_endpoint(&self) -> String {
        format!("http://{}", self.load_balancer.dns_name)
    }
}

fn truncate_for_name(name: &str, max: usize) -> &str {
    match name.char_indices().nth(max) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose_service() -> (ResourceGraph, LoadBalancedService) {
        let spec = TopologySpec::default();
        let env = SynthEnvironment::new(Some("123456789012".into()), Some("us-east-1".into()));
        let mut graph = ResourceGraph::new();
        let network = NetworkBoundary::declare(&mut graph, &spec).unwrap();
        let cluster = Cluster::declare(&mut graph, &spec, &network).unwrap();
        let registry = ImageRegistry::declare(&mut graph, &spec, &env).unwrap();
        let service =
            LoadBalancedService::declare(&mut graph, &spec, &env, &network, &cluster, &registry)
                .unwrap();
        (graph, service)
    }

    #[test]
    fn service_uses_blue_green_controller() {
        let (_, service) = compose_service();
        assert_eq!(
            service.deployment_controller,
            DeploymentController::BlueGreen
        );
    }

    #[test]
    fn service_produces_listener_and_blue_target_group() {
        let (graph, service) = compose_service();
        assert!(graph.contains(&service.target_group.logical_id));
        assert!(graph.contains(&service.listener.logical_id));
        assert_eq!(
            service.listener.default_target_group,
            service.target_group.logical_id
        );
    }

    #[test]
    fn service_image_comes_from_registry() {
        let (_, service) = compose_service();
        assert_eq!(
            service.image,
            "123456789012.dkr.ecr.us-east-1.amazonaws.com/cdk-lb-ecs-service-ecr-repo:latest"
        );
    }

    #[test]
    fn task_definition_arns_embed_account_and_region() {
        let (_, service) = compose_service();
        let td = &service.task_definition;
        assert!(td.arn.starts_with("arn:aws:ecs:us-east-1:123456789012:task-definition/"));
        assert!(td.task_role_arn.starts_with("arn:aws:iam::123456789012:role/"));
        assert!(td.execution_role_arn.ends_with("-execution"));
    }

    #[test]
    fn public_endpoint_prefixes_http() {
        let (_, service) = compose_service();
        let endpoint = service.public_endpoint();
        assert_eq!(
            endpoint,
            format!("http://{}", service.load_balancer.dns_name)
        );
        assert!(!endpoint.ends_with('/'));
    }

    #[test]
    fn empty_region_omits_region_segment() {
        let lb = LoadBalancer::synthesize(&["demo", "lb"], &SynthEnvironment::default());
        assert!(lb.dns_name.ends_with(".elb.amazonaws.com"));
        assert!(!lb.dns_name.contains(".."));
    }
}
