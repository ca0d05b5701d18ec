use serde::{Deserialize, Serialize};

use crate::env::SynthEnvironment;
use crate::error::Result;
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::spec::TopologySpec;

/// Private container image store, referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRegistry {
    pub logical_id: String,
    pub name: String,
    /// Registry endpoint derived from account and region. Account or
    /// region may be empty at synthesis time; the segments stay empty
    /// rather than failing.
    pub uri: String,
}

impl ImageRegistry {
    pub fn declare(
        graph: &mut ResourceGraph,
        spec: &TopologySpec,
        env: &SynthEnvironment,
    ) -> Result<Self> {
        naming::validate_registry_name("registryName", &spec.registry_name)?;

        let logical_id = naming::logical_id(&[&spec.name, "registry"]);
        graph.declare(ResourceKind::Registry, logical_id.clone(), &[])?;

        let uri = format!(
            "{}.dkr.ecr.{}.amazonaws.com/{}",
            env.account, env.region, spec.registry_name
        );

        Ok(Self {
            logical_id,
            name: spec.registry_name.clone(),
            uri,
        })
    }

    /// Full image reference for a tag in this registry.
    pub fn image_ref(&self, tag: &str) -> String {
        format!("{}:{}", self.uri, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> SynthEnvironment {
        SynthEnvironment::new(Some("123456789012".into()), Some("us-east-1".into()))
    }

    #[test]
    fn uri_combines_account_region_and_name() {
        let mut graph = ResourceGraph::new();
        let registry = ImageRegistry::declare(&mut graph, &TopologySpec::default(), &env()).unwrap();
        assert_eq!(
            registry.uri,
            "123456789012.dkr.ecr.us-east-1.amazonaws.com/cdk-lb-ecs-service-ecr-repo"
        );
    }

    #[test]
    fn empty_environment_leaves_empty_segments() {
        let mut graph = ResourceGraph::new();
        let registry = ImageRegistry::declare(
            &mut graph,
            &TopologySpec::default(),
            &SynthEnvironment::default(),
        )
        .unwrap();
        assert_eq!(
            registry.uri,
            ".dkr.ecr..amazonaws.com/cdk-lb-ecs-service-ecr-repo"
        );
    }

    #[test]
    fn image_ref_appends_tag() {
        let mut graph = ResourceGraph::new();
        let registry = ImageRegistry::declare(&mut graph, &TopologySpec::default(), &env()).unwrap();
        assert!(registry.image_ref("latest").ends_with("/cdk-lb-ecs-service-ecr-repo:latest"));
    }
}
