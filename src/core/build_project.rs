use serde::{Deserialize, Serialize};

use crate::compute::LoadBalancedService;
use crate::env::SynthEnvironment;
use crate::error::Result;
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::registry::ImageRegistry;
use crate::spec::TopologySpec;

/// Environment variable names handed to the build specification. The
/// names are a compatibility contract with the externally authored
/// buildspec and must not change.
pub const ENV_ACCOUNT_ID: &str = "AWS_ACCOUNT_ID";
pub const ENV_REGION: &str = "REGION";
pub const ENV_IMAGE_TAG: &str = "IMAGE_TAG";
pub const ENV_IMAGE_REPO_NAME: &str = "IMAGE_REPO_NAME";
pub const ENV_REPOSITORY_URI: &str = "REPOSITORY_URI";
pub const ENV_TASK_DEFINITION_ARN: &str = "TASK_DEFINITION_ARN";
pub const ENV_TASK_ROLE_ARN: &str = "TASK_ROLE_ARN";
pub const ENV_EXECUTION_ROLE_ARN: &str = "EXECUTION_ROLE_ARN";

pub const REQUIRED_ENV_KEYS: [&str; 8] = [
    ENV_ACCOUNT_ID,
    ENV_REGION,
    ENV_IMAGE_TAG,
    ENV_IMAGE_REPO_NAME,
    ENV_REPOSITORY_URI,
    ENV_TASK_DEFINITION_ARN,
    ENV_TASK_ROLE_ARN,
    ENV_EXECUTION_ROLE_ARN,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Managed build job that produces and pushes the service image.
///
/// Parameterized with identifiers that only exist once the service has
/// been constructed (task definition and role ARNs), which is why it is
/// declared after the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProject {
    pub logical_id: String,
    pub build_spec_path: String,
    pub source: crate::spec::RepoSource,
    /// Image builds need the privileged container runtime.
    pub privileged: bool,
    pub environment: Vec<EnvVar>,
}

impl BuildProject {
    pub fn declare(
        graph: &mut ResourceGraph,
        spec: &TopologySpec,
        env: &SynthEnvironment,
        registry: &ImageRegistry,
        service: &LoadBalancedService,
    ) -> Result<Self> {
        let logical_id = naming::logical_id(&[&spec.name, "image-build"]);
        graph.declare(
            ResourceKind::BuildProject,
            logical_id.clone(),
            &[registry.logical_id.as_str(), service.logical_id.as_str()],
        )?;

        let td = &service.task_definition;
        let environment = vec![
            env_var(ENV_ACCOUNT_ID, &env.account),
            env_var(ENV_REGION, &env.region),
            env_var(ENV_IMAGE_TAG, &spec.image_tag),
            env_var(ENV_IMAGE_REPO_NAME, &registry.name),
            env_var(ENV_REPOSITORY_URI, &registry.uri),
            env_var(ENV_TASK_DEFINITION_ARN, &td.arn),
            env_var(ENV_TASK_ROLE_ARN, &td.task_role_arn),
            env_var(ENV_EXECUTION_ROLE_ARN, &td.execution_role_arn),
        ];

        Ok(Self {
            logical_id,
            build_spec_path: spec.build_spec_path.clone(),
            source: spec.build_source.clone(),
            privileged: spec.privileged_build,
            environment,
        })
    }

    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.environment
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: value.to_string(),
    }
}
