use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::build_project::BuildProject;
use crate::deployment::DeploymentGroup;
use crate::error::{Error, Result};
use crate::graph::{ResourceGraph, ResourceKind};
use crate::naming;
use crate::spec::{RepoSource, TopologySpec};

pub const SOURCE_ARTIFACT: &str = "SourceArtifact";
pub const BUILD_ARTIFACT: &str = "BuildArtifact";

/// The fixed stage sequence of the release pipeline.
pub const RELEASE_STAGE_ORDER: [&str; 3] = ["Source", "Build", "Deploy"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Checks out the watched repository using a stored credential and
    /// emits the source artifact. The credential stays a secret-store
    /// reference; the value is resolved by the pipeline service.
    Source {
        repo: RepoSource,
        token_secret: String,
        output: String,
    },
    /// Runs the build project against the source artifact.
    Build {
        project: String,
        input: String,
        output: String,
    },
    /// Drives the deployment group's blue/green cutover. The build
    /// artifact is consumed twice: once as the application spec template
    /// and once as the task definition template.
    BlueGreenDeploy {
        deployment_group: String,
        app_spec_template: String,
        task_definition_template: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub name: String,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl Action {
    pub fn inputs(&self) -> Vec<&str> {
        match &self.kind {
            ActionKind::Source { .. } => Vec::new(),
            ActionKind::Build { input, .. } => vec![input.as_str()],
            ActionKind::BlueGreenDeploy {
                app_spec_template,
                task_definition_template,
                ..
            } => vec![app_spec_template.as_str(), task_definition_template.as_str()],
        }
    }

    pub fn outputs(&self) -> Vec<&str> {
        match &self.kind {
            ActionKind::Source { output, .. } => vec![output.as_str()],
            ActionKind::Build { output, .. } => vec![output.as_str()],
            ActionKind::BlueGreenDeploy { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

/// Sequential release pipeline. Stages run in declared order; artifacts
/// flow between them by name, wired by the external pipeline engine. A
/// stage failure halts the run at that stage; retry and rollback belong
/// to the external services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub logical_id: String,
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Assemble the standard Source -> Build -> Deploy release pipeline.
    pub fn release(
        graph: &mut ResourceGraph,
        spec: &TopologySpec,
        build_project: &BuildProject,
        deployment_group: &DeploymentGroup,
    ) -> Result<Self> {
        let stages = vec![
            Stage {
                name: "Source".to_string(),
                actions: vec![Action {
                    name: "AppCheckout".to_string(),
                    kind: ActionKind::Source {
                        repo: spec.pipeline_source.clone(),
                        token_secret: spec.token_secret.clone(),
                        output: SOURCE_ARTIFACT.to_string(),
                    },
                }],
            },
            Stage {
                name: "Build".to_string(),
                actions: vec![Action {
                    name: "ImageBuildPush".to_string(),
                    kind: ActionKind::Build {
                        project: build_project.logical_id.clone(),
                        input: SOURCE_ARTIFACT.to_string(),
                        output: BUILD_ARTIFACT.to_string(),
                    },
                }],
            },
            Stage {
                name: "Deploy".to_string(),
                actions: vec![Action {
                    name: "BlueGreenCutover".to_string(),
                    kind: ActionKind::BlueGreenDeploy {
                        deployment_group: deployment_group.logical_id.clone(),
                        app_spec_template: BUILD_ARTIFACT.to_string(),
                        task_definition_template: BUILD_ARTIFACT.to_string(),
                    },
                }],
            },
        ];

        let pipeline = Self {
            logical_id: naming::logical_id(&[&spec.name, "release-pipeline"]),
            name: format!("{}-release", spec.name),
            stages,
        };
        pipeline.validate("pipeline.stages")?;
        pipeline.validate_release_order()?;

        graph.declare(
            ResourceKind::Pipeline,
            pipeline.logical_id.clone(),
            &[
                build_project.logical_id.as_str(),
                deployment_group.logical_id.as_str(),
            ],
        )?;

        Ok(pipeline)
    }

    /// Structural validation: at least one stage, no duplicate artifact
    /// outputs, and every input resolved by a strictly earlier stage.
    /// A forward or same-stage reference is a broken topology and fails
    /// here rather than at deploy time.
    pub fn validate(&self, field: &str) -> Result<()> {
        if self.stages.is_empty() {
            return Err(Error::pipeline_empty(field));
        }

        let mut produced: HashSet<String> = HashSet::new();

        for stage in &self.stages {
            // Inputs resolve against earlier stages only, so check them
            // before admitting this stage's outputs.
            for action in &stage.actions {
                for input in action.inputs() {
                    if !produced.contains(input) {
                        return Err(Error::pipeline_artifact_unresolved(
                            input,
                            stage.name.clone(),
                            action.name.clone(),
                        ));
                    }
                }
            }

            for action in &stage.actions {
                for output in action.outputs() {
                    if !produced.insert(output.to_string()) {
                        return Err(Error::pipeline_duplicate_artifact(
                            output,
                            stage.name.clone(),
                            action.name.clone(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// The release pipeline's stage order is fixed; any other sequence
    /// is rejected.
    pub fn validate_release_order(&self) -> Result<()> {
        let found: Vec<&str> = self.stages.iter().map(|s| s.name.as_str()).collect();
        if found != RELEASE_STAGE_ORDER {
            return Err(Error::pipeline_stage_order(
                RELEASE_STAGE_ORDER.iter().map(|s| s.to_string()).collect(),
                found.iter().map(|s| s.to_string()).collect(),
            ));
        }
        Ok(())
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Cluster, LoadBalancedService};
    use crate::env::SynthEnvironment;
    use crate::network::{NetworkBoundary, TargetGroup};
    use crate::registry::ImageRegistry;

    fn release_pipeline() -> Pipeline {
        let spec = TopologySpec::default();
        let env = SynthEnvironment::default();
        let mut graph = ResourceGraph::new();
        let network = NetworkBoundary::declare(&mut graph, &spec).unwrap();
        let cluster = Cluster::declare(&mut graph, &spec, &network).unwrap();
        let registry = ImageRegistry::declare(&mut graph, &spec, &env).unwrap();
        let service =
            LoadBalancedService::declare(&mut graph, &spec, &env, &network, &cluster, &registry)
                .unwrap();
        let green = TargetGroup::declare(
            &mut graph,
            &[&spec.name, "green-target-group"],
            &spec.green_target_group_name,
            spec.container_port,
            &network,
        )
        .unwrap();
        let build = BuildProject::declare(&mut graph, &spec, &env, &registry, &service).unwrap();
        let group = DeploymentGroup::declare(&mut graph, &spec, &service, &green).unwrap();
        Pipeline::release(&mut graph, &spec, &build, &group).unwrap()
    }

    fn source_stage() -> Stage {
        Stage {
            name: "Source".to_string(),
            actions: vec![Action {
                name: "AppCheckout".to_string(),
                kind: ActionKind::Source {
                    repo: TopologySpec::default().pipeline_source,
                    token_secret: "github_token1".to_string(),
                    output: SOURCE_ARTIFACT.to_string(),
                },
            }],
        }
    }

    fn build_stage(input: &str) -> Stage {
        Stage {
            name: "Build".to_string(),
            actions: vec![Action {
                name: "ImageBuildPush".to_string(),
                kind: ActionKind::Build {
                    project: "Build".to_string(),
                    input: input.to_string(),
                    output: BUILD_ARTIFACT.to_string(),
                },
            }],
        }
    }

    #[test]
    fn release_pipeline_has_fixed_stage_order() {
        let pipeline = release_pipeline();
        assert_eq!(pipeline.stage_names(), vec!["Source", "Build", "Deploy"]);
        assert!(pipeline.validate_release_order().is_ok());
    }

    #[test]
    fn reordered_stages_rejected() {
        let mut pipeline = release_pipeline();
        pipeline.stages.swap(0, 1);
        let err = pipeline.validate_release_order().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PipelineStageOrder);
    }

    #[test]
    fn deploy_consumes_build_artifact_twice() {
        let pipeline = release_pipeline();
        let deploy = &pipeline.stages[2].actions[0];
        assert_eq!(deploy.inputs(), vec![BUILD_ARTIFACT, BUILD_ARTIFACT]);
    }

    #[test]
    fn empty_pipeline_rejected() {
        let pipeline = Pipeline {
            logical_id: "P".to_string(),
            name: "p".to_string(),
            stages: Vec::new(),
        };
        let err = pipeline.validate("pipeline.stages").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PipelineEmpty);
    }

    #[test]
    fn unknown_input_artifact_rejected() {
        let pipeline = Pipeline {
            logical_id: "P".to_string(),
            name: "p".to_string(),
            stages: vec![source_stage(), build_stage("MissingArtifact")],
        };
        let err = pipeline.validate("pipeline.stages").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PipelineArtifactUnresolved);
    }

    #[test]
    fn same_stage_artifact_reference_rejected() {
        // An action consuming an artifact produced inside its own stage:
        // inputs resolve against strictly earlier stages only.
        let stage = Stage {
            name: "Build".to_string(),
            actions: vec![
                Action {
                    name: "Producer".to_string(),
                    kind: ActionKind::Build {
                        project: "Build".to_string(),
                        input: SOURCE_ARTIFACT.to_string(),
                        output: BUILD_ARTIFACT.to_string(),
                    },
                },
                Action {
                    name: "Consumer".to_string(),
                    kind: ActionKind::Build {
                        project: "Build".to_string(),
                        input: BUILD_ARTIFACT.to_string(),
                        output: "RepackagedArtifact".to_string(),
                    },
                },
            ],
        };
        let pipeline = Pipeline {
            logical_id: "P".to_string(),
            name: "p".to_string(),
            stages: vec![source_stage(), stage],
        };
        let err = pipeline.validate("pipeline.stages").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PipelineArtifactUnresolved);
    }

    #[test]
    fn duplicate_artifact_output_rejected() {
        let pipeline = Pipeline {
            logical_id: "P".to_string(),
            name: "p".to_string(),
            stages: vec![source_stage(), build_stage(SOURCE_ARTIFACT), {
                let mut extra = build_stage(SOURCE_ARTIFACT);
                extra.name = "BuildAgain".to_string();
                extra
            }],
        };
        let err = pipeline.validate("pipeline.stages").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PipelineDuplicateArtifact);
    }
}
