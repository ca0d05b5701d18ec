use clap::Args;
use serde::Serialize;

use super::{CmdResult, SpecArgs};

#[derive(Args)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRow {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
}

#[derive(Serialize)]
pub struct StageRow {
    pub name: String,
    pub actions: Vec<ActionRow>,
}

#[derive(Serialize)]
pub struct PipelineOutput {
    pub command: String,
    pub pipeline: String,
    pub stages: Vec<StageRow>,
    pub artifacts: Vec<String>,
}

/// Show the stage/action/artifact wiring of the release pipeline.
pub fn run(args: PipelineArgs) -> CmdResult<PipelineOutput> {
    let (topology, _env) = args.spec.compose()?;
    let pipeline = &topology.pipeline;

    let mut artifacts: Vec<String> = Vec::new();
    let stages = pipeline
        .stages
        .iter()
        .map(|stage| StageRow {
            name: stage.name.clone(),
            actions: stage
                .actions
                .iter()
                .map(|action| {
                    for output in action.outputs() {
                        artifacts.push(output.to_string());
                    }
                    ActionRow {
                        name: action.name.clone(),
                        inputs: action.inputs().iter().map(|s| s.to_string()).collect(),
                        outputs: action.outputs().iter().map(|s| s.to_string()).collect(),
                    }
                })
                .collect(),
        })
        .collect();

    Ok((
        PipelineOutput {
            command: "pipeline.show".to_string(),
            pipeline: pipeline.name.clone(),
            stages,
            artifacts,
        },
        0,
    ))
}
