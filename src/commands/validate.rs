use clap::Args;
use serde::Serialize;

use super::{CmdResult, SpecArgs};

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Serialize)]
pub struct ValidateOutput {
    pub command: String,
    pub name: String,
    pub valid: bool,
    pub resources: usize,
    pub stages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Compose the topology and report the result. Composition failures
/// surface through the error envelope with their own exit codes; a
/// success here means every cross-reference resolved.
pub fn run(args: ValidateArgs) -> CmdResult<ValidateOutput> {
    let (topology, _env) = args.spec.compose()?;

    Ok((
        ValidateOutput {
            command: "validate.run".to_string(),
            name: topology.name.clone(),
            valid: true,
            resources: topology.graph.len(),
            stages: topology
                .pipeline
                .stage_names()
                .into_iter()
                .map(String::from)
                .collect(),
            warnings: topology.warnings,
        },
        0,
    ))
}
