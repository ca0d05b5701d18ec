use clap::Args;
use serde::Serialize;

use cutover::core::build_project::EnvVar;

use super::{CmdResult, SpecArgs};

#[derive(Args)]
pub struct EnvArgs {
    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvOutput {
    pub command: String,
    pub build_project: String,
    pub privileged: bool,
    pub environment: Vec<EnvVar>,
}

/// Show the environment mapping handed to the build specification.
pub fn run(args: EnvArgs) -> CmdResult<EnvOutput> {
    let (topology, _env) = args.spec.compose()?;

    Ok((
        EnvOutput {
            command: "env.show".to_string(),
            build_project: topology.build_project.logical_id.clone(),
            privileged: topology.build_project.privileged,
            environment: topology.build_project.environment.clone(),
        },
        0,
    ))
}
