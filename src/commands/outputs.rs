use clap::Args;
use serde::Serialize;

use cutover::core::stack::OutputValue;

use super::{CmdResult, SpecArgs};

#[derive(Args)]
pub struct OutputsArgs {
    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Serialize)]
pub struct OutputsOutput {
    pub command: String,
    pub outputs: Vec<OutputValue>,
}

/// Show the published stack outputs (the load balancer endpoint).
pub fn run(args: OutputsArgs) -> CmdResult<OutputsOutput> {
    let (topology, _env) = args.spec.compose()?;

    Ok((
        OutputsOutput {
            command: "outputs.show".to_string(),
            outputs: topology.outputs,
        },
        0,
    ))
}
