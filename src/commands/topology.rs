use clap::Args;
use serde::Serialize;

use super::{CmdResult, SpecArgs};

#[derive(Args)]
pub struct TopologyArgs {
    #[command(flatten)]
    pub spec: SpecArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyRow {
    pub id: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Serialize)]
pub struct TopologyOutput {
    pub command: String,
    pub name: String,
    pub resources: Vec<TopologyRow>,
}

/// List resources in construction order with their dependencies.
pub fn run(args: TopologyArgs) -> CmdResult<TopologyOutput> {
    let (topology, _env) = args.spec.compose()?;

    let resources = topology
        .graph
        .construction_order()
        .into_iter()
        .map(|node| TopologyRow {
            id: node.id.clone(),
            kind: node.kind.as_str().to_string(),
            depends_on: node.depends_on.clone(),
        })
        .collect();

    Ok((
        TopologyOutput {
            command: "topology.show".to_string(),
            name: topology.name,
            resources,
        },
        0,
    ))
}
