use clap::Args;
use serde::Serialize;

use cutover::core::manifest::{Manifest, ManifestFormat};
use cutover::log_status;
use cutover::utils::io;

use super::{CmdResult, SpecArgs};

#[derive(Args)]
pub struct SynthArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Manifest format: json or yaml
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Write the manifest to a file instead of embedding it in the response
    #[arg(long, value_name = "PATH")]
    pub out: Option<String>,
}

#[derive(Serialize)]
pub struct SynthOutput {
    pub command: String,
    pub name: String,
    pub format: String,
    pub resources: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<serde_json::Value>,
}

pub fn run(args: SynthArgs) -> CmdResult<SynthOutput> {
    let format = ManifestFormat::parse(&args.format)?;

    if args.out.is_none() && format == ManifestFormat::Yaml {
        return Err(cutover::Error::validation_invalid_argument(
            "format",
            "YAML output requires --out; the response envelope is JSON",
            None,
            None,
        ));
    }

    let (topology, env) = args.spec.compose()?;
    let manifest = Manifest::from_topology(&topology, &env);
    let warnings = topology.warnings.clone();
    let resources = topology.graph.len();

    let (written_to, embedded) = match &args.out {
        Some(out) => {
            let rendered = manifest.render(format)?;
            let path = io::expand_path(out);
            io::write_string(&path, &rendered)?;
            log_status!("synth", "Wrote manifest to {}", path.display());
            (Some(path.display().to_string()), None)
        }
        None => {
            let value = serde_json::to_value(&manifest).map_err(|e| {
                cutover::Error::internal_json(
                    e.to_string(),
                    Some("serialize manifest".to_string()),
                )
            })?;
            (None, Some(value))
        }
    };

    Ok((
        SynthOutput {
            command: "synth.run".to_string(),
            name: topology.name,
            format: args.format,
            resources,
            warnings,
            written_to,
            manifest: embedded,
        },
        0,
    ))
}
