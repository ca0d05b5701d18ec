use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{env, init, outputs, pipeline, synth, topology, validate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "cutover")]
#[command(version = VERSION)]
#[command(about = "Declare blue/green container service topologies and synthesize deployment manifests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the topology and emit the deployment manifest
    Synth(synth::SynthArgs),
    /// Compose the topology and report whether every reference resolves
    Validate(validate::ValidateArgs),
    /// Show resources in construction order with their dependencies
    Topology(topology::TopologyArgs),
    /// Show the release pipeline's stage and artifact wiring
    Pipeline(pipeline::PipelineArgs),
    /// Show the build project's environment mapping
    Env(env::EnvArgs),
    /// Show the published stack outputs
    Outputs(outputs::OutputsArgs),
    /// Write a starter cutover.toml
    Init(init::InitArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = commands::run_json(cli.command);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
