use clap::Args;

use cutover::core::env::SynthEnvironment;
use cutover::core::spec::{self, TopologySpec};
use cutover::utils::io;

pub type CmdResult<T> = cutover::Result<(T, i32)>;

/// Shared inputs for every command that composes the topology.
///
/// The spec comes from a file (TOML or JSON by extension) or an inline
/// `--json` value. Account and region are explicit flags with a
/// documented fallback chain: flag, then `CUTOVER_ACCOUNT` /
/// `CUTOVER_REGION`, then the empty string. An empty value is valid;
/// the control plane fills in the real identifiers at deploy time.
#[derive(Args, Debug, Default)]
pub struct SpecArgs {
    /// Path to the topology spec file (default: cutover.toml)
    #[arg(long, value_name = "PATH")]
    pub spec: Option<String>,

    /// Inline JSON spec (takes precedence over --spec)
    #[arg(long, value_name = "JSON")]
    pub json: Option<String>,

    /// Account identifier for synthesized names and ARNs
    #[arg(long)]
    pub account: Option<String>,

    /// Region for synthesized names and ARNs
    #[arg(long)]
    pub region: Option<String>,
}

pub const DEFAULT_SPEC_PATH: &str = "cutover.toml";

impl SpecArgs {
    pub fn load_spec(&self) -> cutover::Result<TopologySpec> {
        if let Some(raw) = &self.json {
            return spec::from_json(raw);
        }

        match &self.spec {
            Some(path) => spec::load(&io::expand_path(path)),
            None => {
                // No explicit path: use cutover.toml when present,
                // otherwise the built-in reference topology.
                let default_path = io::expand_path(DEFAULT_SPEC_PATH);
                if default_path.exists() {
                    spec::load(&default_path)
                } else {
                    let spec = TopologySpec::default();
                    spec.validate()?;
                    Ok(spec)
                }
            }
        }
    }

    pub fn environment(&self) -> SynthEnvironment {
        SynthEnvironment::resolve(self.account.clone(), self.region.clone())
    }

    pub fn compose(&self) -> cutover::Result<(cutover::Topology, SynthEnvironment)> {
        let spec = self.load_spec()?;
        let env = self.environment();
        let topology = cutover::compose(&spec, &env)?;
        Ok((topology, env))
    }
}

pub mod env;
pub mod init;
pub mod outputs;
pub mod pipeline;
pub mod synth;
pub mod topology;
pub mod validate;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
}

pub(crate) fn run_json(command: crate::Commands) -> (cutover::Result<serde_json::Value>, i32) {
    crate::tty::status("cutover is working...");

    match command {
        crate::Commands::Synth(args) => dispatch!(args, synth),
        crate::Commands::Validate(args) => dispatch!(args, validate),
        crate::Commands::Topology(args) => dispatch!(args, topology),
        crate::Commands::Pipeline(args) => dispatch!(args, pipeline),
        crate::Commands::Env(args) => dispatch!(args, env),
        crate::Commands::Outputs(args) => dispatch!(args, outputs),
        crate::Commands::Init(args) => dispatch!(args, init),
    }
}
