use clap::Args;
use serde::Serialize;

use cutover::core::spec;
use cutover::log_status;
use cutover::utils::io;

use super::{CmdResult, DEFAULT_SPEC_PATH};

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the starter spec
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SPEC_PATH)]
    pub path: String,

    /// Overwrite an existing spec file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
pub struct InitOutput {
    pub command: String,
    pub path: String,
    pub created: bool,
}

/// Write a starter spec file with the reference topology's defaults.
pub fn run(args: InitArgs) -> CmdResult<InitOutput> {
    let path = io::expand_path(&args.path);

    if path.exists() && !args.force {
        return Err(cutover::Error::validation_invalid_argument(
            "path",
            format!("'{}' already exists", path.display()),
            None,
            None,
        )
        .with_hint("Pass --force to overwrite"));
    }

    io::write_string(&path, &spec::starter_toml()?)?;
    log_status!("init", "Wrote starter spec to {}", path.display());

    Ok((
        InitOutput {
            command: "init.run".to_string(),
            path: path.display().to_string(),
            created: true,
        },
        0,
    ))
}
