//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//!
//! Invariants:
//! - Every command loads from the same `Locations`, built once from the global flags.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    let locations = cli.locations();
    let subfolder = cli.subfolder.as_deref();

    match &cli.command {
        Commands::Encrypt { value } => commands::encrypt::run(value, &locations, &cli.output),
        Commands::Decrypt { value } => commands::decrypt::run(value, &locations, &cli.output),
        Commands::List => commands::list::run(locations, subfolder, &cli.output),
        Commands::Get { file, key } => {
            commands::get::run(file, key.as_deref(), locations, subfolder, &cli.output)
        }
        Commands::Merge {
            files,
            policy,
            strict,
        } => commands::merge::run(files, *policy, *strict, locations, subfolder, &cli.output),
    }
}
