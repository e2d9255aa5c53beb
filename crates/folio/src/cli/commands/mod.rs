//! Command implementations and dispatch.

pub mod config;
pub mod index;
pub mod rebuild;
pub mod remove;
pub mod search;
pub mod status;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Index(cmd) => index::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Remove(cmd) => remove::run(ctx, &cmd),
        Commands::Rebuild => rebuild::run(ctx),
        Commands::Status => status::run(ctx),
        Commands::Config => config::run(ctx),
    }
}
