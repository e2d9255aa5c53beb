//! Implementation of `folio remove`.

use std::process::ExitCode;

use crate::cli::{args::RemoveCommand, context::CommandContext};

/// Removes every page of a document and commits.
pub fn run(ctx: &CommandContext, cmd: &RemoveCommand) -> ExitCode {
    let index = match ctx.open_index() {
        Ok(index) => index,
        Err(code) => return code,
    };

    if let Err(e) = index.remove_document(&cmd.filename) {
        eprintln!("error: failed to remove {}: {e}", cmd.filename);
        return ExitCode::FAILURE;
    }

    println!("Removed {}", cmd.filename);
    ExitCode::SUCCESS
}
