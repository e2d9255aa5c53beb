//! Implementation of `folio rebuild`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Discards the index contents and recreates it empty.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let mut index = match ctx.open_index() {
        Ok(index) => index,
        Err(code) => return code,
    };

    if let Err(e) = index.rebuild() {
        eprintln!("error: rebuild failed: {e}");
        return ExitCode::FAILURE;
    }

    println!("Rebuilt empty index at {}", index.path().display());
    ExitCode::SUCCESS
}
