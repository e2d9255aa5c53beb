//! Implementation of `folio index`.

use std::{fs, process::ExitCode};

use folio_index::Document;

use crate::cli::{args::IndexCommand, context::CommandContext, output::output_batch_report};

/// Reads extracted page text and indexes it, replacing earlier versions of each file.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let contents = match fs::read_to_string(&cmd.file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", cmd.file.display());
            return ExitCode::FAILURE;
        }
    };

    let documents: Vec<Document> = match serde_json::from_str(&contents) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("error: invalid page text in {}: {e}", cmd.file.display());
            return ExitCode::FAILURE;
        }
    };

    let index = match ctx.open_index() {
        Ok(index) => index,
        Err(code) => return code,
    };

    let report = match index.add_documents(&documents) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: indexing failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = index.commit() {
        eprintln!("error: commit failed: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = index.close() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    output_batch_report(&report, cmd.json)
}
