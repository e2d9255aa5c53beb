//! Implementation of `folio status`.

use std::process::ExitCode;

use folio_index::Index;

use crate::cli::context::CommandContext;

/// Shows where the configuration and index live and what the index holds.
pub fn run(ctx: &CommandContext) -> ExitCode {
    match &ctx.config_path {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: (defaults, no folio.toml found)"),
    }

    let path = match ctx.index_path() {
        Ok(path) => path,
        Err(code) => return code,
    };
    println!("Index:  {}", path.display());

    let (index, status) = match Index::open_or_create(&path, &ctx.config.index) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("error: failed to open index: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("State:  {}", status.description());

    let filenames = match index.filenames() {
        Ok(filenames) => filenames,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Files:  {}", filenames.len());
    println!("Pages:  {}", index.num_pages());

    ExitCode::SUCCESS
}
