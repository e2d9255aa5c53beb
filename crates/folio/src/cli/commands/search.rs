//! Implementation of `folio search`.

use std::process::ExitCode;

use folio_index::{SearchRequest, SearchResponse};

use crate::cli::{
    args::SearchCommand, context::CommandContext, output::output_search_response,
};

/// Builds the request from configured defaults and command-line overrides.
fn build_request(ctx: &CommandContext, cmd: &SearchCommand) -> SearchRequest {
    let mut request = SearchRequest::from_config(&ctx.config).with_page(cmd.page);
    if let Some(page_size) = cmd.page_size {
        request.page_size = page_size;
    }
    if let Some(limit) = cmd.limit {
        request.limit = limit;
    }
    if cmd.no_group {
        request.grouped = false;
    }
    request
}

/// Searches the index and prints one page of results.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let request = build_request(ctx, cmd);

    let index = match ctx.open_index() {
        Ok(index) => index,
        Err(code) => return code,
    };

    let tree = match index.parse_query(&cmd.query) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            return ExitCode::FAILURE;
        }
    };

    if cmd.explain {
        match &tree {
            Some(tree) => print!("{tree}"),
            None => println!("(empty query)"),
        }
        return ExitCode::SUCCESS;
    }

    if tree.is_none() {
        let response = SearchResponse::empty(request.page, request.grouped);
        return output_search_response(&cmd.query, &response, cmd.json);
    }

    match index.search(&cmd.query, &request) {
        Ok(response) => output_search_response(&cmd.query, &response, cmd.json),
        Err(e) => {
            eprintln!("error: search failed: {e}");
            ExitCode::FAILURE
        }
    }
}
