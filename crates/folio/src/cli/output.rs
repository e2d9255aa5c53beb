//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use folio_index::{BatchReport, SearchResponse};
use serde::Serialize;

/// JSON output for `folio search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The query string as given.
    query: &'a str,
    /// The formatted response.
    #[serde(flatten)]
    response: &'a SearchResponse,
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Outputs a search response as a table or as JSON.
pub fn output_search_response(query: &str, response: &SearchResponse, json: bool) -> ExitCode {
    if json {
        return print_json(&JsonSearchOutput { query, response });
    }

    if response.total == 0 {
        println!("No results found.");
        return ExitCode::SUCCESS;
    }

    if !response.results.is_empty() {
        println!("{}", results_table(response));
    }
    println!("{}", summary_line(response));
    ExitCode::SUCCESS
}

/// Builds the result table for one page of results.
fn results_table(response: &SearchResponse) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["File", "Page", "Score", "Match"]);

    for result in &response.results {
        let excerpt = [
            result.context_before.as_str(),
            result.highlight.as_str(),
            result.context_after.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

        table.add_row(vec![
            Cell::new(&result.hit.filename),
            Cell::new(result.hit.page_num.to_string()),
            Cell::new(format!("{:.2}", result.hit.score)),
            Cell::new(excerpt),
        ]);
    }

    table
}

/// Describes the position of this page within the whole result set.
fn summary_line(response: &SearchResponse) -> String {
    let unit = if response.grouped { "files" } else { "pages" };
    format!(
        "Page {} of {} ({} matching {unit}, {} files)",
        response.page, response.pages, response.total, response.file_count
    )
}

/// Outputs an indexing report as text or as JSON.
pub fn output_batch_report(report: &BatchReport, json: bool) -> ExitCode {
    if json {
        return print_json(report);
    }

    for document in &report.documents {
        for reason in &document.skipped {
            eprintln!("warning: {}: skipped {reason}", document.filename);
        }
    }

    println!(
        "Indexed {} pages from {} documents ({} skipped)",
        report.pages_indexed(),
        report.documents.len(),
        report.pages_skipped()
    );
    ExitCode::SUCCESS
}
