//! End-to-end tests for indexing, retrieval and result formatting.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path, sync::Arc, thread};

use folio_config::IndexSettings;
use folio_index::{Document, Index, OpenStatus, SearchRequest, SearchResponse};
use tempfile::TempDir;

/// Opens (or creates) an index with default settings.
fn open(path: &Path) -> Index {
    Index::open_or_create(path, &IndexSettings::default())
        .unwrap()
        .0
}

/// Indexes and commits `documents`.
fn index_with(path: &Path, documents: &[Document]) -> Index {
    let index = open(path);
    index.add_documents(documents).unwrap();
    index.commit().unwrap();
    index
}

/// Returns `(filename, page)` pairs of a response.
fn pages(response: &SearchResponse) -> Vec<(String, u64)> {
    response
        .results
        .iter()
        .map(|r| (r.hit.filename.clone(), r.hit.page_num))
        .collect()
}

/// The two-page fox/dog document.
fn fox_and_dog() -> Document {
    Document::new("a.pdf")
        .with_page(0, "The quick brown fox")
        .with_page(1, "jumps over the lazy dog")
}

mod scenarios {
    use super::*;

    #[test]
    fn single_document_pages() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);
        let request = SearchRequest::default();

        let fox = index.search("fox", &request).unwrap();
        assert_eq!(pages(&fox), vec![("a.pdf".to_string(), 0)]);
        assert_eq!(fox.results[0].highlight, "<em>fox</em>");
        assert_eq!(fox.results[0].context_before, "The quick brown");

        let dog = index.search("dog", &request).unwrap();
        assert_eq!(pages(&dog), vec![("a.pdf".to_string(), 1)]);

        let cat = index.search("cat", &request).unwrap();
        assert!(cat.results.is_empty());
        assert_eq!(cat.total, 0);
        assert_eq!(cat.pages, 1);
    }

    #[test]
    fn grouped_across_files() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[
                Document::new("a.pdf").with_page(0, "alpha release notes"),
                Document::new("b.pdf").with_page(0, "the alpha build"),
            ],
        );

        let response = index.search("alpha", &SearchRequest::default()).unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.file_count, 2);
        assert!(response.grouped);
        assert_eq!(
            pages(&response),
            vec![("a.pdf".to_string(), 0), ("b.pdf".to_string(), 0)]
        );
    }

    #[test]
    fn page_past_the_end() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[
                Document::new("a.pdf").with_page(0, "alpha"),
                Document::new("b.pdf").with_page(0, "alpha"),
                Document::new("c.pdf").with_page(0, "alpha"),
            ],
        );

        let request = SearchRequest::default().with_page(5);
        let response = index.search("alpha", &request).unwrap();

        assert!(response.results.is_empty());
        assert_eq!(response.total, 3);
        assert_eq!(response.pages, 1);
        assert_eq!(response.page, 5);
    }
}

mod retrieval {
    use super::*;

    #[test]
    fn every_indexed_document_is_findable() {
        let temp = TempDir::new().unwrap();
        let words = ["zebra", "quasar", "lantern", "harbor", "meadow"];
        let documents: Vec<Document> = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                Document::new(format!("doc{i}.pdf"))
                    .with_page(0, "shared filler text")
                    .with_page(1, format!("a page about {word}"))
            })
            .collect();
        let index = index_with(temp.path(), &documents);

        for (i, word) in words.iter().enumerate() {
            let response = index.search(word, &SearchRequest::default()).unwrap();
            let filenames: Vec<String> = pages(&response).into_iter().map(|(f, _)| f).collect();
            assert!(filenames.contains(&format!("doc{i}.pdf")), "{word}: {filenames:?}");
        }
    }

    #[test]
    fn terms_are_anded() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);

        let response = index.search("fox dog", &SearchRequest::default()).unwrap();

        assert_eq!(response.total, 0);
    }

    #[test]
    fn or_matches_either() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);
        let request = SearchRequest {
            grouped: false,
            ..SearchRequest::default()
        };

        let response = index.search("fox OR dog", &request).unwrap();

        assert_eq!(response.total, 2);
    }

    #[test]
    fn phrases_require_adjacency() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);
        let request = SearchRequest::default();

        assert_eq!(index.search("\"brown fox\"", &request).unwrap().total, 1);
        assert_eq!(index.search("\"fox brown\"", &request).unwrap().total, 0);
        assert_eq!(index.search("\"over the lazy\"", &request).unwrap().total, 1);
    }

    #[test]
    fn stemming_matches_word_forms() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);

        let response = index.search("jumping", &SearchRequest::default()).unwrap();

        assert_eq!(pages(&response), vec![("a.pdf".to_string(), 1)]);
        assert_eq!(response.results[0].highlight, "<em>jumps</em> over the lazy dog");
    }

    #[test]
    fn unknown_prefixes_are_searched_as_text() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[
                Document::new("a.pdf").with_page(0, "Meeting at 12:30 about the budget"),
                Document::new("b.pdf").with_page(0, "Note: fox sighted near the barn"),
                Document::new("c.pdf").with_page(0, "Section title: budget review"),
            ],
        );
        let request = SearchRequest::default();

        let found = |query: &str| pages(&index.search(query, &request).unwrap());
        assert_eq!(found("12:30"), vec![("a.pdf".to_string(), 0)]);
        assert_eq!(found("Note: fox"), vec![("b.pdf".to_string(), 0)]);
        assert_eq!(found("title:budget"), vec![("c.pdf".to_string(), 0)]);
        assert!(found("12:45").is_empty());
        assert!(index.parse_query("Note: fox").is_ok());
    }

    #[test]
    fn limit_cuts_ties_by_filename() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[
                Document::new("b.pdf").with_page(0, "alpha"),
                Document::new("a.pdf").with_page(0, "alpha"),
            ],
        );
        let request = SearchRequest {
            limit: 1,
            ..SearchRequest::default()
        };

        let response = index.search("alpha", &request).unwrap();

        assert_eq!(pages(&response), vec![("a.pdf".to_string(), 0)]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);

        assert_eq!(index.search("FOX", &SearchRequest::default()).unwrap().total, 1);
    }

    #[test]
    fn filename_matches_count() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[Document::new("budget-report.pdf").with_page(0, "numbers and tables")],
        );
        let request = SearchRequest::default();

        let response = index.search("budget", &request).unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].highlight, "numbers and tables");

        assert_eq!(index.search("filename:report", &request).unwrap().total, 1);
        assert_eq!(index.search("content:report", &request).unwrap().total, 0);
    }

    #[test]
    fn filename_match_adds_to_score() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[
                Document::new("notes.pdf").with_page(0, "a word about glaciers"),
                Document::new("glaciers.pdf").with_page(0, "a word about glaciers"),
            ],
        );
        let request = SearchRequest {
            grouped: false,
            ..SearchRequest::default()
        };

        let tree = index.parse_query("glaciers").unwrap().unwrap();
        let hits = index.search_tree(&tree, request.limit).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].filename, "glaciers.pdf");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn ungrouped_lists_every_page() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[Document::new("a.pdf")
                .with_page(0, "alpha")
                .with_page(1, "alpha alpha")
                .with_page(2, "beta")],
        );
        let request = SearchRequest {
            grouped: false,
            ..SearchRequest::default()
        };

        let response = index.search("alpha", &request).unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.file_count, 1);
        assert!(!response.grouped);
    }

    #[test]
    fn grouping_keeps_best_page() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[Document::new("a.pdf")
                .with_page(0, "alpha and a great many other words that dilute the score")
                .with_page(1, "alpha alpha alpha")],
        );

        let response = index.search("alpha", &SearchRequest::default()).unwrap();

        assert_eq!(pages(&response), vec![("a.pdf".to_string(), 1)]);
    }

    #[test]
    fn invalid_queries_return_empty_response() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);
        let request = SearchRequest::default();

        for query in ["\"fox", "(fox", "content:(filename:fox)", "OR fox"] {
            let response = index.search(query, &request).unwrap();
            assert_eq!(response.total, 0, "{query}");
            assert!(index.parse_query(query).is_err(), "{query}");
        }
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn removed_document_is_not_found() {
        let temp = TempDir::new().unwrap();
        let index = index_with(
            temp.path(),
            &[
                fox_and_dog(),
                Document::new("b.pdf").with_page(0, "a unique walrus"),
            ],
        );

        index.remove_document("b.pdf").unwrap();

        let response = index.search("walrus", &SearchRequest::default()).unwrap();
        assert_eq!(response.total, 0);
        assert_eq!(index.filenames().unwrap(), vec!["a.pdf"]);
    }

    #[test]
    fn reopen_reproduces_results() {
        let temp = TempDir::new().unwrap();
        let request = SearchRequest::default();
        let before = {
            let index = index_with(temp.path(), &[fox_and_dog()]);
            let response = index.search("fox OR dog", &request).unwrap();
            index.close().unwrap();
            response
        };

        let (index, status) = Index::open_or_create(temp.path(), &IndexSettings::default()).unwrap();
        let after = index.search("fox OR dog", &request).unwrap();

        assert_eq!(status, OpenStatus::Opened);
        assert_eq!(before, after);
    }

    #[test]
    fn uncommitted_writes_are_invisible() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);

        index
            .add_documents(&[Document::new("b.pdf").with_page(0, "hidden otter")])
            .unwrap();

        let request = SearchRequest::default();
        assert_eq!(index.search("otter", &request).unwrap().total, 0);

        index.commit().unwrap();
        assert_eq!(index.search("otter", &request).unwrap().total, 1);
    }

    #[test]
    fn upsert_replaces_content() {
        let temp = TempDir::new().unwrap();
        let index = index_with(temp.path(), &[fox_and_dog()]);

        index
            .add_documents(&[Document::new("a.pdf").with_page(0, "only a heron now")])
            .unwrap();
        index.commit().unwrap();

        let request = SearchRequest::default();
        assert_eq!(index.search("fox", &request).unwrap().total, 0);
        assert_eq!(index.search("heron", &request).unwrap().total, 1);
        assert_eq!(index.num_pages(), 1);
    }

    #[test]
    fn readers_search_while_writer_commits() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(index_with(temp.path(), &[fox_and_dog()]));

        thread::scope(|scope| {
            for _ in 0..4 {
                let index = Arc::clone(&index);
                scope.spawn(move || {
                    for _ in 0..20 {
                        let response = index.search("fox", &SearchRequest::default()).unwrap();
                        assert_eq!(response.total, 1);
                    }
                });
            }

            scope.spawn(|| {
                for i in 0..5 {
                    index
                        .add_documents(&[Document::new(format!("extra{i}.pdf")).with_page(0, "badger")])
                        .unwrap();
                    index.commit().unwrap();
                }
            });
        });

        assert_eq!(index.search("badger", &SearchRequest::default()).unwrap().total, 5);
    }

    #[test]
    fn corrupt_index_recovers_empty() {
        let temp = TempDir::new().unwrap();
        index_with(temp.path(), &[fox_and_dog()]).close().unwrap();
        fs::write(temp.path().join("meta.json"), b"garbage").unwrap();

        let (index, status) = Index::open_or_create(temp.path(), &IndexSettings::default()).unwrap();

        assert!(matches!(status, OpenStatus::Recovered { .. }));
        assert_eq!(index.search("fox", &SearchRequest::default()).unwrap().total, 0);

        index.add_documents(&[fox_and_dog()]).unwrap();
        index.commit().unwrap();
        assert_eq!(index.search("fox", &SearchRequest::default()).unwrap().total, 1);
    }
}
