//! Text analysis pipelines for the folio page index.
//!
//! The content pipeline has five stages:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation
//! 2. `LowerCaser` - converts tokens to lowercase
//! 3. `RemoveLongFilter` - removes tokens longer than 40 bytes
//! 4. `StopWordFilter` - removes common English function words
//! 5. `Stemmer` - applies language-specific stemming
//!
//! Filenames go through the same pipeline without the stemmer. Both pipelines run
//! identically at index time and at query time. Filters drop tokens without renumbering
//! the survivors, so token positions keep the gaps left by removed words.

use std::ops::Range;

use tantivy::{
    Index,
    tokenizer::{
        Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
        TextAnalyzer, TokenStream,
    },
};

use crate::{IndexError, schema::SearchField};

/// Name of the content tokenizer registered with Tantivy.
pub const CONTENT_TOKENIZER: &str = "folio_content";

/// Name of the filename tokenizer registered with Tantivy.
pub const FILENAME_TOKENIZER: &str = "folio_filename";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Words removed from content and filenames when stop-word removal is enabled.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "can", "for", "from", "have", "if", "in",
    "is", "it", "may", "not", "of", "on", "or", "tbd", "that", "the", "this", "to", "us", "we",
    "when", "will", "with", "yet", "you", "your",
];

/// One token produced by an analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    /// Normalized token text, as stored in the index.
    pub text: String,
    /// Byte range of the source word in the analyzed text.
    pub offset: Range<usize>,
    /// Word position in the analyzed text, counting removed words.
    pub position: usize,
}

/// Parses a stemmer language string into a Tantivy `Language`.
///
/// Supports lowercase language names matching Tantivy's `Language` enum.
/// Returns an error if the language is not recognized.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    match name.trim().to_lowercase().as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}

/// Builds the stop-word filter, empty when removal is disabled.
fn stop_word_filter(enabled: bool) -> StopWordFilter {
    let words: &[&str] = if enabled { STOP_WORDS } else { &[] };
    StopWordFilter::remove(words.iter().map(|w| (*w).to_string()))
}

/// Builds the content analyzer with the specified stemmer language.
pub fn build_content_analyzer(language: Language, stop_words: bool) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(stop_word_filter(stop_words))
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the filename analyzer.
pub fn build_filename_analyzer(stop_words: bool) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(stop_word_filter(stop_words))
        .build()
}

/// Runs `text` through `analyzer`, collecting normalized tokens with offsets.
///
/// Empty or whitespace-only input yields no tokens.
pub fn analyze(analyzer: &TextAnalyzer, text: &str) -> Vec<AnalyzedToken> {
    let mut analyzer = analyzer.clone();
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();

    while let Some(token) = stream.next() {
        tokens.push(AnalyzedToken {
            text: token.text.clone(),
            offset: token.offset_from..token.offset_to,
            position: token.position,
        });
    }

    tokens
}

/// The pair of analyzers an index uses, one per searchable field.
#[derive(Clone)]
pub struct Analyzers {
    /// Analyzer for page content.
    content: TextAnalyzer,
    /// Analyzer for filenames.
    filename: TextAnalyzer,
}

impl Analyzers {
    /// Builds both analyzers from a language name.
    pub fn new(language: &str, stop_words: bool) -> Result<Self, IndexError> {
        let language = parse_language(language)?;
        Ok(Self {
            content: build_content_analyzer(language, stop_words),
            filename: build_filename_analyzer(stop_words),
        })
    }

    /// Registers both analyzers with an index under their tokenizer names.
    pub fn register(&self, index: &Index) {
        let tokenizers = index.tokenizers();
        tokenizers.register(CONTENT_TOKENIZER, self.content.clone());
        tokenizers.register(FILENAME_TOKENIZER, self.filename.clone());
    }

    /// Returns the analyzer used for `field`.
    pub fn for_field(&self, field: SearchField) -> &TextAnalyzer {
        match field {
            SearchField::Content => &self.content,
            SearchField::Filename => &self.filename,
        }
    }

    /// Analyzes `text` the way `field` is analyzed at index time.
    pub fn analyze(&self, field: SearchField, text: &str) -> Vec<AnalyzedToken> {
        analyze(self.for_field(field), text)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn texts(tokens: &[AnalyzedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn english() -> Analyzers {
        Analyzers::new("english", true).unwrap()
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(parse_language("English").unwrap(), Language::English);
        assert_eq!(parse_language("FRENCH").unwrap(), Language::French);
        assert_eq!(parse_language(" german ").unwrap(), Language::German);
    }

    #[test]
    fn parse_invalid_language() {
        let err = parse_language("klingon").unwrap_err();
        assert!(matches!(err, IndexError::InvalidLanguage(ref l) if l == "klingon"));
    }

    #[test]
    fn content_lowercases_and_stems() {
        let tokens = english().analyze(SearchField::Content, "Running DOGS jumped");
        assert_eq!(texts(&tokens), vec!["run", "dog", "jump"]);
    }

    #[test]
    fn content_removes_stop_words_keeping_positions() {
        let tokens = english().analyze(SearchField::Content, "The quick fox of the woods");
        assert_eq!(texts(&tokens), vec!["quick", "fox", "wood"]);
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2, 5]);
    }

    #[test]
    fn stop_words_can_be_disabled() {
        let analyzers = Analyzers::new("english", false).unwrap();
        let tokens = analyzers.analyze(SearchField::Content, "the fox");
        assert_eq!(texts(&tokens), vec!["the", "fox"]);
    }

    #[test]
    fn offsets_point_into_source_text() {
        let text = "Héllo, wörld";
        let tokens = english().analyze(SearchField::Filename, text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(&text[tokens[0].offset.clone()], "Héllo");
        assert_eq!(&text[tokens[1].offset.clone()], "wörld");
    }

    #[test]
    fn removes_long_tokens() {
        let long_token = "a".repeat(50);
        let text = format!("short {long_token} word");
        let tokens = english().analyze(SearchField::Content, &text);
        assert_eq!(texts(&tokens), vec!["short", "word"]);
    }

    #[test]
    fn filename_is_not_stemmed() {
        let tokens = english().analyze(SearchField::Filename, "Quarterly_Reports-2024.pdf");
        assert_eq!(texts(&tokens), vec!["quarterly", "reports", "2024", "pdf"]);
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        let analyzers = english();
        assert!(analyzers.analyze(SearchField::Content, "").is_empty());
        assert!(analyzers.analyze(SearchField::Content, "   \n\t ").is_empty());
    }

    #[test]
    fn analysis_is_deterministic() {
        let analyzers = english();
        let text = "Searching indexed pages quickly";
        assert_eq!(
            analyzers.analyze(SearchField::Content, text),
            analyzers.analyze(SearchField::Content, text)
        );
    }
}
