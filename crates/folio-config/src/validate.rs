//! Configuration validation.

use crate::{Config, ConfigError};

/// Smallest writer heap the index writer accepts.
pub const MIN_WRITER_HEAP: usize = 15_000_000;

/// Checks that every setting has a value the engine can work with.
///
/// Stemmer languages are not checked here; the index rejects unknown languages when it
/// builds its analyzers.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.index.language.trim().is_empty() {
        return Err(invalid("index.language", "must not be empty"));
    }
    if config.index.writer_heap_bytes < MIN_WRITER_HEAP {
        return Err(invalid(
            "index.writer_heap_bytes",
            format!("must be at least {MIN_WRITER_HEAP} bytes"),
        ));
    }
    if config.search.limit == 0 {
        return Err(invalid("search.limit", "must be at least 1"));
    }
    if config.search.page_size == 0 {
        return Err(invalid("search.page_size", "must be at least 1"));
    }

    let highlight = &config.highlight;
    if highlight.fragment_chars == 0 {
        return Err(invalid("highlight.fragment_chars", "must be at least 1"));
    }
    for (key, value) in [
        ("highlight.pre_tag", &highlight.pre_tag),
        ("highlight.post_tag", &highlight.post_tag),
        ("highlight.ellipsis", &highlight.ellipsis),
    ] {
        if value.is_empty() {
            return Err(invalid(key, "must not be empty"));
        }
    }

    Ok(())
}

/// Builds an [`ConfigError::InvalidSetting`].
fn invalid(key: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting {
        key,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(config: &Config) -> &'static str {
        match validate_config(config) {
            Err(ConfigError::InvalidSetting { key, .. }) => key,
            other => panic!("expected InvalidSetting, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = Config::default();
        config.search.page_size = 0;
        assert_eq!(key_of(&config), "search.page_size");
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut config = Config::default();
        config.search.limit = 0;
        assert_eq!(key_of(&config), "search.limit");
    }

    #[test]
    fn zero_fragment_is_rejected() {
        let mut config = Config::default();
        config.highlight.fragment_chars = 0;
        assert_eq!(key_of(&config), "highlight.fragment_chars");
    }

    #[test]
    fn zero_context_is_allowed() {
        let mut config = Config::default();
        config.highlight.context_chars = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_tags_are_rejected() {
        let mut config = Config::default();
        config.highlight.post_tag.clear();
        assert_eq!(key_of(&config), "highlight.post_tag");
    }

    #[test]
    fn small_heap_is_rejected() {
        let mut config = Config::default();
        config.index.writer_heap_bytes = 1024;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("index.writer_heap_bytes"));
    }

    #[test]
    fn blank_language_is_rejected() {
        let mut config = Config::default();
        config.index.language = "  ".into();
        assert_eq!(key_of(&config), "index.language");
    }
}
