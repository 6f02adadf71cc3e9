use serde::Deserialize;
use serde_json::from_str;
use tracing::debug;

use super::bundle::{EmbeddedBundle, ResourceBundle};
use crate::error::{Error, Result};
use crate::options::Language;

#[derive(Deserialize, Debug, Default)]
struct WordPayload {
    #[serde(default)]
    words: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
struct QuotePayload {
    #[serde(default)]
    quotes: Option<Vec<Option<Quote>>>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    #[serde(default)]
    text: Option<String>,
}

/// Loads word and quote lists for a language from a [`ResourceBundle`].
#[derive(Debug)]
pub struct Corpus {
    bundle: Box<dyn ResourceBundle>,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new(EmbeddedBundle)
    }
}

impl Corpus {
    pub fn new<B: ResourceBundle + 'static>(bundle: B) -> Self {
        Self {
            bundle: Box::new(bundle),
        }
    }

    /// Words in file order. May be empty.
    pub fn load_words(&self, language: Language) -> Result<Vec<String>> {
        let path = language.words_path();
        let payload: WordPayload = self.parse(path)?;
        let words = payload.words.unwrap_or_default();
        debug!(path, count = words.len(), "loaded words");
        Ok(words)
    }

    /// Trimmed, non-blank quotes in file order. May be empty.
    pub fn load_quotes(&self, language: Language) -> Result<Vec<String>> {
        let path = language.quotes_path();
        let payload: QuotePayload = self.parse(path)?;
        let quotes: Vec<String> = payload
            .quotes
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|quote| quote.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        debug!(path, count = quotes.len(), "loaded quotes");
        Ok(quotes)
    }

    fn parse<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let raw = self.bundle.read(path)?;
        from_str(&raw).map_err(|source| Error::MalformedResource {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::MemoryBundle;
    use assert_matches::assert_matches;

    #[test]
    fn test_bundled_corpora_load() {
        let corpus = Corpus::default();

        for language in Language::ALL {
            let words = corpus.load_words(language).unwrap();
            assert!(!words.is_empty());

            let quotes = corpus.load_quotes(language).unwrap();
            assert!(!quotes.is_empty());
            for quote in &quotes {
                assert_eq!(quote, quote.trim());
                assert!(!quote.is_empty());
            }
        }
    }

    #[test]
    fn test_word_payload_ignores_unknown_fields() {
        let bundle = MemoryBundle::new().with(
            "words/english",
            r#"{ "name": "english", "size": 2, "words": ["hello", "world"] }"#,
        );
        let words = Corpus::new(bundle).load_words(Language::Eng).unwrap();
        assert_eq!(words, vec!["hello", "world"]);
    }

    #[test]
    fn test_missing_words_field_is_empty() {
        let bundle = MemoryBundle::new().with("words/filipino", r#"{ "name": "filipino" }"#);
        let words = Corpus::new(bundle).load_words(Language::Fil).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_quotes_are_trimmed_and_blank_ones_dropped() {
        let bundle = MemoryBundle::new().with(
            "quotes/english",
            r#"{ "quotes": [
                { "text": "  stay hungry  ", "author": "someone" },
                { "text": "   " },
                { "author": "nobody" },
                null,
                { "text": "stay foolish" }
            ] }"#,
        );
        let quotes = Corpus::new(bundle).load_quotes(Language::Eng).unwrap();
        assert_eq!(quotes, vec!["stay hungry", "stay foolish"]);
    }

    #[test]
    fn test_malformed_payload_is_fatal() {
        let bundle = MemoryBundle::new().with("words/english", r#"{ "words": [1, 2"#);
        assert_matches!(
            Corpus::new(bundle).load_words(Language::Eng),
            Err(Error::MalformedResource { path, .. }) if path == "words/english"
        );
    }

    #[test]
    fn test_missing_payload_is_fatal() {
        let corpus = Corpus::new(MemoryBundle::new());
        assert_matches!(
            corpus.load_quotes(Language::Fil),
            Err(Error::MissingResource { path }) if path == "quotes/filipino"
        );
    }
}
