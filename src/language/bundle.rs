use include_dir::{include_dir, Dir};
use std::collections::HashMap;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A source of corpus payloads addressed by logical path (e.g. `words/english`).
pub trait ResourceBundle: Debug + Send {
    /// Returns the raw payload, or [`Error::MissingResource`] when the path is unknown.
    fn read(&self, path: &str) -> Result<String>;
}

fn file_name(path: &str) -> String {
    format!("{path}.json")
}

/// The four corpora compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundle;

impl ResourceBundle for EmbeddedBundle {
    fn read(&self, path: &str) -> Result<String> {
        let file = LANG_DIR
            .get_file(file_name(path))
            .ok_or_else(|| Error::MissingResource {
                path: path.to_string(),
            })?;

        let contents = file.contents_utf8().ok_or_else(|| Error::ResourceIo {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, "resource is not valid utf-8"),
        })?;

        Ok(contents.to_string())
    }
}

/// Corpora read from `<root>/<logical path>.json` on disk.
#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
}

impl DirBundle {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ResourceBundle for DirBundle {
    fn read(&self, path: &str) -> Result<String> {
        let full_path = self.root.join(file_name(path));
        std::fs::read_to_string(&full_path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::MissingResource {
                path: path.to_string(),
            },
            _ => Error::ResourceIo {
                path: path.to_string(),
                source,
            },
        })
    }
}

/// In-memory payloads, keyed by logical path.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    resources: HashMap<String, String>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, payload: impl Into<String>) -> Self {
        self.resources.insert(path.to_string(), payload.into());
        self
    }

    /// Builds a bundle holding the given word list for both languages and no quotes.
    pub fn with_words(words: &[&str]) -> Self {
        let payload = serde_json::json!({ "words": words }).to_string();
        Self::new()
            .with("words/english", payload.clone())
            .with("words/filipino", payload)
            .with("quotes/english", r#"{"quotes":[]}"#)
            .with("quotes/filipino", r#"{"quotes":[]}"#)
    }

    /// Builds a bundle holding the given quotes for both languages and no words.
    pub fn with_quotes(quotes: &[&str]) -> Self {
        let entries: Vec<_> = quotes
            .iter()
            .map(|text| serde_json::json!({ "text": text }))
            .collect();
        let payload = serde_json::json!({ "quotes": entries }).to_string();
        Self::new()
            .with("words/english", r#"{"words":[]}"#)
            .with("words/filipino", r#"{"words":[]}"#)
            .with("quotes/english", payload.clone())
            .with("quotes/filipino", payload)
    }
}

impl ResourceBundle for MemoryBundle {
    fn read(&self, path: &str) -> Result<String> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| Error::MissingResource {
                path: path.to_string(),
            })
    }
}
