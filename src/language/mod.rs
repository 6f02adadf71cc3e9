//! Corpus provider: word and quote lists per language, read from a resource bundle.
pub mod bundle;
pub mod core;

pub use bundle::{DirBundle, EmbeddedBundle, MemoryBundle, ResourceBundle};
pub use self::core::Corpus;
