//! Session options and the normalisation applied to host selections.
//!
//! Every selection is normalised rather than rejected: input is trimmed and
//! compared case-insensitively, and anything unrecognised falls back to the
//! default `(Words, Eng, 60s)`.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum WordMode {
    #[default]
    Words,
    Numbers,
    Quotes,
}

impl WordMode {
    pub const ALL: [WordMode; 3] = [WordMode::Words, WordMode::Numbers, WordMode::Quotes];

    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "numbers" => WordMode::Numbers,
            "quotes" => WordMode::Quotes,
            _ => WordMode::Words,
        }
    }

    pub fn next(self) -> Self {
        match self {
            WordMode::Words => WordMode::Numbers,
            WordMode::Numbers => WordMode::Quotes,
            WordMode::Quotes => WordMode::Words,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Language {
    #[default]
    Eng,
    Fil,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Eng, Language::Fil];

    /// A `fil` prefix selects Filipino; everything else is English.
    pub fn normalize(value: &str) -> Self {
        if value.trim().to_lowercase().starts_with("fil") {
            Language::Fil
        } else {
            Language::Eng
        }
    }

    pub fn next(self) -> Self {
        match self {
            Language::Eng => Language::Fil,
            Language::Fil => Language::Eng,
        }
    }

    /// Logical resource path of the word list.
    pub fn words_path(self) -> &'static str {
        match self {
            Language::Eng => "words/english",
            Language::Fil => "words/filipino",
        }
    }

    /// Logical resource path of the quote list.
    pub fn quotes_path(self) -> &'static str {
        match self {
            Language::Eng => "quotes/english",
            Language::Fil => "quotes/filipino",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
pub enum TimeMode {
    #[strum(serialize = "15s")]
    Secs15,
    #[strum(serialize = "30s")]
    Secs30,
    #[default]
    #[strum(serialize = "60s")]
    Secs60,
    #[strum(serialize = "120s")]
    Secs120,
}

impl TimeMode {
    pub const ALL: [TimeMode; 4] = [
        TimeMode::Secs15,
        TimeMode::Secs30,
        TimeMode::Secs60,
        TimeMode::Secs120,
    ];

    pub fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "15s" => TimeMode::Secs15,
            "30s" => TimeMode::Secs30,
            "120s" => TimeMode::Secs120,
            _ => TimeMode::Secs60,
        }
    }

    pub fn seconds(self) -> u32 {
        match self {
            TimeMode::Secs15 => 15,
            TimeMode::Secs30 => 30,
            TimeMode::Secs60 => 60,
            TimeMode::Secs120 => 120,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeMode::Secs15 => TimeMode::Secs30,
            TimeMode::Secs30 => TimeMode::Secs60,
            TimeMode::Secs60 => TimeMode::Secs120,
            TimeMode::Secs120 => TimeMode::Secs15,
        }
    }
}

/// The three selections that shape a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Options {
    pub word_mode: WordMode,
    pub language: Language,
    pub time_mode: TimeMode,
}

impl Options {
    pub fn new(word_mode: WordMode, language: Language, time_mode: TimeMode) -> Self {
        Self {
            word_mode,
            language,
            time_mode,
        }
    }

    pub fn normalize(word_mode: &str, language: &str, time_mode: &str) -> Self {
        Self {
            word_mode: WordMode::normalize(word_mode),
            language: Language::normalize(language),
            time_mode: TimeMode::normalize(time_mode),
        }
    }

    pub fn seconds(&self) -> u32 {
        self.time_mode.seconds()
    }
}
