use itertools::Itertools;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::language::Corpus;
use crate::options::{Language, WordMode};

pub const ROWS_PER_TRIPLET: usize = 3;
pub const WORDS_PER_ROW: usize = 15;
pub const NUMBERS_PER_ROW: usize = 3;
pub const MAX_NUMBER_TOKEN: u32 = 9999;

/// Three rows of target text presented together.
pub type Triplet = Vec<String>;

/// Number of triplets generated for a session of the given length.
pub fn triplet_count(duration_secs: u32) -> Result<usize> {
    match duration_secs {
        15 => Ok(4),
        30 => Ok(5),
        60 => Ok(7),
        120 => Ok(9),
        other => Err(Error::UnsupportedDuration(other)),
    }
}

/// Builds the triplets of a session from a [`Corpus`] and an injected random source.
#[derive(Debug)]
pub struct TripletGenerator<R: Rng> {
    corpus: Corpus,
    rng: R,
}

impl<R: Rng> TripletGenerator<R> {
    pub fn new(corpus: Corpus, rng: R) -> Self {
        Self { corpus, rng }
    }

    pub fn generate_triplets(
        &mut self,
        word_mode: WordMode,
        language: Language,
        duration_secs: u32,
    ) -> Result<Vec<Triplet>> {
        let count = triplet_count(duration_secs)?;

        let triplets = match word_mode {
            WordMode::Quotes => {
                let quotes = self.corpus.load_quotes(language)?;
                self.quote_triplets(quotes, count)
            }
            WordMode::Words | WordMode::Numbers => {
                let words = self.corpus.load_words(language)?;
                self.word_triplets(&words, count, word_mode == WordMode::Numbers)
            }
        };

        debug!(
            %word_mode,
            %language,
            duration_secs,
            triplets = triplets.len(),
            "generated triplets"
        );
        Ok(triplets)
    }

    fn word_triplets(&mut self, words: &[String], count: usize, numbers: bool) -> Vec<Triplet> {
        (0..count)
            .map(|_| {
                (0..ROWS_PER_TRIPLET)
                    .map(|_| self.word_row(words, numbers))
                    .collect()
            })
            .collect()
    }

    /// One row of space-separated tokens; empty when there are no words to sample.
    fn word_row(&mut self, words: &[String], numbers: bool) -> String {
        if words.is_empty() {
            return String::new();
        }

        let number_slots = if numbers {
            index::sample(&mut self.rng, WORDS_PER_ROW, NUMBERS_PER_ROW).into_vec()
        } else {
            Vec::new()
        };

        (0..WORDS_PER_ROW)
            .map(|slot| {
                if number_slots.contains(&slot) {
                    self.rng.gen_range(1..=MAX_NUMBER_TOKEN).to_string()
                } else {
                    words[self.rng.gen_range(0..words.len())].clone()
                }
            })
            .join(" ")
    }

    /// Consumes a shuffled copy of the quotes, reshuffling whenever it runs dry.
    fn quote_triplets(&mut self, mut quotes: Vec<String>, count: usize) -> Vec<Triplet> {
        if quotes.is_empty() {
            return Vec::new();
        }

        quotes.shuffle(&mut self.rng);
        let mut next = 0;

        (0..count)
            .map(|_| {
                (0..ROWS_PER_TRIPLET)
                    .map(|_| {
                        if next >= quotes.len() {
                            debug!(quotes = quotes.len(), "quote list exhausted, reshuffling");
                            quotes.shuffle(&mut self.rng);
                            next = 0;
                        }
                        next += 1;
                        quotes[next - 1].clone()
                    })
                    .collect()
            })
            .collect()
    }
}
