//! End-of-session metrics.
//!
//! The host only receives [`TypingStats`]: WPM plus the two counters. Accuracy,
//! the percentile score and the rank are derived from those with the tables in
//! this module so every front end ranks a run the same way.

use serde::{Deserialize, Serialize};

pub const CHARS_PER_WORD: f64 = 5.0;

/// Percentile assigned to the fastest WPM bracket; scores are normalised against it.
pub const TOP_PERCENTILE: f64 = 42.86;

const PERCENTILE_TABLE: [(f64, f64); 6] = [
    (25.0, 0.02),
    (35.0, 7.16),
    (45.0, 14.30),
    (60.0, 21.44),
    (80.0, 28.58),
    (120.0, 35.72),
];

const RANK_TABLE: [(f64, Rank); 6] = [
    (16.0, Rank::Asleep),
    (32.0, Rank::Noob),
    (48.0, Rank::Average),
    (64.0, Rank::Pro),
    (80.0, Rank::Hacker),
    (96.0, Rank::God),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Rank {
    Asleep,
    Noob,
    Average,
    Pro,
    Hacker,
    God,
    Legend,
}

/// Words per minute from correct characters only, 5 characters per word.
pub fn wpm(correct_count: usize, elapsed_secs: u32) -> f64 {
    if elapsed_secs == 0 {
        return 0.0;
    }
    let minutes = f64::from(elapsed_secs) / 60.0;
    (correct_count as f64 / CHARS_PER_WORD) / minutes
}

/// Percentage of keystrokes that were correct; 0 when nothing was typed.
pub fn accuracy(correct_count: usize, wrong_count: usize) -> f64 {
    let total = correct_count + wrong_count;
    if total == 0 {
        return 0.0;
    }
    100.0 * correct_count as f64 / total as f64
}

pub fn percentile_for_wpm(wpm: f64) -> f64 {
    PERCENTILE_TABLE
        .iter()
        .find(|(upper, _)| wpm < *upper)
        .map_or(TOP_PERCENTILE, |(_, percentile)| *percentile)
}

pub fn rank_for_score(score: f64) -> Rank {
    RANK_TABLE
        .iter()
        .find(|(upper, _)| score < *upper)
        .map_or(Rank::Legend, |(_, rank)| *rank)
}

/// What a finished session hands back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypingStats {
    pub wpm: f64,
    pub correct_count: usize,
    pub wrong_count: usize,
}

impl TypingStats {
    pub fn new(correct_count: usize, wrong_count: usize, elapsed_secs: u32) -> Self {
        Self {
            wpm: wpm(correct_count, elapsed_secs),
            correct_count,
            wrong_count,
        }
    }

    pub fn total_typed(&self) -> usize {
        self.correct_count + self.wrong_count
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct_count, self.wrong_count)
    }

    pub fn report(&self) -> Report {
        let accuracy = self.accuracy();
        let wpm_percentile = percentile_for_wpm(self.wpm);
        let wpm_score = wpm_percentile / TOP_PERCENTILE * 100.0;
        // geometric mean: a low value on either axis drags the score down
        let combined_score = (wpm_score * accuracy).sqrt();

        Report {
            wpm: self.wpm,
            correct_count: self.correct_count,
            wrong_count: self.wrong_count,
            accuracy,
            wpm_percentile,
            wpm_score,
            combined_score,
            rank: rank_for_score(combined_score),
        }
    }
}

/// Fully derived view of a run, as shown in the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub wpm: f64,
    pub correct_count: usize,
    pub wrong_count: usize,
    pub accuracy: f64,
    pub wpm_percentile: f64,
    pub wpm_score: f64,
    pub combined_score: f64,
    pub rank: Rank,
}
