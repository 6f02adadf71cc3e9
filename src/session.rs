//! The typing session state machine.
//!
//! A session walks through the generated triplets one at a time. Each triplet
//! is flattened into a single target string (rows joined by one space) and the
//! user types it slot by slot. Counters survive triplet changes; the typing log
//! and slot states do not.
//!
//! `Fresh` → first keystroke → `Running` → timeout or last triplet finished →
//! `Stopped` → [`TypingSession::reset`] → `Fresh`.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::clock::{Clock, TimeSource};
use crate::error::Result;
use crate::options::Options;
use crate::stats::TypingStats;
use crate::word_generator::{Triplet, TripletGenerator, ROWS_PER_TRIPLET};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotState {
    #[default]
    Pending,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Fresh,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    TimedOut,
    Exhausted,
}

/// One keystroke in the typing log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub typed: char,
    pub correct: bool,
}

/// Outcome of a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputResult {
    /// Affected slot, `None` for the stopped and no-op results.
    pub index: Option<usize>,
    pub typed_char: char,
    pub expected_char: char,
    pub correct: bool,
    pub backspace: bool,
    pub game_stopped: bool,
    pub triplet_advanced: bool,
}

impl InputResult {
    pub fn game_stopped() -> Self {
        Self {
            index: None,
            typed_char: '\0',
            expected_char: '\0',
            correct: false,
            backspace: false,
            game_stopped: true,
            triplet_advanced: false,
        }
    }

    pub fn no_op_backspace() -> Self {
        Self {
            index: None,
            typed_char: '\0',
            expected_char: '\0',
            correct: false,
            backspace: true,
            game_stopped: false,
            triplet_advanced: false,
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.index.is_none()
    }
}

/// Everything a host needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: [String; ROWS_PER_TRIPLET],
    pub target_text: String,
    pub shown: Vec<char>,
    pub state: Vec<SlotState>,
    pub cursor: usize,
    pub running: bool,
    pub remaining_secs: u32,
}

impl Snapshot {
    /// Index of the first slot of each row inside the flat target.
    pub fn row_starts(&self) -> [usize; ROWS_PER_TRIPLET] {
        let mut starts = [0; ROWS_PER_TRIPLET];
        let mut offset = 0;
        for (start, row) in starts.iter_mut().zip(&self.rows) {
            *start = offset;
            offset += row.chars().count() + 1;
        }
        starts
    }
}

/// Flat target: the rows joined by a single space.
pub fn join_rows(rows: &[String]) -> String {
    rows.join(" ")
}

#[derive(Debug)]
pub struct TypingSession<R: Rng = StdRng> {
    options: Options,
    generator: TripletGenerator<R>,
    triplets: Vec<Triplet>,
    triplet_index: usize,
    target: Vec<char>,
    shown: Vec<char>,
    state: Vec<SlotState>,
    cursor: usize,
    typed_log: Vec<Keystroke>,
    correct_count: usize,
    wrong_count: usize,
    running: bool,
    stop_reason: Option<StopReason>,
    clock: Clock,
}

impl<R: Rng> TypingSession<R> {
    /// Builds a session and generates its first set of triplets.
    pub fn new<S: TimeSource + 'static>(
        options: Options,
        generator: TripletGenerator<R>,
        time_source: S,
    ) -> Result<Self> {
        let mut session = Self {
            options,
            generator,
            triplets: Vec::new(),
            triplet_index: 0,
            target: Vec::new(),
            shown: Vec::new(),
            state: Vec::new(),
            cursor: 0,
            typed_log: Vec::new(),
            correct_count: 0,
            wrong_count: 0,
            running: false,
            stop_reason: None,
            clock: Clock::new(options.seconds(), time_source),
        };
        session.reset()?;
        Ok(session)
    }

    /// Regenerates the triplets for the current options and zeroes all progress.
    ///
    /// On error the session is left exactly as it was.
    pub fn reset(&mut self) -> Result<()> {
        let seconds = self.options.seconds();
        let triplets = self.generator.generate_triplets(
            self.options.word_mode,
            self.options.language,
            seconds,
        )?;

        self.triplets = triplets;
        self.triplet_index = 0;
        self.load_current_triplet();
        self.correct_count = 0;
        self.wrong_count = 0;
        self.clock.reset(seconds);
        self.running = true;
        self.stop_reason = None;

        debug!(
            word_mode = %self.options.word_mode,
            language = %self.options.language,
            seconds,
            triplets = self.triplets.len(),
            "session reset"
        );
        Ok(())
    }

    /// Swaps the options and resets. Keeps the old options if generation fails.
    pub fn set_options(&mut self, options: Options) -> Result<()> {
        let previous = std::mem::replace(&mut self.options, options);
        if let Err(err) = self.reset() {
            self.options = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Seconds left on the clock; reaching zero stops the session.
    pub fn remaining_seconds(&mut self) -> u32 {
        let remaining = self.clock.remaining_secs();
        if remaining == 0 && self.running {
            self.stop(StopReason::TimedOut);
        }
        remaining
    }

    pub fn is_running(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_seconds() > 0
    }

    pub fn process_typed(&mut self, ch: char) -> InputResult {
        if !self.is_running() {
            return InputResult::game_stopped();
        }

        if ch.is_control() {
            warn!(code = u32::from(ch), "control character reached the session");
        }

        self.clock.mark_started();

        if self.cursor == self.target.len() && !self.advance_triplet() {
            self.stop(StopReason::Exhausted);
            return InputResult::game_stopped();
        }

        let index = self.cursor;
        let expected = self.target[index];
        let correct = ch == expected;
        if correct {
            self.correct_count += 1;
        } else {
            self.wrong_count += 1;
        }
        self.typed_log.push(Keystroke { typed: ch, correct });
        self.shown[index] = ch;
        self.state[index] = if correct {
            SlotState::Correct
        } else {
            SlotState::Wrong
        };
        self.cursor += 1;

        trace!(index, typed = %ch, expected = %expected, correct, "keystroke");

        let mut triplet_advanced = false;
        if self.cursor == self.target.len() {
            triplet_advanced = self.advance_triplet();
            if !triplet_advanced {
                self.stop(StopReason::Exhausted);
            }
        }

        InputResult {
            index: Some(index),
            typed_char: ch,
            expected_char: expected,
            correct,
            backspace: false,
            game_stopped: false,
            triplet_advanced,
        }
    }

    /// Undoes the last keystroke of the current triplet.
    ///
    /// A correct keystroke gives its point back; a wrong one stays counted.
    pub fn process_backspace(&mut self) -> InputResult {
        if !self.is_running() || self.cursor == 0 {
            return InputResult::no_op_backspace();
        }
        let Some(removed) = self.typed_log.pop() else {
            return InputResult::no_op_backspace();
        };

        self.cursor -= 1;
        if removed.correct {
            self.correct_count = self.correct_count.saturating_sub(1);
        }

        let index = self.cursor;
        let expected = self.target[index];
        self.shown[index] = expected;
        self.state[index] = SlotState::Pending;

        InputResult {
            index: Some(index),
            typed_char: '\0',
            expected_char: expected,
            correct: false,
            backspace: true,
            game_stopped: false,
            triplet_advanced: false,
        }
    }

    /// Moves to the next triplet if there is one. Counters are kept.
    pub fn advance_triplet(&mut self) -> bool {
        if self.triplet_index + 1 >= self.triplets.len() {
            return false;
        }
        self.triplet_index += 1;
        self.load_current_triplet();
        true
    }

    pub fn snapshot(&mut self) -> Snapshot {
        let running = self.is_running();
        let remaining_secs = self.remaining_seconds();
        let rows = self.current_rows();

        Snapshot {
            rows,
            target_text: self.target_text(),
            shown: self.shown.clone(),
            state: self.state.clone(),
            cursor: self.cursor,
            running,
            remaining_secs,
        }
    }

    pub fn typing_stats(&self) -> TypingStats {
        TypingStats::new(
            self.correct_count,
            self.wrong_count,
            self.clock.elapsed_secs(),
        )
    }

    pub fn phase(&mut self) -> Phase {
        if !self.is_running() {
            Phase::Stopped
        } else if self.clock.is_started() {
            Phase::Running
        } else {
            Phase::Fresh
        }
    }

    /// The current triplet's rows, padded with empty strings.
    pub fn current_rows(&self) -> [String; ROWS_PER_TRIPLET] {
        let rows = self
            .triplets
            .get(self.triplet_index)
            .map(Vec::as_slice)
            .unwrap_or_default();
        std::array::from_fn(|i| rows.get(i).cloned().unwrap_or_default())
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    pub fn triplet_index(&self) -> usize {
        self.triplet_index
    }

    pub fn target_text(&self) -> String {
        self.target.iter().collect()
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn wrong_count(&self) -> usize {
        self.wrong_count
    }

    pub fn typed_log(&self) -> &[Keystroke] {
        &self.typed_log
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    fn load_current_triplet(&mut self) {
        let rows = self
            .triplets
            .get(self.triplet_index)
            .map(|rows| join_rows(rows))
            .unwrap_or_default();

        self.target = rows.chars().collect();
        self.shown = self.target.clone();
        self.state = vec![SlotState::Pending; self.target.len()];
        self.cursor = 0;
        self.typed_log.clear();
    }

    fn stop(&mut self, reason: StopReason) {
        self.running = false;
        self.stop_reason = Some(reason);
        info!(
            ?reason,
            correct = self.correct_count,
            wrong = self.wrong_count,
            elapsed_secs = self.clock.elapsed_secs(),
            "session stopped"
        );
    }
}
