use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::clock::{MonotonicSource, TimeSource};
use crate::error::Result;
use crate::language::{Corpus, EmbeddedBundle, ResourceBundle};
use crate::options::Options;
use crate::session::{InputResult, Phase, Snapshot, TypingSession};
use crate::stats::TypingStats;
use crate::word_generator::TripletGenerator;

/// The narrow surface a host talks to.
///
/// Option strings coming from the host are normalised here, so UI selections
/// never produce an error. Only a broken corpus or an unsupported duration can.
#[derive(Debug)]
pub struct Game<R: Rng = StdRng> {
    session: TypingSession<R>,
}

impl Game<StdRng> {
    /// Bundled corpora, entropy-seeded randomness, real monotonic time.
    pub fn new() -> Result<Self> {
        Self::with_parts(
            Options::default(),
            Corpus::new(EmbeddedBundle),
            StdRng::from_entropy(),
            MonotonicSource::new(),
        )
    }

    /// Like [`Game::new`] but with a custom bundle and an optional fixed seed.
    pub fn with_bundle<B: ResourceBundle + 'static>(
        options: Options,
        bundle: B,
        seed: Option<u64>,
    ) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_parts(options, Corpus::new(bundle), rng, MonotonicSource::new())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_parts<S: TimeSource + 'static>(
        options: Options,
        corpus: Corpus,
        rng: R,
        time_source: S,
    ) -> Result<Self> {
        let generator = TripletGenerator::new(corpus, rng);
        let session = TypingSession::new(options, generator, time_source)?;
        Ok(Self { session })
    }

    /// Normalises the three selections and rebuilds the session.
    pub fn apply_options(
        &mut self,
        word_mode: &str,
        language: &str,
        time_mode: &str,
    ) -> Result<()> {
        let options = Options::normalize(word_mode, language, time_mode);
        debug!(word_mode, language, time_mode, ?options, "applying options");
        self.session.set_options(options)
    }

    /// Rebuilds the session with the current options.
    pub fn reset(&mut self) -> Result<()> {
        self.session.reset()
    }

    pub fn process_typed(&mut self, ch: char) -> InputResult {
        self.session.process_typed(ch)
    }

    pub fn process_backspace(&mut self) -> InputResult {
        self.session.process_backspace()
    }

    pub fn remaining_seconds(&mut self) -> u32 {
        self.session.remaining_seconds()
    }

    pub fn is_running(&mut self) -> bool {
        self.session.is_running()
    }

    pub fn phase(&mut self) -> Phase {
        self.session.phase()
    }

    pub fn snapshot(&mut self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn final_stats(&self) -> TypingStats {
        self.session.typing_stats()
    }

    pub fn options(&self) -> Options {
        self.session.options()
    }

    pub fn session(&self) -> &TypingSession<R> {
        &self.session
    }
}
