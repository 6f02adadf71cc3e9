// Library surface for the engine, plus host plumbing that can be tested headless.
// The engine modules never depend on the terminal stack.
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod language;
pub mod options;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod word_generator;

pub use error::{Error, Result};
pub use game::Game;
pub use options::{Language, Options, TimeMode, WordMode};
pub use session::{InputResult, Phase, SlotState, Snapshot};
pub use stats::{Rank, Report, TypingStats};
