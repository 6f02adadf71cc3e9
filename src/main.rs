mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::{debug, info, warn};
use typetuto::{
    config::{Config, ConfigStore, FileConfigStore},
    language::{DirBundle, EmbeddedBundle},
    runtime::{Action, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker, TutorEvent},
    Game, Options, Phase, Report, Snapshot,
};

/// typing practice for your terminal: words, numbers and quotes
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = concat!(
        "Timed typing practice in English and Filipino. Type three rows at a time; ",
        "the clock starts with your first keystroke and the run is ranked when time is up."
    )
)]
pub struct Cli {
    /// text to practise on: words, numbers or quotes (defaults to the last choice)
    #[clap(short = 'm', long)]
    mode: Option<String>,

    /// corpus language: eng or fil (defaults to the last choice)
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// session length: 15s, 30s, 60s or 120s (defaults to the last choice)
    #[clap(short = 't', long)]
    time: Option<String>,

    /// fixed seed for reproducible text
    #[clap(long)]
    seed: Option<u64>,

    /// read corpora from this directory instead of the bundled ones
    #[clap(long)]
    corpus_dir: Option<PathBuf>,

    /// append diagnostics to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log at debug level
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Flags win over the stored preferences; both go through normalisation.
    fn resolve_options(&self, stored: &Config) -> Options {
        Options::normalize(
            self.mode.as_deref().unwrap_or(&stored.word_mode),
            self.language.as_deref().unwrap_or(&stored.language),
            self.time.as_deref().unwrap_or(&stored.time_mode),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub game: Game,
    pub snapshot: Snapshot,
    pub last_report: Option<Report>,
    pub notice: Option<String>,
    store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(mut game: Game, store: Box<dyn ConfigStore>) -> Self {
        let snapshot = game.snapshot();
        Self {
            game,
            snapshot,
            last_report: None,
            notice: None,
            store,
        }
    }

    pub fn options(&self) -> Options {
        self.game.options()
    }

    pub fn handle_action(&mut self, action: Action) -> Flow {
        match action {
            Action::Type(ch) => {
                let result = self.game.process_typed(ch);
                if result.game_stopped || self.game.phase() == Phase::Stopped {
                    self.finish();
                }
            }
            Action::Backspace => {
                self.game.process_backspace();
            }
            Action::CycleWordMode => {
                let mut options = self.options();
                options.word_mode = options.word_mode.next();
                self.apply(options);
            }
            Action::CycleLanguage => {
                let mut options = self.options();
                options.language = options.language.next();
                self.apply(options);
            }
            Action::CycleTimeMode => {
                let mut options = self.options();
                options.time_mode = options.time_mode.next();
                self.apply(options);
            }
            Action::Restart => {
                debug!("restart requested");
                if let Err(err) = self.game.reset() {
                    self.report_error(&err);
                }
            }
            Action::Quit => return Flow::Quit,
            Action::Ignore => {}
        }
        self.refresh();
        Flow::Continue
    }

    pub fn on_tick(&mut self) {
        if self.game.phase() == Phase::Stopped {
            self.finish();
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.snapshot = self.game.snapshot();
    }

    /// Captures the result and immediately starts a fresh session.
    fn finish(&mut self) {
        let report = self.game.final_stats().report();
        info!(
            wpm = report.wpm,
            correct = report.correct_count,
            wrong = report.wrong_count,
            rank = %report.rank,
            "run finished"
        );
        self.last_report = Some(report);
        if let Err(err) = self.game.reset() {
            self.report_error(&err);
        }
    }

    fn apply(&mut self, options: Options) {
        let word_mode = options.word_mode.to_string();
        let language = options.language.to_string();
        let time_mode = options.time_mode.to_string();

        match self.game.apply_options(&word_mode, &language, &time_mode) {
            Ok(()) => {
                self.notice = None;
                if let Err(err) = self.store.save(&Config::from(self.options())) {
                    warn!(%err, "could not save preferences");
                }
            }
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&mut self, err: &typetuto::Error) {
        warn!(%err, "session left unchanged");
        self.notice = Some(err.to_string());
    }
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };

    let log_file = OpenOptions::new().create(true).append(true).open(path)?;
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(log_level)
        .init();

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(&cli)?;

    let store = FileConfigStore::new();
    let options = cli.resolve_options(&store.load());
    info!(?options, seed = ?cli.seed, "starting typetuto");

    let game = match &cli.corpus_dir {
        Some(dir) => Game::with_bundle(options, DirBundle::new(dir), cli.seed)?,
        None => Game::with_bundle(options, EmbeddedBundle, cli.seed)?,
    };
    let mut app = App::new(game, Box::new(store));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let flow = match runner.step() {
            TutorEvent::Tick => {
                app.on_tick();
                Flow::Continue
            }
            TutorEvent::Resize => Flow::Continue,
            TutorEvent::Key(key) => app.handle_action(Action::from_key(key)),
        };

        if flow == Flow::Quit {
            break;
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::test_app;
    use super::*;
    use clap::Parser;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use std::time::Duration;
    use typetuto::{
        language::MemoryBundle, runtime::ChannelEventSource, Language, TimeMode, WordMode,
    };

    fn next_expected(app: &App) -> char {
        let session = app.game.session();
        session
            .target_text()
            .chars()
            .nth(session.cursor_index())
            .unwrap()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typetuto"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.language, None);
        assert_eq!(cli.time, None);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.corpus_dir, None);
        assert_eq!(cli.log_file, None);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::parse_from([
            "typetuto",
            "-m",
            "quotes",
            "-l",
            "fil",
            "-t",
            "15s",
            "--seed",
            "42",
            "--corpus-dir",
            "/tmp/corpus",
            "--log-file",
            "/tmp/typetuto.log",
            "--debug",
        ]);

        assert_eq!(cli.mode.as_deref(), Some("quotes"));
        assert_eq!(cli.language.as_deref(), Some("fil"));
        assert_eq!(cli.time.as_deref(), Some("15s"));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.corpus_dir, Some(PathBuf::from("/tmp/corpus")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/typetuto.log")));
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_rejects_non_numeric_seed() {
        assert!(Cli::try_parse_from(["typetuto", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_flags_override_stored_preferences() {
        let stored = Config::from(Options::new(
            WordMode::Numbers,
            Language::Fil,
            TimeMode::Secs120,
        ));

        let cli = Cli::parse_from(["typetuto"]);
        assert_eq!(
            cli.resolve_options(&stored),
            Options::new(WordMode::Numbers, Language::Fil, TimeMode::Secs120)
        );

        let cli = Cli::parse_from(["typetuto", "--time", "30S", "--mode", "Quotes"]);
        assert_eq!(
            cli.resolve_options(&stored),
            Options::new(WordMode::Quotes, Language::Fil, TimeMode::Secs30)
        );

        let cli = Cli::parse_from(["typetuto", "--language", "klingon"]);
        assert_eq!(cli.resolve_options(&stored).language, Language::Eng);
    }

    #[test]
    fn test_app_starts_waiting() {
        let (app, _, _dir) = test_app(MemoryBundle::with_words(&["ab"]), Options::default());

        assert!(app.last_report.is_none());
        assert!(app.snapshot.running);
        assert_eq!(app.snapshot.remaining_secs, 60);
        assert_eq!(app.snapshot.cursor, 0);
    }

    #[test]
    fn test_typing_updates_snapshot() {
        let (mut app, _, _dir) = test_app(MemoryBundle::with_words(&["ab"]), Options::default());

        assert_eq!(app.handle_action(Action::Type('a')), Flow::Continue);
        assert_eq!(app.handle_action(Action::Type('x')), Flow::Continue);
        assert_eq!(app.snapshot.cursor, 2);

        app.handle_action(Action::Backspace);
        assert_eq!(app.snapshot.cursor, 1);
        assert_eq!(app.game.session().wrong_count(), 1);
    }

    #[test]
    fn test_timeout_on_tick_reports_and_resets() {
        let (mut app, source, _dir) =
            test_app(MemoryBundle::with_words(&["ab"]), Options::default());

        for ch in "ab ax".chars() {
            app.handle_action(Action::Type(ch));
        }
        source.advance_secs(60);
        app.on_tick();

        let report = app.last_report.unwrap();
        assert_eq!(report.correct_count, 4);
        assert_eq!(report.wrong_count, 1);
        assert!((report.wpm - 0.8).abs() < 1e-9);
        assert!((report.accuracy - 80.0).abs() < 1e-9);

        assert_eq!(app.game.phase(), Phase::Fresh);
        assert_eq!(app.snapshot.cursor, 0);
        assert_eq!(app.snapshot.remaining_secs, 60);
    }

    #[test]
    fn test_keystroke_after_timeout_finishes_run() {
        let (mut app, source, _dir) =
            test_app(MemoryBundle::with_words(&["ab"]), Options::default());

        app.handle_action(Action::Type('a'));
        source.advance_secs(90);
        app.handle_action(Action::Type('b'));

        let report = app.last_report.unwrap();
        assert_eq!(report.correct_count, 1);
        assert_eq!(report.wrong_count, 0);
        assert_eq!(app.game.phase(), Phase::Fresh);
    }

    #[test]
    fn test_exhausting_text_finishes_run() {
        let options = Options::new(WordMode::Words, Language::Eng, TimeMode::Secs15);
        let (mut app, source, _dir) = test_app(MemoryBundle::with_words(&["a"]), options);
        let expected_chars: usize = app
            .game
            .session()
            .triplets()
            .iter()
            .map(|rows| rows.join(" ").chars().count())
            .sum();

        app.handle_action(Action::Type(next_expected(&app)));
        source.advance_secs(6);

        let mut steps = 0;
        while app.last_report.is_none() && steps < 10_000 {
            let ch = next_expected(&app);
            app.handle_action(Action::Type(ch));
            steps += 1;
        }

        let report = app.last_report.unwrap();
        assert_eq!(report.correct_count, expected_chars);
        assert_eq!(report.wrong_count, 0);
        assert_eq!(report.accuracy, 100.0);
        assert_eq!(app.game.phase(), Phase::Fresh);
    }

    #[test]
    fn test_cycling_options_applies_and_saves() {
        let (mut app, _, dir) = test_app(MemoryBundle::with_words(&["ab"]), Options::default());
        let store = FileConfigStore::with_path(dir.path().join("config.json"));

        app.handle_action(Action::Type('a'));
        app.handle_action(Action::CycleWordMode);
        assert_eq!(app.options().word_mode, WordMode::Numbers);
        assert_eq!(app.snapshot.cursor, 0);
        assert_eq!(store.load().word_mode, "Numbers");

        app.handle_action(Action::CycleLanguage);
        app.handle_action(Action::CycleTimeMode);
        assert_eq!(
            app.options(),
            Options::new(WordMode::Numbers, Language::Fil, TimeMode::Secs120)
        );
        assert_eq!(app.snapshot.remaining_secs, 120);
        assert_eq!(store.load().options(), app.options());
    }

    #[test]
    fn test_failed_option_change_keeps_session() {
        let bundle = MemoryBundle::with_words(&["ab"]).with("quotes/english", "{ broken");
        let (mut app, _, dir) = test_app(bundle, Options::default());
        app.handle_action(Action::CycleWordMode); // numbers
        app.handle_action(Action::Type('1'));
        let before = app.snapshot.clone();

        app.handle_action(Action::CycleWordMode); // quotes, fails to load
        assert_eq!(app.options().word_mode, WordMode::Numbers);
        assert!(app.notice.is_some());
        assert_eq!(app.snapshot.rows, before.rows);
        assert_eq!(
            FileConfigStore::with_path(dir.path().join("config.json"))
                .load()
                .word_mode,
            "Numbers"
        );
    }

    #[test]
    fn test_restart_and_quit() {
        let (mut app, _, _dir) = test_app(MemoryBundle::with_words(&["ab"]), Options::default());
        app.handle_action(Action::Type('a'));
        assert_eq!(app.game.phase(), Phase::Running);

        assert_eq!(app.handle_action(Action::Restart), Flow::Continue);
        assert_eq!(app.game.phase(), Phase::Fresh);
        assert!(app.last_report.is_none());

        assert_eq!(app.handle_action(Action::Ignore), Flow::Continue);
        assert_eq!(app.handle_action(Action::Quit), Flow::Quit);
    }

    #[test]
    fn test_start_tui_quits_on_escape() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let (mut app, _, _dir) = test_app(MemoryBundle::with_words(&["ab"]), Options::default());
        let (tx, rx) = mpsc::channel();
        for code in [KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Esc] {
            tx.send(TutorEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
                .unwrap();
        }
        let runner = Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert_eq!(app.game.session().correct_count(), 2);
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("typetuto"));
    }

    #[test]
    fn test_logging_without_file_is_noop() {
        let cli = Cli::parse_from(["typetuto"]);
        assert!(init_logging(&cli).is_ok());
    }
}
