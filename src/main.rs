pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyforge::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    generator::{drill, DrillGenerator, ParagraphGenerator},
    logging,
    practice::{Practice, PracticeMode},
    registry::{list_rows, registry, RowId},
    runtime::{AppEvent, ChannelTicker, CrosstermEventSource, EventSource, Runner, Ticker},
    session::SessionPhase,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};
use tracing::info;

/// row-by-row character drills and generated paragraphs for typing practice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice typing one keyboard row at a time, or on generated paragraphs, with live WPM and accuracy."
)]
pub struct Cli {
    /// practice mode to start in
    #[clap(short = 'm', long, value_enum)]
    mode: Option<PracticeMode>,

    /// keyboard row to drill first
    #[clap(short = 'r', long, value_enum)]
    row: Option<RowId>,

    /// refresh interval in milliseconds while a session is running
    #[clap(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// number of characters in each drill sequence (character mode only)
    #[clap(short = 'l', long, value_parser = parse_drill_length)]
    length: Option<usize>,

    /// seed the random generator for a reproducible session
    #[clap(long)]
    seed: Option<u64>,

    /// print the available rows and exit
    #[clap(long)]
    list_rows: bool,

    /// print one practice text and exit
    #[clap(long)]
    print: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

fn parse_drill_length(arg: &str) -> Result<usize, String> {
    let length: usize = arg.parse().map_err(|err| format!("{err}"))?;
    if (1..=drill::MAX_TARGET_LENGTH).contains(&length) {
        Ok(length)
    } else {
        Err(format!(
            "drill length must be between 1 and {}",
            drill::MAX_TARGET_LENGTH
        ))
    }
}

impl Cli {
    /// Overlay command line flags on the stored configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(row) = self.row {
            config.start_row = row;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_rate_ms = tick_ms;
        }
        if let Some(length) = self.length {
            config.drill_length = length;
        }
        config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<T: Ticker> {
    pub practice: Practice<'static, T, StdRng>,
    epoch: Instant,
}

impl<T: Ticker> App<T> {
    pub fn new(config: &Config, ticker: T, rng: StdRng) -> Self {
        Self {
            practice: Practice::new(registry(), ticker, rng, config.practice_settings()),
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the app started
    pub fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    pub fn on_key(&mut self, key: KeyEvent, now: u64) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let practice = &mut self.practice;

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('n') if ctrl => practice.reset(now),
            KeyCode::Char('r') if ctrl => {
                if practice.mode() == PracticeMode::Characters {
                    let next = registry().rows().next(practice.row());
                    practice.jump_to_row(next, now);
                }
            }
            KeyCode::Tab => practice.switch_mode(practice.mode().toggled(), now),
            KeyCode::Enter => {
                if practice.phase() == SessionPhase::Complete {
                    practice.reset(now);
                }
            }
            KeyCode::Backspace => {
                if practice.phase() != SessionPhase::Complete {
                    practice.pop_char(now);
                }
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                if practice.phase() != SessionPhase::Complete {
                    practice.push_char(c, now);
                }
            }
            _ => {}
        }

        Flow::Continue
    }
}

/// One practice text, generated the same way the interactive session does
fn practice_text<R: Rng>(config: &Config, rng: &mut R) -> String {
    match config.mode {
        PracticeMode::Characters => DrillGenerator::new(registry(), rng)
            .with_target_length(config.drill_length)
            .generate(config.start_row),
        PracticeMode::Paragraph => ParagraphGenerator::new(registry(), rng).generate(None).text,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        logging::init(&path)?;
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    if cli.list_rows {
        for row in list_rows() {
            println!("{}\t{}", row.id, row.label);
        }
        return Ok(());
    }

    let mut rng = cli.rng();
    if cli.print {
        println!("{}", practice_text(&config, &mut rng));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let ticker = ChannelTicker::new(
        Duration::from_millis(config.tick_rate_ms.max(1)),
        events.sender(),
    );
    let runner = Runner::new(events, ticker.interval());

    let mut app = App::new(&config, ticker, rng);
    info!(mode = %config.mode, row = %config.start_row, "starting practice");
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, T: Ticker, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<T>,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let Some(event) = runner.step() else {
            continue;
        };
        let now = app.now();

        match event {
            AppEvent::Tick => {
                // stale ticks after a session stopped need no redraw
                if !app.practice.on_tick(now) {
                    continue;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key, now) == Flow::Quit {
                    break;
                }
            }
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyforge::runtime::{ManualTicker, TestEventSource};
    use ratatui::backend::TestBackend;

    fn app(config: &Config, ticker: &ManualTicker) -> App<ManualTicker> {
        App::new(config, ticker.clone(), StdRng::seed_from_u64(7))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_target<T: Ticker>(app: &mut App<T>, start: u64, step: u64) -> u64 {
        let target = app.practice.target().to_string();
        let mut now = start;
        for c in target.chars() {
            app.on_key(key(KeyCode::Char(c)), now);
            now += step;
        }
        now
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["keyforge"]);

        assert_eq!(cli.mode, None);
        assert_eq!(cli.row, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.list_rows);
        assert!(!cli.print);
        assert!(!cli.save_config);
        assert_eq!(cli.apply(Config::default()), Config::default());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "keyforge",
            "--mode",
            "paragraph",
            "--row",
            "symbols",
            "--tick-ms",
            "250",
            "-l",
            "60",
        ]);
        let config = cli.apply(Config::default());

        assert_eq!(config.mode, PracticeMode::Paragraph);
        assert_eq!(config.start_row, RowId::Symbols);
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(config.drill_length, 60);
    }

    #[test]
    fn test_cli_keeps_stored_values_without_flags() {
        let stored = Config {
            start_row: RowId::Caps,
            ..Config::default()
        };
        let cli = Cli::parse_from(["keyforge", "--mode", "paragraph"]);
        let config = cli.apply(stored);

        assert_eq!(config.start_row, RowId::Caps);
        assert_eq!(config.mode, PracticeMode::Paragraph);
    }

    #[test]
    fn test_cli_rejects_out_of_range_length() {
        assert!(Cli::try_parse_from(["keyforge", "--length", "0"]).is_err());
        assert!(Cli::try_parse_from(["keyforge", "--length", "-3"]).is_err());
        assert!(Cli::try_parse_from(["keyforge", "--length", "18446744073709551615"]).is_err());

        let cli = Cli::parse_from(["keyforge", "--length", "1000"]);
        assert_eq!(cli.length, Some(drill::MAX_TARGET_LENGTH));
    }

    #[test]
    fn test_cli_rejects_unknown_row() {
        assert!(Cli::try_parse_from(["keyforge", "--row", "qwerty"]).is_err());
    }

    #[test]
    fn test_seeded_practice_text_is_reproducible() {
        let cli = Cli::parse_from(["keyforge", "--seed", "99"]);
        let config = Config::default();

        let first = practice_text(&config, &mut cli.rng());
        let second = practice_text(&config, &mut cli.rng());
        assert_eq!(first, second);
        assert_eq!(first.chars().count(), 120);
    }

    #[test]
    fn test_typing_completes_and_enter_moves_to_next_row() {
        let ticker = ManualTicker::new();
        let mut app = app(&Config::default(), &ticker);

        type_target(&mut app, 0, 250);
        assert_eq!(app.practice.phase(), SessionPhase::Complete);
        assert_eq!(ticker.active(), 0);

        // completed sessions ignore further typing
        app.on_key(key(KeyCode::Char('x')), 40_000);
        app.on_key(key(KeyCode::Backspace), 40_000);
        assert_eq!(app.practice.phase(), SessionPhase::Complete);

        app.on_key(key(KeyCode::Enter), 41_000);
        assert_eq!(app.practice.row(), RowId::Top);
        assert_eq!(app.practice.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_enter_before_completion_is_ignored() {
        let ticker = ManualTicker::new();
        let mut app = app(&Config::default(), &ticker);
        let target = app.practice.target().to_string();

        app.on_key(key(KeyCode::Enter), 0);

        assert_eq!(app.practice.target(), target);
        assert_eq!(app.practice.row(), RowId::Home);
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let ticker = ManualTicker::new();
        let mut app = app(&Config::default(), &ticker);

        app.on_key(key(KeyCode::Char('a')), 0);
        app.on_key(key(KeyCode::Char('b')), 10);
        app.on_key(key(KeyCode::Backspace), 20);

        assert_eq!(app.practice.session().typed(), "a");
    }

    #[test]
    fn test_control_keys() {
        let ticker = ManualTicker::new();
        let mut app = app(&Config::default(), &ticker);

        app.on_key(ctrl('r'), 0);
        assert_eq!(app.practice.row(), RowId::Top);

        app.on_key(ctrl('n'), 0);
        assert_eq!(app.practice.row(), RowId::Bottom);

        app.on_key(key(KeyCode::Tab), 0);
        assert_eq!(app.practice.mode(), PracticeMode::Paragraph);

        // row jumps only apply to character drills
        app.on_key(ctrl('r'), 0);
        assert_eq!(app.practice.row(), RowId::Bottom);

        assert_eq!(app.on_key(ctrl('c'), 0), Flow::Quit);
        assert_eq!(app.on_key(key(KeyCode::Esc), 0), Flow::Quit);
        assert!(app.practice.session().typed().is_empty());
    }

    #[test]
    fn test_start_tui_quits_on_escape() {
        let ticker = ManualTicker::new();
        let mut app = app(&Config::default(), &ticker);
        let es = TestEventSource::new();
        es.sender().send(AppEvent::Key(key(KeyCode::Char('a')))).unwrap();
        es.sender().send(AppEvent::Tick).unwrap();
        es.sender().send(AppEvent::Resize).unwrap();
        es.sender().send(AppEvent::Key(key(KeyCode::Esc))).unwrap();
        let runner = Runner::new(es, Duration::from_millis(10));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert_eq!(app.practice.session().typed(), "a");
        assert_eq!(app.practice.phase(), SessionPhase::Running);
    }
}
