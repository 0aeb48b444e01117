use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::generator::{drill, DrillGenerator, GeneratedParagraph, ParagraphGenerator};
use crate::registry::{Registry, RowId};
use crate::runtime::{TickHandle, Ticker};
use crate::scoring::Metrics;
use crate::session::{SessionPhase, TypingSession};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PracticeMode {
    #[default]
    Characters,
    Paragraph,
}

impl PracticeMode {
    pub fn toggled(self) -> Self {
        match self {
            PracticeMode::Characters => PracticeMode::Paragraph,
            PracticeMode::Paragraph => PracticeMode::Characters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeSettings {
    pub mode: PracticeMode,
    pub row: RowId,
    pub drill_length: usize,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            mode: PracticeMode::Characters,
            row: RowId::Home,
            drill_length: drill::TARGET_LENGTH,
        }
    }
}

/// Drives practice: picks target text, owns the current session and its refresh tick.
///
/// The tick runs only while the session is running. It is stopped on completion,
/// reset, mode switch, row jump, and when the `Practice` is dropped.
pub struct Practice<'a, T: Ticker, R: Rng> {
    registry: &'a Registry,
    ticker: T,
    rng: R,
    mode: PracticeMode,
    row: RowId,
    drill_length: usize,
    /// Present only while in paragraph mode
    paragraph: Option<GeneratedParagraph>,
    session: TypingSession,
    tick: Option<TickHandle>,
    now: u64,
}

impl<'a, T: Ticker, R: Rng> Practice<'a, T, R> {
    pub fn new(registry: &'a Registry, ticker: T, mut rng: R, settings: PracticeSettings) -> Self {
        let (target, paragraph) = match settings.mode {
            PracticeMode::Characters => {
                let sequence = DrillGenerator::new(registry, &mut rng)
                    .with_target_length(settings.drill_length)
                    .generate(settings.row);
                (sequence, None)
            }
            PracticeMode::Paragraph => {
                let paragraph = ParagraphGenerator::new(registry, &mut rng).generate(None);
                (paragraph.text.clone(), Some(paragraph))
            }
        };

        Self {
            registry,
            ticker,
            rng,
            mode: settings.mode,
            row: settings.row,
            drill_length: settings.drill_length,
            paragraph,
            session: TypingSession::new(target),
            tick: None,
            now: 0,
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn row(&self) -> RowId {
        self.row
    }

    pub fn row_label(&self) -> &str {
        &self.registry.rows().get(self.row).label
    }

    pub fn next_row_label(&self) -> &str {
        let rows = self.registry.rows();
        &rows.get(rows.next(self.row)).label
    }

    /// The paragraph being typed; `None` in characters mode
    pub fn paragraph(&self) -> Option<&GeneratedParagraph> {
        self.paragraph.as_ref()
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    pub fn target(&self) -> &str {
        self.session.target()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn is_ticking(&self) -> bool {
        self.tick.as_ref().is_some_and(|tick| !tick.is_cancelled())
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn metrics(&self) -> Metrics {
        self.session.metrics(self.now)
    }

    /// Feed the full input text as it stands after a keystroke
    pub fn on_input(&mut self, raw: &str, now: u64) -> SessionPhase {
        self.now = now;
        let phase = self.session.accept_input(raw, now);
        self.sync_tick(phase);
        phase
    }

    pub fn push_char(&mut self, c: char, now: u64) -> SessionPhase {
        let mut next = self.session.typed().to_string();
        next.push(c);
        self.on_input(&next, now)
    }

    pub fn pop_char(&mut self, now: u64) -> SessionPhase {
        let mut next = self.session.typed().to_string();
        next.pop();
        self.on_input(&next, now)
    }

    /// Refresh the displayed time. Returns false for ticks that arrive after the
    /// session stopped running.
    pub fn on_tick(&mut self, now: u64) -> bool {
        if self.session.phase() != SessionPhase::Running {
            return false;
        }
        self.now = now;
        true
    }

    /// Start over with new text: the next row in characters mode, a different
    /// paragraph in paragraph mode.
    pub fn reset(&mut self, now: u64) {
        match self.mode {
            PracticeMode::Characters => {
                self.row = self.registry.rows().next(self.row);
                self.restart_drill(now);
            }
            PracticeMode::Paragraph => {
                let previous = self.paragraph.take().map(|paragraph| paragraph.seed);
                self.restart_paragraph(previous.as_deref(), now);
            }
        }
        info!(mode = %self.mode, row = %self.row, "practice reset");
    }

    pub fn switch_mode(&mut self, mode: PracticeMode, now: u64) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        match mode {
            PracticeMode::Characters => {
                self.paragraph = None;
                self.restart_drill(now);
            }
            PracticeMode::Paragraph => self.restart_paragraph(None, now),
        }
        info!(%mode, "switched practice mode");
    }

    /// Drill `row` right away, starting a fresh sequence
    pub fn jump_to_row(&mut self, row: RowId, now: u64) {
        self.row = row;
        if self.mode == PracticeMode::Characters {
            self.restart_drill(now);
        }
        info!(%row, "jumped to row");
    }

    fn restart_drill(&mut self, now: u64) {
        let sequence = DrillGenerator::new(self.registry, &mut self.rng)
            .with_target_length(self.drill_length)
            .generate(self.row);
        self.replace_session(sequence, now);
    }

    fn restart_paragraph(&mut self, previous_seed: Option<&str>, now: u64) {
        let paragraph =
            ParagraphGenerator::new(self.registry, &mut self.rng).generate(previous_seed);
        self.replace_session(paragraph.text.clone(), now);
        self.paragraph = Some(paragraph);
    }

    fn replace_session(&mut self, target: String, now: u64) {
        self.stop_tick();
        self.session = TypingSession::new(target);
        self.now = now;
    }

    fn sync_tick(&mut self, phase: SessionPhase) {
        match phase {
            SessionPhase::Running => {
                if self.tick.is_none() {
                    debug!("starting refresh tick");
                    self.tick = Some(self.ticker.start());
                }
            }
            SessionPhase::Idle | SessionPhase::Complete => self.stop_tick(),
        }
    }

    fn stop_tick(&mut self) {
        if let Some(tick) = self.tick.take() {
            tick.cancel();
        }
    }
}
