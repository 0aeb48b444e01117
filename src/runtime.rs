use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::{debug, trace};

pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, ticks)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;

    /// A sender feeding this source, used by tickers
    fn sender(&self) -> Sender<AppEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    debug!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if input_tx.send(evt).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

/// Handle to a running periodic tick.
///
/// Cancelling is idempotent and also happens on drop, so a ticker never
/// outlives the value that owns its handle.
#[derive(Debug)]
pub struct TickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self { cancelled }
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            trace!("tick cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts periodic ticks
pub trait Ticker {
    fn interval(&self) -> Duration;
    fn start(&self) -> TickHandle;
}

/// Sends `AppEvent::Tick` into an event channel from a background thread
pub struct ChannelTicker {
    interval: Duration,
    tx: Sender<AppEvent>,
}

impl ChannelTicker {
    pub fn new(interval: Duration, tx: Sender<AppEvent>) -> Self {
        Self { interval, tx }
    }
}

impl Ticker for ChannelTicker {
    fn interval(&self) -> Duration {
        self.interval
    }

    fn start(&self) -> TickHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tx = self.tx.clone();
        let interval = self.interval;

        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::SeqCst) || tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });

        trace!(?interval, "tick started");
        TickHandle::new(cancelled)
    }
}

/// Ticker that never fires on its own; records every handle it hands out
#[derive(Clone, Default)]
pub struct ManualTicker {
    issued: Arc<Mutex<Vec<Arc<AtomicBool>>>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles started and not yet cancelled
    pub fn active(&self) -> usize {
        self.issued
            .lock()
            .map(|issued| {
                issued
                    .iter()
                    .filter(|flag| !flag.load(Ordering::SeqCst))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn started(&self) -> usize {
        self.issued.lock().map(|issued| issued.len()).unwrap_or(0)
    }
}

impl Ticker for ManualTicker {
    fn interval(&self) -> Duration {
        Duration::from_millis(TICK_RATE_MS)
    }

    fn start(&self) -> TickHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        if let Ok(mut issued) = self.issued.lock() {
            issued.push(Arc::clone(&cancelled));
        }
        TickHandle::new(cancelled)
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    pub fn event_source(&self) -> &E {
        &self.event_source
    }

    /// Blocks up to the poll interval; `None` when nothing arrived
    pub fn step(&self) -> Option<AppEvent> {
        self.event_source.recv_timeout(self.poll_interval).ok()
    }
}
