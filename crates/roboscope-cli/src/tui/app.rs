//! TUI application state and event loop.
//!
//! Design: the event loop owns the [`ViewerEngine`] and is the only thing
//! that touches it. Each iteration drains finished fetches, applies a
//! playback tick, runs the coverage check, and redraws. Fetches run on a
//! spawned worker thread (the engine's single-flight ticket guarantees at
//! most one at a time) and post their outcome back over a channel, so the
//! UI never blocks on the network.

use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::TableState;

use roboscope_core::engine::{FetchOutcome, FetchRequest, FetchTicket, ViewerEngine};
use roboscope_core::protocol::{SeekRequest, Session, TopicKind, TopicSummary};

use crate::client::Client;

/// Window widths (seconds) the `[`/`]` keys cycle through.
pub const WIDTH_PRESETS: [f64; 6] = [2.0, 5.0, 10.0, 30.0, 60.0, 120.0];

/// Fraction of the window width one arrow-key pan moves.
const PAN_STEP: f64 = 0.1;

pub struct App {
    client: Arc<Client>,
    session: Session,
    engine: ViewerEngine,
    catalog: Vec<TopicSummary>,
    enabled: Vec<bool>,
    cursor: usize,
    width_idx: usize,
    running: bool,
    /// Monotonic origin for playback timestamps.
    started: Instant,
    table_state: TableState,
    tx: mpsc::Sender<(FetchTicket, FetchOutcome)>,
    rx: mpsc::Receiver<(FetchTicket, FetchOutcome)>,
}

impl App {
    pub fn new(
        client: Client,
        session: Session,
        catalog: Vec<TopicSummary>,
        enabled: Vec<bool>,
        limit: usize,
    ) -> Self {
        let topics = active_topics(&catalog, &enabled);
        let mut engine = ViewerEngine::new(session.session_id.clone(), session.duration(), topics);
        engine.set_limit(limit);

        let width = engine.viewport().width();
        let width_idx = WIDTH_PRESETS
            .iter()
            .position(|&w| w >= width)
            .unwrap_or(WIDTH_PRESETS.len() - 1);

        let (tx, rx) = mpsc::channel();

        Self {
            client: Arc::new(client),
            session,
            engine,
            catalog,
            enabled,
            cursor: 0,
            width_idx,
            running: true,
            started: Instant::now(),
            table_state: TableState::default().with_selected(Some(0)),
            tx,
            rx,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            // Finished fetches first, so this frame draws the newest data.
            while let Ok((ticket, outcome)) = self.rx.try_recv() {
                self.engine.complete_fetch(ticket, outcome);
            }

            self.engine.tick(self.started.elapsed().as_secs_f64());

            if let Some(request) = self.engine.poll_fetch() {
                self.spawn_fetch(request);
            }

            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let mut seek = SeekRequest::new(request.start, request.end);
            seek.topics = Some(request.topics);
            seek.limit = request.limit;

            let outcome = client
                .seek(&request.session_id, &seek)
                .map_err(|e| e.to_string());
            // The receiver is gone when the viewer already quit.
            let _ = tx.send((request.ticket, outcome));
        });
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.table_state.select(Some(self.cursor));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor < self.catalog.len().saturating_sub(1) {
                    self.cursor += 1;
                    self.table_state.select(Some(self.cursor));
                }
            }
            KeyCode::Enter | KeyCode::Char('t') => self.toggle_topic(),
            KeyCode::Char(' ') => self.engine.toggle_playback(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.pan(-PAN_STEP * self.engine.viewport().width());
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.pan(PAN_STEP * self.engine.viewport().width());
            }
            KeyCode::PageUp => self.pan(-self.engine.viewport().width()),
            KeyCode::PageDown => self.pan(self.engine.viewport().width()),
            KeyCode::Home | KeyCode::Char('0') => {
                self.engine.stop_playback();
                self.engine.pan_to(0.0);
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.engine.stop_playback();
                self.engine.pan_to(self.engine.duration());
            }
            KeyCode::Char('[') => self.cycle_width(-1),
            KeyCode::Char(']') => self.cycle_width(1),
            _ => {}
        }
    }

    /// Manual pan implies the user took over from playback.
    fn pan(&mut self, delta: f64) {
        self.engine.stop_playback();
        self.engine.pan_by(delta);
    }

    fn toggle_topic(&mut self) {
        let Some(summary) = self.catalog.get(self.cursor) else {
            return;
        };
        if summary.kind() != TopicKind::Numeric {
            return;
        }
        self.enabled[self.cursor] = !self.enabled[self.cursor];
        self.engine
            .set_topics(active_topics(&self.catalog, &self.enabled));
    }

    fn cycle_width(&mut self, step: isize) {
        let last = WIDTH_PRESETS.len() as isize - 1;
        self.width_idx = (self.width_idx as isize + step).clamp(0, last) as usize;
        self.engine.set_width(WIDTH_PRESETS[self.width_idx]);
    }

    // --- Accessors for the UI ---

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> &ViewerEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &[TopicSummary] {
        &self.catalog
    }

    pub fn enabled(&self) -> &[bool] {
        &self.enabled
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn width_preset(&self) -> f64 {
        WIDTH_PRESETS[self.width_idx]
    }

    pub fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }
}

/// The engine's topic set: enabled numeric topics, in catalog order.
fn active_topics(catalog: &[TopicSummary], enabled: &[bool]) -> Vec<String> {
    catalog
        .iter()
        .zip(enabled)
        .filter(|&(ref summary, &on)| on && summary.kind() == TopicKind::Numeric)
        .map(|(summary, _)| summary.topic.clone())
        .collect()
}
