//! The viewer engine: one struct the host event loop drives.
//!
//! Owns the viewport, the playback clock, and the resident buffer, and
//! decides when a fetch is needed. The engine performs no I/O: it emits
//! [`FetchRequest`]s from [`ViewerEngine::poll_fetch`] and the host posts
//! the outcome back through [`ViewerEngine::complete_fetch`]. At most one
//! fetch is outstanding at a time; a completion carrying an outdated
//! session/topic identity is discarded rather than applied.

use crate::buffer::{SeriesBuffer, fetch_range, needs_fetch};
use crate::playback::PlaybackClock;
use crate::protocol::{DEFAULT_SEEK_LIMIT, Message};
use crate::scene::{PlotRect, Scene, build_scene};
use crate::viewport::Viewport;

/// Identity token for one issued fetch.
///
/// `generation` pins the session + topic-set identity the fetch was issued
/// for; `start`/`end` are the requested range, which becomes the buffer
/// range when the fetch lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    pub id: u64,
    generation: u64,
    start: f64,
    end: f64,
}

/// One fetch the host must run against the query service.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub session_id: String,
    pub start: f64,
    pub end: f64,
    pub topics: Vec<String>,
    pub limit: usize,
}

/// What came back from the service. The error string is only surfaced to
/// the host's status display; the engine just keeps the previous buffer.
pub type FetchOutcome = Result<Vec<Message>, String>;

/// Windowed buffering engine for one viewer.
pub struct ViewerEngine {
    session_id: String,
    duration: f64,
    topics: Vec<String>,
    viewport: Viewport,
    clock: PlaybackClock,
    buffer: SeriesBuffer,
    limit: usize,
    /// Bumped on every session/topic-set change; completions from an older
    /// generation are stale.
    generation: u64,
    /// Identity changed since the buffer was filled: the next coverage
    /// check fetches unconditionally.
    dirty: bool,
    in_flight: Option<FetchTicket>,
    next_ticket: u64,
    last_error: Option<String>,
}

impl ViewerEngine {
    pub fn new(session_id: impl Into<String>, duration: f64, topics: Vec<String>) -> Self {
        Self {
            session_id: session_id.into(),
            duration,
            topics,
            viewport: Viewport::initial(duration),
            clock: PlaybackClock::new(),
            buffer: SeriesBuffer::empty(),
            limit: DEFAULT_SEEK_LIMIT,
            generation: 0,
            dirty: false,
            in_flight: None,
            next_ticket: 0,
            last_error: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn buffer(&self) -> &SeriesBuffer {
        &self.buffer
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Per-fetch sample cap forwarded to the service.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Switch to a different session. Resets the viewport and clears the
    /// buffer; any in-flight fetch becomes stale.
    pub fn set_session(&mut self, session_id: impl Into<String>, duration: f64) {
        self.session_id = session_id.into();
        self.duration = duration;
        self.viewport = Viewport::initial(duration);
        self.buffer = SeriesBuffer::empty();
        self.clock.stop();
        self.generation += 1;
        self.dirty = true;
    }

    /// Replace the active topic set. The buffered data keeps rendering
    /// until the forced refetch lands, but its content shape no longer
    /// matches, so the next coverage check fetches unconditionally and any
    /// in-flight fetch becomes stale.
    pub fn set_topics(&mut self, topics: Vec<String>) {
        if topics == self.topics {
            return;
        }
        self.topics = topics;
        self.generation += 1;
        self.dirty = true;
    }

    // --- Viewport operations ---

    pub fn pan_to(&mut self, new_start: f64) {
        self.viewport = self.viewport.pan_to(new_start, self.duration);
    }

    pub fn pan_by(&mut self, delta: f64) {
        self.pan_to(self.viewport.start + delta);
    }

    pub fn set_width(&mut self, width: f64) {
        self.viewport = self.viewport.set_width(width, self.duration);
    }

    // --- Playback ---

    pub fn toggle_playback(&mut self) {
        self.clock.toggle();
    }

    pub fn stop_playback(&mut self) {
        self.clock.stop();
    }

    /// Advance playback. `now` is a monotonic timestamp in seconds.
    /// Returns true when the viewport moved.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.clock.tick(now, self.viewport, self.duration) {
            Some(viewport) => {
                self.viewport = viewport;
                true
            }
            None => false,
        }
    }

    // --- Fetch lifecycle ---

    /// Coverage check: returns the fetch the host should run now, if any.
    ///
    /// A no-op while a fetch is outstanding (single-flight) — the check
    /// after that fetch completes re-evaluates coverage. With no active
    /// topics there is nothing to fetch.
    pub fn poll_fetch(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() || self.topics.is_empty() {
            return None;
        }
        if !self.dirty && !needs_fetch(&self.buffer, self.viewport.start, self.viewport.end) {
            return None;
        }

        let (start, end) = fetch_range(self.viewport.start, self.viewport.end, self.duration);
        let ticket = FetchTicket {
            id: self.next_ticket,
            generation: self.generation,
            start,
            end,
        };
        self.next_ticket += 1;
        self.in_flight = Some(ticket);

        log::debug!(
            "fetch #{} {}: [{start:.2}, {end:.2}] ({} topics)",
            ticket.id,
            self.session_id,
            self.topics.len()
        );

        Some(FetchRequest {
            ticket,
            session_id: self.session_id.clone(),
            start,
            end,
            topics: self.topics.clone(),
            limit: self.limit,
        })
    }

    /// Apply a fetch outcome.
    ///
    /// Success replaces the buffer wholesale; failure keeps the previous
    /// buffer authoritative. Either way the fetch slot is freed. A ticket
    /// from an outdated generation is discarded without touching the
    /// buffer — its data was fetched for a different session/topic set.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, outcome: FetchOutcome) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if ticket.generation != self.generation {
            log::debug!("fetch #{} discarded: identity changed since issue", ticket.id);
            return;
        }
        match outcome {
            Ok(samples) => {
                self.buffer = SeriesBuffer::from_samples(ticket.start, ticket.end, &samples);
                self.dirty = false;
                self.last_error = None;
            }
            Err(err) => {
                log::warn!("fetch #{} failed: {err}", ticket.id);
                self.last_error = Some(err);
            }
        }
    }

    // --- Rendering ---

    /// Build the drawable scene for the current buffer and viewport.
    pub fn scene(&self, rect: PlotRect) -> Scene {
        build_scene(&self.buffer, self.viewport.start, self.viewport.end, rect)
    }
}
