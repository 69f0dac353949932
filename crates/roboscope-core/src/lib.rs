//! # roboscope-core
//!
//! **Scrub through hours of robot telemetry while holding seconds of it in memory.**
//!
//! `roboscope-core` is the windowed buffering and rendering engine behind the
//! roboscope viewer. Given a session of irregularly-sampled, multi-topic
//! telemetry living in a remote store, it keeps a bounded slice of it
//! resident, decides when that slice needs refreshing as the visible window
//! moves, and turns the resident data into a drawable scene.
//!
//! ## Quick Start
//!
//! ```
//! use roboscope_core::{PlotRect, ViewerEngine};
//!
//! let mut engine = ViewerEngine::new("sess-01", 120.0, vec!["/joint_states".into()]);
//!
//! // The engine never performs I/O itself. It hands out fetch requests...
//! let request = engine.poll_fetch().expect("empty buffer needs a fetch");
//!
//! // ...the host runs them and posts the outcome back.
//! engine.complete_fetch(request.ticket, Ok(vec![]));
//!
//! // Rendering is a pure function of the buffer and the viewport.
//! let scene = engine.scene(PlotRect::new(0.0, 0.0, 120.0, 40.0));
//! assert!(scene.lines.is_empty());
//! ```
//!
//! ## Architecture
//!
//! Samples → Parser → Grouper → Buffer ← coverage policy ← Viewport ← Playback
//!
//! The pieces are deliberately I/O-free and single-threaded: the host event
//! loop owns a [`ViewerEngine`], forwards user input to it, executes the
//! [`FetchRequest`]s it emits (one at a time — the engine enforces
//! single-flight), and redraws from [`ViewerEngine::scene`] every frame.
//! Stale-but-available data is always drawable; a fetch that fails or
//! arrives for an outdated session/topic identity changes nothing.

pub mod buffer;
pub mod engine;
pub mod playback;
pub mod protocol;
pub mod sample;
pub mod scene;
pub mod series;
pub mod viewport;

pub use buffer::{BUFFER_MULT, REFETCH_THRESHOLD, SeriesBuffer, fetch_range, needs_fetch};
pub use engine::{FetchOutcome, FetchRequest, FetchTicket, ViewerEngine};
pub use playback::PlaybackClock;
pub use protocol::{
    DEFAULT_SEEK_LIMIT, MAX_SEEK_LIMIT, Message, SeekRequest, Session, SessionListResponse,
    SessionOutcome, SessionSource, SessionStatus, TopicKind, TopicSummary,
};
pub use sample::{Point, parse_payload, parse_sample};
pub use scene::{
    GRID_DIVS, OVERSCAN, PALETTE_LEN, PlotRect, Scene, SeriesLine, ValueBounds, build_scene,
};
pub use series::group_samples;
pub use viewport::Viewport;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
