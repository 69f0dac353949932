//! Continuous playback of the viewport at wall-clock rate.

use crate::viewport::Viewport;

/// Two-state playback clock: `Stopped` or `Playing`.
///
/// The host calls [`PlaybackClock::tick`] once per animation frame with a
/// monotonic timestamp in seconds. The last-tick marker resets whenever
/// playback starts or stops, so the first tick after a (re)start records
/// the timestamp and advances nothing — a pause never turns into a jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackClock {
    playing: bool,
    last_tick: Option<f64>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn start(&mut self) {
        self.playing = true;
        self.last_tick = None;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Advance the viewport by the time elapsed since the previous tick.
    ///
    /// Reaching the session end clamps the window to
    /// `[duration − width, duration]` and stops — playback never wraps.
    /// Returns the new viewport, or `None` when nothing moved.
    pub fn tick(&mut self, now: f64, viewport: Viewport, duration: f64) -> Option<Viewport> {
        if !self.playing {
            return None;
        }
        let Some(prev) = self.last_tick.replace(now) else {
            return None;
        };
        let dt = now - prev;
        if dt <= 0.0 {
            return None;
        }

        let width = viewport.width();
        let new_start = viewport.start + dt;
        if new_start + width > duration {
            self.stop();
            return Some(Viewport {
                start: (duration - width).max(0.0),
                end: duration.max(width),
            });
        }
        Some(Viewport {
            start: new_start,
            end: new_start + width,
        })
    }
}
