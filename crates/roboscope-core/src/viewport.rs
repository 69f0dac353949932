//! The user-visible time window.

/// Narrowest window the controller will produce, in seconds. Zoom presets
/// are far wider than this; it only guards against a degenerate zero-width
/// window on pathological input.
pub const MIN_WIDTH: f64 = 0.001;

/// Default window width for a freshly opened session, in seconds.
pub const DEFAULT_WIDTH: f64 = 10.0;

/// Visible time range `[start, end)`, always inside `[0, duration]` with
/// `start < end`. Pans and playback advances preserve the width; only
/// explicit width presets change it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub start: f64,
    pub end: f64,
}

impl Viewport {
    /// Initial window for a session: the default width, or the whole
    /// session when it is shorter than that.
    pub fn initial(duration: f64) -> Self {
        Self::clamped(0.0, DEFAULT_WIDTH, duration)
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Shift the window to a new start, keeping the width fixed.
    pub fn pan_to(&self, new_start: f64, duration: f64) -> Self {
        Self::clamped(new_start, self.width(), duration)
    }

    /// Re-center the current window on its midpoint with a new width.
    pub fn set_width(&self, width: f64, duration: f64) -> Self {
        Self::clamped(self.midpoint() - width / 2.0, width, duration)
    }

    /// Build a window of `width` starting as close to `start` as the
    /// session bounds allow.
    pub fn clamped(start: f64, width: f64, duration: f64) -> Self {
        let width = width.max(MIN_WIDTH);
        if duration > 0.0 && width >= duration {
            // Window wider than the session: show all of it.
            return Self {
                start: 0.0,
                end: duration,
            };
        }
        let max_start = if duration > 0.0 {
            duration - width
        } else {
            // Duration unknown (still recording): anchor at zero, keep width.
            0.0
        };
        let start = start.clamp(0.0, max_start.max(0.0));
        Self {
            start,
            end: start + width,
        }
    }
}
