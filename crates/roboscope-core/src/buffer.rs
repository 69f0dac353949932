//! The resident data slice and the coverage policy that refreshes it.

use std::collections::BTreeMap;

use crate::protocol::Message;
use crate::sample::Point;
use crate::series::group_samples;

/// Fetched range width as a multiple of the visible window width. The
/// fetched range is centered on the window, so a pan in either direction
/// lands on already-buffered data.
pub const BUFFER_MULT: f64 = 3.0;

/// Fraction of the visible window width: when either window edge comes this
/// close to the corresponding buffer edge, a refetch fires. Triggering well
/// before the user can scrub past buffered data costs some redundant
/// fetching near the edges.
pub const REFETCH_THRESHOLD: f64 = 0.25;

/// The currently-resident time slice, grouped by topic.
///
/// Replaced wholesale on every successful fetch; there is no incremental
/// merge. Every buffered point satisfies `start <= t <= end` because the
/// fetch requests exactly `[start, end]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBuffer {
    pub start: f64,
    pub end: f64,
    pub series: BTreeMap<String, Vec<Point>>,
}

impl SeriesBuffer {
    /// The empty buffer: `start == end == 0`, no series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty range means nothing has been fetched yet (or the last
    /// identity change cleared us out).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Build a buffer from a fetch response covering `[start, end]`.
    pub fn from_samples(start: f64, end: f64, samples: &[Message]) -> Self {
        Self {
            start,
            end,
            series: group_samples(samples),
        }
    }

    /// Total buffered point count across all topics.
    pub fn point_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}

/// Target fetch range for a visible window: over-provision to
/// [`BUFFER_MULT`]× the window width, centered on it, clamped to the
/// session bounds.
pub fn fetch_range(vis_start: f64, vis_end: f64, duration: f64) -> (f64, f64) {
    let window = vis_end - vis_start;
    let pad = window * (BUFFER_MULT - 1.0) / 2.0;
    let start = (vis_start - pad).max(0.0);
    let end = if duration > 0.0 {
        (vis_end + pad).min(duration)
    } else {
        vis_end + pad
    };
    (start, end)
}

/// Does the resident buffer still cover the visible window comfortably?
///
/// A fetch is needed when the buffer is empty, or when either visible edge
/// is within a quarter window width of the corresponding buffer edge.
pub fn needs_fetch(buffer: &SeriesBuffer, vis_start: f64, vis_end: f64) -> bool {
    if buffer.is_empty() {
        return true;
    }
    let window = vis_end - vis_start;
    let threshold = window * REFETCH_THRESHOLD;
    vis_start < buffer.start + threshold || vis_end > buffer.end - threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn buffer(start: f64, end: f64) -> SeriesBuffer {
        SeriesBuffer {
            start,
            end,
            series: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_buffer_always_needs_a_fetch() {
        assert!(needs_fetch(&SeriesBuffer::empty(), 10.0, 15.0));
        assert!(needs_fetch(&buffer(5.0, 5.0), 10.0, 15.0));
    }

    #[test]
    fn comfortable_margins_do_not_fetch() {
        // Window [10, 15], width 5, threshold 1.25. Distances 3 and 3.
        assert!(!needs_fetch(&buffer(7.0, 18.0), 10.0, 15.0));
    }

    #[test]
    fn near_left_edge_fetches() {
        // Left distance 1 < 1.25.
        assert!(needs_fetch(&buffer(9.0, 18.0), 10.0, 15.0));
    }

    #[test]
    fn near_right_edge_fetches() {
        // Right distance 1 < 1.25.
        assert!(needs_fetch(&buffer(7.0, 16.0), 10.0, 15.0));
    }

    #[test]
    fn exactly_at_threshold_does_not_fetch() {
        // Distances exactly 1.25 on both sides: the comparisons are strict.
        assert!(!needs_fetch(&buffer(8.75, 16.25), 10.0, 15.0));
    }

    #[test]
    fn fetch_range_triples_and_centers() {
        let (start, end) = fetch_range(10.0, 15.0, 100.0);
        assert_eq!((start, end), (5.0, 20.0));
    }

    #[test]
    fn fetch_range_clamps_to_session() {
        assert_eq!(fetch_range(0.0, 5.0, 100.0), (0.0, 10.0));
        assert_eq!(fetch_range(95.0, 100.0, 100.0), (90.0, 100.0));
        assert_eq!(fetch_range(0.0, 5.0, 7.0), (0.0, 7.0));
    }

    #[test]
    fn fetch_range_with_unknown_duration_pads_freely() {
        assert_eq!(fetch_range(10.0, 15.0, 0.0), (5.0, 20.0));
    }

    #[test]
    fn from_samples_groups_and_counts() {
        let samples = vec![
            Message {
                id: None,
                session_id: "s1".into(),
                timestamp: 1.0,
                topic: "/a".into(),
                data_type: "float32[]".into(),
                data: Some(json!([1.0, 2.0])),
                image_path: None,
                frame_index: None,
            },
            Message {
                id: None,
                session_id: "s1".into(),
                timestamp: 2.0,
                topic: "/b".into(),
                data_type: "float32[]".into(),
                data: Some(json!("not parseable")),
                image_path: None,
                frame_index: None,
            },
        ];
        let buf = SeriesBuffer::from_samples(0.0, 5.0, &samples);
        assert!(!buf.is_empty());
        assert_eq!(buf.point_count(), 1);
        assert_eq!(buf.series.len(), 1);
    }
}
