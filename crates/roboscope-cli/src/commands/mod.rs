pub mod export;
pub mod seek;
pub mod serve;
pub mod sessions;
pub mod topics;
pub mod view;

use roboscope_core::protocol::Message;
use roboscope_core::sample::parse_sample;

/// Format a duration in seconds as "1m 24.5s" / "24.5s".
pub fn format_duration(secs: f64) -> String {
    if secs >= 60.0 {
        let minutes = (secs / 60.0).floor() as u64;
        format!("{minutes}m {:.1}s", secs - minutes as f64 * 60.0)
    } else {
        format!("{secs:.1}s")
    }
}

/// Truncate a string for table display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Short payload preview for one sample: the first few decoded values, or
/// the data type tag when the payload doesn't decode.
pub fn payload_preview(msg: &Message) -> String {
    match parse_sample(msg) {
        Some(point) => {
            let shown: Vec<String> = point.vals.iter().take(4).map(|v| format!("{v:.3}")).collect();
            if point.vals.len() > 4 {
                format!("[{}, … {} dims]", shown.join(", "), point.vals.len())
            } else {
                format!("[{}]", shown.join(", "))
            }
        }
        None => format!("<{}>", msg.data_type),
    }
}

/// Split a `--topics a,b,c` argument into trimmed names.
pub fn parse_topic_filter(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_duration_short_and_long() {
        assert_eq!(format_duration(24.5), "24.5s");
        assert_eq!(format_duration(84.5), "1m 24.5s");
        assert_eq!(format_duration(0.0), "0.0s");
    }

    #[test]
    fn truncate_leaves_short_strings() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abcdefghij", 10), "abcdefghij");
    }

    #[test]
    fn truncate_marks_long_strings() {
        assert_eq!(truncate("abcdefghijk", 6), "abcde…");
    }

    #[test]
    fn parse_topic_filter_trims_and_drops_empties() {
        assert_eq!(
            parse_topic_filter("/a, /b ,,/c"),
            vec!["/a".to_string(), "/b".to_string(), "/c".to_string()]
        );
        assert!(parse_topic_filter("").is_empty());
    }

    #[test]
    fn payload_preview_shows_values_or_type() {
        let mut msg = Message {
            id: None,
            session_id: "s".into(),
            timestamp: 0.0,
            topic: "/t".into(),
            data_type: "float32[]".into(),
            data: Some(json!([1.0, 2.0])),
            image_path: None,
            frame_index: None,
        };
        assert_eq!(payload_preview(&msg), "[1.000, 2.000]");

        msg.data = Some(json!([0.0, 1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(payload_preview(&msg), "[0.000, 1.000, 2.000, 3.000, … 6 dims]");

        msg.data = None;
        msg.data_type = "image_ref".into();
        assert_eq!(payload_preview(&msg), "<image_ref>");
    }
}
