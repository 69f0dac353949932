//! Grouping fetched samples into per-topic point series.

use std::collections::BTreeMap;

use crate::protocol::Message;
use crate::sample::{Point, parse_sample};

/// Partition raw samples by topic into time-ordered point lists.
///
/// The service is allowed to return samples in any order; each group is
/// stable-sorted ascending by timestamp, so samples sharing a timestamp
/// keep their arrival order. The grouping key is the topic string exactly
/// as received. Samples whose payload doesn't decode simply don't appear.
pub fn group_samples(samples: &[Message]) -> BTreeMap<String, Vec<Point>> {
    let mut grouped: BTreeMap<String, Vec<Point>> = BTreeMap::new();
    for msg in samples {
        if let Some(point) = parse_sample(msg) {
            grouped.entry(msg.topic.clone()).or_default().push(point);
        }
    }
    for points in grouped.values_mut() {
        points.sort_by(|a, b| a.t.total_cmp(&b.t));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(topic: &str, t: f64, vals: serde_json::Value) -> Message {
        Message {
            id: None,
            session_id: "s1".into(),
            timestamp: t,
            topic: topic.into(),
            data_type: "float32[]".into(),
            data: Some(vals),
            image_path: None,
            frame_index: None,
        }
    }

    #[test]
    fn groups_by_topic_and_sorts_by_time() {
        let samples = vec![
            msg("/gripper_state", 3.0, json!([0.2])),
            msg("/joint_states", 2.0, json!([1.0])),
            msg("/joint_states", 1.0, json!([0.5])),
            msg("/gripper_state", 1.5, json!([0.8])),
        ];
        let grouped = group_samples(&samples);

        assert_eq!(grouped.len(), 2);
        let joints = &grouped["/joint_states"];
        assert_eq!(joints.len(), 2);
        assert_eq!(joints[0].t, 1.0);
        assert_eq!(joints[1].t, 2.0);
        let gripper = &grouped["/gripper_state"];
        assert_eq!(gripper[0].t, 1.5);
        assert_eq!(gripper[1].t, 3.0);
    }

    #[test]
    fn unparsable_samples_are_skipped_without_error() {
        let samples = vec![
            msg("/joint_states", 1.0, json!([1.0])),
            msg("/joint_states", 2.0, json!("broken")),
            msg("/camera/front", 3.0, json!(null)),
        ];
        let grouped = group_samples(&samples);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["/joint_states"].len(), 1);
    }

    #[test]
    fn equal_timestamps_keep_arrival_order() {
        let samples = vec![
            msg("/t", 1.0, json!([1.0])),
            msg("/t", 1.0, json!([2.0])),
            msg("/t", 0.5, json!([0.0])),
            msg("/t", 1.0, json!([3.0])),
        ];
        let grouped = group_samples(&samples);
        let vals: Vec<f64> = grouped["/t"].iter().map(|p| p.vals[0]).collect();
        assert_eq!(vals, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn topic_names_are_not_normalized() {
        let samples = vec![
            msg("/Topic", 1.0, json!([1.0])),
            msg("/topic", 1.0, json!([2.0])),
            msg("/topic ", 1.0, json!([3.0])),
        ];
        assert_eq!(group_samples(&samples).len(), 3);
    }

    #[test]
    fn regrouping_flattened_output_is_idempotent() {
        let samples = vec![
            msg("/b", 2.0, json!([2.0])),
            msg("/a", 1.0, json!([1.0, 1.5])),
            msg("/a", 0.5, json!([0.5])),
            msg("/b", 2.0, json!([2.5])),
        ];
        let once = group_samples(&samples);

        // Flatten back into messages, preserving per-topic order.
        let flattened: Vec<Message> = once
            .iter()
            .flat_map(|(topic, points)| {
                points.iter().map(move |p| {
                    msg(topic, p.t, json!(p.vals))
                })
            })
            .collect();

        let twice = group_samples(&flattened);
        assert_eq!(once, twice);
    }
}
