//! Built-in demo session so the viewer can run without a real recording.
//!
//! Mirrors the simulated 6-DOF arm the upstream mock robot streams:
//! sinusoidal joint positions and velocities at 10 Hz, a gripper running a
//! 10-second pick-and-place cycle, and a camera topic that exists only to
//! exercise image-topic filtering in the catalog.

use rand::Rng;
use serde_json::json;
use uuid::Uuid;

use roboscope_core::protocol::{
    Message, Session, SessionSource, SessionStatus, TopicSummary,
};

use crate::store::SessionArchive;

const JOINTS: usize = 6;
const FPS: f64 = 10.0;

/// 6-DOF joint positions + velocities with sinusoidal motion.
fn joint_states(t: f64) -> Vec<f64> {
    let mut vals = Vec::with_capacity(JOINTS * 2);
    for i in 0..JOINTS {
        let freq = 0.5 + i as f64 * 0.3;
        let amp = 1.0 + i as f64 * 0.2;
        vals.push((t * freq).sin() * amp);
    }
    for i in 0..JOINTS {
        let freq = 0.5 + i as f64 * 0.3;
        vals.push((t * freq).cos() * (0.5 + i as f64 * 0.3));
    }
    vals
}

/// Gripper with a simulated pick-and-place cycle: position, force, contact.
fn gripper_state(t: f64, rng: &mut impl Rng) -> Vec<f64> {
    let cycle = (t % 10.0) / 10.0;
    let position = if cycle < 0.5 { 0.8 } else { 0.2 };
    let force = if position < 0.5 {
        rng.random_range(0.1..2.0)
    } else {
        0.0
    };
    let contact = position < 0.5 && force > 1.0;
    vec![position, force, f64::from(u8::from(contact))]
}

/// Generate a complete demo archive of the given length in seconds.
pub fn demo_archive(duration: f64) -> SessionArchive {
    let session_id = format!("demo-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let mut rng = rand::rng();

    let mut messages = Vec::new();
    let mut frame: i64 = 0;
    let mut t = 0.0;
    while t < duration {
        messages.push(Message {
            id: Some(frame * 3),
            session_id: session_id.clone(),
            timestamp: t,
            topic: "/joint_states".into(),
            data_type: "float32[]".into(),
            data: Some(json!(joint_states(t))),
            image_path: None,
            frame_index: Some(frame),
        });
        messages.push(Message {
            id: Some(frame * 3 + 1),
            session_id: session_id.clone(),
            timestamp: t,
            topic: "/gripper_state".into(),
            data_type: "float32[]".into(),
            data: Some(json!(gripper_state(t, &mut rng))),
            image_path: None,
            frame_index: Some(frame),
        });
        // Camera at half rate; no payload to decode, just a reference.
        if frame % 2 == 0 {
            messages.push(Message {
                id: Some(frame * 3 + 2),
                session_id: session_id.clone(),
                timestamp: t,
                topic: "/camera/front".into(),
                data_type: "image_ref".into(),
                data: None,
                image_path: Some(format!("images/{session_id}/{frame}.jpg")),
                frame_index: Some(frame),
            });
        }
        frame += 1;
        t = frame as f64 / FPS;
    }

    let total_frames = frame as u64;
    let session = Session {
        session_id: session_id.clone(),
        source: SessionSource::Live,
        dataset_name: None,
        episode_index: None,
        task: Some("pick and place (simulated)".into()),
        robot_type: Some("mock_6dof".into()),
        fps: Some(FPS),
        start_time: 0.0,
        end_time: Some(duration),
        total_frames,
        status: SessionStatus::Completed,
        outcome: None,
        total_reward: None,
        summary: Some("Built-in demo session".into()),
        created_at: None,
    };

    let topics = summarize_topics(&session_id, &messages);

    SessionArchive {
        session,
        topics,
        messages,
    }
}

/// Per-topic counts/ranges, computed the way the upstream store derives its
/// `topics` table from the messages.
fn summarize_topics(session_id: &str, messages: &[Message]) -> Vec<TopicSummary> {
    let mut topics: Vec<TopicSummary> = Vec::new();
    for msg in messages {
        match topics.iter_mut().find(|t| t.topic == msg.topic) {
            Some(summary) => {
                summary.message_count += 1;
                summary.first_time = summary.first_time.min(msg.timestamp);
                summary.last_time = summary.last_time.max(msg.timestamp);
            }
            None => topics.push(TopicSummary {
                session_id: session_id.into(),
                topic: msg.topic.clone(),
                message_count: 1,
                first_time: msg.timestamp,
                last_time: msg.timestamp,
                avg_frequency: None,
                data_type: msg.data_type.clone(),
                shape: None,
                feature_names: None,
            }),
        }
    }
    for summary in &mut topics {
        if summary.last_time > summary.first_time {
            summary.avg_frequency =
                Some(summary.message_count as f64 / (summary.last_time - summary.first_time));
        }
    }
    topics.sort_by(|a, b| a.topic.cmp(&b.topic));
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use roboscope_core::protocol::TopicKind;
    use roboscope_core::sample::parse_sample;

    #[test]
    fn demo_covers_the_requested_duration() {
        let archive = demo_archive(12.0);
        assert_eq!(archive.session.duration(), 12.0);
        let last = archive.messages.last().unwrap();
        assert!(last.timestamp < 12.0);
        assert_eq!(archive.session.total_frames, 120);
    }

    #[test]
    fn demo_has_two_numeric_topics_and_one_image_topic() {
        let archive = demo_archive(5.0);
        assert_eq!(archive.topics.len(), 3);
        let numeric: Vec<&str> = archive
            .topics
            .iter()
            .filter(|t| t.kind() == TopicKind::Numeric)
            .map(|t| t.topic.as_str())
            .collect();
        assert_eq!(numeric, vec!["/gripper_state", "/joint_states"]);
    }

    #[test]
    fn numeric_payloads_decode_to_the_expected_shapes() {
        let archive = demo_archive(2.0);
        for msg in &archive.messages {
            match msg.topic.as_str() {
                "/joint_states" => {
                    assert_eq!(parse_sample(msg).unwrap().vals.len(), 12);
                }
                "/gripper_state" => {
                    let p = parse_sample(msg).unwrap();
                    assert_eq!(p.vals.len(), 3);
                    assert!(p.vals[2] == 0.0 || p.vals[2] == 1.0);
                }
                "/camera/front" => {
                    assert!(parse_sample(msg).is_none(), "image refs don't parse");
                    assert!(msg.image_path.is_some());
                }
                other => panic!("unexpected topic {other}"),
            }
        }
    }

    #[test]
    fn topic_summaries_count_messages() {
        let archive = demo_archive(10.0);
        let joints = archive
            .topics
            .iter()
            .find(|t| t.topic == "/joint_states")
            .unwrap();
        assert_eq!(joints.message_count, 100);
        assert_eq!(joints.first_time, 0.0);
        let freq = joints.avg_frequency.unwrap();
        assert!((freq - 10.0).abs() < 0.2, "expected ~10 Hz, got {freq}");
    }

    #[test]
    fn session_ids_are_unique() {
        let a = demo_archive(1.0);
        let b = demo_archive(1.0);
        assert_ne!(a.session.session_id, b.session.session_id);
    }
}
