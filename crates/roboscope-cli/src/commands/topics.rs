//! `roboscope topics` — list a session's topics.

use roboscope_core::protocol::TopicKind;

use crate::client::Client;

pub fn run(server: &str, session_id: &str, json: bool) {
    let client = Client::new(server);
    let topics = match client.topics(session_id) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to fetch topics for {session_id}: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&topics) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize response: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if topics.is_empty() {
        println!("No topics recorded for {session_id}");
        return;
    }

    println!(
        "{:<28} {:<10} {:>9} {:>10} {:>10} {:>8}",
        "Topic", "Kind", "Samples", "First", "Last", "Hz"
    );
    println!("{}", "-".repeat(80));

    for topic in &topics {
        let kind = match topic.kind() {
            TopicKind::Numeric => "numeric",
            TopicKind::Image => "image",
        };
        let hz = topic
            .avg_frequency
            .map(|f| format!("{f:.1}"))
            .unwrap_or_else(|| "—".into());
        println!(
            "{:<28} {:<10} {:>9} {:>10.2} {:>10.2} {:>8}",
            super::truncate(&topic.topic, 28),
            kind,
            topic.message_count,
            topic.first_time,
            topic.last_time,
            hz,
        );
    }

    println!("\n{} topic(s); image topics are excluded from the viewer", topics.len());
}
