//! `roboscope seek` — one-shot time-range query.

use roboscope_core::protocol::SeekRequest;

use crate::client::Client;

pub fn run(
    server: &str,
    session_id: &str,
    start: f64,
    end: f64,
    topics: Option<&str>,
    limit: usize,
    json: bool,
) {
    let mut req = SeekRequest::new(start, end);
    req.topics = topics.map(super::parse_topic_filter);
    req.limit = limit;

    if !req.is_valid() {
        eprintln!("Invalid range: end ({end}) must be greater than start ({start})");
        std::process::exit(1);
    }

    let client = Client::new(server);
    let messages = match client.seek(session_id, &req) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Seek failed for {session_id}: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&messages) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize response: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if messages.is_empty() {
        println!("No samples in [{start}, {end}] for {session_id}");
        return;
    }

    println!("{:>10}  {:<28} {}", "Time", "Topic", "Payload");
    println!("{}", "-".repeat(80));
    for msg in &messages {
        println!(
            "{:>10.3}  {:<28} {}",
            msg.timestamp,
            super::truncate(&msg.topic, 28),
            super::payload_preview(msg),
        );
    }
    println!(
        "\n{} sample(s) in [{start}, {end}] (limit {})",
        messages.len(),
        req.clamped_limit()
    );
}
