//! `roboscope sessions` — list the session catalog.

use crate::client::Client;

pub fn run(server: &str, source: Option<&str>, json: bool) {
    let client = Client::new(server);
    let response = match client.list_sessions(source) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to list sessions from {server}: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize response: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if response.sessions.is_empty() {
        println!("No sessions on {server}");
        println!("Start the replay server with a demo session: roboscope serve --demo");
        return;
    }

    println!(
        "{:<24} {:<8} {:<14} {:>10} {:>8}  {}",
        "Session", "Source", "Status", "Duration", "Frames", "Task"
    );
    println!("{}", "-".repeat(90));

    for session in &response.sessions {
        println!(
            "{:<24} {:<8} {:<14} {:>10} {:>8}  {}",
            super::truncate(&session.session_id, 24),
            session.source.to_string(),
            session.status.to_string(),
            super::format_duration(session.duration()),
            session.total_frames,
            super::truncate(session.task.as_deref().unwrap_or("—"), 30),
        );
    }

    println!("\n{} session(s) on {server}", response.total);
    println!("Open one: roboscope view --server {server} --session <id>");
}
