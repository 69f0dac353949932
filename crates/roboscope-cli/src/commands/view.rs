//! `roboscope view` — the interactive session viewer.

use roboscope_core::protocol::TopicKind;

use crate::client::Client;

pub fn run(server: &str, session_id: Option<&str>, topic_filter: Option<&str>, limit: usize) {
    let client = Client::new(server);

    let session = match session_id {
        Some(id) => match client.get_session(id) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to load session {id}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            // Most recent session in the catalog.
            match client.list_sessions(None) {
                Ok(response) => match response.sessions.into_iter().next() {
                    Some(s) => s,
                    None => {
                        eprintln!("No sessions on {}", client.base());
                        eprintln!("Start one: roboscope serve --demo");
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("Failed to list sessions from {}: {e}", client.base());
                    std::process::exit(1);
                }
            }
        }
    };

    let catalog = match client.topics(&session.session_id) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to fetch topics for {}: {e}", session.session_id);
            std::process::exit(1);
        }
    };

    // Image topics never reach the engine; a --topics filter narrows the
    // initially enabled set further.
    let wanted = topic_filter.map(super::parse_topic_filter);
    let enabled: Vec<bool> = catalog
        .iter()
        .map(|t| {
            t.kind() == TopicKind::Numeric
                && wanted.as_ref().is_none_or(|names| names.contains(&t.topic))
        })
        .collect();

    if !catalog.iter().zip(&enabled).any(|(_, &on)| on) {
        eprintln!(
            "No numeric topics to plot in {} (filter: {})",
            session.session_id,
            topic_filter.unwrap_or("none")
        );
        std::process::exit(1);
    }

    let mut app = crate::tui::app::App::new(client, session, catalog, enabled, limit);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
