//! `roboscope export` — download a full session archive.

use crate::client::Client;

pub fn run(server: &str, session_id: &str, output: Option<&str>) {
    let client = Client::new(server);
    let contents = match client.export_raw(session_id) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Export failed for {session_id}: {e}");
            std::process::exit(1);
        }
    };

    let path = output
        .map(str::to_string)
        .unwrap_or_else(|| format!("{session_id}.json"));

    if let Err(e) = std::fs::write(&path, &contents) {
        eprintln!("Failed to write {path}: {e}");
        std::process::exit(1);
    }

    println!("Exported {session_id} to {path} ({} bytes)", contents.len());
    println!("Replay it: roboscope serve --data <dir containing {path}>");
}
