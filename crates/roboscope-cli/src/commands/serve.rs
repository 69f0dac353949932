//! `roboscope serve` — run the replay server.

use std::path::Path;

pub fn run(host: &str, port: u16, data: Option<&str>, demo: bool, demo_duration: f64) {
    let demo_secs = demo.then_some(demo_duration);
    let store = match roboscope_server::build_store(data.map(Path::new), demo_secs) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to load session archives: {e}");
            std::process::exit(1);
        }
    };

    if store.is_empty() {
        eprintln!("No sessions to serve.");
        eprintln!("Pass --data <dir> with archive JSON files, or --demo for a generated session.");
        std::process::exit(1);
    }

    let base = format!("http://{host}:{port}");
    println!("roboscope replay server v{}", roboscope_core::VERSION);
    println!("   {base}");
    println!("   {} session(s) loaded", store.len());
    println!();
    println!("   Endpoints:");
    println!("     GET  /                        API index (try: curl {base})");
    println!("     GET  /sessions                Session catalog");
    println!("     GET  /sessions/<id>           One session");
    println!("     GET  /sessions/<id>/topics    Topic summaries");
    println!("     POST /sessions/<id>/seek      Time-range sample query");
    println!("     GET  /sessions/<id>/export    Full archive");
    println!("     GET  /health                  Health check");
    println!();
    println!("   View a session:");
    println!("     roboscope view --server {base}");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(roboscope_server::run_server(store, host, port)) {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
