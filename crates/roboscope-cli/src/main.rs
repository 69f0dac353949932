//! CLI for roboscope — scrub, zoom, and replay recorded robot telemetry.

mod client;
mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roboscope")]
#[command(about = "roboscope — windowed telemetry viewer for recorded robot sessions")]
#[command(version = roboscope_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive session viewer (TUI)
    View {
        /// Telemetry server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,

        /// Session to open (default: the most recent one)
        #[arg(long)]
        session: Option<String>,

        /// Comma-separated topic filter; default: every numeric topic
        #[arg(long)]
        topics: Option<String>,

        /// Max samples per fetch (1-10000)
        #[arg(long, default_value = "1000")]
        limit: usize,
    },

    /// List sessions in the catalog
    Sessions {
        /// Telemetry server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,

        /// Filter by source: "live" or "import"
        #[arg(long)]
        source: Option<String>,

        /// Print the raw JSON response instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a session's topics
    Topics {
        /// Telemetry server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,

        /// Session id
        session: String,

        /// Print the raw JSON response instead of a table
        #[arg(long)]
        json: bool,
    },

    /// One-shot time-range query against a session
    Seek {
        /// Telemetry server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,

        /// Session id
        session: String,

        /// Range start in seconds
        #[arg(long)]
        start: f64,

        /// Range end in seconds
        #[arg(long)]
        end: f64,

        /// Comma-separated topic filter
        #[arg(long)]
        topics: Option<String>,

        /// Max samples to return (1-10000)
        #[arg(long, default_value = "1000")]
        limit: usize,

        /// Print the raw JSON response instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Download a full session archive
    Export {
        /// Telemetry server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,

        /// Session id
        session: String,

        /// Output path (default: <session_id>.json)
        #[arg(long)]
        output: Option<String>,
    },

    /// Run the replay server over recorded session archives
    Serve {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Directory of session archive JSON files
        #[arg(long)]
        data: Option<String>,

        /// Also serve a generated demo session
        #[arg(long)]
        demo: bool,

        /// Demo session length in seconds
        #[arg(long, default_value = "60.0")]
        demo_duration: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::View {
            server,
            session,
            topics,
            limit,
        } => commands::view::run(&server, session.as_deref(), topics.as_deref(), limit),
        Commands::Sessions {
            server,
            source,
            json,
        } => commands::sessions::run(&server, source.as_deref(), json),
        Commands::Topics {
            server,
            session,
            json,
        } => commands::topics::run(&server, &session, json),
        Commands::Seek {
            server,
            session,
            start,
            end,
            topics,
            limit,
            json,
        } => commands::seek::run(&server, &session, start, end, topics.as_deref(), limit, json),
        Commands::Export {
            server,
            session,
            output,
        } => commands::export::run(&server, &session, output.as_deref()),
        Commands::Serve {
            host,
            port,
            data,
            demo,
            demo_duration,
        } => commands::serve::run(&host, port, data.as_deref(), demo, demo_duration),
    }
}
