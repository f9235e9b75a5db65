//! Riddle generation server.
//!
//! Serves the generation endpoints backed by the built-in example bank and
//! the Gemini API. Reads the API credential from the `GOOGLE_API_KEY`
//! environment variable.
//!
//! # Usage
//!
//! ```sh
//! GOOGLE_API_KEY=... cargo run -p enigma-web
//! GOOGLE_API_KEY=... cargo run -p enigma-web -- --port 8080
//! GOOGLE_API_KEY=... cargo run -p enigma-web -- --model gemini-2.0-flash
//! GOOGLE_API_KEY=... cargo run -p enigma-web -- --static-dir ./site
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use enigma_rs::prelude::*;
use enigma_web::{WebConfig, spawn_web};
use tracing_subscriber::EnvFilter;

/// Riddle generation server backed by Gemini.
#[derive(Parser)]
#[command(name = "enigma-web")]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Model to use for generation calls.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Directory of static files served for non-API requests.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let client = match GeminiClient::from_env() {
        Ok(client) => client.with_model(&args.model),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    let bank = Arc::new(ExampleBank::builtin());
    let service = Arc::new(RiddleService::new(bank, client));

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        static_dir: args.static_dir,
    };
    let addr = spawn_web(service, config).await;
    println!("Riddle server: http://{addr}");

    // The server lives on a spawned task; park the main task for the
    // lifetime of the process.
    std::future::pending::<()>().await;
}
