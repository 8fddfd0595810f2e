//! sleeptracker main entrypoint.

use sleeptracker::run;
use std::env;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = env::var("SLEEPTRACKER_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    println!();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
