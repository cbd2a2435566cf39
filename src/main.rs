//! Air Quality Heatmap Service - Main Binary
//!
//! A small HTTP service that answers one question: given an air quality
//! parameter and either a country or a coordinate+radius, what is every
//! monitoring location's latest reading, and what is the maximum? The
//! answer is shaped for a heatmap renderer.
//!
//! Usage:
//!   cargo run --release                # Serve on the configured port
//!   cargo run --release -- --port 9000 # Override the port
//!
//! Configuration:
//!   aqmap.toml in the working directory (optional, see config.rs)

use aqmap_service::client::OpenAqClient;
use aqmap_service::config::load_config;
use aqmap_service::endpoint;
use std::env;
use std::sync::Arc;

fn main() {
    println!("🌫  Air Quality Heatmap Service");
    println!("===============================\n");

    let mut config = load_config();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(port) => config.server.port = port,
                        Err(_) => {
                            eprintln!("Error: --port requires a valid port number");
                            std::process::exit(1);
                        }
                    }
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    println!("📊 Upstream API: {}", config.api.base_url);
    println!(
        "   Page size {}, {} attempts per call, {} ms backoff",
        config.api.page_size, config.api.retry_attempts, config.api.retry_backoff_ms
    );
    println!(
        "   Serving with {} workers, radius capped at {} m\n",
        config.server.workers, config.server.max_radius_meters
    );

    let client = Arc::new(OpenAqClient::new(&config.api));

    if let Err(e) = endpoint::start_endpoint_server(
        config.server.port,
        config.server.workers,
        config.server.max_radius_meters,
        client,
    ) {
        eprintln!("\n❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
