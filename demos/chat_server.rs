//! Chat hub server example
//!
//! Run with: cargo run --example chat_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example chat_server                    # binds to 0.0.0.0:8080
//!   cargo run --example chat_server localhost          # binds to 127.0.0.1:8080
//!   cargo run --example chat_server 127.0.0.1:9001     # binds to 127.0.0.1:9001
//!
//! Connect with the client example from as many terminals as you like:
//!   cargo run --example chat_client localhost:8080
//!
//! Every line a client sends is delivered to every other connected
//! client. Disconnected clients are evicted; Ctrl+C hangs up on everyone
//! and exits.

use std::net::SocketAddr;

use wshub_rs::{HubServer, ServerConfig};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8080
/// - "localhost:9001" -> 127.0.0.1:9001
/// - "127.0.0.1" -> 127.0.0.1:8080
/// - "0.0.0.0:9001" -> 0.0.0.0:9001
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 8080;

    // Replace "localhost" with "127.0.0.1"
    let normalized = arg.replace("localhost", "127.0.0.1");

    // Try parsing as SocketAddr first (includes port)
    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // Try parsing as IP address without port
    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: chat_server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:8080)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  chat_server                     # binds to 0.0.0.0:8080");
    eprintln!("  chat_server localhost           # binds to 127.0.0.1:8080");
    eprintln!("  chat_server 127.0.0.1:9001      # binds to 127.0.0.1:9001");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:8080".parse().unwrap(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wshub_rs=debug".parse()?)
                .add_directive("chat_server=debug".parse()?),
        )
        .init();

    let config = ServerConfig::with_addr(bind_addr);

    println!("Starting chat hub on {}", config.bind_addr);
    println!();
    println!("Connect with: cargo run --example chat_client {}", config.bind_addr);
    println!();

    let server = HubServer::new(config);

    server
        .run_until(async {
            tokio::signal::ctrl_c().await.ok();
            println!("\nShutting down...");
        })
        .await?;

    Ok(())
}
