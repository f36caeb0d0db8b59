//! Prints the status of the servers given on the command line.
//!
//! Arguments are domain names or `host:port` pairs. Set `RUST_LOG=debug`
//! to see what is going on.

use mcstatus::{Config, StatusClient};
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = Config::new();
    config.set_io_timeout(Duration::from_secs(5));
    let client = StatusClient::with_config(config);

    let names: Vec<_> = env::args().skip(1).collect();
    if names.is_empty() {
        println!("Usage: status <domain | host:port>...");
        return;
    }

    for name in names {
        let res = match name.rsplit_once(':') {
            Some((host, port)) => match port.parse() {
                Ok(port) => client.status_at(host, port).await,
                Err(_) => {
                    eprintln!("Invalid port in {}", name);
                    continue;
                }
            },
            None => client.status(&name).await,
        };
        match res {
            Ok(status) => {
                println!("Name: {}", status.name());
                match status.player_count() {
                    Some(count) => println!("Player count: {}", count),
                    None => println!("Player count: unknown"),
                }
                println!("MOTD: {}", status.motd().unwrap_or(""));
                println!(
                    "Supported versions: {}",
                    status.version().unwrap_or("")
                );
            }
            Err(err) => eprintln!("Error: {}", err),
        }
    }
}
