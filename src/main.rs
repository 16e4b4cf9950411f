//! RAX Files Service - Entry Point
//!
//! Directory and file management confined to a single sandbox root.
//!
//! Usage: `rax-files-service [--config <path>]`

use log::{error, info};
use std::process;

use rax_files_service::config::ServerConfig;
use rax_files_service::console::Console;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching files service...");

    let config = match config_path_from_args() {
        Some(path) => ServerConfig::load_from(&path),
        None => ServerConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let console = match Console::new(&config) {
        Ok(console) => console,
        Err(e) => {
            error!("Failed to open storage root {}: {}", config.storage_root, e);
            process::exit(1);
        }
    };

    if let Err(e) = console.start().await {
        error!("Console terminated: {}", e);
        process::exit(1);
    }
    info!("Files service stopped");
}

fn config_path_from_args() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}
