//! Serve command implementation
//!
//! Loads the configuration, connects to the three stores and runs the HTTP
//! server until a shutdown signal arrives.

use crate::adapters::source::create_record_source;
use crate::config::load_config;
use crate::domain::Store;
use crate::server::{self, AppState};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<String>,

    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Start even if a store does not answer the start-up ping
    #[arg(long)]
    pub skip_ping: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting serve command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let source = match create_record_source(&config.stores).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create record source");
                eprintln!("Failed to connect to the record stores: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if !self.skip_ping {
            for store in Store::ALL {
                if let Err(e) = source.ping(store).await {
                    tracing::error!(store = %store, error = %e, "Store did not answer");
                    eprintln!("The {store} store did not answer: {e}");
                    return Ok(4); // Connection error exit code
                }
            }
        }

        let state = AppState::from_config(&config, source);
        println!("Serving on http://{}", config.server.socket_address());

        match server::serve(&config.server, state, shutdown_signal).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Server failed");
                eprintln!("Server failed: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}
